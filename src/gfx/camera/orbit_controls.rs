use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, MouseScrollDelta, RawKeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::gfx::scene::{ObjectKind, ObjectRef, SceneObject};
use crate::render::{ControlsFactory, ViewerControls};

/// Limits applied while orbiting
#[derive(Debug, Clone, Copy)]
pub struct OrbitBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for OrbitBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: None,
            min_pitch: -std::f32::consts::PI / 2.0 + 0.001,
            max_pitch: std::f32::consts::PI / 2.0 - 0.001,
        }
    }
}

/// Input accumulated since the last `update`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct OrbitDelta {
    yaw: f32,
    pitch: f32,
    zoom: f32,
    pan: (f32, f32),
}

impl OrbitDelta {
    const REST: f32 = 1e-5;

    fn is_idle(&self) -> bool {
        self.yaw.abs() < Self::REST
            && self.pitch.abs() < Self::REST
            && self.zoom.abs() < Self::REST
            && self.pan.0.abs() < Self::REST
            && self.pan.1.abs() < Self::REST
    }

    fn scaled(&self, factor: f32) -> Self {
        Self {
            yaw: self.yaw * factor,
            pitch: self.pitch * factor,
            zoom: self.zoom * factor,
            pan: (self.pan.0 * factor, self.pan.1 * factor),
        }
    }
}

/// Orbit-style viewer controls bound to one camera object
///
/// Input is accumulated and only applied on [`update`](ViewerControls::update),
/// which is what the render trigger and the animation loop call every frame.
/// With damping enabled each update applies a fraction of the remaining input,
/// so the camera eases out over several frames.
pub struct OrbitControls {
    camera: ObjectRef,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub bounds: OrbitBounds,
    pending: OrbitDelta,
    is_mouse_pressed: bool,
    is_shift_held: bool,
    disposed: bool,
}

impl OrbitControls {
    pub fn new(camera: ObjectRef) -> Self {
        Self {
            camera,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.01,
            bounds: OrbitBounds::default(),
            pending: OrbitDelta::default(),
            is_mouse_pressed: false,
            is_shift_held: false,
            disposed: false,
        }
    }

    /// The camera object these controls drive
    pub fn camera(&self) -> &ObjectRef {
        &self.camera
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        if self.disposed {
            return;
        }
        self.pending.yaw += delta_yaw;
        self.pending.pitch += delta_pitch;
    }

    /// Positive values move away from the target
    pub fn zoom(&mut self, delta: f32) {
        if self.disposed {
            return;
        }
        self.pending.zoom += delta;
    }

    /// Pans relative to the current view (x = right, y = up)
    pub fn pan(&mut self, delta: (f32, f32)) {
        if self.disposed {
            return;
        }
        self.pending.pan.0 += delta.0;
        self.pending.pan.1 += delta.1;
    }

    /// Applies pending input to the camera. Returns true if the camera moved.
    pub fn apply_pending(&mut self) -> bool {
        if self.disposed || self.pending.is_idle() {
            self.pending = OrbitDelta::default();
            return false;
        }

        let step = if self.enable_damping {
            self.damping_factor.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let applied = self.pending.scaled(step);
        self.pending = self.pending.scaled(1.0 - step);

        let mut object = self.camera.borrow_mut();
        let SceneObject {
            transform, kind, ..
        } = &mut *object;
        let ObjectKind::Camera(camera) = kind else {
            return false;
        };

        let mut target = camera.target.to_vec();
        let offset = transform.position - target;
        let (mut distance, mut pitch, mut yaw) = spherical_from_offset(offset);

        yaw += applied.yaw;
        pitch = (pitch + applied.pitch).clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        distance = (distance * (1.0 + applied.zoom)).clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );

        if applied.pan != (0.0, 0.0) {
            let forward = (-offset).normalize();
            let right = forward.cross(camera.up).normalize();
            let up = right.cross(forward).normalize();
            // Scale by distance so panning feels the same at every zoom level
            let pan_scale = distance * 0.1;
            target += (right * applied.pan.0 + up * applied.pan.1) * pan_scale;
        }

        transform.position = cartesian_eye_position(pitch, yaw, distance, target);
        camera.target = Point3::from_vec(target);
        true
    }

    fn process_key(&mut self, event: &RawKeyEvent) {
        if let PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight) = event.physical_key {
            self.is_shift_held = event.state == ElementState::Pressed;
        }
    }
}

impl ViewerControls for OrbitControls {
    fn update(&mut self) -> bool {
        self.apply_pending() && !self.pending.is_idle()
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.pending = OrbitDelta::default();
        self.is_mouse_pressed = false;
    }

    fn handle_device_event(&mut self, event: &DeviceEvent) -> bool {
        if self.disposed {
            return false;
        }
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
                false
            }
            DeviceEvent::MouseWheel { delta } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32 * 0.01
                    }
                };
                self.zoom(scroll_amount * self.zoom_speed);
                true
            }
            DeviceEvent::MouseMotion { delta } => {
                if !self.is_mouse_pressed {
                    return false;
                }
                if self.is_shift_held {
                    self.pan((
                        -delta.0 as f32 * self.pan_speed,
                        delta.1 as f32 * self.pan_speed,
                    ));
                } else {
                    self.rotate(
                        -delta.0 as f32 * self.rotate_speed,
                        delta.1 as f32 * self.rotate_speed,
                    );
                }
                true
            }
            DeviceEvent::Key(key) => {
                self.process_key(key);
                false
            }
            _ => false,
        }
    }
}

/// Builds [`OrbitControls`] for every camera the root is handed
#[derive(Debug, Clone, Copy)]
pub struct OrbitControlsFactory {
    pub enable_damping: bool,
}

impl Default for OrbitControlsFactory {
    fn default() -> Self {
        Self {
            enable_damping: true,
        }
    }
}

impl ControlsFactory for OrbitControlsFactory {
    fn create(&self, camera: ObjectRef) -> Box<dyn ViewerControls> {
        let mut controls = OrbitControls::new(camera);
        controls.enable_damping = self.enable_damping;
        Box::new(controls)
    }
}

/// (distance, pitch, yaw) of an eye offset from its target
fn spherical_from_offset(offset: Vector3<f32>) -> (f32, f32, f32) {
    let distance = offset.magnitude();
    if distance <= f32::EPSILON {
        return (f32::EPSILON, 0.0, 0.0);
    }
    let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
    let yaw = offset.x.atan2(offset.z);
    (distance, pitch, yaw)
}

fn cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}
