//! # Rendering Collaborators
//!
//! The binding layer never draws anything itself. It talks to the host's
//! rendering stack through the traits in this module:
//!
//! - [`Renderer`] - the drawing surface: sizing, clear color, one-frame draws
//! - [`FrameScheduler`] - the host's frame pacing (one callback per displayed frame)
//! - [`ViewerControls`] / [`ControlsFactory`] - orbit-style camera input
//!
//! [`RedrawScheduler`] implements frame pacing on top of a winit window.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use cgmath::Vector2;
use winit::{event::DeviceEvent, window::Window};

use crate::color::Color;
use crate::gfx::scene::{ObjectRef, Scene, SceneObject};

/// Screen-space box of the drawing surface, in the same coordinates as pointer events
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Maps a pointer position to normalized device coordinates (-1 to 1, y up)
    ///
    /// Returns None for an empty surface.
    pub fn to_ndc(&self, x: f32, y: f32) -> Option<Vector2<f32>> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(Vector2::new(
            ((x - self.x) / self.width) * 2.0 - 1.0,
            -((y - self.y) / self.height) * 2.0 + 1.0,
        ))
    }
}

/// The drawing surface owned by a scene root
pub trait Renderer {
    /// Resizes the drawing buffer
    fn set_size(&mut self, width: f32, height: f32);

    fn set_clear_color(&mut self, color: Color);

    /// Inserts the drawing surface into the host container
    fn attach_surface(&mut self) {}

    /// Where the surface currently sits on screen
    fn surface_rect(&self) -> SurfaceRect;

    /// Draws one frame of `scene` as seen from `camera`
    fn render(&mut self, scene: &Scene, camera: &SceneObject);

    /// Releases GPU and surface resources
    fn dispose(&mut self);
}

/// Shared renderer handle published through the scene context
pub type RendererHandle = Rc<RefCell<dyn Renderer>>;

/// Identifies one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host frame pacing, the `requestAnimationFrame` of the embedding environment.
///
/// The host calls [`SceneRoot::on_animation_frame`](crate::root::SceneRoot::on_animation_frame)
/// with the handle once the frame is due.
pub trait FrameScheduler {
    fn request_frame(&self) -> FrameHandle;
    fn cancel_frame(&self, handle: FrameHandle);
}

/// Orbit-style input handler bound to one camera
pub trait ViewerControls {
    /// Applies accumulated input to the camera.
    ///
    /// Returns true while the camera is still easing towards its target and
    /// needs further frames.
    fn update(&mut self) -> bool;

    /// Detaches from input; later calls must be no-ops
    fn dispose(&mut self);

    /// Accumulates raw input. Returns true if the event will move the camera.
    fn handle_device_event(&mut self, _event: &DeviceEvent) -> bool {
        false
    }
}

/// Builds viewer controls for a camera
pub trait ControlsFactory {
    fn create(&self, camera: ObjectRef) -> Box<dyn ViewerControls>;
}

/// Frame scheduler backed by `Window::request_redraw`
///
/// Hand the pending handle back to the root from `WindowEvent::RedrawRequested`:
///
/// ```no_run
/// # use scenebind::render::RedrawScheduler;
/// # use scenebind::root::SceneRoot;
/// # fn on_redraw(scheduler: &RedrawScheduler, root: &mut SceneRoot) {
/// if let Some(handle) = scheduler.take_pending() {
///     root.on_animation_frame(handle);
/// }
/// # }
/// ```
pub struct RedrawScheduler {
    window: Arc<Window>,
    next: Cell<u64>,
    pending: Cell<Option<FrameHandle>>,
}

impl RedrawScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next: Cell::new(1),
            pending: Cell::new(None),
        }
    }

    /// Takes the frame that is waiting for the next redraw, if any
    pub fn take_pending(&self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&self) -> FrameHandle {
        let handle = FrameHandle(self.next.get());
        self.next.set(handle.0 + 1);
        self.pending.set(Some(handle));
        self.window.request_redraw();
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        if self.pending.get() == Some(handle) {
            self.pending.set(None);
        }
    }
}
