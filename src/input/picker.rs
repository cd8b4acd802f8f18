//! Pointer picking and drag-on-plane
//!
//! A pointer press casts a ray from the active camera through the pointer and
//! selects the nearest object it hits. While the pointer is held, the selected
//! object follows the pointer across a plane that faces the camera and passes
//! through the object, keeping the offset between the object and the point
//! that was grabbed. Releasing ends the drag.

use cgmath::{Vector3, Zero};

use super::pointer::{PointerEvent, PointerPhase};
use crate::adapters::{report, Lifecycle};
use crate::context::SceneContext;
use crate::error::SceneError;
use crate::gfx::picking::{Plane, Raycaster};
use crate::gfx::scene::ObjectRef;

const COMPONENT: &str = "PointerPicker";

/// What a pointer event did to the selection
#[derive(Debug, Clone)]
pub enum PickEvent {
    Selected(ObjectRef),
    Dragged(ObjectRef),
    Released(ObjectRef),
}

impl PickEvent {
    pub fn object(&self) -> &ObjectRef {
        match self {
            PickEvent::Selected(object)
            | PickEvent::Dragged(object)
            | PickEvent::Released(object) => object,
        }
    }
}

#[derive(Debug, Default)]
enum PickState {
    #[default]
    Idle,
    Dragging {
        object: ObjectRef,
        plane: Plane,
        offset: Vector3<f32>,
    },
}

type PickListener = Box<dyn FnMut(&PickEvent)>;

/// Selects and drags scene objects with the pointer
#[derive(Default)]
pub struct PointerPicker {
    lifecycle: Lifecycle,
    ctx: Option<SceneContext>,
    raycaster: Raycaster,
    state: PickState,
    listeners: Vec<PickListener>,
}

impl PointerPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls `listener` for every selection, drag step and release
    pub fn subscribe(&mut self, listener: impl FnMut(&PickEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Starts listening. Needs the scene, the camera and the renderer.
    pub fn mount(&mut self, ctx: &SceneContext) -> Result<(), SceneError> {
        if self.lifecycle == Lifecycle::Mounted {
            return Ok(());
        }
        ctx.require_scene(COMPONENT).map_err(report)?;
        ctx.require_camera(COMPONENT).map_err(report)?;
        ctx.require_renderer(COMPONENT).map_err(report)?;

        self.ctx = Some(ctx.clone());
        self.lifecycle = Lifecycle::Mounted;
        Ok(())
    }

    /// Stops listening and drops any selection
    pub fn unmount(&mut self) {
        self.state = PickState::Idle;
        self.ctx = None;
        if self.lifecycle == Lifecycle::Mounted {
            self.lifecycle = Lifecycle::Unmounted;
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, PickState::Dragging { .. })
    }

    pub fn selected(&self) -> Option<ObjectRef> {
        match &self.state {
            PickState::Dragging { object, .. } => Some(object.clone()),
            PickState::Idle => None,
        }
    }

    /// Feeds one pointer event through the picker
    pub fn handle(&mut self, event: PointerEvent) -> Option<PickEvent> {
        if self.lifecycle != Lifecycle::Mounted {
            return None;
        }
        let picked = match event.phase {
            PointerPhase::Down => self.pointer_down(event.x, event.y),
            PointerPhase::Move => self.pointer_move(event.x, event.y),
            PointerPhase::Up => self.pointer_up(),
        }?;
        for listener in &mut self.listeners {
            listener(&picked);
        }
        Some(picked)
    }

    /// Aims the raycaster through the pointer. False if the pointer is off the surface.
    fn aim(&mut self, x: f32, y: f32, require_inside: bool) -> bool {
        let Some(ctx) = &self.ctx else {
            return false;
        };
        let (Some(renderer), Some(camera)) = (&ctx.renderer, &ctx.camera) else {
            return false;
        };
        let rect = renderer.borrow().surface_rect();
        if require_inside && !rect.contains(x, y) {
            return false;
        }
        let Some(ndc) = rect.to_ndc(x, y) else {
            return false;
        };
        let camera = camera.get();
        let camera = camera.borrow();
        self.raycaster.set_from_camera(ndc, &camera)
    }

    fn pointer_down(&mut self, x: f32, y: f32) -> Option<PickEvent> {
        if self.is_dragging() {
            log::debug!("pointer down while dragging; ignored");
            return None;
        }
        if !self.aim(x, y, true) {
            return None;
        }
        let ctx = self.ctx.as_ref()?;
        let scene = ctx.scene.as_ref()?;

        let hit = {
            let scene = scene.borrow();
            self.raycaster
                .intersect_objects(scene.children(), true)
                .into_iter()
                .next()
        }?;

        let camera = ctx.camera.as_ref()?.get();
        let normal = {
            let camera = camera.borrow();
            let eye = camera.transform.position;
            camera.as_camera()?.world_direction(eye)
        };
        let position = hit.object.borrow().transform.position;
        let plane = Plane::from_normal_and_coplanar_point(normal, position);
        let offset = self
            .raycaster
            .ray
            .intersect_plane(&plane)
            .map_or(Vector3::zero(), |grabbed| grabbed - position);

        log::debug!("selected `{}`", hit.object.borrow().name);
        self.state = PickState::Dragging {
            object: hit.object.clone(),
            plane,
            offset,
        };
        Some(PickEvent::Selected(hit.object))
    }

    fn pointer_move(&mut self, x: f32, y: f32) -> Option<PickEvent> {
        if !self.is_dragging() || !self.aim(x, y, false) {
            return None;
        }
        let PickState::Dragging {
            object,
            plane,
            offset,
        } = &self.state
        else {
            return None;
        };
        let point = self.raycaster.ray.intersect_plane(plane)?;
        object.borrow_mut().transform.position = point - *offset;
        let object = object.clone();

        if let Some(ctx) = &self.ctx {
            ctx.request_redraw();
        }
        Some(PickEvent::Dragged(object))
    }

    fn pointer_up(&mut self) -> Option<PickEvent> {
        match std::mem::take(&mut self.state) {
            PickState::Dragging { object, .. } => Some(PickEvent::Released(object)),
            PickState::Idle => None,
        }
    }
}
