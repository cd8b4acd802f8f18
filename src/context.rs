//! # Scene Context
//!
//! The set of shared handles a [`SceneRoot`](crate::root::SceneRoot) publishes
//! to the adapters mounted beneath it. Instead of an ambient provide/inject
//! lookup, the root hands out a [`SceneContext`] value and each adapter
//! receives it explicitly on mount.
//!
//! Every entry is optional: a context taken from a root that has not mounted
//! yet (or has already unmounted) is empty, and adapters mounted with it
//! report [`SceneError::MissingContext`] instead of touching the scene.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::SceneError;
use crate::gfx::camera::PerspectiveCamera;
use crate::gfx::scene::{ObjectRef, SceneHandle};
use crate::render::RendererHandle;
use crate::ui::DebugPanelHandle;

/// Names of the context entries, as hosts and diagnostics know them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKey {
    Scene,
    Camera,
    Renderer,
    AnimateScene,
    WidthScene,
    HeightScene,
    Render,
    SetCamera,
    Gui,
}

impl ContextKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKey::Scene => "scene",
            ContextKey::Camera => "camera",
            ContextKey::Renderer => "renderer",
            ContextKey::AnimateScene => "animateScene",
            ContextKey::WidthScene => "widthScene",
            ContextKey::HeightScene => "heightScene",
            ContextKey::Render => "render",
            ContextKey::SetCamera => "setCamera",
            ContextKey::Gui => "gui",
        }
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-slot holder for the active camera.
///
/// Readers always go through the slot, so replacing the camera is visible to
/// every holder at once and nothing keeps drawing through a stale camera.
#[derive(Debug, Clone)]
pub struct CameraSlot(Rc<RefCell<ObjectRef>>);

impl CameraSlot {
    pub fn new(camera: ObjectRef) -> Self {
        Self(Rc::new(RefCell::new(camera)))
    }

    /// The camera that is active right now
    pub fn get(&self) -> ObjectRef {
        self.0.borrow().clone()
    }

    /// Installs `camera`, returning the one it replaced
    pub fn replace(&self, camera: ObjectRef) -> ObjectRef {
        self.0.replace(camera)
    }

    pub fn is_active(&self, camera: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0.borrow(), camera)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        PerspectiveCamera::aspect_for(self.width, self.height)
    }
}

/// Reactive viewport size (`widthScene` / `heightScene`)
#[derive(Debug, Clone, Default)]
pub struct Viewport(Rc<Cell<ViewportSize>>);

impl Viewport {
    pub fn new(size: ViewportSize) -> Self {
        Self(Rc::new(Cell::new(size)))
    }

    pub fn get(&self) -> ViewportSize {
        self.0.get()
    }

    pub fn width(&self) -> f32 {
        self.0.get().width
    }

    pub fn height(&self) -> f32 {
        self.0.get().height
    }

    /// Stores a new size. Returns true if it differs from the previous one.
    pub fn set(&self, size: ViewportSize) -> bool {
        self.0.replace(size) != size
    }
}

/// Whether the root's animation loop owns the redraw cadence
#[derive(Debug, Clone, Default)]
pub struct AnimateFlag(Rc<Cell<bool>>);

impl AnimateFlag {
    pub fn new(value: bool) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    pub fn get(&self) -> bool {
        self.0.get()
    }

    pub fn set(&self, value: bool) {
        self.0.set(value);
    }
}

/// "Update controls, refresh projection, draw one frame". Safe to call redundantly.
#[derive(Clone)]
pub struct RenderTrigger(Rc<dyn Fn()>);

impl RenderTrigger {
    pub fn new(render: impl Fn() + 'static) -> Self {
        Self(Rc::new(render))
    }

    pub fn trigger(&self) {
        (self.0)();
    }
}

impl fmt::Debug for RenderTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenderTrigger(..)")
    }
}

/// Camera replacement operation published by the root
#[derive(Clone)]
pub struct SetCamera(Rc<dyn Fn(ObjectRef)>);

impl SetCamera {
    pub fn new(set: impl Fn(ObjectRef) + 'static) -> Self {
        Self(Rc::new(set))
    }

    pub fn call(&self, camera: ObjectRef) {
        (self.0)(camera);
    }
}

impl fmt::Debug for SetCamera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SetCamera(..)")
    }
}

/// The Context Registry handed from a root to its adapters
#[derive(Clone, Default)]
pub struct SceneContext {
    pub scene: Option<SceneHandle>,
    pub camera: Option<CameraSlot>,
    pub renderer: Option<RendererHandle>,
    pub animate: AnimateFlag,
    pub viewport: Option<Viewport>,
    pub render: Option<RenderTrigger>,
    pub set_camera: Option<SetCamera>,
    pub gui: Option<DebugPanelHandle>,
}

impl SceneContext {
    /// A context with nothing published
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn require_scene(&self, component: &'static str) -> Result<SceneHandle, SceneError> {
        self.scene
            .clone()
            .ok_or_else(|| SceneError::missing(component, ContextKey::Scene))
    }

    pub fn require_camera(&self, component: &'static str) -> Result<CameraSlot, SceneError> {
        self.camera
            .clone()
            .ok_or_else(|| SceneError::missing(component, ContextKey::Camera))
    }

    pub fn require_renderer(&self, component: &'static str) -> Result<RendererHandle, SceneError> {
        self.renderer
            .clone()
            .ok_or_else(|| SceneError::missing(component, ContextKey::Renderer))
    }

    pub fn require_set_camera(&self, component: &'static str) -> Result<SetCamera, SceneError> {
        self.set_camera
            .clone()
            .ok_or_else(|| SceneError::missing(component, ContextKey::SetCamera))
    }

    pub fn is_animating(&self) -> bool {
        self.animate.get()
    }

    /// Current viewport aspect ratio, or 1 when no viewport was published
    pub fn viewport_aspect(&self) -> f32 {
        self.viewport.as_ref().map_or(1.0, |v| v.get().aspect())
    }

    /// Requests one frame after a mutation.
    ///
    /// Skipped while the animation loop is running: the next scheduled frame
    /// picks the change up. Returns true if a frame was requested.
    pub fn request_redraw(&self) -> bool {
        if self.is_animating() {
            return false;
        }
        match &self.render {
            Some(render) => {
                render.trigger();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for SceneContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneContext")
            .field("scene", &self.scene.is_some())
            .field("camera", &self.camera.is_some())
            .field("renderer", &self.renderer.is_some())
            .field("animate", &self.animate.get())
            .field("viewport", &self.viewport.as_ref().map(Viewport::get))
            .field("render", &self.render.is_some())
            .field("set_camera", &self.set_camera.is_some())
            .field("gui", &self.gui.is_some())
            .finish()
    }
}
