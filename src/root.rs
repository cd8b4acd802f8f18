//! # Scene Root Controller
//!
//! [`SceneRoot`] owns the renderer, the default camera, the viewer controls,
//! the animation loop and the debug panel slot for one mounted scene. Once
//! mounted it publishes a [`SceneContext`] that every adapter below it
//! receives explicitly.
//!
//! ## Lifecycle
//!
//! 1. [`SceneRoot::new`] - builds the scene and default camera, touches nothing external
//! 2. [`SceneRoot::mount`] - sizes and attaches the renderer, builds controls,
//!    publishes the context, draws the first frame, starts the loop if animating
//! 3. [`SceneRoot::update`] / [`SceneRoot::resize`] - reconcile configuration and viewport changes
//! 4. [`SceneRoot::unmount`] - stops the loop, disposes controls and renderer, destroys the panel
//!
//! ## Usage
//!
//! ```no_run
//! use std::rc::Rc;
//! use scenebind::prelude::*;
//!
//! # fn host(renderer: RendererHandle, frames: Rc<dyn FrameScheduler>) {
//! let backend = SceneBackend::new(renderer, frames);
//! let mut root = SceneRoot::new(SceneProps::default().with_animate(true), backend);
//! root.mount(ViewportSize::new(800.0, 600.0));
//!
//! let mut ground = GroundAdapter::new(GroundProps::default());
//! ground.mount(&root.context()).ok();
//! # }
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use cgmath::Vector3;
use winit::event::DeviceEvent;

use crate::animation::AnimationLoop;
use crate::color::Color;
use crate::context::{
    AnimateFlag, CameraSlot, RenderTrigger, SceneContext, SetCamera, Viewport, ViewportSize,
};
use crate::gfx::camera::{OrbitControlsFactory, PerspectiveCamera};
use crate::gfx::scene::{ObjectRef, SceneHandle, SceneObject};
use crate::render::{ControlsFactory, FrameHandle, FrameScheduler, RendererHandle, ViewerControls};
use crate::ui::DebugPanelHandle;

/// Root configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SceneProps {
    pub background_color: Color,
    pub animate: bool,
    pub show_debug_panel: bool,
}

impl Default for SceneProps {
    fn default() -> Self {
        Self {
            background_color: Color::BLACK,
            animate: false,
            show_debug_panel: false,
        }
    }
}

impl SceneProps {
    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_animate(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn with_debug_panel(mut self, show: bool) -> Self {
        self.show_debug_panel = show;
        self
    }
}

/// External collaborators a root draws and schedules through
pub struct SceneBackend {
    pub renderer: RendererHandle,
    pub controls: Rc<dyn ControlsFactory>,
    pub frames: Rc<dyn FrameScheduler>,
}

impl SceneBackend {
    /// Backend with damped orbit controls
    pub fn new(renderer: RendererHandle, frames: Rc<dyn FrameScheduler>) -> Self {
        Self {
            renderer,
            controls: Rc::new(OrbitControlsFactory::default()),
            frames,
        }
    }

    pub fn with_controls(mut self, controls: Rc<dyn ControlsFactory>) -> Self {
        self.controls = controls;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootState {
    Created,
    Mounted,
    Unmounted,
}

/// Everything one frame needs, shared with the render trigger and camera setter
struct Stage {
    scene: SceneHandle,
    camera: CameraSlot,
    renderer: RendererHandle,
    controls_factory: Rc<dyn ControlsFactory>,
    controls: Option<Box<dyn ViewerControls>>,
    frames: Rc<dyn FrameScheduler>,
    animate: AnimateFlag,
    /// Follow-up frame requested while damped controls settle outside the loop
    settle_frame: Option<FrameHandle>,
}

impl Stage {
    /// Update controls, refresh camera projection, draw one frame
    fn render(&mut self) {
        let settling = self
            .controls
            .as_mut()
            .is_some_and(|controls| controls.update());

        let camera = self.camera.get();
        if let Some(data) = camera.borrow_mut().as_camera_mut() {
            data.update_projection_matrix();
        }

        {
            let scene = self.scene.borrow();
            let camera = camera.borrow();
            self.renderer.borrow_mut().render(&scene, &camera);
        }

        if settling && !self.animate.get() && self.settle_frame.is_none() {
            self.settle_frame = Some(self.frames.request_frame());
        }
    }

    /// Draws the follow-up frame if `handle` is the one this stage asked for
    fn settle(&mut self, handle: FrameHandle) -> bool {
        if self.settle_frame != Some(handle) {
            return false;
        }
        self.settle_frame = None;
        self.render();
        true
    }

    fn cancel_settle_frame(&mut self) {
        if let Some(handle) = self.settle_frame.take() {
            self.frames.cancel_frame(handle);
        }
    }

    /// Disposes the current controls and binds fresh ones to the active camera
    fn rebind_controls(&mut self) {
        if let Some(mut previous) = self.controls.take() {
            previous.dispose();
        }
        self.controls = Some(self.controls_factory.create(self.camera.get()));
    }

    fn dispose_controls(&mut self) {
        if let Some(mut controls) = self.controls.take() {
            controls.dispose();
        }
    }
}

fn render_trigger(stage: Weak<RefCell<Stage>>) -> RenderTrigger {
    RenderTrigger::new(move || {
        let Some(stage) = stage.upgrade() else {
            return;
        };
        match stage.try_borrow_mut() {
            Ok(mut stage) => stage.render(),
            Err(_) => log::debug!("render requested while a frame is in progress; skipped"),
        };
    })
}

fn camera_setter(stage: Weak<RefCell<Stage>>) -> SetCamera {
    SetCamera::new(move |camera: ObjectRef| {
        let Some(stage) = stage.upgrade() else {
            log::warn!("setCamera called on an unmounted scene; ignored");
            return;
        };
        let Ok(mut stage) = stage.try_borrow_mut() else {
            log::error!("setCamera called while a frame is in progress; ignored");
            return;
        };
        stage.camera.replace(camera);
        stage.rebind_controls();
        log::debug!("active camera replaced");
        stage.render();
    })
}

/// Scene Root Controller
pub struct SceneRoot {
    props: SceneProps,
    state: RootState,
    scene: SceneHandle,
    camera: CameraSlot,
    viewport: Viewport,
    animate: AnimateFlag,
    panel: DebugPanelHandle,
    renderer: RendererHandle,
    controls_factory: Rc<dyn ControlsFactory>,
    frames: Rc<dyn FrameScheduler>,
    animation: AnimationLoop,
    stage: Option<Rc<RefCell<Stage>>>,
    context: SceneContext,
}

impl SceneRoot {
    pub fn new(props: SceneProps, backend: SceneBackend) -> Self {
        let mut default_camera = SceneObject::camera(
            "Default Camera",
            PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0),
        );
        default_camera.transform.position = Vector3::new(0.0, 1.0, 5.0);

        let animate = AnimateFlag::new(props.animate);
        Self {
            props,
            state: RootState::Created,
            scene: SceneHandle::new(),
            camera: CameraSlot::new(default_camera.into_ref()),
            viewport: Viewport::default(),
            animate,
            panel: DebugPanelHandle::new(),
            renderer: backend.renderer,
            controls_factory: backend.controls,
            frames: backend.frames,
            animation: AnimationLoop::new(),
            stage: None,
            context: SceneContext::empty(),
        }
    }

    /// Builds the drawing state for `viewport`, publishes the context and draws
    /// the first frame. Mounting twice is a no-op.
    pub fn mount(&mut self, viewport: ViewportSize) {
        if self.state != RootState::Created {
            log::warn!("scene root can only be mounted once; ignoring mount");
            return;
        }

        self.viewport.set(viewport);
        if let Some(camera) = self.camera.get().borrow_mut().as_camera_mut() {
            camera.aspect = viewport.aspect();
            camera.update_projection_matrix();
        }

        {
            let mut renderer = self.renderer.borrow_mut();
            renderer.set_size(viewport.width, viewport.height);
            renderer.set_clear_color(self.props.background_color);
            renderer.attach_surface();
        }
        self.scene.borrow_mut().background = Some(self.props.background_color);

        let stage = Rc::new(RefCell::new(Stage {
            scene: self.scene.clone(),
            camera: self.camera.clone(),
            renderer: self.renderer.clone(),
            controls_factory: self.controls_factory.clone(),
            controls: None,
            frames: self.frames.clone(),
            animate: self.animate.clone(),
            settle_frame: None,
        }));
        stage.borrow_mut().rebind_controls();

        if self.props.show_debug_panel {
            self.panel.create();
            self.panel
                .add_object_controls(&self.camera.get(), "Camera Controls", None);
        }

        self.context = SceneContext {
            scene: Some(self.scene.clone()),
            camera: Some(self.camera.clone()),
            renderer: Some(self.renderer.clone()),
            animate: self.animate.clone(),
            viewport: Some(self.viewport.clone()),
            render: Some(render_trigger(Rc::downgrade(&stage))),
            set_camera: Some(camera_setter(Rc::downgrade(&stage))),
            gui: Some(self.panel.clone()),
        };

        stage.borrow_mut().render();
        self.stage = Some(stage);
        self.state = RootState::Mounted;
        log::info!(
            "scene root mounted at {}x{}",
            viewport.width,
            viewport.height
        );

        if self.animate.get() {
            self.animation.start(self.frames.as_ref());
        }
    }

    /// Tears the scene down. Safe to call repeatedly, or before `mount`.
    pub fn unmount(&mut self) {
        if self.state != RootState::Mounted {
            self.state = RootState::Unmounted;
            return;
        }

        self.animation.stop(self.frames.as_ref());
        if let Some(stage) = self.stage.take() {
            let mut stage = stage.borrow_mut();
            stage.cancel_settle_frame();
            stage.dispose_controls();
        }
        self.renderer.borrow_mut().dispose();
        self.panel.destroy();
        self.context = SceneContext::empty();
        self.state = RootState::Unmounted;
        log::info!("scene root unmounted");
    }

    /// Applies the difference between the current and `props`
    pub fn update(&mut self, props: SceneProps) {
        let previous = std::mem::replace(&mut self.props, props.clone());
        if self.state != RootState::Mounted {
            self.animate.set(props.animate);
            return;
        }

        if previous.background_color != props.background_color {
            self.renderer
                .borrow_mut()
                .set_clear_color(props.background_color);
            self.scene.borrow_mut().background = Some(props.background_color);
            self.context.request_redraw();
        }

        if previous.animate != props.animate {
            self.set_animating(props.animate);
        }

        if previous.show_debug_panel != props.show_debug_panel {
            if props.show_debug_panel {
                self.panel.create();
            } else {
                self.panel.destroy();
            }
        }
    }

    fn set_animating(&mut self, animate: bool) {
        if animate {
            self.animate.set(true);
            if let Some(stage) = &self.stage {
                stage.borrow_mut().cancel_settle_frame();
            }
            self.animation.start(self.frames.as_ref());
        } else {
            self.animation.stop(self.frames.as_ref());
            self.animate.set(false);
        }
    }

    /// Reacts to a new viewport size: camera aspect, projection, renderer size, one frame.
    ///
    /// Before mount the size is only recorded.
    pub fn resize(&mut self, size: ViewportSize) {
        let changed = self.viewport.set(size);
        if !changed || self.state != RootState::Mounted {
            return;
        }

        if let Some(camera) = self.camera.get().borrow_mut().as_camera_mut() {
            camera.aspect = size.aspect();
            camera.update_projection_matrix();
        }
        self.renderer.borrow_mut().set_size(size.width, size.height);
        self.render();
    }

    /// Host callback for a due animation frame
    pub fn on_animation_frame(&mut self, handle: FrameHandle) {
        let Some(stage) = self.stage.clone() else {
            return;
        };
        if stage.borrow_mut().settle(handle) {
            return;
        }
        self.animation
            .advance(handle, self.frames.as_ref(), || stage.borrow_mut().render());
    }

    /// Draws one frame now
    pub fn render(&self) {
        if let Some(render) = &self.context.render {
            render.trigger();
        }
    }

    /// Makes `camera` the active camera and rebinds the viewer controls to it
    pub fn set_camera(&self, camera: ObjectRef) {
        match &self.context.set_camera {
            Some(set_camera) => set_camera.call(camera),
            None => log::warn!("set_camera before mount; ignored"),
        }
    }

    /// Forwards raw device input to the active viewer controls, requesting a
    /// frame when the input moves the camera
    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        let Some(stage) = &self.stage else {
            return;
        };
        let moved = stage
            .borrow_mut()
            .controls
            .as_mut()
            .is_some_and(|controls| controls.handle_device_event(event));
        if moved {
            self.context.request_redraw();
        }
    }

    /// Draws the debug panel, requesting a frame if a control changed the scene
    pub fn draw_debug_panel(&self, ui: &imgui::Ui) -> bool {
        let changed = self.panel.draw(ui);
        if changed {
            self.context.request_redraw();
        }
        changed
    }

    /// The published context; empty before mount and after unmount
    pub fn context(&self) -> SceneContext {
        self.context.clone()
    }

    pub fn props(&self) -> &SceneProps {
        &self.props
    }

    pub fn scene(&self) -> &SceneHandle {
        &self.scene
    }

    /// The camera currently used for drawing
    pub fn active_camera(&self) -> ObjectRef {
        self.camera.get()
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport.get()
    }

    pub fn debug_panel(&self) -> &DebugPanelHandle {
        &self.panel
    }

    pub fn is_mounted(&self) -> bool {
        self.state == RootState::Mounted
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_running()
    }
}

impl Drop for SceneRoot {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        init_logging, mounted_root, test_backend, RecordingRenderer, TestBackend, TestFrames,
    };
    use cgmath::InnerSpace;
    use winit::event::{ElementState, MouseScrollDelta};

    /// A root driven by real orbit controls
    fn orbit_root(
        props: SceneProps,
        enable_damping: bool,
    ) -> (SceneRoot, Rc<RefCell<RecordingRenderer>>, Rc<TestFrames>) {
        init_logging();
        let TestBackend {
            backend,
            renderer,
            frames,
            ..
        } = test_backend();
        let backend = backend.with_controls(Rc::new(OrbitControlsFactory { enable_damping }));
        let mut root = SceneRoot::new(props, backend);
        root.mount(ViewportSize::new(800.0, 600.0));
        (root, renderer, frames)
    }

    fn left_button(state: ElementState) -> DeviceEvent {
        DeviceEvent::Button { button: 0, state }
    }

    fn camera_position(root: &SceneRoot) -> Vector3<f32> {
        root.active_camera().borrow().transform.position
    }

    #[test]
    fn test_mount_draws_once_and_publishes_context() {
        let TestBackend {
            backend,
            renderer,
            controls,
            ..
        } = test_backend();
        let mut root = SceneRoot::new(
            SceneProps::default().with_background_color(Color::from(0x102030)),
            backend,
        );
        assert!(root.context().scene.is_none());

        root.mount(ViewportSize::new(800.0, 600.0));

        let r = renderer.borrow();
        assert_eq!(r.renders, 1);
        assert_eq!(r.sizes, vec![(800.0, 600.0)]);
        assert_eq!(r.clear_colors, vec![Color::from(0x102030)]);
        assert!(r.attached);
        assert_eq!(controls.live(), 1);

        let ctx = root.context();
        assert!(ctx.scene.is_some() && ctx.render.is_some() && ctx.set_camera.is_some());
        assert!(!ctx.is_animating());
        let camera = root.active_camera();
        let aspect = camera.borrow().as_camera().unwrap().aspect;
        assert!((aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_mount_twice_is_ignored() {
        let (mut root, t) = mounted_root(SceneProps::default());
        root.mount(ViewportSize::new(10.0, 10.0));
        assert_eq!(t.renderer.borrow().renders, 1);
        assert_eq!(t.controls.created(), 1);
    }

    #[test]
    fn test_resize_updates_aspect_and_renderer_once() {
        let (mut root, t) = mounted_root(SceneProps::default().with_animate(true));
        let requested_before = t.frames.requested().len();

        root.resize(ViewportSize::new(400.0, 300.0));
        root.resize(ViewportSize::new(400.0, 300.0));

        let camera = root.active_camera();
        let aspect = camera.borrow().as_camera().unwrap().aspect;
        assert!((aspect - 400.0 / 300.0).abs() < 1e-6);
        assert_eq!(
            t.renderer.borrow().sizes,
            vec![(800.0, 600.0), (400.0, 300.0)]
        );
        // The loop keeps its outstanding frame
        assert_eq!(t.frames.requested().len(), requested_before);
        assert!(t.frames.cancelled().is_empty());
    }

    #[test]
    fn test_resize_before_mount_only_records() {
        let TestBackend {
            backend, renderer, ..
        } = test_backend();
        let mut root = SceneRoot::new(SceneProps::default(), backend);
        root.resize(ViewportSize::new(400.0, 300.0));

        assert!(renderer.borrow().sizes.is_empty());
        assert_eq!(renderer.borrow().renders, 0);
        assert_eq!(root.viewport(), ViewportSize::new(400.0, 300.0));
    }

    #[test]
    fn test_animation_loop_toggle() {
        let (mut root, t) = mounted_root(SceneProps::default().with_animate(true));
        assert!(root.is_animating());

        let due = t.frames.last_requested().unwrap();
        root.on_animation_frame(due);
        assert_eq!(t.renderer.borrow().renders, 2);

        let due = t.frames.last_requested().unwrap();
        root.update(SceneProps::default().with_animate(false));
        assert!(!root.is_animating());
        assert_eq!(t.frames.cancelled(), vec![due]);
        assert!(!root.context().is_animating());

        // A frame that was already in flight draws nothing
        root.on_animation_frame(due);
        assert_eq!(t.renderer.borrow().renders, 2);

        root.update(SceneProps::default().with_animate(true));
        assert!(root.is_animating());
        root.on_animation_frame(t.frames.last_requested().unwrap());
        assert_eq!(t.renderer.borrow().renders, 3);
    }

    #[test]
    fn test_set_camera_twice_keeps_one_live_controls() {
        let (root, t) = mounted_root(SceneProps::default());
        let first = SceneObject::camera("first", PerspectiveCamera::default()).into_ref();
        let second = SceneObject::camera("second", PerspectiveCamera::default()).into_ref();

        root.set_camera(first);
        root.set_camera(second.clone());

        assert!(Rc::ptr_eq(&root.active_camera(), &second));
        assert_eq!(t.controls.live(), 1);
        assert_eq!(t.controls.created(), 3);
        assert!(Rc::ptr_eq(&t.controls.last_camera().unwrap(), &second));

        let r = t.renderer.borrow();
        assert_eq!(r.renders, 3);
        assert_eq!(r.last_camera, Some(second.borrow().id()));
    }

    #[test]
    fn test_unmount_is_idempotent() {
        let (mut root, t) = mounted_root(SceneProps::default().with_animate(true));
        let render = root.context().render.unwrap();

        root.unmount();
        root.unmount();

        assert_eq!(t.renderer.borrow().disposed, 1);
        assert_eq!(t.controls.live(), 0);
        assert_eq!(t.frames.cancelled().len(), 1);
        assert!(root.context().scene.is_none());

        // A trigger captured before unmount no longer draws
        let renders = t.renderer.borrow().renders;
        render.trigger();
        assert_eq!(t.renderer.borrow().renders, renders);
    }

    #[test]
    fn test_unmount_before_mount_is_noop() {
        let TestBackend {
            backend, renderer, ..
        } = test_backend();
        let mut root = SceneRoot::new(SceneProps::default(), backend);
        root.unmount();
        root.unmount();
        assert_eq!(renderer.borrow().disposed, 0);
        assert!(!root.is_mounted());
    }

    #[test]
    fn test_debug_panel_toggle() {
        let (mut root, _t) = mounted_root(SceneProps::default().with_debug_panel(true));
        let panel = root.debug_panel().clone();
        assert!(panel.is_active());
        assert!(panel
            .with_panel(|p| p.folder_by_name("Camera Controls").is_some())
            .unwrap());

        root.update(SceneProps::default());
        assert!(!panel.is_active());

        root.update(SceneProps::default().with_debug_panel(true));
        assert!(panel.is_active());

        root.unmount();
        assert!(!panel.is_active());
    }

    #[test]
    fn test_background_change_redraws() {
        let (mut root, t) = mounted_root(SceneProps::default());
        root.update(SceneProps::default().with_background_color(Color::WHITE));

        let r = t.renderer.borrow();
        assert_eq!(r.clear_colors.last(), Some(&Color::WHITE));
        assert_eq!(r.renders, 2);
    }

    #[test]
    fn test_orbit_drag_redraws_when_not_animating() {
        let (mut root, renderer, frames) = orbit_root(SceneProps::default(), false);
        let before = camera_position(&root);

        root.handle_device_event(&left_button(ElementState::Pressed));
        assert_eq!(renderer.borrow().renders, 1);

        for _ in 0..20 {
            root.handle_device_event(&DeviceEvent::MouseMotion { delta: (50.0, 0.0) });
        }
        root.handle_device_event(&left_button(ElementState::Released));

        assert_eq!(renderer.borrow().renders, 21);
        let after = camera_position(&root);
        assert_ne!(after, before);
        assert!((after.magnitude() - before.magnitude()).abs() < 1e-3);
        // Undamped input is fully applied by the frame it requested
        assert!(frames.requested().is_empty());
    }

    #[test]
    fn test_pointer_motion_without_button_draws_nothing() {
        let (mut root, renderer, _frames) = orbit_root(SceneProps::default(), false);
        root.handle_device_event(&DeviceEvent::MouseMotion { delta: (50.0, 0.0) });
        assert_eq!(renderer.borrow().renders, 1);
    }

    #[test]
    fn test_damped_zoom_settles_over_follow_up_frames() {
        let (mut root, renderer, frames) = orbit_root(SceneProps::default(), true);
        let start = camera_position(&root).magnitude();

        root.handle_device_event(&DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::LineDelta(0.0, -1.0),
        });
        assert_eq!(renderer.borrow().renders, 2);
        assert_eq!(frames.requested().len(), 1);

        let mut follow_ups = 0;
        while let Some(due) = frames.last_requested() {
            let requested = frames.requested().len();
            root.on_animation_frame(due);
            follow_ups += 1;
            if frames.requested().len() == requested {
                break;
            }
            assert!(follow_ups < 1000, "damped controls never settled");
        }

        assert_eq!(renderer.borrow().renders, 2 + follow_ups);
        let end = camera_position(&root).magnitude();
        assert!(end > start * 1.09 && end < start * 1.11);
        assert!(!root.is_animating());
    }

    #[test]
    fn test_orbit_input_while_animating_leaves_drawing_to_loop() {
        let (mut root, t) = mounted_root(SceneProps::default().with_animate(true));
        let requested = t.frames.requested().len();

        root.handle_device_event(&left_button(ElementState::Pressed));

        assert_eq!(t.controls.events(), 1);
        assert_eq!(t.renderer.borrow().renders, 1);
        assert_eq!(t.frames.requested().len(), requested);
    }

    #[test]
    fn test_every_drawn_frame_updates_controls() {
        let (mut root, t) = mounted_root(SceneProps::default().with_animate(true));
        assert_eq!(t.controls.updates(), 1);

        root.on_animation_frame(t.frames.last_requested().unwrap());
        assert_eq!(t.controls.updates(), 2);

        root.render();
        assert_eq!(t.controls.updates(), 3);
        assert_eq!(t.renderer.borrow().renders, 3);
    }

    #[test]
    fn test_settle_frame_is_cancelled_by_unmount_and_by_animation() {
        let (mut root, t) = mounted_root(SceneProps::default());
        t.controls.settle_for(10);

        root.render();
        let settle = t.frames.last_requested().unwrap();
        root.update(SceneProps::default().with_animate(true));
        assert_eq!(t.frames.cancelled(), vec![settle]);

        // The loop draws; a stale settle handle does not
        let renders = t.renderer.borrow().renders;
        root.on_animation_frame(settle);
        assert_eq!(t.renderer.borrow().renders, renders);

        root.update(SceneProps::default());
        root.render();
        let settle = t.frames.last_requested().unwrap();
        root.unmount();
        assert_eq!(t.frames.cancelled().last(), Some(&settle));
    }
}
