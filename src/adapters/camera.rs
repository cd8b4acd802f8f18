use cgmath::Vector3;

use super::{report, vec3, Adapter, Lifecycle};
use crate::context::SceneContext;
use crate::error::SceneError;
use crate::gfx::camera::PerspectiveCamera;
use crate::gfx::scene::{ObjectRef, SceneObject};
use crate::ui::FolderId;

const COMPONENT: &str = "PerspectiveCamera";

#[derive(Debug, Clone, PartialEq)]
pub struct CameraProps {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Fixed aspect ratio; follows the viewport when `None`
    pub aspect: Option<f32>,
    pub near: f32,
    pub far: f32,
    pub position: Vector3<f32>,
}

impl Default for CameraProps {
    fn default() -> Self {
        Self {
            fov: 75.0,
            aspect: None,
            near: 0.1,
            far: 1000.0,
            position: vec3(0.0, 0.0, 5.0),
        }
    }
}

impl CameraProps {
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = Some(aspect);
        self
    }

    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }
}

type CameraListener = Box<dyn FnMut(&ObjectRef)>;

/// Perspective camera adapter. On mount it becomes the scene's active camera.
pub struct CameraAdapter {
    props: CameraProps,
    lifecycle: Lifecycle,
    ctx: Option<SceneContext>,
    camera: Option<ObjectRef>,
    folder: Option<FolderId>,
    listeners: Vec<CameraListener>,
}

impl CameraAdapter {
    pub fn new(props: CameraProps) -> Self {
        Self {
            props,
            lifecycle: Lifecycle::Created,
            ctx: None,
            camera: None,
            folder: None,
            listeners: Vec::new(),
        }
    }

    pub fn props(&self) -> &CameraProps {
        &self.props
    }

    /// Calls `listener` with the camera object once it has been created
    pub fn on_camera_created(&mut self, listener: impl FnMut(&ObjectRef) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn aspect(&self, ctx: &SceneContext) -> f32 {
        self.props.aspect.unwrap_or_else(|| ctx.viewport_aspect())
    }
}

impl Adapter for CameraAdapter {
    type Props = CameraProps;

    fn mount(&mut self, ctx: &SceneContext) -> Result<(), SceneError> {
        if self.lifecycle != Lifecycle::Created {
            log::warn!("{COMPONENT} is already mounted");
            return Ok(());
        }
        let scene = ctx.require_scene(COMPONENT).map_err(report)?;
        let set_camera = ctx.require_set_camera(COMPONENT).map_err(report)?;

        let data = PerspectiveCamera::new(
            self.props.fov,
            self.aspect(ctx),
            self.props.near,
            self.props.far,
        );
        let camera = SceneObject::camera("Perspective Camera", data)
            .with_position(self.props.position)
            .into_ref();

        scene.add(camera.clone());
        for listener in &mut self.listeners {
            listener(&camera);
        }
        // Draws the first frame through the new camera
        set_camera.call(camera.clone());

        self.folder = ctx
            .gui
            .as_ref()
            .and_then(|gui| gui.add_object_controls(&camera, "Camera Controls", None));
        self.camera = Some(camera);
        self.ctx = Some(ctx.clone());
        self.lifecycle = Lifecycle::Mounted;
        Ok(())
    }

    fn update(&mut self, props: CameraProps) {
        let previous = std::mem::replace(&mut self.props, props);
        let (Lifecycle::Mounted, Some(camera), Some(ctx)) =
            (self.lifecycle, &self.camera, &self.ctx)
        else {
            return;
        };
        if previous == self.props {
            return;
        }

        let aspect = self.aspect(ctx);
        {
            let mut object = camera.borrow_mut();
            object.transform.position = self.props.position;
            if let Some(data) = object.as_camera_mut() {
                data.fov = self.props.fov;
                data.aspect = aspect;
                data.near = self.props.near;
                data.far = self.props.far;
                data.update_projection_matrix();
            }
        }
        ctx.request_redraw();
    }

    fn unmount(&mut self) {
        if self.lifecycle != Lifecycle::Mounted {
            return;
        }
        self.lifecycle = Lifecycle::Unmounted;
        let Some(ctx) = self.ctx.take() else {
            return;
        };
        if let (Some(scene), Some(camera)) = (&ctx.scene, &self.camera) {
            scene.remove(camera);
        }
        if let (Some(gui), Some(folder)) = (&ctx.gui, self.folder.take()) {
            gui.remove_folder(folder);
        }
        ctx.request_redraw();
    }

    fn object(&self) -> Option<ObjectRef> {
        self.camera.clone()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
}

impl CameraAdapter {
    /// True while this adapter's camera is the one the root draws with
    pub fn is_active(&self, ctx: &SceneContext) -> bool {
        match (&self.camera, &ctx.camera) {
            (Some(camera), Some(slot)) => slot.is_active(camera),
            _ => false,
        }
    }

    pub fn camera(&self) -> Option<&ObjectRef> {
        self.camera.as_ref()
    }
}
