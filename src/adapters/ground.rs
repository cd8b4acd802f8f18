use std::f32::consts::FRAC_PI_2;

use cgmath::Vector3;

use super::{report, vec3, Adapter, Lifecycle};
use crate::color::Color;
use crate::context::SceneContext;
use crate::error::SceneError;
use crate::gfx::scene::{Geometry, Mesh, ObjectRef, SceneObject};
use crate::ui::FolderId;

const COMPONENT: &str = "Ground";
const FOLDER: &str = "Ground Controls";

#[derive(Debug, Clone, PartialEq)]
pub struct GroundProps {
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub position: Vector3<f32>,
    /// Euler rotation in radians; the default lays the plane flat
    pub rotation: Vector3<f32>,
}

impl Default for GroundProps {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 10.0,
            color: Color::from(0x808080),
            position: vec3(0.0, 0.0, 0.0),
            rotation: vec3(-FRAC_PI_2, 0.0, 0.0),
        }
    }
}

impl GroundProps {
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vector3<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    fn build(&self) -> ObjectRef {
        let mut ground = SceneObject::mesh(
            "Ground",
            Mesh {
                geometry: Geometry::Plane {
                    width: self.width,
                    height: self.height,
                },
                color: self.color,
                receive_shadow: true,
            },
        );
        ground.transform.position = self.position;
        ground.transform.rotation = self.rotation;
        ground.into_ref()
    }
}

/// Flat ground plane.
///
/// Size changes rebuild the mesh, since plane geometry is fixed at creation;
/// the new object takes the old one's place in the scene. Everything else is
/// applied in place.
pub struct GroundAdapter {
    props: GroundProps,
    lifecycle: Lifecycle,
    ctx: Option<SceneContext>,
    ground: Option<ObjectRef>,
    folder: Option<FolderId>,
}

impl GroundAdapter {
    pub fn new(props: GroundProps) -> Self {
        Self {
            props,
            lifecycle: Lifecycle::Created,
            ctx: None,
            ground: None,
            folder: None,
        }
    }

    pub fn props(&self) -> &GroundProps {
        &self.props
    }

    fn register_controls(&mut self, ctx: &SceneContext, ground: &ObjectRef) {
        self.folder = ctx
            .gui
            .as_ref()
            .and_then(|gui| gui.add_object_controls(ground, FOLDER, None));
    }
}

impl Adapter for GroundAdapter {
    type Props = GroundProps;

    fn mount(&mut self, ctx: &SceneContext) -> Result<(), SceneError> {
        if self.lifecycle != Lifecycle::Created {
            log::warn!("{COMPONENT} is already mounted");
            return Ok(());
        }
        let scene = ctx.require_scene(COMPONENT).map_err(report)?;

        let ground = self.props.build();
        scene.add(ground.clone());
        self.register_controls(ctx, &ground);
        self.ground = Some(ground);
        self.ctx = Some(ctx.clone());
        self.lifecycle = Lifecycle::Mounted;
        ctx.request_redraw();
        Ok(())
    }

    fn update(&mut self, props: GroundProps) {
        let previous = std::mem::replace(&mut self.props, props);
        if self.lifecycle != Lifecycle::Mounted || previous == self.props {
            return;
        }
        let (Some(ctx), Some(ground)) = (self.ctx.clone(), self.ground.clone()) else {
            return;
        };

        if previous.width != self.props.width || previous.height != self.props.height {
            let rebuilt = self.props.build();
            if let Some(scene) = &ctx.scene {
                scene.replace(&ground, rebuilt.clone());
            }
            if let (Some(gui), Some(folder)) = (&ctx.gui, self.folder.take()) {
                gui.remove_folder(folder);
                self.register_controls(&ctx, &rebuilt);
            }
            log::debug!(
                "ground rebuilt at {}x{}",
                self.props.width,
                self.props.height
            );
            self.ground = Some(rebuilt);
        } else {
            let mut object = ground.borrow_mut();
            object.transform.position = self.props.position;
            object.transform.rotation = self.props.rotation;
            if let Some(mesh) = object.as_mesh_mut() {
                mesh.color = self.props.color;
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
        if let (Some(scene), Some(ground)) = (&ctx.scene, &self.ground) {
            scene.remove(ground);
        }
        if let (Some(gui), Some(folder)) = (&ctx.gui, self.folder.take()) {
            gui.remove_folder(folder);
        }
        ctx.request_redraw();
    }

    fn object(&self) -> Option<ObjectRef> {
        self.ground.clone()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
}
