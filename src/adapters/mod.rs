//! # Node Adapters
//!
//! One adapter per declarative component. Each owns exactly one scene object
//! (plus, for some, a helper or a companion light), created once on mount and
//! mutated in place afterwards.
//!
//! ## Lifecycle
//!
//! Every adapter follows the same three steps through the [`Adapter`] trait:
//!
//! - `mount(&SceneContext)` - resolve the context, create and add the object,
//!   register debug controls, request a frame
//! - `update(props)` - apply only what changed to the existing object
//! - `unmount()` - remove everything the adapter added; idempotent
//!
//! A mount against a context without the needed entries logs one error and
//! returns it. Nothing is added to the scene in that case, and later updates
//! and unmounts are no-ops.

pub mod camera;
pub mod ground;
pub mod lights;
pub mod model;

use cgmath::Vector3;

use crate::context::SceneContext;
use crate::error::SceneError;
use crate::gfx::scene::ObjectRef;

// Re-export main types
pub use camera::{CameraAdapter, CameraProps};
pub use ground::{GroundAdapter, GroundProps};
pub use lights::{
    AmbientLightProps, DirectionalLightProps, LightAdapter, LightProps, PointLightProps,
    SpotLightProps,
};
pub use model::{LoadStatus, ModelAdapter, ModelProps};

/// Where an adapter is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Created,
    Mounted,
    Unmounted,
}

/// A declarative component bound to one imperative scene object
pub trait Adapter {
    type Props;

    /// Creates the object and adds it to the context's scene
    fn mount(&mut self, ctx: &SceneContext) -> Result<(), SceneError>;

    /// Applies the difference between the current and `props`
    fn update(&mut self, props: Self::Props);

    /// Removes everything the adapter added. Safe to call repeatedly.
    fn unmount(&mut self);

    /// The owned scene object, once it exists
    fn object(&self) -> Option<ObjectRef>;

    fn lifecycle(&self) -> Lifecycle;

    fn is_mounted(&self) -> bool {
        self.lifecycle() == Lifecycle::Mounted
    }
}

/// Logs a mount failure once and hands it back
pub(crate) fn report(err: SceneError) -> SceneError {
    log::error!("{err}");
    err
}

pub(crate) fn vec3(x: f32, y: f32, z: f32) -> Vector3<f32> {
    Vector3::new(x, y, z)
}
