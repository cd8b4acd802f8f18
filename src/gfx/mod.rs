//! # Graphics Module
//!
//! The scene-graph side of the binding layer: the objects adapters create,
//! the camera and its orbit controls, lights, and the ray casting used by the
//! pointer picker.
//!
//! ## Architecture Overview
//!
//! - **Scene Graph** ([`scene`]) - Shared object handles and the top-level scene
//! - **Camera System** ([`camera`]) - Perspective camera data and orbit controls
//! - **Lights** ([`light`]) - Light data and debug helpers
//! - **Picking** ([`picking`]) - Rays, bounds, planes and the raycaster
//!
//! Drawing itself is delegated to a [`Renderer`](crate::render::Renderer)
//! implementation supplied by the host.

pub mod camera;
pub mod light;
pub mod picking;
pub mod scene;

// Re-export commonly used types
pub use camera::{OrbitControls, PerspectiveCamera};
pub use light::{Light, LightKind};
pub use scene::{ObjectRef, Scene, SceneHandle, SceneObject};
