//! # Scene Graph Module
//!
//! The handle API the binding layer drives: a [`Scene`] holding shared
//! [`SceneObject`]s, each with a [`Transform`], an [`ObjectKind`] and
//! optional children.
//!
//! ## Key Components
//!
//! - [`Scene`] / [`SceneHandle`] - Top-level container and its shared handle
//! - [`SceneObject`] / [`ObjectRef`] - Individual nodes and their shared handle
//! - [`Mesh`] / [`Geometry`] - Mesh descriptors used by the ground and loaded models
//!
//! ## Usage
//!
//! ```
//! use scenebind::gfx::scene::{SceneHandle, SceneObject};
//!
//! let scene = SceneHandle::new();
//! let group = SceneObject::group("props").into_ref();
//! scene.add(group.clone());
//! assert!(scene.contains(&group));
//! ```

pub mod object;
pub mod scene;

// Re-export main types
pub use object::{
    Geometry, Mesh, ObjectId, ObjectKind, ObjectRef, SceneObject, Transform, WeakObjectRef,
};
pub use scene::{Scene, SceneHandle};
