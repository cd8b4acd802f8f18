// src/lib.rs
//! Scenebind
//!
//! Declarative scene components on top of an imperative 3D scene graph. A
//! [`SceneRoot`] owns the renderer, camera, controls and animation loop and
//! publishes a [`SceneContext`]; node adapters mount into that context and keep
//! their scene objects in sync with their props.

pub mod adapters;
pub mod animation;
pub mod color;
pub mod context;
pub mod error;
pub mod gfx;
pub mod input;
pub mod loader;
pub mod prelude;
pub mod render;
pub mod root;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main types for convenience
pub use color::Color;
pub use context::SceneContext;
pub use error::SceneError;
pub use root::{SceneBackend, SceneProps, SceneRoot};
