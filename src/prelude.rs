//! # Scenebind Prelude
//!
//! Commonly used types and traits in one import.
//!
//! ```no_run
//! use std::rc::Rc;
//! use scenebind::prelude::*;
//!
//! # fn host(renderer: RendererHandle, frames: Rc<dyn FrameScheduler>) -> Result<(), SceneError> {
//! let mut root = SceneRoot::new(
//!     SceneProps::default().with_debug_panel(true),
//!     SceneBackend::new(renderer, frames),
//! );
//! root.mount(ViewportSize::new(1280.0, 720.0));
//!
//! let mut sun = LightAdapter::new(DirectionalLightProps::default());
//! sun.mount(&root.context())?;
//! # Ok(())
//! # }
//! ```

// Re-export the root and its context
pub use crate::context::{SceneContext, ViewportSize};
pub use crate::error::SceneError;
pub use crate::root::{SceneBackend, SceneProps, SceneRoot};

// Re-export adapters
pub use crate::adapters::{
    Adapter, AmbientLightProps, CameraAdapter, CameraProps, DirectionalLightProps, GroundAdapter,
    GroundProps, LightAdapter, ModelAdapter, ModelProps, PointLightProps, SpotLightProps,
};

// Re-export collaborator traits
pub use crate::loader::{ModelLoader, ObjLoader};
pub use crate::render::{
    ControlsFactory, FrameHandle, FrameScheduler, Renderer, RendererHandle, ViewerControls,
};

// Re-export scene types
pub use crate::color::Color;
pub use crate::gfx::scene::{ObjectRef, SceneHandle, SceneObject};

// Re-export input
pub use crate::input::{PickEvent, PointerEvent, PointerPicker, PointerTracker};

// Re-export math types
pub use cgmath::Vector3;
