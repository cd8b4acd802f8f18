pub mod orbit_controls;
pub mod perspective;

// Re-export main types
pub use orbit_controls::{OrbitBounds, OrbitControls, OrbitControlsFactory};
pub use perspective::PerspectiveCamera;
