//! # Input Module
//!
//! Pointer handling for mounted scenes: [`PointerTracker`] turns winit window
//! events into [`PointerEvent`]s, and [`PointerPicker`] uses them to select and
//! drag scene objects.

pub mod picker;
pub mod pointer;

// Re-export main types
pub use picker::{PickEvent, PointerPicker};
pub use pointer::{viewport_size, PointerEvent, PointerPhase, PointerTracker};
