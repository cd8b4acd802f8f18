use winit::event::{ElementState, MouseButton, WindowEvent};

use crate::context::ViewportSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// A primary-button pointer event in surface pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn down(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Down,
            x,
            y,
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Move,
            x,
            y,
        }
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Up,
            x,
            y,
        }
    }
}

/// Turns winit window events into pointer events.
///
/// winit reports button presses without a position, so the tracker remembers
/// the last cursor position it saw.
#[derive(Debug, Default)]
pub struct PointerTracker {
    cursor: (f32, f32),
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    pub fn pointer_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                Some(PointerEvent::moved(self.cursor.0, self.cursor.1))
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let (x, y) = self.cursor;
                Some(match state {
                    ElementState::Pressed => PointerEvent::down(x, y),
                    ElementState::Released => PointerEvent::up(x, y),
                })
            }
            _ => None,
        }
    }
}

/// The new viewport size, for resize events
pub fn viewport_size(event: &WindowEvent) -> Option<ViewportSize> {
    match event {
        WindowEvent::Resized(size) => Some(ViewportSize::new(size.width as f32, size.height as f32)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn test_resize_maps_to_viewport() {
        let event = WindowEvent::Resized(PhysicalSize::new(1024, 768));
        assert_eq!(
            viewport_size(&event),
            Some(ViewportSize::new(1024.0, 768.0))
        );
        assert_eq!(viewport_size(&WindowEvent::Focused(true)), None);
    }

    #[test]
    fn test_other_events_are_not_pointer_events() {
        let mut tracker = PointerTracker::new();
        assert!(tracker.pointer_event(&WindowEvent::Focused(false)).is_none());
        assert_eq!(tracker.cursor(), (0.0, 0.0));
    }
}
