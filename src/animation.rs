//! Animation loop state machine
//!
//! While running, exactly one frame callback is outstanding with the host's
//! [`FrameScheduler`]. Each accepted frame runs one step and schedules the
//! next; stopping cancels the outstanding callback, which ends the chain.
//! Frames that arrive with any other handle are stale and ignored.

use crate::render::{FrameHandle, FrameScheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Stopped,
    Scheduled(FrameHandle),
}

#[derive(Debug, Default)]
pub struct AnimationLoop {
    state: LoopState,
    frames: u64,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Scheduled(_))
    }

    /// Steps run since creation
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Schedules the first frame. Returns false if the loop was already running.
    pub fn start(&mut self, scheduler: &dyn FrameScheduler) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = LoopState::Scheduled(scheduler.request_frame());
        log::debug!("animation loop started");
        true
    }

    /// Cancels the outstanding frame. Returns false if the loop was not running.
    pub fn stop(&mut self, scheduler: &dyn FrameScheduler) -> bool {
        let LoopState::Scheduled(handle) = self.state else {
            return false;
        };
        scheduler.cancel_frame(handle);
        self.state = LoopState::Stopped;
        log::debug!("animation loop stopped");
        true
    }

    /// Runs `step` for the outstanding frame and schedules the next one.
    ///
    /// Returns false without running anything when `handle` is not the
    /// outstanding frame.
    pub fn advance(
        &mut self,
        handle: FrameHandle,
        scheduler: &dyn FrameScheduler,
        step: impl FnOnce(),
    ) -> bool {
        if self.state != LoopState::Scheduled(handle) {
            log::trace!("ignoring stale frame {handle:?}");
            return false;
        }
        step();
        self.frames += 1;
        self.state = LoopState::Scheduled(scheduler.request_frame());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestFrames;

    #[test]
    fn test_start_schedules_single_frame() {
        let frames = TestFrames::default();
        let mut animation = AnimationLoop::new();

        assert!(animation.start(&frames));
        assert!(!animation.start(&frames));
        assert_eq!(frames.requested().len(), 1);
    }

    #[test]
    fn test_advance_chains_frames() {
        let frames = TestFrames::default();
        let mut animation = AnimationLoop::new();
        animation.start(&frames);

        let mut steps = 0;
        for _ in 0..3 {
            let due = frames.last_requested().unwrap();
            assert!(animation.advance(due, &frames, || steps += 1));
        }
        assert_eq!(steps, 3);
        assert_eq!(animation.frames(), 3);
        assert_eq!(frames.requested().len(), 4);
    }

    #[test]
    fn test_stop_cancels_and_ignores_late_frame() {
        let frames = TestFrames::default();
        let mut animation = AnimationLoop::new();
        animation.start(&frames);
        let due = frames.last_requested().unwrap();

        assert!(animation.stop(&frames));
        assert_eq!(frames.cancelled(), vec![due]);

        let mut ran = false;
        assert!(!animation.advance(due, &frames, || ran = true));
        assert!(!ran);
        assert!(!animation.stop(&frames));
    }
}
