//! Bus activity monitor
//!
//! Any received frame proves the rest of the vehicle is awake, so every
//! frame restarts the idle countdown. Its expiry is what puts the viewer
//! to sleep.

use crate::traits::{TimerId, TimingSource};

/// Tracks bus traffic and holds off the idle timer
#[derive(Debug, Default)]
pub struct ActivityMonitor {
    frames: u32,
}

impl ActivityMonitor {
    pub const fn new() -> Self {
        Self { frames: 0 }
    }

    /// A frame was received, whatever its identifier
    pub fn record_frame<T: TimingSource>(&mut self, timers: &mut T) {
        self.frames = self.frames.wrapping_add(1);
        timers.reset(TimerId::Idle);
    }

    /// Restart the idle countdown without counting a frame
    pub fn hold_off<T: TimingSource>(&mut self, timers: &mut T) {
        timers.reset(TimerId::Idle);
    }

    /// Frames seen since boot (wrapping)
    pub fn frames(&self) -> u32 {
        self.frames
    }
}
