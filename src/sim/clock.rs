//! Frame counter driving spawn timing and the idle bob

use serde::{Deserialize, Serialize};

/// Monotonic frame counter, one step per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameClock {
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current frame number
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn tick(&mut self) {
        self.frame += 1;
    }

    pub fn reset(&mut self) {
        self.frame = 0;
    }

    /// True on frames that are a multiple of `period` (including frame 0)
    pub fn is_on_period(&self, period: u64) -> bool {
        period > 0 && self.frame.is_multiple_of(period)
    }
}
