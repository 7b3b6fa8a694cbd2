//! Score counter and the difficulty it drives

use serde::{Deserialize, Serialize};

use crate::Tuning;

/// Pipes passed this session; only ever goes up until a reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    value: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn increment(&mut self) {
        self.value = self.value.saturating_add(1);
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }

    pub fn has_reached(&self, threshold: u32) -> bool {
        self.value >= threshold
    }

    /// floor(score / interval)
    pub fn difficulty_level(&self, tuning: &Tuning) -> u32 {
        self.value / tuning.difficulty_interval.max(1)
    }

    /// Step function of the score, recomputed on every read
    pub fn difficulty_multiplier(&self, tuning: &Tuning) -> f32 {
        tuning.difficulty_base + self.difficulty_level(tuning) as f32 * tuning.difficulty_step
    }

    /// Horizontal pipe speed (pixels/frame), shared by every obstacle
    pub fn pipe_speed(&self, tuning: &Tuning) -> f32 {
        tuning.base_speed * self.difficulty_multiplier(tuning)
    }
}
