//! Gameplay tuning and player preferences
//!
//! `Tuning` is fixed when a session is created. `Settings` only affects audio.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Gameplay constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Bird ===
    pub bird_x: f32,
    pub bird_start_y: f32,
    pub bird_width: f32,
    pub bird_height: f32,
    pub bird_radius: f32,
    pub gravity: f32,
    pub flap_impulse: f32,

    // === Pipes ===
    pub pipe_width: f32,
    pub pipe_gap: f32,
    pub gap_margin_top: f32,
    pub gap_margin_bottom: f32,
    pub base_speed: f32,
    pub spawn_period: u64,

    // === Winning ===
    pub win_score: u32,
    pub winner_width: f32,
    pub winner_height: f32,
    pub winner_y: f32,
    pub winner_hit_width: f32,

    // === Difficulty ===
    pub difficulty_base: f32,
    pub difficulty_step: f32,
    pub difficulty_interval: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bird_x: BIRD_X,
            bird_start_y: BIRD_START_Y,
            bird_width: BIRD_WIDTH,
            bird_height: BIRD_HEIGHT,
            bird_radius: BIRD_RADIUS,
            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,

            pipe_width: PIPE_WIDTH,
            pipe_gap: PIPE_GAP,
            gap_margin_top: GAP_MARGIN_TOP,
            gap_margin_bottom: GAP_MARGIN_BOTTOM,
            base_speed: PIPE_BASE_SPEED,
            spawn_period: SPAWN_PERIOD_FRAMES,

            win_score: WIN_SCORE,
            winner_width: WINNER_WIDTH,
            winner_height: WINNER_HEIGHT,
            winner_y: WINNER_Y,
            winner_hit_width: WINNER_HIT_WIDTH,

            difficulty_base: DIFFICULTY_BASE,
            difficulty_step: DIFFICULTY_STEP,
            difficulty_interval: DIFFICULTY_SCORE_INTERVAL,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.spawn_period == 0 {
            return Err(TuningError::Invalid("spawn_period must be at least 1".into()));
        }
        if self.difficulty_interval == 0 {
            return Err(TuningError::Invalid(
                "difficulty_interval must be at least 1".into(),
            ));
        }
        if self.pipe_width <= 0.0 || self.winner_width <= 0.0 {
            return Err(TuningError::Invalid("obstacle widths must be positive".into()));
        }
        if self.winner_hit_width <= 0.0 || self.winner_hit_width > self.winner_width {
            return Err(TuningError::Invalid(
                "winner_hit_width must be in (0, winner_width]".into(),
            ));
        }
        if self.bird_radius <= 0.0 || self.pipe_gap <= 0.0 {
            return Err(TuningError::Invalid(
                "bird_radius and pipe_gap must be positive".into(),
            ));
        }
        if self.base_speed <= 0.0 {
            return Err(TuningError::Invalid("base_speed must be positive".into()));
        }
        if self.difficulty_base <= 0.0 {
            return Err(TuningError::Invalid("difficulty_base must be positive".into()));
        }
        if self.difficulty_step < 0.0 {
            return Err(TuningError::Invalid(
                "difficulty_step must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Audio preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            music_volume: 0.3,
            sfx_volume: 0.5,
            muted: false,
        }
    }
}

impl Settings {
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }
}
