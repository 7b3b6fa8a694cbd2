//! Flappy Gate - a one-screen flap-through-the-pipes arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actor physics, pipes, scoring, game state)
//! - `hooks`: Interfaces to the presentation layer (UI, audio, drawing, frame scheduling)
//! - `settings`: Gameplay tuning and audio preferences
//! - `effects`: Win celebration confetti
//! - `audio`: Procedural sound cues (browser only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod effects;
pub mod hooks;
pub mod settings;
pub mod sim;

pub use hooks::{Background, FrameScheduler, GameHooks, HookError, HookResult, RenderFrame, Renderer};
pub use settings::{Settings, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Default playfield (canvas) dimensions
    pub const PLAYFIELD_WIDTH: f32 = 480.0;
    pub const PLAYFIELD_HEIGHT: f32 = 640.0;

    /// Bird defaults - x never changes during a session
    pub const BIRD_X: f32 = 50.0;
    pub const BIRD_START_Y: f32 = 150.0;
    pub const BIRD_WIDTH: f32 = 70.0;
    pub const BIRD_HEIGHT: f32 = 52.0;
    /// Collision radius, deliberately smaller than the sprite box
    pub const BIRD_RADIUS: f32 = 25.0;
    /// Downward acceleration (pixels/frame²)
    pub const GRAVITY: f32 = 0.15;
    /// Upward speed set by a flap (pixels/frame)
    pub const FLAP_IMPULSE: f32 = 3.5;

    /// Idle bob: y = start_y + cos(frame / IDLE_PERIOD) * IDLE_AMPLITUDE
    pub const IDLE_AMPLITUDE: f32 = 5.0;
    pub const IDLE_PERIOD: f32 = 10.0;

    /// Tilt (degrees)
    pub const NOSE_UP_DEG: f32 = -25.0;
    pub const TILT_STEP_DEG: f32 = 5.0;
    pub const MAX_NOSE_DOWN_DEG: f32 = 90.0;

    /// Pipe defaults
    pub const PIPE_WIDTH: f32 = 40.0;
    pub const PIPE_GAP: f32 = 200.0;
    /// Gap anchor is drawn from [GAP_MARGIN_TOP, height - GAP_MARGIN_BOTTOM - gap]
    pub const GAP_MARGIN_TOP: f32 = 50.0;
    pub const GAP_MARGIN_BOTTOM: f32 = 150.0;
    pub const PIPE_BASE_SPEED: f32 = 2.0;
    pub const SPAWN_PERIOD_FRAMES: u64 = 150;

    /// Winner gate (drawn 200x300 at y=100, but hit with a 100-wide box)
    pub const WINNER_WIDTH: f32 = 200.0;
    pub const WINNER_HEIGHT: f32 = 300.0;
    pub const WINNER_Y: f32 = 100.0;
    pub const WINNER_HIT_WIDTH: f32 = 100.0;

    /// Score needed before the winner gate spawns
    pub const WIN_SCORE: u32 = 3;

    /// Difficulty: multiplier = BASE + floor(score / INTERVAL) * STEP
    pub const DIFFICULTY_BASE: f32 = 1.0;
    pub const DIFFICULTY_STEP: f32 = 0.1;
    pub const DIFFICULTY_SCORE_INTERVAL: u32 = 5;

    /// Sky color behind everything
    pub const SKY_COLOR: [u8; 3] = [0x70, 0xc5, 0xce];
}
