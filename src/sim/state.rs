//! Game state and core simulation types
//!
//! Everything the loop mutates lives in one `Session`, handed by reference to
//! the components instead of being shared as globals.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::Bird;
use super::clock::FrameClock;
use super::obstacle::ObstacleField;
use super::score::Score;
use crate::Tuning;
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};

/// Current phase of the game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, bird bobbing in place
    #[default]
    Start,
    /// Active gameplay
    Playing,
    /// Hit a pipe or the floor
    GameOver,
    /// Reached the winner gate
    Win,
}

impl GamePhase {
    /// No simulation happens in a terminal phase
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Win)
    }

    /// The bird bobs instead of falling
    pub fn is_idle(self) -> bool {
        matches!(self, GamePhase::Start | GamePhase::Win)
    }
}

/// Terminal signal raised by a component during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Pipe or floor contact
    Crashed,
    /// Touched the winner gate
    ReachedWinner,
}

/// Drawable area in pixels; the floor is at `height`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        }
    }
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// One play session: the context every component is driven through
#[derive(Debug, Clone)]
pub struct Session {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Fixed for the lifetime of the session
    pub tuning: Tuning,
    pub playfield: Playfield,
    pub phase: GamePhase,
    pub clock: FrameClock,
    pub bird: Bird,
    pub obstacles: ObstacleField,
    pub score: Score,
    pub(crate) rng: Pcg32,
}

impl Session {
    /// Create a session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default(), Playfield::default())
    }

    /// Create a session with custom tuning.
    ///
    /// `tuning` must pass [`Tuning::validate`]; values loaded through
    /// [`Tuning::from_json`] already have.
    pub fn with_tuning(seed: u64, tuning: Tuning, playfield: Playfield) -> Self {
        debug_assert!(tuning.validate().is_ok(), "invalid tuning: {:?}", tuning.validate());
        Self {
            seed,
            bird: Bird::new(&tuning),
            tuning,
            playfield,
            phase: GamePhase::Start,
            clock: FrameClock::new(),
            obstacles: ObstacleField::new(),
            score: Score::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Put actor, obstacles, score and clock back to their fresh values
    pub(crate) fn reset_world(&mut self) {
        self.bird.reset();
        self.obstacles.reset();
        self.score.reset();
        self.clock.reset();
    }

    /// The canvas changed size; the bird goes back to its start pose
    pub fn resize(&mut self, width: f32, height: f32) {
        self.playfield = Playfield::new(width, height);
        self.bird.reset();
        log::info!("Playfield resized to {}x{}", width, height);
    }

    /// Serializable view of the world, for logging and debugging
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            frame: self.clock.frame(),
            score: self.score.value(),
            bird: &self.bird,
            obstacles: &self.obstacles,
        }
    }
}

/// Borrowed, serializable summary of a session
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub frame: u64,
    pub score: u32,
    pub bird: &'a Bird,
    pub obstacles: &'a ObstacleField,
}
