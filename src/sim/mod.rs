//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per frame
//! - Seeded RNG only
//! - Obstacles kept in spawn order
//! - No rendering or platform dependencies

pub mod actor;
pub mod clock;
pub mod machine;
pub mod obstacle;
pub mod score;
pub mod state;
pub mod tick;

pub use actor::Bird;
pub use clock::FrameClock;
pub use obstacle::{FieldReport, Obstacle, ObstacleField, ObstacleKind};
pub use score::Score;
pub use state::{GamePhase, Outcome, Playfield, Session, Snapshot};
pub use tick::{LoopControl, run_frame, tick};
