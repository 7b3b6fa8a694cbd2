//! Win celebration: confetti cannons firing from both sides of the screen
//!
//! Purely visual. Runs on its own frame count because the simulation loop
//! has already halted when the player wins.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::sim::Playfield;

/// How long the cannons fire (3 seconds at 60 Hz)
pub const CELEBRATION_FRAMES: u32 = 180;
/// Pieces per cannon per frame
pub const PIECES_PER_BURST: usize = 5;
/// Launch angles in degrees, counter-clockwise from +x with y pointing up
pub const LEFT_CANNON_ANGLE: f32 = 60.0;
pub const RIGHT_CANNON_ANGLE: f32 = 120.0;
pub const SPREAD_DEG: f32 = 55.0;

/// Maximum pieces alive at once
pub const MAX_PIECES: usize = 1024;

const LAUNCH_SPEED: f32 = 12.0;
const SPEED_JITTER: f32 = 0.35;
const DRAG: f32 = 0.94;
const GRAVITY: f32 = 0.35;
const LIFETIME_FRAMES: u32 = 200;

/// Palette the pieces pick from
pub const COLORS: [[u8; 3]; 6] = [
    [0x26, 0xcc, 0xff],
    [0xa2, 0x5a, 0xfd],
    [0xff, 0x5e, 0x7e],
    [0x88, 0xff, 0x5a],
    [0xfc, 0xff, 0x42],
    [0xff, 0xa6, 0x2d],
];

/// A single confetti piece
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfettiPiece {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [u8; 3],
    /// Spin angle for drawing (radians)
    pub tilt: f32,
    /// Frames left to live
    pub ttl: u32,
}

impl ConfettiPiece {
    /// 0-1 fade factor for drawing
    pub fn opacity(&self) -> f32 {
        self.ttl as f32 / LIFETIME_FRAMES as f32
    }
}

/// Confetti particle system
#[derive(Debug, Clone)]
pub struct Celebration {
    pieces: Vec<ConfettiPiece>,
    frames_left: u32,
    rng: Pcg32,
}

impl Celebration {
    pub fn new(seed: u64) -> Self {
        Self {
            pieces: Vec::new(),
            frames_left: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Start (or restart) the cannons
    pub fn fire(&mut self) {
        self.frames_left = CELEBRATION_FRAMES;
    }

    /// Stop firing and drop every piece
    pub fn clear(&mut self) {
        self.frames_left = 0;
        self.pieces.clear();
    }

    /// Still firing or pieces still in the air
    pub fn is_active(&self) -> bool {
        self.frames_left > 0 || !self.pieces.is_empty()
    }

    pub fn pieces(&self) -> &[ConfettiPiece] {
        &self.pieces
    }

    /// Advance one frame
    pub fn update(&mut self, playfield: Playfield) {
        if self.frames_left > 0 {
            self.frames_left -= 1;
            let origin_y = playfield.height * 0.5;
            for _ in 0..PIECES_PER_BURST {
                self.emit(Vec2::new(0.0, origin_y), LEFT_CANNON_ANGLE);
                self.emit(Vec2::new(playfield.width, origin_y), RIGHT_CANNON_ANGLE);
            }
        }

        for piece in &mut self.pieces {
            piece.vel *= DRAG;
            piece.vel.y += GRAVITY;
            piece.pos += piece.vel;
            piece.tilt += 0.1 + piece.vel.x.abs() * 0.01;
            piece.ttl = piece.ttl.saturating_sub(1);
        }

        let height = playfield.height;
        self.pieces.retain(|p| p.ttl > 0 && p.pos.y < height + 20.0);
    }

    fn emit(&mut self, origin: Vec2, angle_deg: f32) {
        if self.pieces.len() >= MAX_PIECES {
            return;
        }
        let half = SPREAD_DEG / 2.0;
        let angle = (angle_deg + self.rng.random_range(-half..=half)).to_radians();
        let speed = LAUNCH_SPEED * (1.0 + self.rng.random_range(-SPEED_JITTER..=SPEED_JITTER));
        // Screen y grows downward
        let vel = Vec2::new(angle.cos(), -angle.sin()) * speed;
        let color = COLORS[self.rng.random_range(0..COLORS.len())];
        self.pieces.push(ConfettiPiece {
            pos: origin,
            vel,
            color,
            tilt: self.rng.random_range(0.0..std::f32::consts::TAU),
            ttl: LIFETIME_FRAMES,
        });
    }
}
