//! The bird: flap impulse, gravity, floor contact and tilt

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::FrameClock;
use super::state::Outcome;
use crate::Tuning;
use crate::consts::{
    IDLE_AMPLITUDE, IDLE_PERIOD, MAX_NOSE_DOWN_DEG, NOSE_UP_DEG, TILT_STEP_DEG,
};

/// The player-controlled bird
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Center of the sprite box (x stays fixed)
    pub pos: Vec2,
    /// Sprite box size
    pub size: Vec2,
    /// Collision radius, smaller than the sprite box
    pub radius: f32,
    /// Vertical velocity, positive is down (pixels/frame)
    pub vel_y: f32,
    /// Tilt in radians, negative is nose-up
    pub rotation: f32,
    gravity: f32,
    impulse: f32,
    start: Vec2,
}

impl Bird {
    pub fn new(tuning: &Tuning) -> Self {
        let start = Vec2::new(tuning.bird_x, tuning.bird_start_y);
        Self {
            pos: start,
            size: Vec2::new(tuning.bird_width, tuning.bird_height),
            radius: tuning.bird_radius,
            vel_y: 0.0,
            rotation: 0.0,
            gravity: tuning.gravity,
            impulse: tuning.flap_impulse,
            start,
        }
    }

    /// Set upward velocity, replacing whatever it was
    pub fn flap(&mut self) {
        self.vel_y = -self.impulse;
    }

    /// Advance one frame.
    ///
    /// Idle frames bob around the start height and never collide. Otherwise
    /// gravity is integrated and `Outcome::Crashed` is returned when the
    /// bottom of the sprite box reaches `floor`.
    pub fn advance(&mut self, idle: bool, clock: &FrameClock, floor: f32) -> Option<Outcome> {
        if idle {
            let phase = clock.frame() as f32 / IDLE_PERIOD;
            self.pos.y = self.start.y + phase.cos() * IDLE_AMPLITUDE;
            self.rotation = 0.0;
            return None;
        }

        self.vel_y += self.gravity;
        self.pos.y += self.vel_y;

        let mut outcome = None;
        let half_h = self.size.y / 2.0;
        if self.pos.y + half_h >= floor {
            self.pos.y = floor - half_h;
            outcome = Some(Outcome::Crashed);
        }

        if self.vel_y < self.impulse / 2.0 {
            self.rotation = NOSE_UP_DEG.to_radians();
        } else {
            self.rotation =
                (self.rotation + TILT_STEP_DEG.to_radians()).min(MAX_NOSE_DOWN_DEG.to_radians());
        }

        outcome
    }

    /// Back to the start pose, at rest
    pub fn reset(&mut self) {
        self.pos = self.start;
        self.vel_y = 0.0;
        self.rotation = 0.0;
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }

    pub fn left(&self) -> f32 {
        self.pos.x - self.radius
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.radius
    }
}
