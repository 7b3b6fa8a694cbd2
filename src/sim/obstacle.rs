//! Pipes and the winner gate
//!
//! Obstacles spawn at the right edge and all move left at the same speed, so
//! spawn order is also screen order. The oldest obstacle is always the
//! leftmost one, which lets recycling pop from the front only.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actor::Bird;
use super::clock::FrameClock;
use super::score::Score;
use super::state::{Outcome, Playfield};
use crate::Tuning;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Top and bottom pipe around a gap starting at `gap_top`
    Pipe { gap_top: f32 },
    /// One-time gate that ends the session with a win
    Winner,
}

/// A spawned obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub kind: ObstacleKind,
    /// Already counted towards the score
    pub passed: bool,
}

impl Obstacle {
    pub fn is_winner(&self) -> bool {
        self.kind == ObstacleKind::Winner
    }

    /// Visual width, also used for recycling
    pub fn width(&self, tuning: &Tuning) -> f32 {
        match self.kind {
            ObstacleKind::Pipe { .. } => tuning.pipe_width,
            ObstacleKind::Winner => tuning.winner_width,
        }
    }

    /// Width of the horizontal hit test (the winner's is narrower than drawn)
    pub fn hit_width(&self, tuning: &Tuning) -> f32 {
        match self.kind {
            ObstacleKind::Pipe { .. } => tuning.pipe_width,
            ObstacleKind::Winner => tuning.winner_hit_width,
        }
    }

    pub fn right(&self, tuning: &Tuning) -> f32 {
        self.x + self.width(tuning)
    }

    pub fn is_off_screen(&self, tuning: &Tuning) -> bool {
        self.right(tuning) <= 0.0
    }

    /// Gap as (top, bottom), pipes only
    pub fn gap(&self, tuning: &Tuning) -> Option<(f32, f32)> {
        match self.kind {
            ObstacleKind::Pipe { gap_top } => Some((gap_top, gap_top + tuning.pipe_gap)),
            ObstacleKind::Winner => None,
        }
    }

    /// Horizontal overlap between the bird's hit circle and the hit box
    pub fn overlaps(&self, bird: &Bird, tuning: &Tuning) -> bool {
        bird.right() > self.x && bird.left() < self.x + self.hit_width(tuning)
    }

    /// Collision verdict for this obstacle against the bird
    pub fn collide(&self, bird: &Bird, tuning: &Tuning) -> Option<Outcome> {
        if !self.overlaps(bird, tuning) {
            return None;
        }
        match self.kind {
            ObstacleKind::Pipe { gap_top } => {
                let gap_bottom = gap_top + tuning.pipe_gap;
                (bird.top() < gap_top || bird.bottom() > gap_bottom).then_some(Outcome::Crashed)
            }
            // No vertical test - any overlap wins
            ObstacleKind::Winner => Some(Outcome::ReachedWinner),
        }
    }
}

/// What happened to the field during one advance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldReport {
    /// First terminal signal raised this frame
    pub outcome: Option<Outcome>,
    /// Pipes counted this frame
    pub scored: u32,
}

/// Ordered obstacle collection, oldest (leftmost) first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: VecDeque<Obstacle>,
    /// A winner has been spawned this session (even if since recycled)
    winner_spawned: bool,
    next_id: u32,
}

impl Default for ObstacleField {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleField {
    pub fn new() -> Self {
        Self {
            obstacles: VecDeque::new(),
            winner_spawned: false,
            next_id: 1,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn front(&self) -> Option<&Obstacle> {
        self.obstacles.front()
    }

    pub fn winner_spawned(&self) -> bool {
        self.winner_spawned
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push(&mut self, x: f32, kind: ObstacleKind) -> &Obstacle {
        debug_assert!(
            self.obstacles.back().is_none_or(|last| last.x <= x),
            "obstacles must be pushed in left-to-right order"
        );
        let id = self.next_entity_id();
        self.obstacles.push_back(Obstacle {
            id,
            x,
            kind,
            passed: false,
        });
        &self.obstacles[self.obstacles.len() - 1]
    }

    /// Add a pipe at `x` with the given gap anchor
    pub fn spawn_pipe(&mut self, x: f32, gap_top: f32) -> &Obstacle {
        self.push(x, ObstacleKind::Pipe { gap_top })
    }

    /// Add the winner gate at `x`; refused once one has been spawned
    pub fn spawn_winner(&mut self, x: f32) -> Option<&Obstacle> {
        if self.winner_spawned {
            return None;
        }
        self.winner_spawned = true;
        Some(self.push(x, ObstacleKind::Winner))
    }

    /// Spawn whatever the score calls for at the right edge
    fn spawn<R: Rng>(
        &mut self,
        score: &Score,
        playfield: Playfield,
        tuning: &Tuning,
        rng: &mut R,
    ) {
        if score.has_reached(tuning.win_score) {
            if self.spawn_winner(playfield.width).is_some() {
                log::info!("Winner gate spawned at score {}", score.value());
            }
            return;
        }

        let min = tuning.gap_margin_top.floor() as i32;
        let max = ((playfield.height - tuning.gap_margin_bottom - tuning.pipe_gap).floor() as i32)
            .max(min);
        let gap_top = rng.random_range(min..=max) as f32;
        let id = self.spawn_pipe(playfield.width, gap_top).id;
        log::debug!("Pipe {} spawned with gap at {}", id, gap_top);
    }

    /// Advance one frame: spawn, move, collide, score, recycle
    pub fn advance<R: Rng>(
        &mut self,
        clock: &FrameClock,
        score: &mut Score,
        bird: &Bird,
        playfield: Playfield,
        tuning: &Tuning,
        rng: &mut R,
    ) -> FieldReport {
        if clock.is_on_period(tuning.spawn_period) {
            self.spawn(score, playfield, tuning, rng);
        }

        // One speed for everyone keeps spawn order == screen order
        let speed = score.pipe_speed(tuning);
        for obstacle in &mut self.obstacles {
            obstacle.x -= speed;
        }

        let mut report = FieldReport::default();
        for obstacle in &mut self.obstacles {
            if let Some(outcome) = obstacle.collide(bird, tuning) {
                report.outcome.get_or_insert(outcome);
            }

            if !obstacle.passed
                && !obstacle.is_winner()
                && obstacle.right(tuning) < bird.left()
            {
                obstacle.passed = true;
                score.increment();
                report.scored += 1;
            }
        }

        // Recycle last: a pipe is counted before it can leave the field
        while self
            .obstacles
            .front()
            .is_some_and(|front| front.is_off_screen(tuning))
        {
            if let Some(gone) = self.obstacles.pop_front() {
                log::debug!("Obstacle {} recycled", gone.id);
            }
        }

        report
    }

    /// Drop every obstacle and forget the winner
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (Tuning, Bird, Playfield, Pcg32) {
        let tuning = Tuning::default();
        let bird = Bird::new(&tuning);
        (tuning, bird, Playfield::default(), Pcg32::seed_from_u64(7))
    }

    /// A clock that is not on a spawn frame
    fn quiet_clock() -> FrameClock {
        let mut clock = FrameClock::new();
        clock.tick();
        clock
    }

    #[test]
    fn test_spawns_on_frame_zero_at_right_edge() {
        let (tuning, bird, playfield, mut rng) = setup();
        let mut field = ObstacleField::new();
        let mut score = Score::new();

        field.advance(&FrameClock::new(), &mut score, &bird, playfield, &tuning, &mut rng);
        assert_eq!(field.len(), 1);
        let pipe = field.front().unwrap();
        assert_eq!(pipe.x, playfield.width - 2.0);
        let (top, bottom) = pipe.gap(&tuning).unwrap();
        assert!(top >= 50.0);
        assert!(top <= playfield.height - 150.0 - 200.0);
        assert_eq!(bottom - top, 200.0);
        assert_eq!(top.fract(), 0.0);
    }

    #[test]
    fn test_gap_range_collapses_on_tiny_playfield() {
        let (tuning, bird, _, mut rng) = setup();
        let playfield = Playfield::new(300.0, 200.0);
        let mut field = ObstacleField::new();
        field.advance(&FrameClock::new(), &mut Score::new(), &bird, playfield, &tuning, &mut rng);
        assert_eq!(field.front().unwrap().gap(&tuning).unwrap().0, 50.0);
    }

    #[test]
    fn test_pipe_collision_outside_gap() {
        let (tuning, mut bird, playfield, mut rng) = setup();
        let mut field = ObstacleField::new();
        field.spawn_pipe(30.0 + 2.0, 100.0);

        bird.pos.y = 150.0;
        let report =
            field.clone().advance(&quiet_clock(), &mut Score::new(), &bird, playfield, &tuning, &mut rng);
        assert_eq!(report.outcome, None);

        bird.pos.y = 50.0;
        let report = field.advance(&quiet_clock(), &mut Score::new(), &bird, playfield, &tuning, &mut rng);
        assert_eq!(report.outcome, Some(Outcome::Crashed));
    }

    #[test]
    fn test_pipe_collision_below_gap() {
        let (tuning, mut bird, playfield, mut rng) = setup();
        let mut field = ObstacleField::new();
        field.spawn_pipe(32.0, 100.0);
        bird.pos.y = 290.0;
        let report = field.advance(&quiet_clock(), &mut Score::new(), &bird, playfield, &tuning, &mut rng);
        assert_eq!(report.outcome, Some(Outcome::Crashed));
    }

    #[test]
    fn test_no_collision_without_horizontal_overlap() {
        let (tuning, mut bird, playfield, mut rng) = setup();
        let mut field = ObstacleField::new();
        // Left edge lands exactly on bird.right() = 75 after moving 2px
        field.spawn_pipe(77.0, 100.0);
        bird.pos.y = 10.0;
        let report = field.advance(&quiet_clock(), &mut Score::new(), &bird, playfield, &tuning, &mut rng);
        assert_eq!(report.outcome, None);
    }

    #[test]
    fn test_winner_hitbox_is_generous_and_narrow() {
        let (tuning, mut bird, playfield, mut rng) = setup();
        bird.pos.y = 600.0;

        // Touching from the right: x = 74 after the move, bird.right() = 75
        let mut field = ObstacleField::new();
        field.spawn_winner(76.0);
        let report = field.advance(&quiet_clock(), &mut Score::new(), &bird, playfield, &tuning, &mut rng);
        assert_eq!(report.outcome, Some(Outcome::ReachedWinner));

        // Drawn box still overlaps but the 100px hitbox has passed the bird
        let mut field = ObstacleField::new();
        field.spawn_winner(-73.0);
        let report = field.advance(&quiet_clock(), &mut Score::new(), &bird, playfield, &tuning, &mut rng);
        assert_eq!(report.outcome, None);
    }

    #[test]
    fn test_scores_once_per_pipe() {
        let (tuning, bird, playfield, mut rng) = setup();
        let mut field = ObstacleField::new();
        let mut score = Score::new();
        // Right edge ends at 24, just behind bird.left() = 25
        field.spawn_pipe(-14.0, 100.0);

        let report = field.advance(&quiet_clock(), &mut score, &bird, playfield, &tuning, &mut rng);
        assert_eq!(report.scored, 1);
        assert_eq!(score.value(), 1);
        assert!(field.front().unwrap().passed);

        let report = field.advance(&quiet_clock(), &mut score, &bird, playfield, &tuning, &mut rng);
        assert_eq!(report.scored, 0);
        assert_eq!(score.value(), 1);
    }

    #[test]
    fn test_winner_never_scores() {
        let (tuning, bird, playfield, mut rng) = setup();
        let mut field = ObstacleField::new();
        let mut score = Score::new();
        field.spawn_winner(-170.0);
        field.advance(&quiet_clock(), &mut score, &bird, playfield, &tuning, &mut rng);
        assert_eq!(score.value(), 0);
    }

    #[test]
    fn test_recycles_from_front() {
        let (tuning, bird, playfield, mut rng) = setup();
        let mut field = ObstacleField::new();
        field.spawn_pipe(-38.0, 100.0);
        field.spawn_pipe(200.0, 100.0);
        let mut score = Score::new();

        field.advance(&quiet_clock(), &mut score, &bird, playfield, &tuning, &mut rng);
        assert_eq!(field.len(), 1);
        assert_eq!(field.front().unwrap().x, 198.0);
    }

    #[test]
    fn test_fast_pipe_scores_before_recycling() {
        let (_, bird, playfield, mut rng) = setup();
        let tuning = Tuning {
            base_speed: 70.0,
            ..Tuning::default()
        };
        let mut field = ObstacleField::new();
        let mut score = Score::new();
        // Right edge goes from 60 (ahead of bird.left() = 25) to -10 in one frame
        field.spawn_pipe(20.0, 100.0);

        let report = field.advance(&quiet_clock(), &mut score, &bird, playfield, &tuning, &mut rng);
        assert_eq!(report.scored, 1);
        assert_eq!(score.value(), 1);
        assert!(field.is_empty());
    }

    #[test]
    fn test_winner_replaces_pipes_after_threshold() {
        let (tuning, bird, playfield, mut rng) = setup();
        let mut field = ObstacleField::new();
        let mut score = Score::new();
        for _ in 0..tuning.win_score {
            score.increment();
        }

        field.advance(&FrameClock::new(), &mut score, &bird, playfield, &tuning, &mut rng);
        assert!(field.front().unwrap().is_winner());

        let mut clock = FrameClock::new();
        for _ in 0..tuning.spawn_period {
            clock.tick();
        }
        field.advance(&clock, &mut score, &bird, playfield, &tuning, &mut rng);
        assert_eq!(field.len(), 1);
        assert_eq!(field.iter().filter(|o| o.is_winner()).count(), 1);
    }

    #[test]
    fn test_spawn_winner_only_once() {
        let mut field = ObstacleField::new();
        assert!(field.spawn_winner(400.0).is_some());
        assert!(field.spawn_winner(400.0).is_none());
        assert!(field.winner_spawned());
    }

    #[test]
    fn test_reset_matches_fresh() {
        let mut field = ObstacleField::new();
        field.spawn_pipe(10.0, 60.0);
        field.spawn_winner(300.0);
        field.reset();
        field.reset();
        assert_eq!(field, ObstacleField::new());
    }
}
