//! Phase transitions: START -> PLAYING -> GAMEOVER | WIN -> PLAYING
//!
//! Commands that are invalid for the current phase are ignored and return
//! `false`; hooks only fire on a real transition.

use super::state::{GamePhase, Outcome, Session};
use crate::hooks::{GameHooks, report};

impl Session {
    /// Leave the title screen. Only valid from START.
    pub fn start(&mut self, hooks: &mut dyn GameHooks) -> bool {
        if self.phase != GamePhase::Start {
            return false;
        }
        // Attract-mode ticks may have advanced the clock
        self.clock.reset();
        self.phase = GamePhase::Playing;
        log::info!("Game started (seed {})", self.seed);
        report("enter_playing", hooks.on_enter_playing());
        true
    }

    /// End the run after a crash. Only valid from PLAYING.
    pub fn trigger_game_over(&mut self, hooks: &mut dyn GameHooks) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::GameOver;
        let score = self.score.value();
        log::info!("Game over at frame {} with score {}", self.clock.frame(), score);
        report("enter_game_over", hooks.on_enter_game_over(score));
        true
    }

    /// End the run at the winner gate. Only valid from PLAYING.
    pub fn trigger_win(&mut self, hooks: &mut dyn GameHooks) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Win;
        let score = self.score.value();
        log::info!("Winner gate reached at frame {} with score {}", self.clock.frame(), score);
        report("enter_win", hooks.on_enter_win(score));
        true
    }

    /// Fresh run after GAMEOVER or WIN
    pub fn restart(&mut self, hooks: &mut dyn GameHooks) -> bool {
        if !self.phase.is_terminal() {
            return false;
        }
        self.reset_world();
        self.phase = GamePhase::Playing;
        log::info!("Game restarted");
        report("score_changed", hooks.on_score_changed(0));
        report("enter_playing", hooks.on_enter_playing());
        true
    }

    /// Single start/restart button
    pub fn start_or_restart(&mut self, hooks: &mut dyn GameHooks) -> bool {
        match self.phase {
            GamePhase::Start => self.start(hooks),
            GamePhase::GameOver | GamePhase::Win => self.restart(hooks),
            GamePhase::Playing => false,
        }
    }

    /// Flap input; ignored unless PLAYING
    pub fn flap(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.bird.flap();
        true
    }

    /// Route a component's terminal signal to its transition
    pub fn apply(&mut self, outcome: Outcome, hooks: &mut dyn GameHooks) -> bool {
        match outcome {
            Outcome::Crashed => self.trigger_game_over(hooks),
            Outcome::ReachedWinner => self.trigger_win(hooks),
        }
    }
}
