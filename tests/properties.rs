//! Property tests over random input sequences

use flappy_gate::Tuning;
use flappy_gate::hooks::{GameHooks, HookResult, NullRenderer};
use flappy_gate::sim::{GamePhase, LoopControl, Playfield, Session, tick};
use proptest::prelude::*;

#[derive(Default)]
struct Counts {
    playing: u32,
    game_over: u32,
    win: u32,
}

impl GameHooks for Counts {
    fn on_enter_playing(&mut self) -> HookResult {
        self.playing += 1;
        Ok(())
    }
    fn on_enter_game_over(&mut self, _final_score: u32) -> HookResult {
        self.game_over += 1;
        Ok(())
    }
    fn on_enter_win(&mut self, _final_score: u32) -> HookResult {
        self.win += 1;
        Ok(())
    }
}

/// Easy tuning so random flapping gets far enough to score and win
fn forgiving() -> Tuning {
    Tuning {
        pipe_gap: 400.0,
        spawn_period: 60,
        ..Tuning::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn score_never_decreases_and_one_winner(
        seed in any::<u64>(),
        flaps in prop::collection::vec(any::<bool>(), 1..2_000),
    ) {
        let mut session = Session::with_tuning(seed, forgiving(), Playfield::default());
        let mut hooks = Counts::default();
        session.start(&mut hooks);

        let mut last_score = 0;
        for flap in flaps {
            if flap && session.bird.vel_y > 0.0 {
                session.flap();
            }
            // Pipes recycled this frame may still have scored, a new spawn cannot
            let live = session.obstacles.len() as u32;
            let control = tick(&mut session, &mut hooks, &mut NullRenderer);

            let score = session.score.value();
            prop_assert!(score >= last_score);
            prop_assert!(score - last_score <= live);
            last_score = score;

            prop_assert!(session.obstacles.iter().filter(|o| o.is_winner()).count() <= 1);
            if session.obstacles.iter().any(|o| o.is_winner()) {
                prop_assert!(session.score.has_reached(session.tuning.win_score));
            }

            if control == LoopControl::Halt {
                break;
            }
        }
        prop_assert!(hooks.game_over + hooks.win <= 1);
    }

    #[test]
    fn obstacles_stay_in_screen_order(
        seed in any::<u64>(),
        frames in 1usize..1_500,
    ) {
        let mut session = Session::new(seed);
        session.start(&mut Counts::default());
        for _ in 0..frames {
            // Hold the bird in the middle so it only ends on a pipe hit
            session.bird.pos.y = session.playfield.height / 2.0;
            session.bird.vel_y = 0.0;
            if tick(&mut session, &mut Counts::default(), &mut NullRenderer) == LoopControl::Halt {
                break;
            }
            let xs: Vec<f32> = session.obstacles.iter().map(|o| o.x).collect();
            prop_assert!(xs.windows(2).all(|w| w[0] <= w[1]));
            prop_assert!(session.obstacles.iter().all(|o| !o.is_off_screen(&session.tuning)));
        }
    }

    #[test]
    fn restart_restores_fresh_state(
        seed in any::<u64>(),
        frames in 1usize..600,
        flaps in prop::collection::vec(any::<bool>(), 600),
    ) {
        let mut hooks = Counts::default();
        let mut session = Session::new(seed);
        session.start(&mut hooks);
        for flap in flaps.iter().take(frames) {
            if *flap {
                session.flap();
            }
            if tick(&mut session, &mut hooks, &mut NullRenderer) == LoopControl::Halt {
                break;
            }
        }
        session.trigger_game_over(&mut hooks);
        prop_assert!(session.restart(&mut hooks));

        let fresh = Session::new(seed);
        prop_assert_eq!(&session.bird, &fresh.bird);
        prop_assert_eq!(&session.obstacles, &fresh.obstacles);
        prop_assert_eq!(session.score, fresh.score);
        prop_assert_eq!(session.clock, fresh.clock);
        prop_assert_eq!(session.phase, GamePhase::Playing);
    }

    #[test]
    fn game_over_hook_fires_once(repeats in 1usize..10) {
        let mut hooks = Counts::default();
        let mut session = Session::new(0);
        session.start(&mut hooks);
        for _ in 0..repeats {
            session.trigger_game_over(&mut hooks);
        }
        prop_assert_eq!(hooks.playing, 1);
        prop_assert_eq!(hooks.game_over, 1);
        prop_assert_eq!(session.phase, GamePhase::GameOver);
    }
}
