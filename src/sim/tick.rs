//! Per-frame simulation tick
//!
//! One tick runs to completion before the next is requested. Once the session
//! is terminal no further tick is scheduled.

use super::state::{GamePhase, Session};
use crate::hooks::{Background, FrameScheduler, GameHooks, RenderFrame, Renderer, report};

/// Whether the loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Halt,
}

/// Advance the session by one frame.
///
/// Obstacles move and collide before the bird checks the floor, so a frame
/// with both a pipe hit and a floor hit reports the pipe. In START only the
/// bird bobs and the clock runs.
pub fn tick(
    session: &mut Session,
    hooks: &mut dyn GameHooks,
    renderer: &mut dyn Renderer,
) -> LoopControl {
    if session.is_terminal() {
        return LoopControl::Halt;
    }

    renderer.clear();

    if session.phase == GamePhase::Playing {
        let report = session.obstacles.advance(
            &session.clock,
            &mut session.score,
            &session.bird,
            session.playfield,
            &session.tuning,
            &mut session.rng,
        );
        if report.scored > 0 {
            report_score(session, hooks);
        }
        if let Some(outcome) = report.outcome {
            session.apply(outcome, hooks);
        }
    }

    let idle = session.phase.is_idle();
    if let Some(outcome) = session
        .bird
        .advance(idle, &session.clock, session.playfield.height)
    {
        session.apply(outcome, hooks);
    }

    let frame = RenderFrame {
        bird: &session.bird,
        obstacles: &session.obstacles,
        background: Background::default(),
        playfield: session.playfield,
        tuning: &session.tuning,
    };
    report("render", renderer.render(&frame));

    session.clock.tick();

    if session.is_terminal() {
        LoopControl::Halt
    } else {
        LoopControl::Continue
    }
}

fn report_score(session: &Session, hooks: &mut dyn GameHooks) {
    log::debug!("Score {}", session.score.value());
    report("score_changed", hooks.on_score_changed(session.score.value()));
}

/// Tick once and ask the scheduler for the next frame unless halted
pub fn run_frame(
    session: &mut Session,
    hooks: &mut dyn GameHooks,
    renderer: &mut dyn Renderer,
    scheduler: &mut dyn FrameScheduler,
) -> LoopControl {
    let control = tick(session, hooks, renderer);
    if control == LoopControl::Continue {
        scheduler.request_next_frame();
    }
    control
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{HookResult, NoopHooks, NullRenderer};
    use crate::sim::Outcome;

    #[derive(Default)]
    struct Counter {
        requests: u32,
    }

    impl FrameScheduler for Counter {
        fn request_next_frame(&mut self) {
            self.requests += 1;
        }
    }

    #[derive(Default)]
    struct CountingRenderer {
        clears: u32,
        renders: u32,
    }

    impl Renderer for CountingRenderer {
        fn clear(&mut self) {
            self.clears += 1;
        }
        fn render(&mut self, _frame: &RenderFrame<'_>) -> HookResult {
            self.renders += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Transitions {
        game_over: u32,
        win: u32,
    }

    impl GameHooks for Transitions {
        fn on_enter_playing(&mut self) -> HookResult {
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

    #[test]
    fn test_start_phase_only_idles() {
        let mut session = Session::new(3);
        let mut renderer = CountingRenderer::default();
        for _ in 0..200 {
            assert_eq!(tick(&mut session, &mut NoopHooks, &mut renderer), LoopControl::Continue);
        }
        assert!(session.obstacles.is_empty());
        assert_eq!(session.clock.frame(), 200);
        assert_eq!(renderer.clears, 200);
        assert_eq!(renderer.renders, 200);
    }

    #[test]
    fn test_first_playing_frame_spawns() {
        let mut session = Session::new(3);
        session.start(&mut NoopHooks);
        tick(&mut session, &mut NoopHooks, &mut NullRenderer);
        assert_eq!(session.obstacles.len(), 1);
        assert_eq!(session.clock.frame(), 1);
    }

    #[test]
    fn test_terminal_phase_halts_without_work() {
        let mut session = Session::new(3);
        session.start(&mut NoopHooks);
        session.apply(Outcome::Crashed, &mut NoopHooks);
        let frame = session.clock.frame();

        let mut scheduler = Counter::default();
        let mut renderer = CountingRenderer::default();
        let control = run_frame(&mut session, &mut NoopHooks, &mut renderer, &mut scheduler);
        assert_eq!(control, LoopControl::Halt);
        assert_eq!(scheduler.requests, 0);
        assert_eq!(renderer.clears, 0);
        assert_eq!(session.clock.frame(), frame);
    }

    #[test]
    fn test_schedules_while_playing() {
        let mut session = Session::new(3);
        session.start(&mut NoopHooks);
        let mut scheduler = Counter::default();
        for _ in 0..5 {
            run_frame(&mut session, &mut NoopHooks, &mut NullRenderer, &mut scheduler);
        }
        assert_eq!(scheduler.requests, 5);
    }

    #[test]
    fn test_floor_contact_ends_run_once() {
        let mut session = Session::new(3);
        let mut hooks = Transitions::default();
        session.start(&mut hooks);
        let floor = session.playfield.height;
        session.bird.pos.y = floor - session.bird.size.y / 2.0;

        let mut scheduler = Counter::default();
        let control = run_frame(&mut session, &mut hooks, &mut NullRenderer, &mut scheduler);
        assert_eq!(control, LoopControl::Halt);
        assert_eq!(scheduler.requests, 0);
        assert_eq!(session.phase, GamePhase::GameOver);
        assert_eq!(session.bird.pos.y, floor - session.bird.size.y / 2.0);
        assert_eq!(hooks.game_over, 1);

        run_frame(&mut session, &mut hooks, &mut NullRenderer, &mut scheduler);
        assert_eq!(hooks.game_over, 1);
    }

    #[test]
    fn test_pipe_hit_reported_before_floor() {
        let mut session = Session::new(3);
        let mut hooks = Transitions::default();
        session.start(&mut hooks);
        session.clock.tick();
        session.obstacles.spawn_pipe(40.0, 50.0);
        session.bird.pos.y = session.playfield.height - session.bird.size.y / 2.0;

        tick(&mut session, &mut hooks, &mut NullRenderer);
        assert_eq!(session.phase, GamePhase::GameOver);
        assert_eq!(hooks.game_over, 1);
    }

    #[test]
    fn test_win_puts_bird_back_to_idle() {
        let mut session = Session::new(3);
        let mut hooks = Transitions::default();
        session.start(&mut hooks);
        session.clock.tick();
        session.obstacles.spawn_winner(40.0);
        session.bird.vel_y = 2.0;
        session.bird.rotation = 0.5;

        assert_eq!(tick(&mut session, &mut hooks, &mut NullRenderer), LoopControl::Halt);
        assert_eq!(session.phase, GamePhase::Win);
        assert_eq!(hooks.win, 1);
        assert_eq!(session.bird.rotation, 0.0);
    }
}
