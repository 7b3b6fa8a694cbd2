//! Flappy Gate entry point
//!
//! In the browser this wires the simulation to the canvas, the DOM overlays
//! and Web Audio. Natively it runs a headless autopilot session and logs it.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, KeyboardEvent, MouseEvent,
    };

    use flappy_gate::Settings;
    use flappy_gate::audio::{AudioManager, SoundEffect};
    use flappy_gate::effects::Celebration;
    use flappy_gate::hooks::{
        Background, FrameScheduler, GameHooks, HookError, HookResult, RenderFrame, Renderer,
    };
    use flappy_gate::sim::{LoopControl, ObstacleKind, Playfield, Session, run_frame};

    /// Keep the first failure but run every step
    fn first_error(results: impl IntoIterator<Item = HookResult>) -> HookResult {
        results.into_iter().fold(Ok(()), |acc, r| acc.and(r))
    }

    /// DOM overlays, HUD, audio and confetti
    struct DomHooks {
        document: Document,
        audio: AudioManager,
        celebration: Celebration,
    }

    impl DomHooks {
        fn element(&self, id: &str) -> Result<Element, HookError> {
            self.document
                .get_element_by_id(id)
                .ok_or_else(|| HookError::MissingElement(id.to_string()))
        }

        fn show(&self, id: &str) -> HookResult {
            self.element(id)?
                .class_list()
                .remove_1("hidden")
                .map_err(|_| HookError::MissingElement(id.to_string()))
        }

        fn hide(&self, id: &str) -> HookResult {
            self.element(id)?
                .class_list()
                .add_1("hidden")
                .map_err(|_| HookError::MissingElement(id.to_string()))
        }

        fn set_text(&self, id: &str, text: &str) -> HookResult {
            self.element(id)?.set_text_content(Some(text));
            Ok(())
        }
    }

    impl GameHooks for DomHooks {
        fn on_enter_playing(&mut self) -> HookResult {
            self.celebration.clear();
            self.audio.stop_win();
            first_error([
                self.hide("start-screen"),
                self.hide("game-over-screen"),
                self.hide("win-screen"),
                self.show("hud"),
                self.audio.start_music(),
            ])
        }

        fn on_enter_game_over(&mut self, final_score: u32) -> HookResult {
            self.audio.stop_music();
            first_error([
                self.audio.play(SoundEffect::Hit),
                self.show("game-over-screen"),
                self.set_text("final-score", &final_score.to_string()),
            ])
        }

        fn on_enter_win(&mut self, final_score: u32) -> HookResult {
            self.audio.stop_music();
            self.celebration.fire();
            first_error([
                self.show("win-screen"),
                self.set_text("win-score", &final_score.to_string()),
                self.audio.play(SoundEffect::Win),
            ])
        }

        fn on_score_changed(&mut self, score: u32) -> HookResult {
            self.set_text("current-score", &score.to_string())
        }
    }

    /// Primitive canvas drawing
    struct CanvasRenderer {
        ctx: CanvasRenderingContext2d,
        width: f64,
        height: f64,
    }

    impl CanvasRenderer {
        fn draw(&self, frame: &RenderFrame<'_>) -> Result<(), JsValue> {
            let ctx = &self.ctx;
            let tuning = frame.tuning;

            ctx.set_fill_style_str(&frame.background.css());
            ctx.fill_rect(0.0, 0.0, self.width, self.height);

            for obstacle in frame.obstacles.iter() {
                let x = obstacle.x as f64;
                match obstacle.kind {
                    ObstacleKind::Pipe { gap_top } => {
                        let w = tuning.pipe_width as f64;
                        let bottom = (gap_top + tuning.pipe_gap) as f64;
                        ctx.set_fill_style_str("#5a8f29");
                        ctx.fill_rect(x, 0.0, w, gap_top as f64);
                        ctx.fill_rect(x, bottom, w, self.height - bottom);
                    }
                    ObstacleKind::Winner => {
                        let y = tuning.winner_y as f64;
                        let w = tuning.winner_width as f64;
                        let h = tuning.winner_height as f64;
                        ctx.set_fill_style_str("#f5c842");
                        ctx.fill_rect(x, y, w, h);
                        ctx.set_fill_style_str("#7a4f00");
                        ctx.set_font("bold 48px sans-serif");
                        ctx.set_text_align("center");
                        ctx.fill_text("WIN", x + w / 2.0, y + h / 2.0)?;
                    }
                }
            }

            let bird = frame.bird;
            ctx.save();
            ctx.translate(bird.pos.x as f64, bird.pos.y as f64)?;
            ctx.rotate(bird.rotation as f64)?;
            let (hw, hh) = (bird.size.x as f64 / 2.0, bird.size.y as f64 / 2.0);
            ctx.set_fill_style_str("#f5c842");
            ctx.begin_path();
            ctx.ellipse(0.0, 0.0, hw, hh, 0.0, 0.0, std::f64::consts::TAU)?;
            ctx.fill();
            ctx.set_fill_style_str("#e14b23");
            ctx.fill_rect(hw * 0.6, -hh * 0.1, hw * 0.5, hh * 0.35);
            ctx.set_fill_style_str("#ffffff");
            ctx.fill_rect(hw * 0.25, -hh * 0.6, hw * 0.3, hh * 0.4);
            ctx.restore();
            Ok(())
        }

        fn draw_confetti(&self, celebration: &Celebration) {
            for piece in celebration.pieces() {
                let [r, g, b] = piece.color;
                self.ctx.set_global_alpha(piece.opacity() as f64);
                self.ctx
                    .set_fill_style_str(&format!("rgb({}, {}, {})", r, g, b));
                let w = 8.0 * (piece.tilt as f64).cos().abs() + 2.0;
                self.ctx
                    .fill_rect(piece.pos.x as f64, piece.pos.y as f64, w, 6.0);
            }
            self.ctx.set_global_alpha(1.0);
        }
    }

    impl Renderer for CanvasRenderer {
        fn clear(&mut self) {
            self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        }

        fn render(&mut self, frame: &RenderFrame<'_>) -> HookResult {
            self.draw(frame)
                .map_err(|e| HookError::Render(format!("{:?}", e)))
        }
    }

    /// Records whether the tick asked for another frame
    #[derive(Default)]
    struct NextFrame {
        requested: bool,
    }

    impl FrameScheduler for NextFrame {
        fn request_next_frame(&mut self) {
            self.requested = true;
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        hooks: DomHooks,
        renderer: CanvasRenderer,
        /// A simulation frame is scheduled
        running: bool,
        /// A confetti frame is scheduled
        confetti_running: bool,
    }

    impl Game {
        /// Redraw the frozen scene under the confetti
        fn draw_celebration(&mut self) {
            let session = &self.session;
            let frame = RenderFrame {
                bird: &session.bird,
                obstacles: &session.obstacles,
                background: Background::default(),
                playfield: session.playfield,
                tuning: &session.tuning,
            };
            self.renderer.clear();
            if let Err(e) = self.renderer.render(&frame) {
                log::warn!("Render failed: {}", e);
            }
            self.renderer.draw_confetti(&self.hooks.celebration);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flappy Gate starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let (width, height) = container_size(&document, &canvas);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let seed = js_sys::Date::now() as u64;
        let mut session = Session::new(seed);
        session.resize(width, height);

        let settings = Settings::default();
        let game = Rc::new(RefCell::new(Game {
            session,
            hooks: DomHooks {
                document: document.clone(),
                audio: AudioManager::new(settings),
                celebration: Celebration::new(seed ^ 0x9e37_79b9),
            },
            renderer: CanvasRenderer {
                ctx,
                width: width as f64,
                height: height as f64,
            },
            running: true,
            confetti_running: false,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_resize(canvas, game.clone());

        // Title screen bob
        request_animation_frame(game);

        log::info!("Flappy Gate running!");
    }

    fn container_size(document: &Document, canvas: &HtmlCanvasElement) -> (f32, f32) {
        match document.get_element_by_id("game-container") {
            Some(container) => (
                container.client_width() as f32,
                container.client_height() as f32,
            ),
            None => (canvas.width() as f32, canvas.height() as f32),
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    event.prevent_default();
                    game.borrow_mut().session.flap();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click on the canvas
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.flap();
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["start-btn", "restart-btn", "win-restart-btn"] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Button #{} not found", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let needs_loop = {
                    let mut guard = game.borrow_mut();
                    let g = &mut *guard;
                    let changed = g.session.start_or_restart(&mut g.hooks);
                    let needs_loop = changed && !g.running;
                    if needs_loop {
                        g.running = true;
                    }
                    needs_loop
                };
                if needs_loop {
                    request_animation_frame(game.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let (width, height) = container_size(&document, &canvas);
            canvas.set_width(width as u32);
            canvas.set_height(height as u32);

            let mut g = game.borrow_mut();
            g.session.resize(width, height);
            g.renderer.width = width as f64;
            g.renderer.height = height as f64;
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let (requested, start_confetti) = {
            let mut guard = game.borrow_mut();
            let g = &mut *guard;
            let mut next = NextFrame::default();
            let control = run_frame(&mut g.session, &mut g.hooks, &mut g.renderer, &mut next);
            if control == LoopControl::Halt {
                g.running = false;
            }
            let start_confetti = g.hooks.celebration.is_active() && !g.confetti_running;
            if start_confetti {
                g.confetti_running = true;
            }
            (next.requested, start_confetti)
        };

        if start_confetti {
            request_confetti_frame(game.clone());
        }
        if requested {
            request_animation_frame(game);
        }
    }

    fn request_confetti_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            confetti_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn confetti_loop(game: Rc<RefCell<Game>>) {
        let keep_going = {
            let mut g = game.borrow_mut();
            // A restart took over the canvas
            if g.running || !g.hooks.celebration.is_active() {
                g.confetti_running = false;
                false
            } else {
                let playfield: Playfield = g.session.playfield;
                g.hooks.celebration.update(playfield);
                g.draw_celebration();
                true
            }
        };
        if keep_going {
            request_confetti_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use flappy_gate::hooks::{FrameScheduler, GameHooks, HookResult, NullRenderer};
    use flappy_gate::sim::{ObstacleKind, Session, run_frame};

    /// Logs every transition
    pub struct LogHooks;

    impl GameHooks for LogHooks {
        fn on_enter_playing(&mut self) -> HookResult {
            log::info!("[hook] playing");
            Ok(())
        }
        fn on_enter_game_over(&mut self, final_score: u32) -> HookResult {
            log::info!("[hook] game over, final score {}", final_score);
            Ok(())
        }
        fn on_enter_win(&mut self, final_score: u32) -> HookResult {
            log::info!("[hook] win, final score {}", final_score);
            Ok(())
        }
        fn on_score_changed(&mut self, score: u32) -> HookResult {
            log::info!("[hook] score {}", score);
            Ok(())
        }
    }

    /// Runs requested frames back to back, up to a budget
    pub struct FrameBudget {
        pending: bool,
        remaining: u64,
    }

    impl FrameBudget {
        pub fn new(frames: u64) -> Self {
            Self {
                pending: true,
                remaining: frames,
            }
        }

        fn take(&mut self) -> bool {
            if !self.pending || self.remaining == 0 {
                return false;
            }
            self.pending = false;
            self.remaining -= 1;
            true
        }
    }

    impl FrameScheduler for FrameBudget {
        fn request_next_frame(&mut self) {
            self.pending = true;
        }
    }

    /// Flap whenever the bird sinks below the middle of the next gap
    fn autopilot(session: &mut Session) {
        let bird = &session.bird;
        let tuning = &session.tuning;
        let target = session
            .obstacles
            .iter()
            .find(|o| o.right(tuning) >= bird.left())
            .and_then(|o| match o.kind {
                ObstacleKind::Pipe { gap_top } => Some(gap_top + tuning.pipe_gap / 2.0),
                ObstacleKind::Winner => None,
            })
            .unwrap_or(session.playfield.height / 2.0);

        if bird.pos.y > target + 20.0 && bird.vel_y > 0.0 {
            session.flap();
        }
    }

    pub fn run(mut session: Session, frames: u64) {
        let mut hooks = LogHooks;
        let mut renderer = NullRenderer;
        let mut budget = FrameBudget::new(frames);

        session.start(&mut hooks);
        while budget.take() {
            autopilot(&mut session);
            run_frame(&mut session, &mut hooks, &mut renderer, &mut budget);
        }

        log::info!(
            "Stopped at frame {} in {:?} with score {}",
            session.clock.frame(),
            session.phase,
            session.score.value()
        );
        match serde_json::to_string_pretty(&session.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize snapshot: {}", e),
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flappy_gate::Tuning;
    use flappy_gate::sim::{Playfield, Session};

    env_logger::init();
    log::info!("Flappy Gate (headless) starting...");

    let mut tuning_path = None;
    let mut seed = 1u64;
    let mut frames = 10_000u64;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--tuning" => tuning_path = args.next(),
            "--seed" => seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(seed),
            "--frames" => frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(frames),
            other => log::warn!("Ignoring unknown argument {}", other),
        }
    }

    let tuning = match tuning_path {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let session = Session::with_tuning(seed, tuning, Playfield::default());
    headless::run(session, frames);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
