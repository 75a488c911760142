//! Street Run entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use street_run::autopilot;
    use street_run::platform::{GameLoop, LoopControl, Pacing, action_for_key};
    use street_run::renderer::{CanvasRenderer, build_scene};
    use street_run::sim::{Action, Engine, GameEvent, GamePhase};
    use street_run::submit::{LogSubmitter, STREET_RUN_GAME_ID, ScoreReporter};
    use street_run::Tuning;

    /// Game instance holding all state
    struct Game {
        game_loop: GameLoop,
        renderer: CanvasRenderer,
        reporter: ScoreReporter<LogSubmitter>,
        /// Autopilot plays the game
        idle_mode: bool,
        /// A requestAnimationFrame callback is pending
        frame_requested: bool,
    }

    impl Game {
        fn render(&self) {
            let tuning = self.game_loop.engine().tuning();
            let cmds = build_scene(&self.game_loop.snapshot(), tuning);
            if let Err(e) = self.renderer.draw(&cmds) {
                log::warn!("Render error: {:?}", e);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let snap = self.game_loop.snapshot();

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&snap.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-coins") {
                el.set_text_content(Some(&snap.coins.to_string()));
            }

            let show = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };
            show("start-prompt", snap.phase == GamePhase::NotStarted);
            show("game-over", snap.phase == GamePhase::Over);

            if snap.phase == GamePhase::Over {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&snap.score.to_string()));
                }
                let saved = self
                    .reporter
                    .is_saved(self.game_loop.engine().run_number());
                show("saved-note", saved);
                show("save-hint", !saved);
            }
        }

        /// Submit the finished run's score
        fn save_score(&mut self) {
            let engine = self.game_loop.engine();
            let run = engine.run_number();
            let final_score = engine.final_score();
            match self.reporter.submit_final(run, final_score) {
                Ok(()) => self.update_hud(),
                Err(e) if e.is_retryable() => {
                    if let Some(window) = web_sys::window() {
                        let _ = window.alert_with_message("Failed to save score.");
                    }
                }
                Err(e) => log::info!("{e}"),
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Street Run starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let tuning = Tuning::default();
        let renderer = CanvasRenderer::new(
            &canvas,
            tuning.world_width() as u32,
            tuning.world_height as u32,
        )
        .expect("no 2d context");

        let seed = js_sys::Date::now() as u64;
        let engine = match Engine::seeded(tuning, seed) {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("Invalid tuning: {}", e);
                return;
            }
        };
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            game_loop: GameLoop::new(engine, Pacing::PerFrame),
            renderer,
            reporter: ScoreReporter::new(LogSubmitter::default(), STREET_RUN_GAME_ID),
            idle_mode: false,
            frame_requested: false,
        }));

        {
            let g = game.borrow();
            g.render();
            g.update_hud();
        }

        setup_keyboard(game);

        log::info!("Street Run ready - press Space");
    }

    /// Queue `action`; schedule a frame if it woke the loop
    fn send(game: &Rc<RefCell<Game>>, action: Action) {
        let wake = {
            let mut g = game.borrow_mut();
            let woke = g.game_loop.push_input(action);
            let wake = woke && !g.frame_requested;
            if wake {
                g.frame_requested = true;
            }
            wake
        };
        if wake {
            request_animation_frame(game.clone());
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let code = event.code();
            let phase = game.borrow().game_loop.engine().phase();

            match code.as_str() {
                "KeyI" => {
                    let idle = {
                        let mut g = game.borrow_mut();
                        g.idle_mode = !g.idle_mode;
                        g.idle_mode
                    };
                    log::info!("Idle mode: {}", idle);
                    if idle && phase == GamePhase::NotStarted {
                        send(&game, Action::Start);
                    } else if idle && phase == GamePhase::Over {
                        send(&game, Action::Restart);
                    }
                }
                "KeyS" if phase == GamePhase::Over => game.borrow_mut().save_score(),
                _ => {
                    if let Some(action) = action_for_key(&code, phase) {
                        event.prevent_default();
                        send(&game, action);
                    }
                }
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let control = {
            let mut g = game.borrow_mut();

            if g.idle_mode {
                let tuning = g.game_loop.engine().tuning();
                let suggestion = autopilot::suggest(&g.game_loop.snapshot(), tuning);
                if let Some(action) = suggestion {
                    g.game_loop.push_input(action);
                }
            }

            let mut control = g.game_loop.frame(time);
            for event in g.game_loop.events() {
                if let GameEvent::Crashed { obstacle_id } = event {
                    log::info!("Crashed into obstacle #{}", obstacle_id);
                }
            }

            // Idle mode keeps playing after a crash
            if g.idle_mode && control == LoopControl::Stop {
                let tuning = g.game_loop.engine().tuning();
                let suggestion = autopilot::suggest(&g.game_loop.snapshot(), tuning);
                if let Some(action) = suggestion {
                    if g.game_loop.push_input(action) {
                        control = LoopControl::Continue;
                    }
                }
            }

            g.render();
            g.update_hud();
            g.frame_requested = control == LoopControl::Continue;
            control
        };

        if control == LoopControl::Continue {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web_game::run();
}

/// Frames the headless demo plays before giving up (10 minutes at 60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const DEMO_MAX_FRAMES: u32 = 36_000;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use street_run::platform::{GameLoop, LoopControl, Pacing};
    use street_run::sim::Engine;
    use street_run::submit::{LogSubmitter, STREET_RUN_GAME_ID, ScoreReporter};
    use street_run::{Tuning, autopilot};

    env_logger::init();
    log::info!("Street Run (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` to play");

    let tuning = match std::env::var("STREET_RUN_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::error!("Bad tuning file {}: {}", path, e);
                std::process::exit(1);
            }
        },
        Err(_) => Tuning::default(),
    };

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);

    let engine = match Engine::seeded(tuning, seed) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("Invalid tuning: {}", e);
            std::process::exit(1);
        }
    };
    let mut game_loop = GameLoop::new(engine, Pacing::PerFrame);
    game_loop.push_input(street_run::Action::Start);

    let mut frames = 0;
    let mut now_ms = 0.0;
    while frames < DEMO_MAX_FRAMES {
        let suggestion = autopilot::suggest(&game_loop.snapshot(), game_loop.engine().tuning());
        if let Some(action) = suggestion {
            game_loop.push_input(action);
        }
        if game_loop.frame(now_ms) == LoopControl::Stop {
            break;
        }
        frames += 1;
        now_ms += 1000.0 / 60.0;
    }

    let engine = game_loop.engine();
    let snap = engine.snapshot();
    println!(
        "seed {seed}: {:?} after {} ticks, score {}, coins {}, speed {:.2}, dodged {}",
        snap.phase,
        snap.frame,
        snap.score,
        snap.coins,
        snap.speed,
        engine.state().obstacles_passed
    );

    let mut reporter = ScoreReporter::new(LogSubmitter::default(), STREET_RUN_GAME_ID);
    if let Err(e) = reporter.submit_final(engine.run_number(), engine.final_score()) {
        log::warn!("Not submitted: {}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
