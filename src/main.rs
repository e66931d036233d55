//! Stack Tower entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use stack_tower::Settings;
    use stack_tower::audio::{AudioManager, SoundEffect};
    use stack_tower::consts::*;
    use stack_tower::renderer::{CameraRig, Renderer};
    use stack_tower::sim::{GameEvent, GamePhase, GameSession, TickInput, tick};
    use stack_tower::ui::Hud;

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        renderer: Option<Renderer>,
        camera: CameraRig,
        audio: AudioManager,
        hud: Hud,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Set after a broken invariant; the last frame stays on screen
        halted: bool,
    }

    impl Game {
        fn new(settings: &Settings, seed: u64, hud: Hud, width: u32, height: u32) -> Self {
            let input = TickInput {
                autoplay: settings.autoplay,
                ..Default::default()
            };
            Self {
                session: GameSession::new(seed, settings.difficulty),
                renderer: None,
                camera: CameraRig::new(width, height),
                audio: AudioManager::new(settings),
                hud,
                accumulator: 0.0,
                last_time: 0.0,
                input,
                halted: false,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            if self.halted {
                return;
            }

            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                if let Err(e) = tick(&mut self.session, &self.input, SIM_DT) {
                    log::error!("Simulation halted: {}", e);
                    self.halted = true;
                    break;
                }
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.clear_one_shots();

                let target = self.session.camera_target_height();
                self.camera.follow(target, self.session.params().speed);
            }

            if substeps == MAX_SUBSTEPS {
                // Drop the backlog rather than fast-forwarding later
                self.accumulator = 0.0;
            }
        }

        /// React to what happened this frame
        fn handle_events(&mut self) {
            for event in self.session.drain_events() {
                match event {
                    GameEvent::Started => {
                        self.hud.show_menu(false);
                        self.audio.resume();
                        self.audio.play(SoundEffect::Start);
                    }
                    GameEvent::Placed { score, perfect } => {
                        self.hud.set_score(score);
                        let effect = if perfect {
                            SoundEffect::Perfect { score }
                        } else {
                            SoundEffect::Place { score }
                        };
                        self.audio.play(effect);
                    }
                    GameEvent::Missed { final_score } => {
                        self.hud.show_results(final_score);
                        self.audio.play(SoundEffect::Fall);
                    }
                    GameEvent::Reset { difficulty } => {
                        self.hud.set_score(0);
                        self.hud.hide_results();
                        self.hud.show_menu(true);
                        self.hud.highlight_difficulty(difficulty);
                        self.camera.reset();
                        self.accumulator = 0.0;
                        self.audio.play(SoundEffect::Reset);
                    }
                    GameEvent::DifficultyRejected { .. } => {}
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut renderer) = self.renderer {
                match renderer.render(&self.session, &self.camera) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        renderer.resize(renderer.size.0, renderer.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.camera.resize(width, height);
            if let Some(ref mut renderer) = self.renderer {
                renderer.resize(width, height);
            }
        }
    }

    /// Canvas backing size in device pixels
    fn canvas_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Stack Tower starting...");

        let settings = Settings::load();

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height) = canvas_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
        let hud = Hud::new(&document);
        hud.set_score(0);
        hud.hide_results();
        hud.show_menu(true);
        hud.highlight_difficulty(settings.difficulty);

        let game = Rc::new(RefCell::new(Game::new(&settings, seed, hud, width, height)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU, falling back to WebGL2
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match Renderer::new(surface, &adapter, width, height).await {
            Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        setup_input_handlers(&canvas, game.clone());
        setup_difficulty_buttons(game.clone());
        setup_resize(canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Stack Tower running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Click anywhere drops the layer
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.place = true;
            });
            let _ = window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tap on the canvas does the same
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                match g.session.phase {
                    GamePhase::Idle => g.input.start = true,
                    _ => g.input.place = true,
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => {
                        event.prevent_default();
                        match g.session.phase {
                            GamePhase::Idle => g.input.start = true,
                            GamePhase::Running => g.input.place = true,
                            GamePhase::Ended => {}
                        }
                    }
                    "r" | "R" => {
                        event.prevent_default();
                        g.input.reset = true;
                    }
                    "i" | "I" => {
                        g.input.autoplay = !g.input.autoplay;
                        log::info!("Autoplay: {}", g.input.autoplay);
                    }
                    "m" | "M" => {
                        let muted = g.audio.toggle_mute();
                        log::info!("Muted: {}", muted);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_difficulty_buttons(game: Rc<RefCell<Game>>) {
        let buttons = game.borrow().hud.difficulty_buttons().to_vec();
        for (difficulty, button) in buttons {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.difficulty = Some(difficulty);
            });
            let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = canvas_size(&window, &canvas);
            if width == 0 || height == 0 {
                return;
            }
            canvas.set_width(width);
            canvas.set_height(height);
            game.borrow_mut().resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.handle_events();
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Longest headless demo: ten minutes of simulated play
#[cfg(not(target_arch = "wasm32"))]
const DEMO_MAX_TICKS: u64 = 60 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use stack_tower::consts::SIM_DT;
    use stack_tower::sim::{Difficulty, GameEvent, GamePhase, GameSession, TickInput, tick};

    env_logger::init();
    log::info!("Stack Tower (native) starting...");
    log::info!("Native mode is a headless autoplay demo - run with `trunk serve` for web version");

    let mut settings = stack_tower::Settings::load();
    if let Some(arg) = std::env::args().nth(1) {
        match Difficulty::from_str(&arg) {
            Some(d) => settings.difficulty = d,
            None => log::warn!("Unknown difficulty '{}', using {}", arg, settings.difficulty.as_str()),
        }
    }

    let seed = settings.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    });
    let mut session = GameSession::new(seed, settings.difficulty);

    let mut input = TickInput {
        start: true,
        autoplay: true,
        ..Default::default()
    };

    let mut perfect = 0u32;
    while session.phase != GamePhase::Ended && session.time_ticks < DEMO_MAX_TICKS {
        if let Err(e) = tick(&mut session, &input, SIM_DT) {
            log::error!("Simulation halted: {}", e);
            std::process::exit(1);
        }
        input.clear_one_shots();

        for event in session.drain_events() {
            if let GameEvent::Placed { perfect: true, .. } = event {
                perfect += 1;
            }
        }
    }

    println!(
        "{} demo: {} layers ({} perfect) in {:.1}s, phase {:?}",
        session.difficulty.as_str(),
        session.score,
        perfect,
        session.time_ticks as f32 * SIM_DT,
        session.phase,
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
