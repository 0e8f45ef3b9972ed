//! Road Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use road_rush::audio::WebAudio;
    use road_rush::consts::TICK_INTERVAL_MS;
    use road_rush::input::Key;
    use road_rush::renderer::{RenderState, shapes};
    use road_rush::{Session, Settings, TimerCommand, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session<WebAudio>,
        render_state: Option<RenderState>,
        /// Handle of the running tick interval
        interval: Option<i32>,
        /// Callback behind `interval`; replaced (never dropped mid-call) on restart
        tick_callback: Option<Closure<dyn FnMut()>>,
        start_time: f64,
        last_hud_score: Option<u64>,
    }

    impl Game {
        /// Render the current frame
        fn render(&mut self, time: f64) {
            let elapsed = ((time - self.start_time) / 1000.0) as f32;
            let show_hitboxes = self.session.settings().show_hitboxes;
            let snapshot = self.session.snapshot();
            if let Some(ref mut render_state) = self.render_state {
                let vertices = shapes::scene(&snapshot, elapsed, show_hitboxes);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let snapshot = self.session.snapshot();

            if self.last_hud_score != Some(snapshot.score) {
                if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                    el.set_text_content(Some(&snapshot.score.to_string()));
                }
                self.last_hud_score = Some(snapshot.score);
            }

            if let Some(el) = document.get_element_by_id("music-toggle") {
                let label = if snapshot.music_enabled { "Sound Off" } else { "Sound On" };
                el.set_text_content(Some(label));
            }

            // Show/hide game over
            if let Some(el) = document.get_element_by_id("game-over") {
                if snapshot.game_over {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&snapshot.score.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    /// Arm or tear down the tick interval as the session asks
    fn apply_timer(game: &Rc<RefCell<Game>>, command: TimerCommand) {
        let Some(window) = web_sys::window() else {
            return;
        };
        match command {
            TimerCommand::Keep => {}
            TimerCommand::Start => {
                let tick_game = game.clone();
                let callback = Closure::<dyn FnMut()>::new(move || {
                    let command = tick_game.borrow_mut().session.on_timer();
                    apply_timer(&tick_game, command);
                });
                match window.set_interval_with_callback_and_timeout_and_arguments_0(
                    callback.as_ref().unchecked_ref(),
                    TICK_INTERVAL_MS,
                ) {
                    Ok(handle) => {
                        let mut g = game.borrow_mut();
                        g.interval = Some(handle);
                        g.tick_callback = Some(callback);
                    }
                    Err(e) => log::error!("Failed to start tick timer: {:?}", e),
                }
            }
            TimerCommand::Stop => {
                if let Some(handle) = game.borrow_mut().interval.take() {
                    window.clear_interval_with_handle(handle);
                    log::info!("Tick timer stopped");
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Road Rush starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let settings = Settings::load();
        let audio = WebAudio::new(&settings);
        let seed = js_sys::Date::now() as u64;
        let session = match Session::new(seed, Tuning::default(), settings, audio) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Invalid tuning: {}", e);
                return;
            }
        };
        let game = Rc::new(RefCell::new(Game {
            session,
            render_state: None,
            interval: None,
            tick_callback: None,
            start_time: 0.0,
            last_hud_score: None,
        }));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::LowPower,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height).await {
                            Ok(render_state) => {
                                game.borrow_mut().render_state = Some(render_state);
                            }
                            Err(e) => log::error!("Failed to create device: {}", e),
                        }
                    }
                    Err(e) => log::error!("No graphics adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }
        game.borrow_mut().start_time = js_sys::Date::now();

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_teardown(game.clone());

        // Start simulation and render loop
        let command = game.borrow_mut().session.start();
        apply_timer(&game, command);
        request_animation_frame(game);

        log::info!("Road Rush running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let key = Key::from_key_name(&event.key());
            if matches!(key, Key::Left | Key::Right | Key::Space) {
                // Keep arrows and space from scrolling the page
                event.prevent_default();
            }
            let command = {
                let mut g = game.borrow_mut();
                // Browsers only allow audio after a user gesture
                g.session.sink_mut().resume();
                g.session.on_key(key)
            };
            apply_timer(&game, command);
        });
        let _ = window.add_event_listener_with_callback(
            "keydown",
            closure.as_ref().unchecked_ref(),
        );
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Music toggle
        if let Some(btn) = document.get_element_by_id("music-toggle") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.session.sink_mut().resume();
                g.session.toggle_music();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart button on the game over overlay
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let command = {
                    let mut g = game.borrow_mut();
                    g.session.sink_mut().resume();
                    g.session.restart()
                };
                apply_timer(&game, command);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let command = game.borrow_mut().session.shutdown();
            apply_timer(&game, command);
            log::info!("Session torn down");
        });
        let _ = window.add_event_listener_with_callback(
            "pagehide",
            closure.as_ref().unchecked_ref(),
        );
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

    fn game_loop(game: Rc<RefCell<Game>>, _time: f64) {
        {
            let mut g = game.borrow_mut();
            let now = js_sys::Date::now();
            g.render(now);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Road Rush (native) starting...");
    log::info!("Native mode runs the simulation headless; use `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(2024);

    match headless::run(seed) {
        Ok(score) => println!("Final score: {}", score),
        Err(e) => {
            eprintln!("Headless run failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Self-driving run without a window, for smoke testing the simulation
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use road_rush::audio::NullAudio;
    use road_rush::consts::CAR_HITBOX_WIDTH;
    use road_rush::input::Key;
    use road_rush::sim::Snapshot;
    use road_rush::{Session, Settings, Tuning};

    /// Stop even a perfect driver eventually
    const MAX_TICKS: u64 = 20_000;

    pub fn run(seed: u64) -> Result<u64, Box<dyn std::error::Error>> {
        let mut session = Session::new(seed, Tuning::default(), Settings::default(), NullAudio)?;
        session.start();
        log::info!("Headless run with seed {}", seed);

        while !session.state().is_game_over() && session.state().time_ticks < MAX_TICKS {
            if let Some(key) = steer(&session.snapshot()) {
                session.on_key(key);
            }
            session.on_timer();
            session.state().check_invariants(session.tuning())?;
        }

        session.shutdown();
        Ok(session.state().score)
    }

    /// Sidestep the nearest car heading into the player's column
    fn steer(snapshot: &Snapshot) -> Option<Key> {
        let margin = 10.0;
        let player = snapshot.player as f32;
        let threat = snapshot
            .opponents
            .iter()
            .filter(|o| o.y > 250.0)
            .filter(|o| {
                let x = o.x as f32;
                x < player + CAR_HITBOX_WIDTH + margin && x + CAR_HITBOX_WIDTH > player - margin
            })
            .max_by(|a, b| a.y.total_cmp(&b.y))?;

        if threat.x >= snapshot.player {
            Some(Key::Left)
        } else {
            Some(Key::Right)
        }
    }
}
