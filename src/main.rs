//! Cake Stack entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent};

    use cake_stack::audio::{AudioManager, SoundEffect};
    use cake_stack::consts::*;
    use cake_stack::sim::{
        self, GameEvent, GameState, Ingredient, Key, Kitchen, Notification, Overlay, PlayState,
        Verdict,
    };
    use cake_stack::{HighScores, Tuning};

    /// How long a notification sprite stays up (ms)
    const NOTIFICATION_MS: f64 = 1500.0;
    /// Title prompt blink period (ms)
    const BLINK_MS: f64 = 500.0;

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        kitchen: Kitchen,
        scores: HighScores,
        audio: AudioManager,
        accumulator: f32,
        last_time: f64,
        /// Play-field width in CSS pixels
        width: f32,
        notification: Option<(Notification, f64)>,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, width: f32) -> Self {
            let scores = HighScores::load();
            let mut state = GameState::with_tuning(seed, tuning);
            state.champion_score = scores.champion();
            Self {
                state,
                kitchen: Kitchen::new(width),
                scores,
                audio: AudioManager::new(),
                accumulator: 0.0,
                last_time: 0.0,
                width,
                notification: None,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            self.accumulator += dt.min(0.25);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                sim::tick(&mut self.state, &mut self.kitchen, self.width);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        fn press(&mut self, key: Key, now: f64) -> bool {
            let accepted = sim::handle_key(&mut self.state, &mut self.kitchen, key, self.width);
            // Handle events while still inside the user gesture so audio may start
            self.process_events(now);
            accepted
        }

        /// React to everything the simulation reported since the last call
        fn process_events(&mut self, now: f64) {
            for event in self.state.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
                match event {
                    GameEvent::MuteToggled { muted } => self.audio.set_muted(muted),
                    GameEvent::Notify(kind) => {
                        self.notification = Some((kind, now + NOTIFICATION_MS));
                    }
                    GameEvent::GameOver { score, .. } => {
                        if let Some(rank) =
                            self.scores
                                .add_score(score, self.state.level, self.state.game_number)
                        {
                            log::info!("Session rank #{} with {}", rank, score);
                            self.scores.save();
                        }
                    }
                    _ => {}
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document, now: f64) {
            let state = &self.state;

            if state.play_state != PlayState::NotStarted {
                set_text(document, "score_text", &format!("Score: {}", state.score));
                set_text(document, "level_text", &format!("Level: {}", state.level));
                set_text(document, "live_text", &format!("Lives: {}", state.lives));
                if let Some(hud) = document.get_element_by_id("hud") {
                    let _ = hud.set_attribute("class", "");
                }
            }

            if let Some(el) = document.get_element_by_id("overlay") {
                let _ = el.set_attribute("data-screen", overlay_name(state.overlay));
            }

            if let Some(el) = document.get_element_by_id("control_text") {
                el.set_inner_html(&control_text(state));
                let blink_on = (now / BLINK_MS) as u64 % 2 == 0;
                let visible = state.overlay != Overlay::Hidden && blink_on;
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }

            // Order card shows the wanted cake, or the verdict once submitted
            if let Some(el) = document.get_element_by_id("order") {
                let asset = match (state.play_state, state.last_verdict) {
                    (PlayState::GameOver, _) | (_, Some(Verdict::Incorrect)) => "wrong".to_string(),
                    (_, Some(Verdict::Correct)) => "correct".to_string(),
                    (_, None) => state.order.asset_key(),
                };
                let _ = el.set_attribute("data-asset", &asset);
            }

            if let Some(el) = document.get_element_by_id("plate") {
                let _ = el.set_attribute("data-asset", &self.kitchen.plate_asset_key());
            }

            if let Some((_, until)) = self.notification {
                if now >= until {
                    self.notification = None;
                }
            }
            if let Some(el) = document.get_element_by_id("notification") {
                match self.notification {
                    Some((kind, _)) => {
                        let _ = el.set_attribute("data-kind", notification_name(kind));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn overlay_name(overlay: Overlay) -> &'static str {
        match overlay {
            Overlay::Start => "start",
            Overlay::Instructions => "instructions",
            Overlay::Controls => "controls",
            Overlay::Paused => "paused",
            Overlay::GameOver => "game-over",
            Overlay::Hidden => "none",
        }
    }

    fn notification_name(kind: Notification) -> &'static str {
        match kind {
            Notification::Muted => "muted",
            Notification::Unmuted => "unmuted",
            Notification::LevelUp => "level-up",
        }
    }

    fn control_text(state: &GameState) -> String {
        match state.overlay {
            Overlay::Start | Overlay::Controls => {
                "PRESS I FOR INSTRUCTIONS <br /> PRESS SPACE TO START".to_string()
            }
            Overlay::Instructions => "PRESS C FOR CONTROLS".to_string(),
            Overlay::Paused => "PRESS SPACE TO RESUME".to_string(),
            Overlay::GameOver => format!(
                "BEST SCORE: {} <br /> PRESS SPACE TO PLAY AGAIN",
                state.champion_score
            ),
            Overlay::Hidden => String::new(),
        }
    }

    /// Optional `<script id="tuning" type="application/json">` overrides
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning overrides: {}", e);
                Tuning::default()
            }
        }
    }

    fn with_game<T>(f: impl FnOnce(&mut Game) -> T) -> Option<T> {
        GAME.with(|slot| {
            let game = slot.borrow().clone()?;
            let mut g = game.borrow_mut();
            Some(f(&mut g))
        })
    }

    /// Called by the page's drag layer when an ingredient sprite is released
    /// at world position (x, y)
    #[wasm_bindgen]
    pub fn drop_ingredient(name: &str, x: f32, y: f32) -> bool {
        let Some(ingredient) = Ingredient::from_name(name) else {
            log::warn!("Unknown ingredient dropped: {}", name);
            return false;
        };
        with_game(|g| {
            let accepted =
                sim::drop_ingredient(&mut g.state, &mut g.kitchen, ingredient, Vec2::new(x, y));
            g.process_events(js_sys::Date::now());
            accepted
        })
        .unwrap_or(false)
    }

    /// Plate position for the renderer, as `[x, y]`
    #[wasm_bindgen]
    pub fn plate_position() -> Vec<f32> {
        with_game(|g| g.kitchen.plate_pos().to_array().to_vec()).unwrap_or_default()
    }

    /// Whether ingredients may be dragged right now
    #[wasm_bindgen]
    pub fn drag_enabled() -> bool {
        with_game(|g| g.state.play_state == PlayState::Playing).unwrap_or(false)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Cake Stack starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let width = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(960.0) as f32;
        let seed = js_sys::Date::now() as u64;
        let tuning = load_tuning(&document);
        let game = Rc::new(RefCell::new(Game::new(seed, tuning, width)));
        GAME.with(|slot| *slot.borrow_mut() = Some(game.clone()));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_resize(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Cake Stack running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let Some(key) = Key::from_dom_key(&event.key()) else {
                return;
            };
            if key == Key::Space {
                // Keep space from scrolling the page
                event.prevent_default();
            }
            let accepted = game.borrow_mut().press(key, js_sys::Date::now());
            if !accepted {
                log::debug!("Ignored {:?}", key);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(width) = web_sys::window()
                .and_then(|w| w.inner_width().ok())
                .and_then(|w| w.as_f64())
            else {
                return;
            };
            game.borrow_mut().width = width as f32;
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            if sim::pause(&mut g.state) {
                log::info!("Auto-paused (window blur)");
                g.process_events(js_sys::Date::now());
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
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
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            let now = js_sys::Date::now();
            g.process_events(now);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document, now);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Cake Stack (native) starting...");
    log::info!("Native mode plays a headless demo - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);
    let summary = demo::run(seed);
    println!(
        "Seed {}: {} points, level {}, {} rounds",
        seed, summary.score, summary.level, summary.rounds
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use cake_stack::sim::autoplay::serve_round;
    use cake_stack::sim::{self, GameEvent, GameState, Key, Kitchen, PlayState};

    const WIDTH: f32 = 960.0;
    const MISTAKE_RATE: f64 = 0.1;
    const MAX_ROUNDS: u32 = 500;

    pub struct Summary {
        pub score: u64,
        pub level: u8,
        pub rounds: u32,
    }

    /// Play one game with the demo player until it runs out of lives
    pub fn run(seed: u64) -> Summary {
        let mut state = GameState::new(seed);
        let mut kitchen = Kitchen::new(WIDTH);
        let mut player = Pcg32::seed_from_u64(seed.wrapping_add(1));

        sim::handle_key(&mut state, &mut kitchen, Key::Space, WIDTH);

        let mut rounds = 0;
        while state.play_state == PlayState::Playing && rounds < MAX_ROUNDS {
            serve_round(&mut state, &mut kitchen, &mut player, MISTAKE_RATE, WIDTH);
            loop {
                sim::tick(&mut state, &mut kitchen, WIDTH);
                let mut round_over = false;
                for event in state.drain_events() {
                    log::debug!("{:?}", event);
                    if let GameEvent::LevelUp { level } = event {
                        log::info!("Reached level {}", level);
                    }
                    round_over |= matches!(event, GameEvent::NewOrder(_) | GameEvent::GameOver { .. });
                }
                if round_over {
                    break;
                }
            }
            rounds += 1;
        }

        if let Ok(snapshot) = serde_json::to_string(&state) {
            log::debug!("Final state: {}", snapshot);
        }
        Summary {
            score: state.score,
            level: state.level,
            rounds,
        }
    }
}
