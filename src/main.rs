//! Icy Tower entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, KeyboardEvent, TouchEvent, Window};

    use icy_tower::audio::AudioManager;
    use icy_tower::platform::{self, KeyCommand, TouchDecoder, key_command};
    use icy_tower::renderer::DomRenderer;
    use icy_tower::sim::Intent;
    use icy_tower::{Config, Error, GameDriver, Result};

    const CONTAINER_ID: &str = "game-container";

    /// Game instance holding all state
    struct Game {
        driver: GameDriver<DomRenderer>,
        audio: Rc<AudioManager>,
        touch: TouchDecoder,
        last_time: f64,
    }

    impl Game {
        fn push(&mut self, intent: Intent) {
            self.driver.push_intent(intent);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            if let Some(el) = document.get_element_by_id("step-count") {
                el.set_text_content(Some(&self.driver.state().steps_landed().to_string()));
            }

            if let Some(el) = document.get_element_by_id("pause") {
                let label = if self.driver.is_paused() { "▷" } else { "❚❚" };
                el.set_text_content(Some(label));
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                let class = if self.driver.game_over_reported() { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    /// Read the configuration from `data-config`, or pick a layout preset
    fn load_config(container: &Element) -> Result<Config> {
        match container.get_attribute("data-config") {
            Some(json) => Config::from_json(&json),
            None => Ok(Config::from_layout(platform::detect_layout())),
        }
    }

    pub fn run() -> Result<()> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Icy Tower starting...");

        let window = web_sys::window().ok_or(Error::NoWindow)?;
        let document = window.document().ok_or(Error::NoDocument)?;
        let container = document
            .get_element_by_id(CONTAINER_ID)
            .ok_or_else(|| Error::MissingElement(CONTAINER_ID.to_string()))?;

        let config = load_config(&container)?;
        log::info!("Layout: {}", config.layout.as_str());

        let renderer = DomRenderer::new(document.clone(), CONTAINER_ID, config.field_height)?;
        let audio = Rc::new(AudioManager::new(config.effective_volume()));

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let driver = GameDriver::new(seed, config, renderer)?
            .with_audio(Box::new(audio.clone()))
            .on_game_over(|| log::info!("Game over"));

        let game = Rc::new(RefCell::new(Game {
            driver,
            audio,
            touch: TouchDecoder::new(),
            last_time: 0.0,
        }));

        setup_input_handlers(&window, &container, game.clone())?;
        setup_buttons(&document, game.clone());
        setup_auto_pause(&window, &document, game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Icy Tower running!");
        Ok(())
    }

    /// Report a start-up failure in the page itself
    pub fn report_startup_error(error: &Error) {
        log::error!("Failed to start: {}", error);
        if let Some(body) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
        {
            body.set_inner_html(&format!(
                "<div style=\"padding: 20px; color: red; font-family: Arial;\">Error loading game: {}</div>",
                error
            ));
        }
    }

    fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
        target: &web_sys::EventTarget,
        event: &str,
        handler: impl FnMut(E) + 'static,
    ) -> Result<()> {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| Error::Dom(format!("{} listener: {:?}", event, e)))?;
        closure.forget();
        Ok(())
    }

    fn setup_input_handlers(
        window: &Window,
        container: &Element,
        game: Rc<RefCell<Game>>,
    ) -> Result<()> {
        // Keyboard
        {
            let game = game.clone();
            listen(window, "keydown", move |event: KeyboardEvent| {
                let Some(command) = key_command(&event.key()) else {
                    return;
                };
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                match command {
                    KeyCommand::Intent(intent) => g.push(intent),
                    KeyCommand::ToggleIdle => {
                        let idle = !g.driver.idle_mode();
                        g.driver.set_idle_mode(idle);
                    }
                    KeyCommand::SwitchCharacter => g.driver.switch_character(),
                }
            })?;
        }

        // Touch start - left/right half of the screen moves
        {
            let game = game.clone();
            let container_clone = container.clone();
            listen(container, "touchstart", move |event: TouchEvent| {
                event.prevent_default();
                if event.touches().length() != 1 {
                    return;
                }
                if let Some(touch) = event.touches().get(0) {
                    let rect = container_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    let intent = g.touch.touch_start(x, rect.width() as f32);
                    g.push(intent);
                }
            })?;
        }

        // Touch move - keep moving while dragging
        {
            let game = game.clone();
            let container_clone = container.clone();
            listen(container, "touchmove", move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = container_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let mut g = game.borrow_mut();
                    if let Some(intent) = g.touch.touch_move(x, rect.width() as f32) {
                        g.push(intent);
                    }
                }
            })?;
        }

        // Touch end - double tap jumps, double tap on the player switches character
        {
            let game = game.clone();
            listen(container, "touchend", move |event: TouchEvent| {
                event.prevent_default();
                let now = js_sys::Date::now();
                let mut g = game.borrow_mut();
                if is_on_player(&event) {
                    if g.touch.player_tap(now) {
                        g.driver.switch_character();
                    }
                } else if let Some(intent) = g.touch.touch_end(now) {
                    g.push(intent);
                }
            })?;
        }

        // Double click on the player switches character
        listen(container, "dblclick", move |event: web_sys::MouseEvent| {
            if is_on_player(&event) {
                event.prevent_default();
                game.borrow_mut().driver.switch_character();
            }
        })
    }

    /// Whether the event happened on the player element
    fn is_on_player(event: &web_sys::Event) -> bool {
        event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .map(|element| element.class_list().contains("player"))
            .unwrap_or(false)
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        let buttons = [
            ("pause", Intent::TogglePause),
            ("restart", Intent::Restart),
            ("play-again", Intent::Restart),
        ];
        for (id, intent) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Control button #{} not found", id);
                continue;
            };
            let game = game.clone();
            let result = listen(&btn, "click", move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.push(intent);
            });
            if let Err(e) = result {
                log::warn!("{}", e);
            }
        }
    }

    fn setup_auto_pause(window: &Window, document: &Document, game: Rc<RefCell<Game>>) -> Result<()> {
        fn pause_if_running(game: &Rc<RefCell<Game>>, reason: &str) {
            let mut g = game.borrow_mut();
            if !g.driver.is_paused() && !g.driver.is_game_over() {
                g.push(Intent::TogglePause);
                log::info!("Auto-paused ({})", reason);
            }
        }

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            listen(document, "visibilitychange", move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    pause_if_running(&game, "tab hidden");
                }
            })?;
        }

        // Window blur (click outside)
        listen(window, "blur", move |_event: web_sys::FocusEvent| {
            pause_if_running(&game, "window blur");
        })
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            log::error!("Window gone, stopping game loop");
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
                icy_tower::consts::SIM_DT
            };
            g.last_time = time;

            g.driver.frame(dt);

            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().map_err(|e| {
        wasm_game::report_startup_error(&e);
        JsValue::from_str(&e.to_string())
    })
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: the autopilot plays until it falls or time runs out
#[cfg(not(target_arch = "wasm32"))]
fn main() -> icy_tower::Result<()> {
    use icy_tower::consts::SIM_DT;
    use icy_tower::renderer::HeadlessRenderer;
    use icy_tower::{Config, GameDriver, Layout};

    /// Five minutes of simulated play
    const MAX_TICKS: u32 = 5 * 60 * 60;

    env_logger::init();
    log::info!("Icy Tower (native) starting...");
    log::info!("Native mode runs the autopilot headless - build for wasm32 to play");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            Config::from_json(&std::fs::read_to_string(path)?)?
        }
        None => {
            let layout = std::env::var("ICY_TOWER_LAYOUT")
                .ok()
                .and_then(|name| Layout::from_str(&name))
                .unwrap_or_default();
            Config::from_layout(layout)
        }
    };

    let seed = std::env::var("ICY_TOWER_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);

    let mut driver = GameDriver::new(seed, config, HeadlessRenderer::new())?
        .on_game_over(|| log::info!("Autopilot fell"));
    driver.set_idle_mode(true);

    for _ in 0..MAX_TICKS {
        driver.frame(SIM_DT);
        if driver.game_over_reported() {
            break;
        }
    }

    let state = driver.state();
    println!(
        "seed {}: {} ticks, {} steps landed, {}",
        seed,
        state.time_ticks,
        state.steps_landed(),
        if driver.is_game_over() { "fell" } else { "still climbing" }
    );
    Ok(())
}
