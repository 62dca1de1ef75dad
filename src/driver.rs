//! Frame driver
//!
//! Owns a run: the game state, the queue of player intents, the fixed
//! timestep accumulator and the adapters. The host calls `frame` once per
//! display refresh and pushes intents from its input callbacks; everything
//! else happens here.

use std::collections::{BTreeMap, VecDeque};

use crate::audio::{AudioHook, SoundEffect};
use crate::consts::{CHARACTER_COUNT, FALL_SPIN_SECONDS, MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::error::Result;
use crate::renderer::{RenderAdapter, Sprite};
use crate::settings::Config;
use crate::sim::{GameEvent, GamePhase, GameState, Intent, Platform, TickInput, tick};

pub struct GameDriver<R: RenderAdapter> {
    state: GameState,
    renderer: R,
    audio: Option<Box<dyn AudioHook>>,
    /// Fired once per run, after the falling spin
    on_game_over: Option<Box<dyn FnMut()>>,
    game_over_fired: bool,
    /// Seconds left before the game-over callback fires
    game_over_delay: Option<f32>,
    /// Player look, kept across restarts
    character: usize,
    intents: VecDeque<Intent>,
    idle_mode: bool,
    accumulator: f32,
    player_handle: R::Handle,
    platform_handles: BTreeMap<u32, R::Handle>,
}

impl<R: RenderAdapter> GameDriver<R> {
    /// Start a run; fails when `config` does not validate
    pub fn new(seed: u64, config: Config, mut renderer: R) -> Result<Self> {
        config.validate()?;
        let state = GameState::new(seed, config);
        let player_handle = renderer.render(&player_sprite(&state));
        renderer.set_character(player_handle, 0);
        log::info!("Game initialized with seed: {}", seed);
        Ok(Self {
            state,
            renderer,
            audio: None,
            on_game_over: None,
            game_over_fired: false,
            game_over_delay: None,
            character: 0,
            intents: VecDeque::new(),
            idle_mode: false,
            accumulator: 0.0,
            player_handle,
            platform_handles: BTreeMap::new(),
        })
    }

    /// Attach the audio cue hook
    pub fn with_audio(mut self, audio: Box<dyn AudioHook>) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Register the game-over callback
    pub fn on_game_over(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_game_over = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn player_handle(&self) -> R::Handle {
        self.player_handle
    }

    pub fn is_paused(&self) -> bool {
        self.state.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.state.phase == GamePhase::GameOver
    }

    /// Game over and the falling spin has finished
    pub fn game_over_reported(&self) -> bool {
        self.game_over_fired
    }

    pub fn character(&self) -> usize {
        self.character
    }

    /// Cycle the player to the next character look
    pub fn switch_character(&mut self) {
        self.character = (self.character + 1) % CHARACTER_COUNT;
        self.renderer.set_character(self.player_handle, self.character);
        log::debug!("Switched to character {}", self.character);
    }

    pub fn idle_mode(&self) -> bool {
        self.idle_mode
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.idle_mode = idle;
        log::info!("Idle mode: {}", idle);
    }

    /// Queue an intent for the next tick
    pub fn push_intent(&mut self, intent: Intent) {
        self.intents.push_back(intent);
    }

    /// Advance by one display frame of `dt` seconds
    pub fn frame(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        self.sync_render();
        self.run_game_over_delay(dt);
    }

    /// Run exactly one tick with the queued intents
    pub fn step(&mut self) {
        let intents: Vec<Intent> = self.intents.drain(..).collect();
        if intents.contains(&Intent::Restart) {
            let seed = next_seed(self.state.seed, self.state.time_ticks);
            self.restart(seed);
            return;
        }

        let input = TickInput {
            intents,
            idle_mode: self.idle_mode,
        };
        tick(&mut self.state, &input);
        self.dispatch_events();
    }

    /// Discard the run and start a fresh one
    pub fn restart(&mut self, seed: u64) {
        for (_, handle) in std::mem::take(&mut self.platform_handles) {
            self.renderer.remove(handle);
        }
        self.renderer.remove(self.player_handle);

        let config = self.state.config.clone();
        self.state = GameState::new(seed, config);
        self.player_handle = self.renderer.render(&player_sprite(&self.state));
        self.renderer.set_character(self.player_handle, self.character);
        self.intents.clear();
        self.accumulator = 0.0;
        self.game_over_fired = false;
        self.game_over_delay = None;
        log::info!("Game restarted with seed: {}", seed);
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Jumped => self.play(SoundEffect::Jump),
                GameEvent::WallHit { .. } => self.renderer.spin(self.player_handle),
                GameEvent::Fell => {
                    self.play(SoundEffect::Fall);
                    self.renderer.fall_spin(self.player_handle);
                }
                GameEvent::GameOver => {
                    if !self.game_over_fired && self.game_over_delay.is_none() {
                        self.game_over_delay = Some(FALL_SPIN_SECONDS);
                    }
                }
                GameEvent::StepCounted { total } => log::debug!("Steps landed: {}", total),
                GameEvent::Landed { .. } | GameEvent::Paused | GameEvent::Resumed => {}
            }
        }
    }

    /// Count down the falling spin, then report the game over once
    fn run_game_over_delay(&mut self, dt: f32) {
        let Some(remaining) = self.game_over_delay else {
            return;
        };
        let remaining = remaining - dt;
        if remaining > 0.0 {
            self.game_over_delay = Some(remaining);
            return;
        }

        self.game_over_delay = None;
        self.game_over_fired = true;
        if let Some(callback) = self.on_game_over.as_mut() {
            callback();
        }
    }

    fn play(&self, effect: SoundEffect) {
        if let Some(audio) = &self.audio {
            audio.play(effect);
        }
    }

    /// Push the current positions to the renderer
    fn sync_render(&mut self) {
        let platforms = &self.state.platforms;

        // Drop visuals of platforms that left the field
        let renderer = &mut self.renderer;
        self.platform_handles.retain(|id, handle| {
            let alive = platforms.binary_search_by_key(id, |p| p.id).is_ok();
            if !alive {
                renderer.remove(*handle);
            }
            alive
        });

        for platform in platforms {
            match self.platform_handles.get(&platform.id) {
                Some(handle) => self.renderer.update_position(*handle, platform.pos),
                None => {
                    let handle = self.renderer.render(&platform_sprite(platform));
                    self.platform_handles.insert(platform.id, handle);
                }
            }
        }

        self.renderer
            .update_position(self.player_handle, self.state.player.pos);
    }
}

fn player_sprite(state: &GameState) -> Sprite {
    Sprite::Player {
        pos: state.player.pos,
        width: state.config.player_width,
    }
}

fn platform_sprite(platform: &Platform) -> Sprite {
    Sprite::Platform {
        pos: platform.pos,
        size: platform.size,
    }
}

/// Derive a fresh seed for an in-game restart
fn next_seed(seed: u64, ticks: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(ticks | 1)
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::renderer::HeadlessRenderer;

    #[derive(Default)]
    struct RecordingAudio {
        played: RefCell<Vec<SoundEffect>>,
    }

    impl AudioHook for RecordingAudio {
        fn play(&self, effect: SoundEffect) {
            self.played.borrow_mut().push(effect);
        }
    }

    /// Unit field with a platform the player will be carried off on
    fn doomed_driver() -> GameDriver<HeadlessRenderer> {
        let config = Config {
            field_height: 100.0,
            spawn_interval_ms: 1.0e9,
            ..Config::default()
        };
        let mut driver = GameDriver::new(1, config, HeadlessRenderer::new()).unwrap();
        let mut platform = Platform::new(1, 5.0, 20.0, 5.0);
        platform.pos.y = 95.0;
        driver.state.platforms.push(platform);
        driver.state.player.pos.y = 5.0;
        driver.state.player.current_step = Some(1);
        driver.state.player.left_floor = true;
        driver
    }

    #[test]
    fn test_frame_runs_fixed_substeps() {
        let mut driver = GameDriver::new(1, Config::default(), HeadlessRenderer::new()).unwrap();
        driver.frame(SIM_DT * 3.5);
        assert_eq!(driver.state().time_ticks, 3);

        // Huge frame gaps are capped
        driver.frame(10.0);
        assert!(driver.state().time_ticks <= 3 + MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_jump_plays_sound() {
        let audio = Rc::new(RecordingAudio::default());
        let mut driver = GameDriver::new(1, Config::default(), HeadlessRenderer::new())
            .unwrap()
            .with_audio(Box::new(audio.clone()));

        driver.push_intent(Intent::Jump);
        driver.step();
        driver.push_intent(Intent::Jump);
        driver.step();
        assert_eq!(*audio.played.borrow(), vec![SoundEffect::Jump]);
    }

    #[test]
    fn test_render_tracks_platforms() {
        let mut driver = GameDriver::new(8, Config::default(), HeadlessRenderer::new()).unwrap();
        assert_eq!(driver.renderer().len(), 1);

        for _ in 0..400 {
            driver.frame(SIM_DT);
        }
        let live = driver.state().platforms.len();
        assert!(live >= 2);
        assert_eq!(driver.renderer().len(), live + 1);

        let player = driver.player_handle();
        assert_eq!(
            driver.renderer().sprite(player).map(Sprite::pos),
            Some(driver.state().player.pos)
        );
    }

    #[test]
    fn test_wall_hit_spins_player() {
        let mut driver = GameDriver::new(1, Config::default(), HeadlessRenderer::new()).unwrap();
        for _ in 0..3 {
            driver.push_intent(Intent::MoveLeft);
        }
        driver.step();
        let player = driver.player_handle();
        assert_eq!(driver.renderer().spins.get(&player), Some(&1));
        assert_eq!(driver.state().player.pos.x, 0.0);
    }

    #[test]
    fn test_game_over_fires_once() {
        let fired = Rc::new(Cell::new(0));
        let audio = Rc::new(RecordingAudio::default());
        let counter = fired.clone();
        let mut driver = doomed_driver()
            .with_audio(Box::new(audio.clone()))
            .on_game_over(move || counter.set(counter.get() + 1));

        for _ in 0..300 {
            driver.frame(SIM_DT);
        }
        assert!(driver.is_game_over());
        assert_eq!(fired.get(), 1);
        assert_eq!(*audio.played.borrow(), vec![SoundEffect::Fall]);
    }

    #[test]
    fn test_game_over_waits_for_fall_spin() {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let mut driver = doomed_driver().on_game_over(move || counter.set(counter.get() + 1));

        let mut frames = 0;
        while !driver.is_game_over() && frames < 600 {
            driver.frame(SIM_DT);
            frames += 1;
        }
        assert!(driver.is_game_over());
        assert_eq!(fired.get(), 0);
        assert!(!driver.game_over_reported());
        let player = driver.player_handle();
        assert!(driver.renderer().spins.get(&player).is_some());

        // Still spinning halfway through
        for _ in 0..60 {
            driver.frame(SIM_DT);
        }
        assert_eq!(fired.get(), 0);

        for _ in 0..70 {
            driver.frame(SIM_DT);
        }
        assert_eq!(fired.get(), 1);
        assert!(driver.game_over_reported());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = Config {
            player_start_x: 99.0,
            ..Config::default()
        };
        assert!(matches!(
            GameDriver::new(1, config, HeadlessRenderer::new()),
            Err(crate::Error::InvalidConfig(_))
        ));

        let config = Config {
            platform_width: (20, 20),
            ..Config::default()
        };
        assert!(GameDriver::new(1, config, HeadlessRenderer::new()).is_err());
    }

    #[test]
    fn test_character_switch_survives_restart() {
        let mut driver = GameDriver::new(1, Config::default(), HeadlessRenderer::new()).unwrap();
        let player = driver.player_handle();
        assert_eq!(driver.renderer().characters.get(&player), Some(&0));

        driver.switch_character();
        driver.switch_character();
        assert_eq!(driver.character(), 2);
        assert_eq!(driver.renderer().characters.get(&player), Some(&2));

        // Wraps back to the first look
        for _ in 0..CHARACTER_COUNT - 2 {
            driver.switch_character();
        }
        assert_eq!(driver.character(), 0);

        driver.switch_character();
        driver.restart(7);
        let player = driver.player_handle();
        assert_eq!(driver.renderer().characters.get(&player), Some(&1));
    }

    #[test]
    fn test_restart_discards_state() {
        let mut driver = doomed_driver();
        for _ in 0..300 {
            driver.frame(SIM_DT);
        }
        assert!(driver.is_game_over());

        driver.push_intent(Intent::Restart);
        driver.step();
        assert!(!driver.is_game_over());
        assert_eq!(driver.state().time_ticks, 0);
        assert!(driver.state().platforms.is_empty());
        assert_eq!(driver.renderer().len(), 1);
        assert_ne!(driver.state().seed, 1);
    }

    #[test]
    fn test_pause_intent() {
        let mut driver = GameDriver::new(1, Config::default(), HeadlessRenderer::new()).unwrap();
        driver.push_intent(Intent::TogglePause);
        driver.frame(SIM_DT);
        assert!(driver.is_paused());
        driver.frame(SIM_DT * 4.0);
        assert_eq!(driver.state().time_ticks, 0);
    }
}
