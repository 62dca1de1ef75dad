//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives here.

use std::collections::BTreeSet;

use glam::Vec2;

use super::spawner::Spawner;
use crate::settings::Config;
use crate::{percent_to_pixels, top_percent_to_height};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Physics, platform motion and spawning suspended
    Paused,
    /// Run ended
    GameOver,
}

/// Which limit a horizontal move ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Something the adapters should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Player left the ground or a platform
    Jumped,
    /// Player landed on a platform
    Landed { platform: u32 },
    /// First landing on this platform this run
    StepCounted { total: u32 },
    /// Horizontal move clamped at a limit
    WallHit { side: Side },
    /// Player dropped below the visible floor
    Fell,
    /// Run is over (emitted once)
    GameOver,
    Paused,
    Resumed,
}

/// The player character
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// x: percent of field width, y: bottom-anchored pixels
    pub pos: Vec2,
    /// Vertical speed per tick (positive = rising)
    pub vel_y: f32,
    pub gravity: f32,
    /// Airborne, not resting on the floor or a platform
    pub is_jumping: bool,
    /// Platform the player rests on (id into `GameState::platforms`)
    pub current_step: Option<u32>,
    /// Set on the first platform landing; the floor stops catching the player
    pub left_floor: bool,
}

impl Player {
    pub fn new(x: f32, y: f32, gravity: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel_y: 0.0,
            gravity,
            is_jumping: false,
            current_step: None,
            left_floor: false,
        }
    }

    /// Start a jump. Returns false (and changes nothing) while airborne.
    pub fn jump(&mut self, velocity: f32) -> bool {
        if self.is_jumping {
            return false;
        }
        self.is_jumping = true;
        self.vel_y = velocity;
        self.current_step = None;
        true
    }

    /// Step left, clamped at `limit`. Returns true when the limit was hit.
    pub fn move_left(&mut self, step: f32, limit: f32) -> bool {
        let target = self.pos.x - step;
        self.pos.x = target.max(limit);
        target < limit
    }

    /// Step right, clamped at `limit`. Returns true when the limit was hit.
    pub fn move_right(&mut self, step: f32, limit: f32) -> bool {
        let target = self.pos.x + step;
        self.pos.x = target.min(limit);
        target > limit
    }

    /// Whether the horizontal extent [x, x + width] overlaps the platform's
    pub fn overlaps_horizontally(&self, width: f32, platform: &Platform) -> bool {
        self.pos.x + width >= platform.pos.x && self.pos.x <= platform.pos.x + platform.size.x
    }
}

/// A platform ("step")
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    /// Creation-ordered id
    pub id: u32,
    /// x: percent of field width, y: top edge in percent from the spawn line
    pub pos: Vec2,
    /// Width and height in percent
    pub size: Vec2,
}

impl Platform {
    pub fn new(id: u32, x: f32, width: f32, height: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, 0.0),
            size: Vec2::new(width, height),
        }
    }

    /// Top edge in percent of field height, growing downward
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    /// Top surface in the player frame
    pub fn surface(&self, field_height: f32) -> f32 {
        top_percent_to_height(self.pos.y, field_height)
    }

    /// Vertical span (bottom, top) in the player frame
    pub fn vertical_span(&self, field_height: f32) -> (f32, f32) {
        let surface = self.surface(field_height);
        (surface - percent_to_pixels(self.size.y, field_height), surface)
    }

    /// Move the platform down by `delta` percent
    pub fn descend(&mut self, delta: f32) {
        self.pos.y += delta;
    }

    /// Past the line where platforms leave the field
    pub fn is_below_floor(&self, despawn_top: f32) -> bool {
        self.pos.y > despawn_top
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: Config,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    /// Live platforms (sorted by id: creation order)
    pub platforms: Vec<Platform>,
    pub spawner: Spawner,
    /// Platforms landed on at least once this run
    pub visited: BTreeSet<u32>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed
    ///
    /// `config` must pass [`Config::validate`]: empty platform ranges make
    /// the spawner panic. `GameDriver::new` checks this for you.
    pub fn new(seed: u64, config: Config) -> Self {
        let player = Player::new(config.player_start_x, config.floor, config.gravity);
        let spawner = Spawner::new(seed, &config);
        Self {
            seed,
            config,
            time_ticks: 0,
            phase: GamePhase::Playing,
            player,
            platforms: Vec::new(),
            spawner,
            visited: BTreeSet::new(),
            events: Vec::new(),
        }
    }

    /// Number of distinct platforms landed on (the score)
    pub fn steps_landed(&self) -> u32 {
        self.visited.len() as u32
    }

    pub fn platform(&self, id: u32) -> Option<&Platform> {
        self.platforms
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &self.platforms[i])
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_jump_only_from_rest() {
        let mut player = Player::new(10.0, 0.0, 0.5);
        assert!(player.jump(10.0));
        assert!(player.is_jumping);
        assert_eq!(player.vel_y, 10.0);

        player.vel_y = 3.0;
        assert!(!player.jump(10.0));
        assert_eq!(player.vel_y, 3.0);
    }

    #[test]
    fn test_jump_detaches_from_step() {
        let mut player = Player::new(10.0, 100.0, 0.5);
        player.current_step = Some(4);
        assert!(player.jump(10.0));
        assert_eq!(player.current_step, None);
    }

    #[test]
    fn test_moves_clamp_at_limits() {
        let mut player = Player::new(3.0, 0.0, 0.5);
        assert!(player.move_left(5.0, 0.0));
        assert_eq!(player.pos.x, 0.0);
        // Already at the limit: stays put
        assert!(player.move_left(5.0, 0.0));
        assert_eq!(player.pos.x, 0.0);

        player.pos.x = 92.0;
        assert!(player.move_right(5.0, 95.0));
        assert_eq!(player.pos.x, 95.0);

        player.pos.x = 50.0;
        assert!(!player.move_right(5.0, 95.0));
        assert_eq!(player.pos.x, 55.0);
    }

    #[test]
    fn test_platform_span() {
        let mut platform = Platform::new(1, 5.0, 20.0, 5.0);
        platform.pos.y = 55.0;
        assert_eq!(platform.vertical_span(100.0), (40.0, 45.0));
        assert!(!platform.is_below_floor(100.0));
        platform.descend(46.0);
        assert!(platform.is_below_floor(100.0));
    }

    #[test]
    fn test_horizontal_overlap_is_inclusive() {
        let platform = Platform::new(1, 20.0, 10.0, 5.0);
        let mut player = Player::new(15.0, 0.0, 0.5);
        assert!(player.overlaps_horizontally(5.0, &platform));
        player.pos.x = 30.0;
        assert!(player.overlaps_horizontally(5.0, &platform));
        player.pos.x = 30.5;
        assert!(!player.overlaps_horizontally(5.0, &platform));
        player.pos.x = 14.0;
        assert!(!player.overlaps_horizontally(5.0, &platform));
    }

    #[test]
    fn test_platform_lookup() {
        let mut state = GameState::new(1, Config::default());
        state.platforms.push(Platform::new(3, 10.0, 20.0, 5.0));
        state.platforms.push(Platform::new(7, 10.0, 20.0, 5.0));
        assert_eq!(state.platform(7).map(|p| p.id), Some(7));
        assert!(state.platform(5).is_none());
    }

    proptest! {
        #[test]
        fn prop_moves_stay_in_bounds(
            start in 0.0f32..=95.0,
            moves in prop::collection::vec(any::<bool>(), 0..50),
        ) {
            let mut player = Player::new(start, 0.0, 0.5);
            for right in moves {
                if right {
                    player.move_right(5.0, 95.0);
                } else {
                    player.move_left(5.0, 0.0);
                }
                prop_assert!((0.0..=95.0).contains(&player.pos.x));
            }
        }

        #[test]
        fn prop_jump_while_airborne_is_noop(
            y in 0.0f32..700.0,
            vel in -20.0f32..20.0,
        ) {
            let mut player = Player::new(50.0, y, 0.5);
            player.is_jumping = true;
            player.vel_y = vel;
            let before = player.clone();
            prop_assert!(!player.jump(10.0));
            prop_assert_eq!(player, before);
        }
    }
}
