//! Icy Tower - a vertically scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, platforms, spawning)
//! - `driver`: Frame loop, intent queue and adapter plumbing
//! - `renderer`: Render adapter trait and the DOM implementation
//! - `platform`: Browser input decoding
//! - `audio`: Sound cue hook and the Web Audio implementation
//! - `settings`: Data-driven game configuration

pub mod audio;
pub mod driver;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use driver::GameDriver;
pub use error::{Error, Result};
pub use settings::{Config, Layout};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one display refresh at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted by the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Height of the play field in player-frame pixels
    pub const FIELD_HEIGHT: f32 = 720.0;
    /// Floor line in the player frame
    pub const FLOOR_Y: f32 = 0.0;

    /// Player defaults (x units are percent of field width)
    pub const PLAYER_START_X: f32 = 10.0;
    pub const PLAYER_WIDTH: f32 = 5.0;
    pub const PLAYER_MOVE_STEP: f32 = 5.0;
    /// Per-tick gravity and jump impulse (pixels per tick)
    pub const GRAVITY: f32 = 0.5;
    pub const JUMP_VELOCITY: f32 = 10.0;

    /// Platform defaults (percent of field width / height)
    pub const PLATFORM_HEIGHT: f32 = 5.0;
    pub const PLATFORM_MIN_WIDTH: u32 = 10;
    pub const PLATFORM_MAX_WIDTH: u32 = 40;
    pub const PLATFORM_MIN_X: u32 = 8;
    pub const PLATFORM_MAX_X: u32 = 60;
    /// Platforms whose top passes this line are below the floor
    pub const PLATFORM_DESPAWN_TOP: f32 = 100.0;

    /// Spawner ramp: shrink the interval every N platforms
    pub const SPAWN_RAMP_EVERY: u32 = 5;

    /// Seconds the falling spin plays before the game-over callback
    pub const FALL_SPIN_SECONDS: f32 = 2.0;
    /// Player looks cycled by the character switch
    pub const CHARACTER_COUNT: usize = 6;
}

/// Convert a vertical percentage measured from the top of the field
/// into a bottom-anchored player-frame height.
#[inline]
pub fn top_percent_to_height(top: f32, field_height: f32) -> f32 {
    field_height - percent_to_pixels(top, field_height)
}

/// Convert a vertical extent in percent of the field into player-frame pixels
#[inline]
pub fn percent_to_pixels(percent: f32, field_height: f32) -> f32 {
    field_height * percent / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_translation() {
        assert_eq!(top_percent_to_height(0.0, 720.0), 720.0);
        assert_eq!(top_percent_to_height(100.0, 720.0), 0.0);
        assert_eq!(top_percent_to_height(55.0, 100.0), 45.0);
        assert_eq!(percent_to_pixels(5.0, 100.0), 5.0);
        assert_eq!(percent_to_pixels(50.0, 720.0), 360.0);
    }
}
