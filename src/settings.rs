//! Game configuration
//!
//! Tuning values for physics, platforms, spawning and audio. Layout presets
//! carry the desktop vs touch-screen differences; any field can be
//! overridden from JSON.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Layout preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Layout {
    /// Keyboard-driven, wide screen
    #[default]
    Desktop,
    /// Touch screen: faster platforms, slower spawning
    Touch,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Desktop => "Desktop",
            Layout::Touch => "Touch",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "desktop" | "keyboard" => Some(Layout::Desktop),
            "touch" | "mobile" => Some(Layout::Touch),
            _ => None,
        }
    }

    /// Platform descent per tick (percent of field height)
    pub fn platform_speed(&self) -> f32 {
        match self {
            Layout::Desktop => 0.12,
            Layout::Touch => 0.18,
        }
    }

    /// Initial spawn interval (ms)
    pub fn spawn_interval_ms(&self) -> f32 {
        match self {
            Layout::Desktop => 2000.0,
            Layout::Touch => 2500.0,
        }
    }

    /// Interval reduction applied on each ramp step (ms)
    pub fn spawn_interval_step_ms(&self) -> f32 {
        match self {
            Layout::Desktop => 100.0,
            Layout::Touch => 150.0,
        }
    }

    /// Shortest interval the ramp reaches (ms)
    pub fn spawn_min_interval_ms(&self) -> f32 {
        match self {
            Layout::Desktop => 1200.0,
            Layout::Touch => 1500.0,
        }
    }
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Layout preset the timing values were derived from
    pub layout: Layout,

    // === Field ===
    /// Field height in player-frame pixels
    pub field_height: f32,
    /// Floor line in the player frame
    pub floor: f32,

    // === Player ===
    pub player_start_x: f32,
    pub player_width: f32,
    pub move_step: f32,
    /// Leftmost allowed x
    pub left_limit: f32,
    /// Rightmost allowed x
    pub right_limit: f32,
    /// Gravity per tick
    pub gravity: f32,
    /// Upward velocity assigned by a jump
    pub jump_velocity: f32,

    // === Platforms ===
    pub platform_height: f32,
    /// Width range [min, max) in whole percent
    pub platform_width: (u32, u32),
    /// Horizontal offset range [min, max) in whole percent
    pub platform_x: (u32, u32),
    /// Descent per tick (percent of field height)
    pub platform_speed: f32,
    /// Platforms whose top passes this line are removed
    pub despawn_top: f32,

    // === Spawner ===
    pub spawn_interval_ms: f32,
    pub spawn_interval_step_ms: f32,
    pub spawn_min_interval_ms: f32,
    /// Apply one ramp step every N platforms created
    pub spawn_ramp_every: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_layout(Layout::Desktop)
    }
}

impl Config {
    /// Create a configuration from a layout preset
    pub fn from_layout(layout: Layout) -> Self {
        Self {
            layout,

            field_height: FIELD_HEIGHT,
            floor: FLOOR_Y,

            player_start_x: PLAYER_START_X,
            player_width: PLAYER_WIDTH,
            move_step: PLAYER_MOVE_STEP,
            left_limit: 0.0,
            right_limit: 100.0 - PLAYER_WIDTH,
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,

            platform_height: PLATFORM_HEIGHT,
            platform_width: (PLATFORM_MIN_WIDTH, PLATFORM_MAX_WIDTH),
            platform_x: (PLATFORM_MIN_X, PLATFORM_MAX_X),
            platform_speed: layout.platform_speed(),
            despawn_top: PLATFORM_DESPAWN_TOP,

            spawn_interval_ms: layout.spawn_interval_ms(),
            spawn_interval_step_ms: layout.spawn_interval_step_ms(),
            spawn_min_interval_ms: layout.spawn_min_interval_ms(),
            spawn_ramp_every: SPAWN_RAMP_EVERY,

            master_volume: 0.8,
            muted: false,
        }
    }

    /// Parse a JSON override on top of a layout preset and validate it
    ///
    /// The preset is the one named by `layout` (desktop when absent); every
    /// other field present in the JSON replaces the preset's value.
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(fields) = overrides else {
            return Err(Error::InvalidConfig(
                "configuration must be a JSON object".to_string(),
            ));
        };

        let layout = match fields.get("layout") {
            Some(value) => serde_json::from_value(value.clone())?,
            None => Layout::default(),
        };

        let mut merged = serde_json::to_value(Config::from_layout(layout))?;
        if let Some(base) = merged.as_object_mut() {
            base.extend(fields);
        }

        let config: Config = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(Error::InvalidConfig(msg.to_string()));

        if self.field_height <= 0.0 {
            return invalid("field_height must be positive");
        }
        if self.gravity <= 0.0 {
            return invalid("gravity must be positive");
        }
        if self.left_limit > self.right_limit {
            return invalid("left_limit must not exceed right_limit");
        }
        if !(self.left_limit..=self.right_limit).contains(&self.player_start_x) {
            return invalid("player_start_x must lie within the horizontal limits");
        }
        if self.move_step <= 0.0 {
            return invalid("move_step must be positive");
        }
        if self.platform_speed <= 0.0 {
            return invalid("platform_speed must be positive");
        }
        if self.despawn_top <= 0.0 {
            return invalid("despawn_top must be positive");
        }
        if self.platform_width.0 >= self.platform_width.1 {
            return invalid("platform_width range is empty");
        }
        if self.platform_x.0 >= self.platform_x.1 {
            return invalid("platform_x range is empty");
        }
        if self.spawn_min_interval_ms <= 0.0 || self.spawn_interval_ms <= 0.0 {
            return invalid("spawn intervals must be positive");
        }
        if self.spawn_ramp_every == 0 {
            return invalid("spawn_ramp_every must be at least 1");
        }
        Ok(())
    }

    /// Effective audio volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }
}
