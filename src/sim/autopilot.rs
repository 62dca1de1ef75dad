//! Idle/demo mode AI
//!
//! Picks the lowest platform above the player that a jump can still reach,
//! steers under it and jumps. Produces ordinary intents, so it runs through
//! the same tick path as a human player.

use super::state::{GameState, Platform};
use super::tick::Intent;

/// Ticks between autopilot steering moves (keeps movement keyboard-paced)
const STEER_EVERY: u64 = 4;

/// Highest rise a jump reaches above its start
pub fn jump_reach(jump_velocity: f32, gravity: f32) -> f32 {
    jump_velocity * (jump_velocity + gravity) / (2.0 * gravity)
}

/// Choose this tick's intents
pub fn choose(state: &GameState) -> Vec<Intent> {
    let player = &state.player;
    let config = &state.config;
    let reach = jump_reach(config.jump_velocity, config.gravity);

    let Some(target) = target_platform(state, reach) else {
        return Vec::new();
    };

    let mut intents = Vec::new();
    let player_center = player.pos.x + config.player_width / 2.0;
    let target_center = target.pos.x + target.size.x / 2.0;
    let offset = target_center - player_center;
    let aligned = offset.abs() <= (target.size.x / 2.0).max(config.move_step);

    if !aligned && state.time_ticks % STEER_EVERY == 0 {
        intents.push(if offset > 0.0 {
            Intent::MoveRight
        } else {
            Intent::MoveLeft
        });
    }

    if !player.is_jumping && aligned {
        intents.push(Intent::Jump);
    }

    intents
}

/// Lowest platform above the player whose surface is within jump reach
fn target_platform(state: &GameState, reach: f32) -> Option<&Platform> {
    let player = &state.player;
    let field_height = state.config.field_height;

    state
        .platforms
        .iter()
        .filter(|p| Some(p.id) != player.current_step)
        .filter(|p| {
            let rise = p.surface(field_height) - player.pos.y;
            rise > 0.0 && rise < reach
        })
        .min_by(|a, b| {
            a.surface(field_height)
                .partial_cmp(&b.surface(field_height))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Config;
    use crate::sim::tick::{TickInput, tick};

    #[test]
    fn test_jump_reach_matches_integration() {
        let reach = jump_reach(10.0, 0.5);
        assert_eq!(reach, 105.0);
    }

    #[test]
    fn test_no_target_no_intents() {
        let state = GameState::new(1, Config::default());
        assert!(choose(&state).is_empty());
    }

    #[test]
    fn test_jumps_toward_reachable_platform() {
        let mut state = GameState::new(1, Config::default());
        let mut platform = Platform::new(1, 5.0, 20.0, 5.0);
        // Surface 72 px above the floor
        platform.pos.y = 90.0;
        state.platforms.push(platform);

        assert_eq!(choose(&state), vec![Intent::Jump]);
    }

    #[test]
    fn test_steers_when_misaligned() {
        let mut state = GameState::new(1, Config::default());
        let mut platform = Platform::new(1, 60.0, 10.0, 5.0);
        platform.pos.y = 90.0;
        state.platforms.push(platform);

        assert_eq!(choose(&state), vec![Intent::MoveRight]);
    }

    #[test]
    fn test_idle_mode_climbs() {
        let mut state = GameState::new(2024, Config::default());
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..60 * 60 {
            tick(&mut state, &idle);
        }
        assert!(state.steps_landed() > 0);
    }
}
