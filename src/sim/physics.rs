//! Player physics and platform landing
//!
//! The one tricky part of the game: platforms move while the player jumps
//! between them, so every tick has to re-anchor a resting player, integrate
//! gravity for an airborne one, and decide whether it landed, hit the floor
//! or fell out of the field.

use super::state::{Platform, Player};
use crate::settings::Config;

/// Outcome of one physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing notable (airborne, resting, or caught by the floor)
    Continuing,
    /// Landed on the platform with this id
    Landed(u32),
    /// Dropped below the floor after leaving the ground
    Fell,
}

/// Advance the player by one tick against the live platforms
///
/// `platforms` must be in creation order: the first qualifying platform
/// wins when several overlap the same tentative position.
pub fn advance(player: &mut Player, platforms: &[Platform], config: &Config) -> Verdict {
    if let Some(step_id) = player.current_step {
        match platforms.iter().find(|p| p.id == step_id) {
            Some(step) if !step.is_below_floor(config.despawn_top) => {
                player.pos.y = step.surface(config.field_height);
                return Verdict::Continuing;
            }
            _ => {
                // Carried off the field (or already removed): start falling
                player.current_step = None;
                player.is_jumping = true;
                player.vel_y = 0.0;
                return Verdict::Continuing;
            }
        }
    }

    // Resting on the floor
    if !player.is_jumping {
        return Verdict::Continuing;
    }

    let new_y = player.pos.y + player.vel_y;
    let new_vel = player.vel_y - player.gravity;

    if let Some(platform) = find_landing(player, new_y, platforms, config) {
        player.pos.y = platform.surface(config.field_height);
        player.vel_y = 0.0;
        player.is_jumping = false;
        player.current_step = Some(platform.id);
        player.left_floor = true;
        return Verdict::Landed(platform.id);
    }

    if new_y <= config.floor {
        if !player.left_floor {
            player.pos.y = config.floor;
            player.vel_y = 0.0;
            player.is_jumping = false;
            return Verdict::Continuing;
        }
        player.pos.y = new_y;
        player.vel_y = new_vel;
        return Verdict::Fell;
    }

    player.pos.y = new_y;
    player.vel_y = new_vel;
    Verdict::Continuing
}

/// First platform (creation order) the player would land on at `new_y`
fn find_landing<'a>(
    player: &Player,
    new_y: f32,
    platforms: &'a [Platform],
    config: &Config,
) -> Option<&'a Platform> {
    // Only a falling (or apex) player can land
    if player.vel_y > 0.0 {
        return None;
    }
    platforms.iter().find(|platform| {
        let (bottom, top) = platform.vertical_span(config.field_height);
        new_y >= bottom && new_y <= top && player.overlaps_horizontally(config.player_width, platform)
    })
}
