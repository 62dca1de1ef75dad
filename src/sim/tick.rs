//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::autopilot;
use super::physics::{self, Verdict};
use super::state::{GameEvent, GamePhase, GameState, Side};
use crate::consts::SIM_DT;

/// A discrete player intent, queued by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Jump,
    TogglePause,
    /// Handled by the driver (discards the whole state)
    Restart,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Intents in the order they arrived
    pub intents: Vec<Intent>,
    /// Idle/demo mode - the autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Handle pause toggles first so a paused game ignores everything else
    for _ in input.intents.iter().filter(|i| **i == Intent::TogglePause) {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                log::info!("Paused");
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::Resumed);
                log::info!("Resumed");
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    let mut intents = input.intents.clone();
    if input.idle_mode {
        intents.extend(autopilot::choose(state));
    }
    for intent in intents {
        apply_intent(state, intent);
    }

    // Spawner bookkeeping
    if let Some(platform) = state.spawner.update(SIM_DT * 1000.0, &state.config) {
        state.platforms.push(platform);
    }

    // Player physics against the current platforms
    match physics::advance(&mut state.player, &state.platforms, &state.config) {
        Verdict::Continuing => {}
        Verdict::Landed(id) => {
            log::debug!("Landed on platform {}", id);
            state.events.push(GameEvent::Landed { platform: id });
            if state.visited.insert(id) {
                let total = state.steps_landed();
                state.events.push(GameEvent::StepCounted { total });
            }
        }
        Verdict::Fell => {
            state.events.push(GameEvent::Fell);
            state.events.push(GameEvent::GameOver);
            state.phase = GamePhase::GameOver;
            log::info!(
                "Game over after {} ticks, {} steps landed",
                state.time_ticks,
                state.steps_landed()
            );
            return;
        }
    }

    // Platforms scroll down and leave the field
    let speed = state.config.platform_speed;
    for platform in &mut state.platforms {
        platform.descend(speed);
    }
    let despawn_top = state.config.despawn_top;
    state.platforms.retain(|p| !p.is_below_floor(despawn_top));

    // A resting player rides the scroll with its platform
    let field_height = state.config.field_height;
    let surface = state
        .player
        .current_step
        .and_then(|id| state.platform(id))
        .map(|step| step.surface(field_height));
    if let Some(y) = surface {
        state.player.pos.y = y;
    }
}

fn apply_intent(state: &mut GameState, intent: Intent) {
    let config = &state.config;
    let player = &mut state.player;
    match intent {
        Intent::MoveLeft => {
            if player.move_left(config.move_step, config.left_limit) {
                state.events.push(GameEvent::WallHit { side: Side::Left });
            }
        }
        Intent::MoveRight => {
            if player.move_right(config.move_step, config.right_limit) {
                state.events.push(GameEvent::WallHit { side: Side::Right });
            }
        }
        Intent::Jump => {
            if player.jump(config.jump_velocity) {
                state.events.push(GameEvent::Jumped);
            }
        }
        Intent::TogglePause | Intent::Restart => {}
    }
}
