//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by platform ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod physics;
pub mod spawner;
pub mod state;
pub mod tick;

pub use physics::{Verdict, advance};
pub use spawner::Spawner;
pub use state::{GameEvent, GamePhase, GameState, Platform, Player, Side};
pub use tick::{Intent, TickInput, tick};
