//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Hitbox, find_collision, opponent_hitbox, player_hitbox};
pub use state::{
    GameEvent, GamePhase, GameState, Opponent, OpponentView, RuleViolation, Snapshot,
};
pub use tick::{TickOutcome, spawn_opponent, tick};
