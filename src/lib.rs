//! Road Rush - A top-down arcade driving game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (opponent traffic, collisions, game state)
//! - `input`: Keyboard mapping onto player moves and restarts
//! - `audio`: Music/crash cue control and the Web Audio backend
//! - `session`: Owner of all per-page state, routes timer/key/toggle triggers
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (music, volumes, restart keys)

pub mod audio;
pub mod input;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::{Session, TimerCommand};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
///
/// All distances are in logical play-field units (1 unit = 1 CSS pixel at
/// the reference 500x650 field size).
pub mod consts {
    /// Fixed simulation interval in milliseconds (20 Hz)
    pub const TICK_INTERVAL_MS: i32 = 50;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 500.0;
    pub const FIELD_HEIGHT: f32 = 650.0;

    /// Player lateral bounds and step size
    pub const PLAYER_START: i32 = 225;
    pub const PLAYER_MIN: i32 = 0;
    pub const PLAYER_MAX: i32 = 430;
    pub const PLAYER_STEP: i32 = 20;

    /// Hitbox shared by the player and every opponent
    pub const CAR_HITBOX_WIDTH: f32 = 70.0;
    pub const CAR_HITBOX_HEIGHT: f32 = 100.0;
    /// Top edge of the player hitbox
    pub const PLAYER_HITBOX_TOP: f32 = 600.0;

    /// Drawn car size (larger than the hitbox)
    pub const CAR_SPRITE_WIDTH: f32 = 85.0;
    pub const CAR_SPRITE_HEIGHT: f32 = 110.0;
    /// Gap between the player sprite and the bottom of the field
    pub const PLAYER_SPRITE_BOTTOM_MARGIN: f32 = 10.0;

    /// Opponent traffic
    pub const MAX_OPPONENTS: usize = 4;
    pub const OPPONENT_SPAWN_Y: f32 = -100.0;
    /// Opponents at or past this line are removed
    pub const OPPONENT_CULL_Y: f32 = 700.0;
    /// Spawn column is drawn from [0, OPPONENT_SPAWN_WIDTH)
    pub const OPPONENT_SPAWN_WIDTH: i32 = 450;
    /// Base speed range in units per tick, [min, max)
    pub const OPPONENT_SPEED_MIN: f32 = 4.0;
    pub const OPPONENT_SPEED_MAX: f32 = 9.0;
    /// Score points per +1 unit/tick of spawn speed
    pub const SPEED_RAMP_SCORE_DIVISOR: f32 = 50.0;
}

/// Clamp a lateral player offset into the drivable range
#[inline]
pub fn clamp_player(x: i32) -> i32 {
    x.clamp(consts::PLAYER_MIN, consts::PLAYER_MAX)
}

/// Top-left corner of a car drawn at the given logical position
#[inline]
pub fn car_origin(x: i32, y: f32) -> Vec2 {
    Vec2::new(x as f32, y)
}
