//! Game state and core simulation types
//!
//! Everything the tick reads or writes lives in [`GameState`]; the platform
//! layer only ever sees it through a [`Snapshot`].

use std::fmt;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Cars are moving and the score is running
    #[default]
    Playing,
    /// A collision happened; only a reset leaves this phase
    GameOver,
}

/// Something noteworthy that happened during a state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { opponent_id: u32 },
    Culled { opponent_id: u32 },
    /// Player hit an opponent (first match only)
    Crash { opponent_id: u32 },
    Restarted,
}

/// A car in oncoming traffic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opponent {
    /// Stable identity for diffed rendering
    pub id: u32,
    /// Left edge, in [0, spawn_width)
    pub x: i32,
    /// Top edge; grows by `speed` every tick
    pub y: f32,
    /// Units per tick
    pub speed: f32,
}

impl Opponent {
    pub fn new(id: u32, x: i32, y: f32, speed: f32) -> Self {
        Self {
            id,
            x,
            y,
            // Cars never stall or reverse up the road
            speed: if speed.is_finite() {
                speed.max(OPPONENT_SPEED_MIN)
            } else {
                OPPONENT_SPEED_MIN
            },
        }
    }

    /// Move one tick down the road
    #[inline]
    pub fn advance(&mut self) {
        self.y += self.speed;
    }
}

/// State invariant broken, reported by [`GameState::check_invariants`]
#[derive(Debug, Clone, PartialEq)]
pub enum RuleViolation {
    PlayerOutOfRange { player: i32 },
    PlayerOffGrid { player: i32 },
    TooManyOpponents { count: usize, max: usize },
    OpponentPastCullLine { id: u32, y: f32 },
    OpponentTooSlow { id: u32, speed: f32 },
    OpponentOffRoad { id: u32, x: i32 },
    DuplicateOpponentId { id: u32 },
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleViolation::PlayerOutOfRange { player } => {
                write!(f, "player offset {player} outside {PLAYER_MIN}..={PLAYER_MAX}")
            }
            RuleViolation::PlayerOffGrid { player } => {
                write!(f, "player offset {player} not on the {PLAYER_STEP}-unit grid")
            }
            RuleViolation::TooManyOpponents { count, max } => {
                write!(f, "{count} opponents on the road, cap is {max}")
            }
            RuleViolation::OpponentPastCullLine { id, y } => {
                write!(f, "opponent {id} at y={y} should have been culled")
            }
            RuleViolation::OpponentTooSlow { id, speed } => {
                write!(f, "opponent {id} speed {speed} below minimum")
            }
            RuleViolation::OpponentOffRoad { id, x } => {
                write!(f, "opponent {id} spawned off road at x={x}")
            }
            RuleViolation::DuplicateOpponentId { id } => {
                write!(f, "opponent id {id} used twice")
            }
        }
    }
}

impl std::error::Error for RuleViolation {}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Spawn randomness; keeps running across resets
    pub rng: Pcg32,
    pub score: u64,
    /// Left edge of the player car
    pub player: i32,
    /// Oncoming cars in spawn order
    pub opponents: Vec<Opponent>,
    pub phase: GamePhase,
    /// Ticks simulated in the current run
    pub time_ticks: u64,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            player: PLAYER_START,
            opponents: Vec::new(),
            phase: GamePhase::Playing,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Put every gameplay value back to its starting default.
    ///
    /// The RNG stream and id counter carry on so the next run differs and
    /// ids stay unique for the renderer.
    pub fn reset(&mut self) {
        self.score = 0;
        self.player = PLAYER_START;
        self.opponents.clear();
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        self.events.push(GameEvent::Restarted);
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place an opponent directly (scenario setup, replays)
    pub fn push_opponent(&mut self, x: i32, y: f32, speed: f32) -> u32 {
        let id = self.next_entity_id();
        self.opponents.push(Opponent::new(id, x, y, speed));
        id
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Verify the state is one the simulation can legally reach
    pub fn check_invariants(&self, tuning: &Tuning) -> Result<(), RuleViolation> {
        if !(PLAYER_MIN..=PLAYER_MAX).contains(&self.player) {
            return Err(RuleViolation::PlayerOutOfRange {
                player: self.player,
            });
        }

        if (self.player - PLAYER_START).rem_euclid(PLAYER_STEP) != 0 {
            return Err(RuleViolation::PlayerOffGrid {
                player: self.player,
            });
        }

        if self.opponents.len() > tuning.max_opponents {
            return Err(RuleViolation::TooManyOpponents {
                count: self.opponents.len(),
                max: tuning.max_opponents,
            });
        }

        for (i, opponent) in self.opponents.iter().enumerate() {
            if opponent.y >= tuning.cull_y {
                return Err(RuleViolation::OpponentPastCullLine {
                    id: opponent.id,
                    y: opponent.y,
                });
            }
            if opponent.speed < tuning.speed_min {
                return Err(RuleViolation::OpponentTooSlow {
                    id: opponent.id,
                    speed: opponent.speed,
                });
            }
            if !(0..tuning.spawn_width).contains(&opponent.x) {
                return Err(RuleViolation::OpponentOffRoad {
                    id: opponent.id,
                    x: opponent.x,
                });
            }
            if self.opponents[..i].iter().any(|o| o.id == opponent.id) {
                return Err(RuleViolation::DuplicateOpponentId { id: opponent.id });
            }
        }

        Ok(())
    }

    /// Read-only view for renderers and the HUD
    pub fn snapshot(&self, music_enabled: bool) -> Snapshot {
        Snapshot {
            player: self.player,
            opponents: self
                .opponents
                .iter()
                .map(|o| OpponentView {
                    id: o.id,
                    x: o.x,
                    y: o.y,
                })
                .collect(),
            score: self.score,
            game_over: self.is_game_over(),
            music_enabled,
            tick: self.time_ticks,
        }
    }
}

/// Opponent as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpponentView {
    pub id: u32,
    pub x: i32,
    pub y: f32,
}

/// Per-frame read-only copy of everything the presentation layer draws
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub player: i32,
    pub opponents: Vec<OpponentView>,
    pub score: u64,
    pub game_over: bool,
    pub music_enabled: bool,
    pub tick: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(7);
        assert_eq!(state.score, 0);
        assert_eq!(state.player, 225);
        assert!(state.opponents.is_empty());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.check_invariants(&Tuning::default()), Ok(()));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = GameState::new(7);
        state.score = 312;
        state.player = 45;
        state.push_opponent(100, 300.0, 6.0);
        state.phase = GamePhase::GameOver;

        state.reset();

        assert_eq!(state.score, 0);
        assert_eq!(state.player, 225);
        assert!(state.opponents.is_empty());
        assert!(!state.is_game_over());
        assert_eq!(state.drain_events(), vec![GameEvent::Restarted]);
    }

    #[test]
    fn test_ids_stay_unique_across_reset() {
        let mut state = GameState::new(7);
        let first = state.push_opponent(0, 0.0, 5.0);
        state.reset();
        let second = state.push_opponent(0, 0.0, 5.0);
        assert_ne!(first, second);
    }

    #[test]
    fn test_negative_speed_clamped() {
        let opponent = Opponent::new(1, 10, 0.0, -3.0);
        assert_eq!(opponent.speed, OPPONENT_SPEED_MIN);
        assert_eq!(Opponent::new(2, 10, 0.0, f32::NAN).speed, OPPONENT_SPEED_MIN);
    }

    #[test]
    fn test_reversing_car_still_leaves_the_road() {
        // No traffic joins until this car is gone
        let tuning = Tuning {
            max_opponents: 1,
            ..Default::default()
        };
        let mut state = GameState::new(1);
        state.player = 25;
        let id = state.push_opponent(400, 100.0, -3.0);
        assert_eq!(state.check_invariants(&tuning), Ok(()));

        for _ in 0..200 {
            crate::sim::tick(&mut state, &tuning);
        }

        assert!(state.opponents.iter().all(|o| o.id != id));
        assert_eq!(state.check_invariants(&tuning), Ok(()));
    }

    #[test]
    fn test_invariants_catch_bad_player() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1);
        state.player = 440;
        assert_eq!(
            state.check_invariants(&tuning),
            Err(RuleViolation::PlayerOutOfRange { player: 440 })
        );
        state.player = 230;
        assert_eq!(
            state.check_invariants(&tuning),
            Err(RuleViolation::PlayerOffGrid { player: 230 })
        );
    }

    #[test]
    fn test_invariants_catch_stale_opponent() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1);
        let id = state.push_opponent(10, 700.0, 5.0);
        assert_eq!(
            state.check_invariants(&tuning),
            Err(RuleViolation::OpponentPastCullLine { id, y: 700.0 })
        );
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = GameState::new(3);
        let id = state.push_opponent(120, -100.0, 4.5);
        state.score = 9;
        let snap = state.snapshot(false);
        assert_eq!(snap.player, 225);
        assert_eq!(snap.score, 9);
        assert!(!snap.game_over);
        assert!(!snap.music_enabled);
        assert_eq!(
            snap.opponents,
            vec![OpponentView {
                id,
                x: 120,
                y: -100.0
            }]
        );
    }
}
