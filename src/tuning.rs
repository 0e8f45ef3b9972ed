//! Data-driven game balance
//!
//! Everything the tick reads that a designer might want to tweak. Defaults
//! come from [`crate::consts`] and reproduce the classic arcade feel.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which opponent positions the collision test sees on a given tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionTiming {
    /// Test the opponent list as it was before this tick moved it.
    /// A car that slides into the player becomes fatal one tick later.
    #[default]
    BeforeAdvance,
    /// Test the list after this tick's advance and cull.
    AfterAdvance,
}

/// Tuning values rejected by [`Tuning::validate`]
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// Speed range must satisfy 0 < min < max
    SpeedRange { min: f32, max: f32 },
    /// Ramp divisor must be positive and finite
    SpeedRampDivisor(f32),
    /// Opponents need at least one spawn column
    SpawnWidth(i32),
    /// At least one opponent must be allowed on the road
    MaxOpponents(usize),
    /// Cars must be able to reach the player before being culled
    CullLine { cull_y: f32, spawn_y: f32 },
    /// Cars must be culled before they can pass under the player hitbox
    CullBelowPlayer { cull_y: f32, player_bottom: f32 },
    /// Hitbox dimensions must be positive
    Hitbox { width: f32, height: f32 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::SpeedRange { min, max } => {
                write!(f, "invalid opponent speed range: {min}..{max}")
            }
            TuningError::SpeedRampDivisor(d) => write!(f, "invalid speed ramp divisor: {d}"),
            TuningError::SpawnWidth(w) => write!(f, "spawn width must be positive, got {w}"),
            TuningError::MaxOpponents(n) => write!(f, "max opponents must be positive, got {n}"),
            TuningError::CullLine { cull_y, spawn_y } => write!(
                f,
                "cull line {cull_y} must lie below the spawn line {spawn_y}"
            ),
            TuningError::CullBelowPlayer {
                cull_y,
                player_bottom,
            } => write!(
                f,
                "cull line {cull_y} lies below the player hitbox bottom {player_bottom}"
            ),
            TuningError::Hitbox { width, height } => {
                write!(f, "hitbox must be non-empty, got {width}x{height}")
            }
        }
    }
}

impl std::error::Error for TuningError {}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Opponent cap checked before each spawn
    pub max_opponents: usize,
    /// Spawn column range [0, spawn_width)
    pub spawn_width: i32,
    pub spawn_y: f32,
    pub cull_y: f32,
    /// Base speed range [min, max)
    pub speed_min: f32,
    pub speed_max: f32,
    /// Spawn speed gains `score / speed_ramp_divisor`
    pub speed_ramp_divisor: f32,
    pub hitbox_width: f32,
    pub hitbox_height: f32,
    /// Top edge of the player hitbox
    pub player_hitbox_top: f32,
    #[serde(default)]
    pub collision_timing: CollisionTiming,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_opponents: MAX_OPPONENTS,
            spawn_width: OPPONENT_SPAWN_WIDTH,
            spawn_y: OPPONENT_SPAWN_Y,
            cull_y: OPPONENT_CULL_Y,
            speed_min: OPPONENT_SPEED_MIN,
            speed_max: OPPONENT_SPEED_MAX,
            speed_ramp_divisor: SPEED_RAMP_SCORE_DIVISOR,
            hitbox_width: CAR_HITBOX_WIDTH,
            hitbox_height: CAR_HITBOX_HEIGHT,
            player_hitbox_top: PLAYER_HITBOX_TOP,
            collision_timing: CollisionTiming::BeforeAdvance,
        }
    }
}

impl Tuning {
    /// Check that the balance values describe a playable road
    pub fn validate(&self) -> Result<(), TuningError> {
        let speeds_ok = self.speed_min.is_finite()
            && self.speed_max.is_finite()
            && self.speed_min > 0.0
            && self.speed_min < self.speed_max;
        if !speeds_ok {
            return Err(TuningError::SpeedRange {
                min: self.speed_min,
                max: self.speed_max,
            });
        }

        if !(self.speed_ramp_divisor.is_finite() && self.speed_ramp_divisor > 0.0) {
            return Err(TuningError::SpeedRampDivisor(self.speed_ramp_divisor));
        }

        if self.spawn_width <= 0 {
            return Err(TuningError::SpawnWidth(self.spawn_width));
        }

        if self.max_opponents == 0 {
            return Err(TuningError::MaxOpponents(self.max_opponents));
        }

        if self.cull_y <= self.spawn_y {
            return Err(TuningError::CullLine {
                cull_y: self.cull_y,
                spawn_y: self.spawn_y,
            });
        }

        if self.hitbox_width <= 0.0 || self.hitbox_height <= 0.0 {
            return Err(TuningError::Hitbox {
                width: self.hitbox_width,
                height: self.hitbox_height,
            });
        }

        // Hitboxes are two-sided; a car below the player box would slip by
        let player_bottom = self.player_hitbox_top + self.hitbox_height;
        if self.cull_y > player_bottom {
            return Err(TuningError::CullBelowPlayer {
                cull_y: self.cull_y,
                player_bottom,
            });
        }

        Ok(())
    }

    /// Spawn speed for a car entering the road at the given score
    #[inline]
    pub fn spawn_speed(&self, base: f32, score: u64) -> f32 {
        base + score as f32 / self.speed_ramp_divisor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_negative_speed() {
        let tuning = Tuning {
            speed_min: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::SpeedRange { .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_speed_range() {
        let tuning = Tuning {
            speed_min: 9.0,
            speed_max: 4.0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_cull_above_spawn() {
        let tuning = Tuning {
            cull_y: -200.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::CullLine { .. })
        ));
    }

    #[test]
    fn test_rejects_cull_below_player() {
        let tuning = Tuning {
            cull_y: 800.0,
            ..Default::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(TuningError::CullBelowPlayer {
                cull_y: 800.0,
                player_bottom: 700.0,
            })
        );

        let flush = Tuning {
            cull_y: 700.0,
            ..Default::default()
        };
        assert_eq!(flush.validate(), Ok(()));
    }

    #[test]
    fn test_spawn_speed_ramp() {
        let tuning = Tuning::default();
        assert_eq!(tuning.spawn_speed(4.0, 0), 4.0);
        assert_eq!(tuning.spawn_speed(4.0, 100), 6.0);
        assert!((tuning.spawn_speed(4.0, 25) - 4.5).abs() < 1e-6);
    }

    #[test]
    fn test_missing_timing_defaults() {
        let json = serde_json::to_string(&Tuning::default()).unwrap();
        let stripped = json.replace(",\"collision_timing\":\"BeforeAdvance\"", "");
        let parsed: Tuning = serde_json::from_str(&stripped).unwrap();
        assert_eq!(parsed.collision_timing, CollisionTiming::BeforeAdvance);
    }
}
