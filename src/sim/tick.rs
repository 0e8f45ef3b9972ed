//! Fixed interval simulation tick
//!
//! One call advances the road by one 50 ms step. The step order is
//! advance, cull, spawn, score, then collision.

use rand::Rng;

use super::collision::find_collision;
use super::state::{GameEvent, GamePhase, GameState};
use crate::tuning::{CollisionTiming, Tuning};

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Run continues
    Running,
    /// This tick ended the run
    Crashed { opponent_id: u32 },
    /// Already game over, nothing changed
    Halted,
}

/// Advance the game state by one fixed step
pub fn tick(state: &mut GameState, tuning: &Tuning) -> TickOutcome {
    if state.phase == GamePhase::GameOver {
        return TickOutcome::Halted;
    }

    // Pre-tick view: decides both the spawn and (by default) the collision
    let count_before = state.opponents.len();
    let early_hit = match tuning.collision_timing {
        CollisionTiming::BeforeAdvance => {
            find_collision(&state.opponents, state.player, tuning).map(|o| o.id)
        }
        CollisionTiming::AfterAdvance => None,
    };

    for opponent in &mut state.opponents {
        opponent.advance();
    }

    let cull_y = tuning.cull_y;
    let events = &mut state.events;
    state.opponents.retain(|o| {
        let keep = o.y < cull_y;
        if !keep {
            events.push(GameEvent::Culled { opponent_id: o.id });
        }
        keep
    });

    if count_before < tuning.max_opponents {
        spawn_opponent(state, tuning);
    }

    state.score += 1;
    state.time_ticks += 1;

    let hit = match tuning.collision_timing {
        CollisionTiming::BeforeAdvance => early_hit,
        CollisionTiming::AfterAdvance => {
            find_collision(&state.opponents, state.player, tuning).map(|o| o.id)
        }
    };

    match hit {
        Some(opponent_id) => {
            state.phase = GamePhase::GameOver;
            state.events.push(GameEvent::Crash { opponent_id });
            TickOutcome::Crashed { opponent_id }
        }
        None => TickOutcome::Running,
    }
}

/// Append one car at the top of the road; faster as the score climbs
pub fn spawn_opponent(state: &mut GameState, tuning: &Tuning) -> u32 {
    let x = state.rng.random_range(0..tuning.spawn_width);
    let base = state.rng.random_range(tuning.speed_min..tuning.speed_max);
    let speed = tuning.spawn_speed(base, state.score);
    let id = state.push_opponent(x, tuning.spawn_y, speed);
    state.events.push(GameEvent::Spawned { opponent_id: id });
    id
}
