//! Keyboard input
//!
//! Key presses are edge-triggered and applied to the state immediately;
//! they do not wait for the next tick.

use serde::{Deserialize, Serialize};

use crate::clamp_player;
use crate::consts::*;
use crate::sim::GameState;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Space,
    Enter,
    /// Anything else
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            " " | "Spacebar" => Key::Space,
            "Enter" => Key::Enter,
            _ => Key::Other,
        }
    }

    fn is_restart_key(self) -> bool {
        matches!(self, Key::Space | Key::Enter)
    }
}

/// Which keys restart the game from the game-over screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RestartKeys {
    /// Space or Enter
    #[default]
    Strict,
    /// Any key press, but only from the game-over screen
    AnyKey,
}

impl RestartKeys {
    pub fn accepts(self, key: Key) -> bool {
        match self {
            RestartKeys::Strict => key.is_restart_key(),
            RestartKeys::AnyKey => true,
        }
    }
}

/// Result of handling one key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Moved { from: i32, to: i32 },
    Restarted,
    Ignored,
}

/// Apply one key press to the game state
pub fn handle_key(state: &mut GameState, key: Key, restart_keys: RestartKeys) -> InputAction {
    if state.is_game_over() {
        if restart_keys.accepts(key) {
            state.reset();
            return InputAction::Restarted;
        }
        return InputAction::Ignored;
    }

    let from = state.player;
    let target = match key {
        Key::Left if from - PLAYER_STEP >= PLAYER_MIN => from - PLAYER_STEP,
        Key::Right if from + PLAYER_STEP <= PLAYER_MAX => from + PLAYER_STEP,
        _ => return InputAction::Ignored,
    };

    state.player = clamp_player(target);
    InputAction::Moved {
        from,
        to: state.player,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    fn press(state: &mut GameState, key: Key) -> InputAction {
        handle_key(state, key, RestartKeys::Strict)
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_key_name("ArrowLeft"), Key::Left);
        assert_eq!(Key::from_key_name("ArrowRight"), Key::Right);
        assert_eq!(Key::from_key_name(" "), Key::Space);
        assert_eq!(Key::from_key_name("Enter"), Key::Enter);
        assert_eq!(Key::from_key_name("a"), Key::Other);
    }

    #[test]
    fn test_steps_of_twenty() {
        let mut state = GameState::new(1);
        assert_eq!(
            press(&mut state, Key::Left),
            InputAction::Moved { from: 225, to: 205 }
        );
        assert_eq!(
            press(&mut state, Key::Right),
            InputAction::Moved { from: 205, to: 225 }
        );
    }

    #[test]
    fn test_left_edge_stops() {
        let mut state = GameState::new(1);
        for _ in 0..30 {
            press(&mut state, Key::Left);
        }
        assert_eq!(state.player, 5);
        assert_eq!(press(&mut state, Key::Left), InputAction::Ignored);
    }

    #[test]
    fn test_right_edge_stops() {
        let mut state = GameState::new(1);
        for _ in 0..30 {
            press(&mut state, Key::Right);
        }
        assert_eq!(state.player, 425);
        assert_eq!(press(&mut state, Key::Right), InputAction::Ignored);
    }

    #[test]
    fn test_no_steering_after_crash() {
        let mut state = GameState::new(1);
        state.phase = GamePhase::GameOver;
        assert_eq!(press(&mut state, Key::Left), InputAction::Ignored);
        assert_eq!(state.player, 225);
    }

    #[test]
    fn test_restart_keys_strict() {
        let mut state = GameState::new(1);
        state.phase = GamePhase::GameOver;
        state.score = 40;

        assert_eq!(press(&mut state, Key::Other), InputAction::Ignored);
        assert!(state.is_game_over());

        assert_eq!(press(&mut state, Key::Enter), InputAction::Restarted);
        assert!(!state.is_game_over());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_restart_keys_any() {
        let mut state = GameState::new(1);
        state.phase = GamePhase::GameOver;
        assert_eq!(
            handle_key(&mut state, Key::Left, RestartKeys::AnyKey),
            InputAction::Restarted
        );
        assert_eq!(state.player, 225);
    }

    #[test]
    fn test_any_key_policy_needs_game_over() {
        let mut state = GameState::new(1);
        state.score = 12;
        assert_eq!(
            handle_key(&mut state, Key::Space, RestartKeys::AnyKey),
            InputAction::Ignored
        );
        assert_eq!(state.score, 12);
    }

    #[test]
    fn test_restart_key_while_playing_is_ignored() {
        let mut state = GameState::new(1);
        state.score = 12;
        assert_eq!(press(&mut state, Key::Space), InputAction::Ignored);
        assert_eq!(state.score, 12);
    }
}
