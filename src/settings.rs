//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web; native builds always use defaults.

use serde::{Deserialize, Serialize};

use crate::input::RestartKeys;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // === Audio ===
    /// Background music toggle
    pub music_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Input ===
    /// Keys that restart from the game-over screen
    #[serde(default)]
    pub restart_keys: RestartKeys,

    // === HUD ===
    /// Draw hitbox outlines over the cars
    #[serde(default)]
    pub show_hitboxes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_enabled: true,
            master_volume: 0.8,
            music_volume: 0.6,
            sfx_volume: 1.0,
            restart_keys: RestartKeys::Strict,
            show_hitboxes: false,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "road_rush_settings";

    /// Flip the music toggle, returning the new value
    pub fn toggle_music(&mut self) -> bool {
        self.music_enabled = !self.music_enabled;
        self.music_enabled
    }

    /// Parse stored JSON, falling back to defaults on anything unreadable
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_music_on_by_default() {
        assert!(Settings::default().music_enabled);
    }

    #[test]
    fn test_toggle_music() {
        let mut settings = Settings::default();
        assert!(!settings.toggle_music());
        assert!(settings.toggle_music());
    }

    #[test]
    fn test_from_json_fills_new_fields() {
        let json = r#"{"music_enabled":false,"master_volume":0.5,"music_volume":0.4,"sfx_volume":1.0}"#;
        let settings = Settings::from_json(json);
        assert!(!settings.music_enabled);
        assert_eq!(settings.restart_keys, RestartKeys::Strict);
        assert!(!settings.show_hitboxes);
    }

    #[test]
    fn test_from_json_garbage_falls_back() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }
}
