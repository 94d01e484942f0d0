//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web; native builds use defaults plus
//! environment overrides for the narrative service.

use serde::{Deserialize, Serialize};

/// Default generateContent base URL
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default text model
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Narrative text service connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Without a key every fetch falls back to canned text
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl NarrativeConfig {
    /// Read from environment variables
    ///
    /// Optional: NARRATIVE_API_KEY (no key means fallback text only)
    /// Optional: NARRATIVE_API_URL (defaults to the public generateContent API)
    /// Optional: NARRATIVE_MODEL
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("NARRATIVE_API_KEY").ok(),
            api_url: std::env::var("NARRATIVE_API_URL").unwrap_or(defaults.api_url),
            model: std::env::var("NARRATIVE_MODEL").unwrap_or(defaults.model),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all cues
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === HUD ===
    /// Show the key legend under the board
    pub show_key_hints: bool,

    /// Narrative service connection
    pub narrative: NarrativeConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,
            show_key_hints: true,
            narrative: NarrativeConfig::default(),
        }
    }
}

impl Settings {
    /// Volume a cue plays at, after master/sfx scaling and mute
    pub fn effective_volume(&self, cue_volume: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume * cue_volume).clamp(0.0, 1.0)
        }
    }

    /// Flip the mute switch, returning the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "silent_kapten_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring corrupt settings: {}", e),
                }
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

    /// Native builds take defaults with the narrative service from the environment
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self {
            narrative: NarrativeConfig::from_env(),
            ..Self::default()
        }
    }
}
