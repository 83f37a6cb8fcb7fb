//! Key bindings and balance settings
//!
//! Persisted in LocalStorage as JSON. Missing fields fall back to defaults,
//! invalid files are ignored with a warning.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::{Action, Control, KeyDisposition, Side};
use crate::tuning::Tuning;

/// Key that the page must swallow so it never toggles caps state mid-match
pub const LOCK_KEY: &str = "CapsLock";

/// Why a settings document was rejected
#[derive(Debug)]
pub enum SettingsError {
    Json(serde_json::Error),
    /// Same key bound to two controls
    DuplicateKey(String),
    /// Empty key or the lock key used as a binding
    UnusableKey(String),
    InvalidTuning(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Json(e) => write!(f, "malformed settings: {e}"),
            SettingsError::DuplicateKey(key) => write!(f, "key {key:?} is bound twice"),
            SettingsError::UnusableKey(key) => write!(f, "key {key:?} cannot be bound"),
            SettingsError::InvalidTuning(msg) => write!(f, "invalid tuning: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Json(e)
    }
}

/// `KeyboardEvent.key` values for one player's controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerKeys {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
    pub fire: String,
    pub shield: String,
}

impl PlayerKeys {
    fn key_for(&self, action: Action) -> &str {
        match action {
            Action::Up => &self.up,
            Action::Down => &self.down,
            Action::Left => &self.left,
            Action::Right => &self.right,
            Action::Fire => &self.fire,
            Action::Shield => &self.shield,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub player1: PlayerKeys,
    pub player2: PlayerKeys,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            player1: PlayerKeys {
                up: "w".into(),
                down: "s".into(),
                left: "a".into(),
                right: "d".into(),
                fire: " ".into(),
                shield: "q".into(),
            },
            player2: PlayerKeys {
                up: "ArrowUp".into(),
                down: "ArrowDown".into(),
                left: "ArrowLeft".into(),
                right: "ArrowRight".into(),
                fire: "Enter".into(),
                shield: "m".into(),
            },
        }
    }
}

impl KeyBindings {
    pub fn keys(&self, side: Side) -> &PlayerKeys {
        match side {
            Side::One => &self.player1,
            Side::Two => &self.player2,
        }
    }

    /// Map a raw key identifier to what the match should do with it
    pub fn resolve(&self, key: &str) -> KeyDisposition {
        if key == LOCK_KEY {
            return KeyDisposition::Suppressed;
        }
        self.controls()
            .find(|(bound, _)| *bound == key)
            .map(|(_, control)| KeyDisposition::Handled(control))
            .unwrap_or(KeyDisposition::Ignored)
    }

    fn controls(&self) -> impl Iterator<Item = (&str, Control)> + '_ {
        Side::BOTH.into_iter().flat_map(move |side| {
            Action::ALL
                .into_iter()
                .map(move |action| (self.keys(side).key_for(action), Control { side, action }))
        })
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let mut seen: Vec<&str> = Vec::with_capacity(12);
        for (key, _) in self.controls() {
            if key.is_empty() || key == LOCK_KEY {
                return Err(SettingsError::UnusableKey(key.to_string()));
            }
            if seen.contains(&key) {
                return Err(SettingsError::DuplicateKey(key.to_string()));
            }
            seen.push(key);
        }
        Ok(())
    }
}

/// Everything a player can configure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bindings: KeyBindings,
    pub tuning: Tuning,
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "shield_duel_settings";

    /// Parse and validate a settings document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.bindings.validate()?;
        self.tuning.validate()
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
