//! Game settings and preferences
//!
//! Persisted separately from the high score as a small JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Skip the tracker and use keyboard-only controls
    pub keyboard_only: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Visual effects ===
    /// Screen shake on hits
    pub screen_shake: bool,
    /// Reduced motion (suppresses shake regardless of the toggle above)
    pub reduced_motion: bool,

    // === HUD ===
    pub show_fps: bool,

    /// Fixed RNG seed; `None` seeds from the clock at startup
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keyboard_only: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            screen_shake: true,
            reduced_motion: false,
            show_fps: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Default on-disk location
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".astro_strike_settings.json")
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("settings file unreadable ({e}), using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            if let Err(e) = std::fs::write(path, json) {
                log::warn!("failed to save settings: {e}");
            } else {
                log::info!("settings saved");
            }
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective audio volume; zero means every cue is dropped
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }
}
