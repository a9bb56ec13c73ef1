//! Player settings and preferences
//!
//! Persisted separately from the leaderboard under its own storage key.

use serde::{Deserialize, Serialize};

use crate::consts::SETTINGS_KEY;
use crate::engine::DEFAULT_TOUCH_SENSITIVITY;
use crate::persistence::{self, KeyValueStore};

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Controls ===
    /// Lane units per pixel of touch drag
    pub touch_sensitivity: f32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (freezes coin spin and curb animation)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            touch_sensitivity: DEFAULT_TOUCH_SENSITIVITY,
            show_fps: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Whether time-driven animation should run
    pub fn effective_animation(&self) -> bool {
        !self.reduced_motion
    }

    /// Combined sound volume, zero when muted
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match persistence::load_json::<Settings, _>(store, SETTINGS_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to load settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Best-effort save
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        match persistence::save_json(store, SETTINGS_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }

    /// Flip mute and persist the result
    pub fn toggle_mute<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) {
        self.muted = !self.muted;
        self.save(store);
    }
}
