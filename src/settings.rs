//! Player settings and preferences
//!
//! Persisted as JSON next to the tuning file, separately from gameplay balance.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::SoundCue;

/// Errors that can occur while reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which volume slider a cue belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeCategory {
    Sfx,
    Ambience,
}

impl SoundCue {
    /// Mix level of the cue itself before any player volume
    pub fn base_volume(self) -> f32 {
        match self {
            SoundCue::Ambience => 0.7,
            SoundCue::Collect => 0.9,
            SoundCue::SteamBurst => 0.6,
            SoundCue::Death => 1.0,
        }
    }

    pub fn category(self) -> VolumeCategory {
        match self {
            SoundCue::Ambience | SoundCue::SteamBurst => VolumeCategory::Ambience,
            SoundCue::Collect | SoundCue::Death => VolumeCategory::Sfx,
        }
    }

    /// Only the volcano ambience loops
    pub fn looping(self) -> bool {
        self == SoundCue::Ambience
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Feedback ===
    /// Haptic pulses on jump and low oxygen
    pub haptics: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Ambience and steam volume (0.0 - 1.0)
    pub ambience_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            haptics: true,

            master_volume: 1.0,
            sfx_volume: 1.0,
            ambience_volume: 1.0,
        }
    }
}

impl Settings {
    /// Volume slider for a category
    pub fn category_volume(&self, category: VolumeCategory) -> f32 {
        match category {
            VolumeCategory::Sfx => self.sfx_volume,
            VolumeCategory::Ambience => self.ambience_volume,
        }
    }

    /// Final playback volume for a cue
    pub fn cue_volume(&self, cue: SoundCue) -> f32 {
        let volume = cue.base_volume() * self.category_volume(cue.category()) * self.master_volume;
        volume.clamp(0.0, 1.0)
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from disk
    pub fn read(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults if the file is missing or broken
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings to disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
