//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads goes through [`Tuning`], so a run can be
//! rebalanced from a JSON file without recompiling. Missing fields fall back to the
//! defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors that can occur while loading a tuning file.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value: {0}")]
    Invalid(&'static str),
}

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Oxygen ===
    /// Oxygen lost per virtual frame
    pub oxygen_decay_per_frame: f64,
    /// Oxygen restored by a tank
    pub oxygen_refill: f64,
    /// Low-oxygen warning threshold
    pub low_oxygen_threshold: f64,

    // === Platforms ===
    pub sink_speed: f32,
    pub recovery_speed: f32,
    pub sink_debounce_secs: f64,
    pub jump_recovery_hold_frames: u32,
    pub slot_spacing: f32,

    // === Jump arc ===
    pub jump_hop: f32,
    pub jump_rise_lateral: f32,
    pub jump_fall_lateral: f32,
    pub jump_clip_frames: u32,

    // === Tank ===
    pub tank_respawn_frames: u32,
    pub tank_hover_height: f32,
    pub tank_fade_in_secs: f32,
    pub tank_fade_out_secs: f32,
    /// Rotation about the vertical axis per `tank_spin_secs`
    pub tank_spin_radians: f32,
    pub tank_spin_secs: f32,

    // === Ambience ===
    pub steam_burst_base_frames: u32,
    pub steam_burst_jitter_frames: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            oxygen_decay_per_frame: OXYGEN_DECAY_PER_FRAME,
            oxygen_refill: OXYGEN_REFILL,
            low_oxygen_threshold: LOW_OXYGEN_THRESHOLD,

            sink_speed: SINK_SPEED,
            recovery_speed: RECOVERY_SPEED,
            sink_debounce_secs: SINK_DEBOUNCE_SECS,
            jump_recovery_hold_frames: JUMP_RECOVERY_HOLD_FRAMES,
            slot_spacing: SLOT_SPACING,

            jump_hop: JUMP_HOP,
            jump_rise_lateral: JUMP_RISE_LATERAL,
            jump_fall_lateral: JUMP_FALL_LATERAL,
            jump_clip_frames: JUMP_CLIP_FRAMES,

            tank_respawn_frames: TANK_RESPAWN_FRAMES,
            tank_hover_height: TANK_HOVER_HEIGHT,
            tank_fade_in_secs: TANK_FADE_IN_SECS,
            tank_fade_out_secs: TANK_FADE_OUT_SECS,
            tank_spin_radians: TANK_SPIN_RADIANS,
            tank_spin_secs: TANK_SPIN_SECS,

            steam_burst_base_frames: STEAM_BURST_BASE_FRAMES,
            steam_burst_jitter_frames: STEAM_BURST_JITTER_FRAMES,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON, filling unspecified fields with defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.oxygen_decay_per_frame < 0.0 {
            return Err(TuningError::Invalid("oxygen_decay_per_frame must be >= 0"));
        }
        if self.oxygen_refill <= 0.0 {
            return Err(TuningError::Invalid("oxygen_refill must be > 0"));
        }
        if self.sink_speed < 0.0 || self.recovery_speed < 0.0 {
            return Err(TuningError::Invalid("platform speeds must be >= 0"));
        }
        if self.slot_spacing <= 0.0 {
            return Err(TuningError::Invalid("slot_spacing must be > 0"));
        }
        // A jump has to land exactly on the neighbouring platform
        let travel = self.jump_rise_lateral + self.jump_fall_lateral;
        if (travel - self.slot_spacing).abs() > 1e-4 {
            return Err(TuningError::Invalid(
                "jump_rise_lateral + jump_fall_lateral must equal slot_spacing",
            ));
        }
        // Completion must come after the last fall event
        if self.jump_clip_frames < JUMP_FALL_FIRST_FRAME + JUMP_FALL_EVENTS {
            return Err(TuningError::Invalid("jump_clip_frames too short for the jump arc"));
        }
        Ok(())
    }

    /// Recovery applied to a platform over `frames` virtual frames
    #[inline]
    pub fn recovery_step(&self, frames: u32) -> f32 {
        self.recovery_speed * frames as f32 / REFERENCE_FPS as f32
    }

    /// Sink applied to a platform over `frames` virtual frames
    #[inline]
    pub fn sink_step(&self, frames: u32) -> f32 {
        self.sink_speed * frames as f32 / REFERENCE_FPS as f32
    }
}
