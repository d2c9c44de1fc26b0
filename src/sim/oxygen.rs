//! Oxygen meter
//!
//! A bounded scalar in [0, 1] that drains every virtual frame and is topped up by tanks.

use serde::{Deserialize, Serialize};

/// Outcome of one frame of oxygen decay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OxygenStatus {
    /// Level was at or below the warning threshold this frame
    pub low: bool,
    /// Level reached zero this frame (reported once)
    pub exhausted: bool,
}

/// The oxygen meter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OxygenMeter {
    level: f64,
    decay_per_frame: f64,
    refill_amount: f64,
    low_threshold: f64,
    /// Set once the level hits zero so exhaustion is reported once
    exhausted: bool,
}

impl OxygenMeter {
    pub fn new(decay_per_frame: f64, refill_amount: f64, low_threshold: f64) -> Self {
        Self {
            level: 1.0,
            decay_per_frame,
            refill_amount,
            low_threshold,
            exhausted: false,
        }
    }

    #[inline]
    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn is_low(&self) -> bool {
        self.level <= self.low_threshold
    }

    /// Drain oxygen for `virtual_frames` frames.
    ///
    /// The low warning reflects the level before this frame's decay.
    pub fn decay(&mut self, virtual_frames: u32) -> OxygenStatus {
        let low = self.is_low();
        self.level -= self.decay_per_frame * virtual_frames as f64;

        let mut exhausted = false;
        if self.level <= 0.0 {
            self.level = 0.0;
            exhausted = !self.exhausted;
            self.exhausted = true;
        }
        self.clamp();

        OxygenStatus { low, exhausted }
    }

    /// Add one tank's worth of oxygen
    pub fn refill(&mut self) {
        self.level += self.refill_amount;
        self.clamp();
        if self.level > 0.0 {
            self.exhausted = false;
        }
    }

    /// Back to a full meter
    pub fn reset(&mut self) {
        self.level = 1.0;
        self.exhausted = false;
    }

    fn clamp(&mut self) {
        self.level = self.level.clamp(0.0, 1.0);
    }
}
