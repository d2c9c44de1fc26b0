//! Variable-delta frame clock
//!
//! The display calls back once per frame with an absolute timestamp. Rate-based updates
//! are scaled by a whole number of "virtual frames" so gameplay runs at the same speed
//! regardless of the actual frame cadence.

use crate::consts::VIRTUAL_FRAME_SECS;

/// Elapsed time for one update
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameDelta {
    /// Real seconds since the previous update
    pub real_dt: f64,
    /// `floor(real_dt / (1/60))`
    pub virtual_frames: u32,
}

impl FrameDelta {
    /// Delta covering `real_dt` seconds
    pub fn from_secs(real_dt: f64) -> Self {
        let real_dt = real_dt.max(0.0);
        Self {
            real_dt,
            virtual_frames: (real_dt / VIRTUAL_FRAME_SECS).floor() as u32,
        }
    }

    /// Delta of exactly `frames` virtual frames
    pub fn frames(frames: u32) -> Self {
        Self {
            real_dt: frames as f64 * VIRTUAL_FRAME_SECS,
            virtual_frames: frames,
        }
    }
}

/// Converts absolute frame timestamps into [`FrameDelta`]s
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    previous: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `now` (seconds). The first sample after a reset yields a zero delta.
    pub fn advance(&mut self, now: f64) -> FrameDelta {
        let previous = self.previous.replace(now).unwrap_or(now);
        FrameDelta::from_secs(now - previous)
    }

    /// Forget the previous timestamp so the next sample starts fresh
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(12.5), FrameDelta::default());
    }

    #[test]
    fn test_virtual_frames_floor() {
        let mut clock = FrameClock::new();
        clock.advance(1.0);
        assert_eq!(clock.advance(1.0 + 1.0 / 30.0 + 1e-6).virtual_frames, 2);
        // Slightly under one reference frame rounds down to zero
        assert_eq!(clock.advance(1.0 + 1.0 / 30.0 + 0.016).virtual_frames, 0);
    }

    #[test]
    fn test_reset_drops_gap() {
        let mut clock = FrameClock::new();
        clock.advance(1.0);
        clock.reset();
        assert_eq!(clock.advance(100.0).virtual_frames, 0);
    }

    #[test]
    fn test_backwards_time_is_clamped() {
        assert_eq!(FrameDelta::from_secs(-0.5), FrameDelta::default());
    }
}
