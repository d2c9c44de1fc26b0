//! Platform sinking and recovery
//!
//! Shortly after the character lands, the platform under it starts sinking into the
//! lava and carries the character down with it. Platforms the character has left float
//! back up to resting height.

use serde::{Deserialize, Serialize};

use super::clock::FrameDelta;
use super::jump::{Character, Jump};
use super::slot::{Platforms, Slot};
use super::tank::Tank;
use crate::tuning::Tuning;

/// Single-shot wall-clock timer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebounceTimer {
    remaining: Option<f64>,
}

impl DebounceTimer {
    /// (Re)start the timer
    pub fn arm(&mut self, secs: f64) {
        self.remaining = Some(secs);
    }

    /// Cancel without firing
    pub fn invalidate(&mut self) {
        self.remaining = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    /// Run the timer for `dt` seconds. Returns true exactly once, when it fires.
    pub fn advance(&mut self, dt: f64) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };
        let remaining = remaining - dt;
        if remaining <= 0.0 {
            self.remaining = None;
            true
        } else {
            self.remaining = Some(remaining);
            false
        }
    }
}

/// Sinking state of the character's platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SinkStatus {
    /// Not sinking, no timer pending
    #[default]
    Idle,
    /// Debounce running; sinking starts when it fires
    Armed,
    /// Platform under the character is going down
    Sinking,
}

/// What the sink controller did this frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SinkUpdate {
    /// Sinking began this frame
    pub started: bool,
    /// How far the current platform sank
    pub sunk: f32,
}

/// Drives platform offsets each frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SinkController {
    status: SinkStatus,
    timer: DebounceTimer,
}

impl SinkController {
    #[inline]
    pub fn status(&self) -> SinkStatus {
        self.status
    }

    pub fn timer(&self) -> &DebounceTimer {
        &self.timer
    }

    /// Start the debounce before the current platform sinks
    pub fn arm(&mut self, delay_secs: f64) {
        self.timer.arm(delay_secs);
        self.status = SinkStatus::Armed;
    }

    /// Stop sinking and drop any pending timer
    pub fn cancel(&mut self) {
        self.timer.invalidate();
        self.status = SinkStatus::Idle;
    }

    /// Advance sinking and recovery by one frame
    pub fn update(
        &mut self,
        platforms: &mut Platforms,
        character: &mut Character,
        tank: &mut Tank,
        jump: &Jump,
        delta: FrameDelta,
        tuning: &Tuning,
    ) -> SinkUpdate {
        let mut update = SinkUpdate::default();

        if self.timer.advance(delta.real_dt) {
            // A jump may have been requested after the timer was armed
            if jump.is_pending() {
                self.status = SinkStatus::Idle;
            } else {
                log::debug!("Platform {} starts sinking", character.slot.as_str());
                self.status = SinkStatus::Sinking;
                update.started = true;
            }
        }

        if self.status == SinkStatus::Sinking && !jump.is_pending() {
            let slot = character.slot;
            let before = platforms.offset(slot);
            platforms.sink(slot, tuning.sink_step(delta.virtual_frames));
            let dy = platforms.offset(slot) - before;
            character.position.y += dy;
            tank.follow(slot, dy);
            update.sunk = -dy;
        }

        self.recover(platforms, character, tank, jump, delta.virtual_frames, tuning);
        update
    }

    /// Raise vacated platforms toward resting height
    fn recover(
        &self,
        platforms: &mut Platforms,
        character: &Character,
        tank: &mut Tank,
        jump: &Jump,
        frames: u32,
        tuning: &Tuning,
    ) {
        let held = match jump.in_flight() {
            // Nothing recovers early in the jump, and the landing platform stays put
            Some((_, elapsed)) if elapsed < tuning.jump_recovery_hold_frames => return,
            Some((destination, _)) => destination,
            None if jump.is_pending() => return,
            None => character.slot,
        };

        let step = tuning.recovery_step(frames);
        for slot in Slot::ALL.into_iter().filter(|&slot| slot != held) {
            let dy = platforms.recover(slot, step);
            tank.follow(slot, dy);
        }
    }
}
