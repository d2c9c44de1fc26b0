//! Platform slots and their sink offsets
//!
//! Three platforms sit side by side over the lava. The lateral axis runs Left -> Right
//! (negative -> positive), and each platform tracks how far it has sunk below its
//! resting height.

use serde::{Deserialize, Serialize};

/// One of the three discrete platform positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Left,
    Center,
    Right,
}

impl Slot {
    /// All slots in lateral order
    pub const ALL: [Slot; 3] = [Slot::Left, Slot::Center, Slot::Right];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Slot::Left => 0,
            Slot::Center => 1,
            Slot::Right => 2,
        }
    }

    /// Slot reached by jumping in `direction`, if any.
    ///
    /// End slots only connect to the center; there are no end-to-end jumps.
    pub fn neighbor(self, direction: JumpDirection) -> Option<Slot> {
        match (self, direction) {
            (Slot::Left, JumpDirection::Right) => Some(Slot::Center),
            (Slot::Right, JumpDirection::Left) => Some(Slot::Center),
            (Slot::Center, JumpDirection::Left) => Some(Slot::Left),
            (Slot::Center, JumpDirection::Right) => Some(Slot::Right),
            _ => None,
        }
    }

    /// The two slots other than `self`, in lateral order
    pub fn others(self) -> [Slot; 2] {
        match self {
            Slot::Left => [Slot::Center, Slot::Right],
            Slot::Center => [Slot::Left, Slot::Right],
            Slot::Right => [Slot::Left, Slot::Center],
        }
    }

    /// Lateral position of the slot relative to the center platform
    #[inline]
    pub fn lateral(self, spacing: f32) -> f32 {
        match self {
            Slot::Left => -spacing,
            Slot::Center => 0.0,
            Slot::Right => spacing,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Left => "left",
            Slot::Center => "center",
            Slot::Right => "right",
        }
    }
}

/// Requested jump direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpDirection {
    Left,
    Right,
    #[default]
    None,
}

impl JumpDirection {
    /// Sign of the lateral displacement (+1 right, -1 left, 0 none)
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            JumpDirection::Left => -1.0,
            JumpDirection::Right => 1.0,
            JumpDirection::None => 0.0,
        }
    }
}

/// Vertical offsets of the three platforms (<= 0, 0 = resting height)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Platforms {
    offsets: [f32; 3],
}

impl Platforms {
    #[inline]
    pub fn offset(&self, slot: Slot) -> f32 {
        self.offsets[slot.index()]
    }

    /// Set a platform's offset, clamped so it never rises above resting height
    pub fn set_offset(&mut self, slot: Slot, offset: f32) {
        self.offsets[slot.index()] = offset.min(0.0);
    }

    /// Lower a platform by `amount`
    pub fn sink(&mut self, slot: Slot, amount: f32) {
        let offset = self.offset(slot) - amount.max(0.0);
        self.set_offset(slot, offset);
    }

    /// Raise a platform toward resting height by at most `amount`.
    /// Returns how far it actually moved.
    pub fn recover(&mut self, slot: Slot, amount: f32) -> f32 {
        let before = self.offset(slot);
        if before >= 0.0 {
            self.offsets[slot.index()] = 0.0;
            return 0.0;
        }
        self.set_offset(slot, before + amount.max(0.0));
        self.offset(slot) - before
    }

    /// Put every platform back at resting height
    pub fn reset(&mut self) {
        self.offsets = [0.0; 3];
    }
}
