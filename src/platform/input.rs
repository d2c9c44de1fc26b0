//! Tap input mapping

use crate::sim::JumpDirection;

/// Map a tap's horizontal screen coordinate to a jump direction.
///
/// The camera looks down the world's negative lateral axis, so the right half of the
/// screen is the character's left.
pub fn tap_direction(x: f32, viewport_width: f32) -> JumpDirection {
    if x > viewport_width / 2.0 {
        JumpDirection::Left
    } else {
        JumpDirection::Right
    }
}
