//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time enters only as a [`FrameDelta`]
//! - Seeded RNG only
//! - No scene engine, audio or overlay calls; side effects are queued as [`GameEvent`]s

pub mod clock;
pub mod jump;
pub mod oxygen;
pub mod sink;
pub mod slot;
pub mod state;
pub mod tank;
pub mod tick;

pub use clock::{FrameClock, FrameDelta};
pub use jump::{ActiveJump, Character, Jump, JumpDescriptor, JumpPhase, JumpTimeline, JumpUpdate};
pub use oxygen::OxygenMeter;
pub use sink::{DebounceTimer, SinkController, SinkStatus};
pub use slot::{JumpDirection, Platforms, Slot};
pub use state::{
    AnimationClip, ContactKind, DeathCause, GameEvent, GameState, HapticStrength, OverlayScene,
    SessionPhase, SoundCue,
};
pub use tank::{Tank, choose_spawn_slot};
pub use tick::{TickInput, tick};
