//! Lava Rush - three sinking platforms, one lava pit, not enough oxygen
//!
//! Core modules:
//! - `sim`: Deterministic simulation (jumps, sinking platforms, oxygen, tank, session)
//! - `platform`: Scene engine boundary (typed node handles, input mapping, headless engine)
//! - `game`: Per-frame driver gluing the simulation to a scene engine
//! - `ui`: Overlay view models (oxygen gauge, splash/summary scenes)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod game;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game::Game;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Reference frame rate all rate-based updates are scaled to
    pub const REFERENCE_FPS: f64 = 60.0;
    /// Duration of one virtual frame in seconds
    pub const VIRTUAL_FRAME_SECS: f64 = 1.0 / REFERENCE_FPS;

    /// Oxygen lost per virtual frame
    pub const OXYGEN_DECAY_PER_FRAME: f64 = 0.0015;
    /// Oxygen restored per tank (above 1 so a pickup always saturates)
    pub const OXYGEN_REFILL: f64 = 1.05;
    /// At or below this level the low-oxygen haptic fires every frame
    pub const LOW_OXYGEN_THRESHOLD: f64 = 0.2;

    /// Platform sink speed (units per second at the reference rate)
    pub const SINK_SPEED: f32 = 0.3;
    /// Platform recovery speed (units per second at the reference rate)
    pub const RECOVERY_SPEED: f32 = 0.05;
    /// Wall-clock delay after landing before the platform starts sinking
    pub const SINK_DEBOUNCE_SECS: f64 = 0.5;
    /// Virtual frames into a jump before vacated platforms start recovering
    pub const JUMP_RECOVERY_HOLD_FRAMES: u32 = 30;

    /// Lateral distance between neighbouring platform slots
    pub const SLOT_SPACING: f32 = 2.5;

    /// Extra height added to the rise (and removed from the fall) of every jump
    pub const JUMP_HOP: f32 = 0.3;
    /// Lateral travel of the rise phase
    pub const JUMP_RISE_LATERAL: f32 = 0.9;
    /// Lateral travel of the fall phase
    pub const JUMP_FALL_LATERAL: f32 = 1.6;
    /// Rise phase events fire at frames `RISE_FIRST_FRAME..RISE_FIRST_FRAME + RISE_EVENTS`
    pub const JUMP_RISE_FIRST_FRAME: u32 = 8;
    pub const JUMP_RISE_EVENTS: u32 = 8;
    /// Fall phase events fire at frames `FALL_FIRST_FRAME..FALL_FIRST_FRAME + FALL_EVENTS`
    pub const JUMP_FALL_FIRST_FRAME: u32 = 16;
    pub const JUMP_FALL_EVENTS: u32 = 12;
    /// Length of the short-jump clips in virtual frames
    pub const JUMP_CLIP_FRAMES: u32 = 40;
    /// Idle animation blend-out when a jump starts
    pub const IDLE_BLEND_OUT_SECS: f32 = 0.1;

    /// Virtual frames with no tank visible before a new one spawns
    pub const TANK_RESPAWN_FRAMES: u32 = 180;
    /// Tank hovers this far above its platform
    pub const TANK_HOVER_HEIGHT: f32 = 0.7;
    pub const TANK_FADE_IN_SECS: f32 = 0.3;
    pub const TANK_FADE_OUT_SECS: f32 = 0.1;
    /// Tank spin: half a turn every two seconds
    pub const TANK_SPIN_RADIANS: f32 = std::f32::consts::PI;
    pub const TANK_SPIN_SECS: f32 = 2.0;

    /// Steam bursts play after this many frames plus a random jitter
    pub const STEAM_BURST_BASE_FRAMES: u32 = 1200;
    pub const STEAM_BURST_JITTER_FRAMES: u32 = 100;
}
