//! Session state and core simulation types
//!
//! [`GameState`] is the single owner of everything the per-frame update mutates. Outward
//! effects (haptics, audio, animation, overlay changes) are queued as [`GameEvent`]s and
//! drained by whoever drives the simulation.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::jump::{Character, Jump};
use super::oxygen::OxygenMeter;
use super::sink::SinkController;
use super::slot::{JumpDirection, Platforms};
use super::tank::{Tank, choose_spawn_slot};
use crate::tuning::Tuning;

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Splash screen shown, a tap starts the run
    #[default]
    WillStart,
    /// Run in progress
    Started,
    /// Run frozen
    Paused,
    /// Summary screen shown, a tap goes back to the splash
    Ended,
}

/// Why the last run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeathCause {
    #[default]
    None,
    Lava,
    Oxygen,
}

/// Classified contact-begin event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Character touched the oxygen tank
    OxygenPickup,
    /// Anything else: the character hit the lava
    Hazard,
}

/// Haptic pulse intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticStrength {
    Medium,
    Heavy,
}

/// One-shot or looping audio cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Volcano ambience loop
    Ambience,
    /// Tank collected
    Collect,
    /// Random steam burst
    SteamBurst,
    /// Run lost
    Death,
}

/// Character animation clips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationClip {
    Idle,
    JumpLeft,
    JumpRight,
}

impl AnimationClip {
    /// Clip played for a jump in `direction`
    pub fn for_jump(direction: JumpDirection) -> Option<Self> {
        match direction {
            JumpDirection::Left => Some(AnimationClip::JumpLeft),
            JumpDirection::Right => Some(AnimationClip::JumpRight),
            JumpDirection::None => None,
        }
    }
}

/// Overlay scene to present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayScene {
    /// Welcome + logo + tap to continue
    Splash,
    /// In-run oxygen gauge
    Hud,
    /// End-of-run summary
    Summary(DeathCause),
}

/// Side effects requested by the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Haptic(HapticStrength),
    Sound(SoundCue),
    PlayAnimation(AnimationClip),
    StopAnimation { clip: AnimationClip, blend_out: f32 },
    /// Tank placed; fade in and start spinning
    TankSpawned,
    /// Tank picked up; fade out
    TankCollected,
    /// Show or hide platforms, character and tank
    GameplayVisible(bool),
    ShowOverlay(OverlayScene),
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: SessionPhase,
    pub death_cause: DeathCause,
    /// Virtual frames simulated in the current run
    pub time_frames: u64,
    pub platforms: Platforms,
    pub character: Character,
    pub jump: Jump,
    pub sink: SinkController,
    pub oxygen: OxygenMeter,
    pub tank: Tank,
    /// Frames since the last steam burst
    pub steam_frames: u32,
    /// Frames until the next steam burst
    pub steam_threshold: u32,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
    ambience_started: bool,
}

impl GameState {
    /// New session on the splash screen
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let oxygen = OxygenMeter::new(
            tuning.oxygen_decay_per_frame,
            tuning.oxygen_refill,
            tuning.low_oxygen_threshold,
        );
        let mut state = Self {
            seed,
            phase: SessionPhase::WillStart,
            death_cause: DeathCause::None,
            time_frames: 0,
            platforms: Platforms::default(),
            character: Character::default(),
            jump: Jump::default(),
            sink: SinkController::default(),
            oxygen,
            tank: Tank::default(),
            steam_frames: 0,
            steam_threshold: tuning.steam_burst_base_frames,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            ambience_started: false,
            tuning,
        };
        state.show_splash();
        state
    }

    /// Queue a side effect
    #[inline]
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every queued side effect
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Peek at queued side effects
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// A tap, already mapped to a jump direction by the input layer
    pub fn handle_tap(&mut self, direction: JumpDirection) {
        match self.phase {
            SessionPhase::WillStart => self.start_run(),
            SessionPhase::Ended => self.back_to_splash(),
            SessionPhase::Paused => self.resume(),
            SessionPhase::Started => {
                self.jump.request(direction);
            }
        }
    }

    /// React to a classified contact-begin event
    pub fn handle_contact(&mut self, contact: ContactKind) {
        if self.phase != SessionPhase::Started {
            return;
        }
        match contact {
            ContactKind::OxygenPickup => self.collect_tank(),
            ContactKind::Hazard => self.end_session(DeathCause::Lava),
        }
    }

    /// Reset the world and begin a run
    pub fn start_run(&mut self) {
        self.platforms.reset();
        self.character = Character::default();
        self.jump.reset();
        self.oxygen.reset();
        self.sink.arm(self.tuning.sink_debounce_secs);
        self.death_cause = DeathCause::None;
        self.time_frames = 0;
        self.reset_steam();

        self.phase = SessionPhase::Started;
        log::info!("Run started (seed {})", self.seed);

        self.emit(GameEvent::GameplayVisible(true));
        self.emit(GameEvent::PlayAnimation(AnimationClip::Idle));
        self.emit(GameEvent::ShowOverlay(OverlayScene::Hud));
        self.spawn_tank();
    }

    /// End the run. Only the first call per run has any effect.
    pub fn end_session(&mut self, cause: DeathCause) {
        if self.phase != SessionPhase::Started {
            return;
        }
        self.phase = SessionPhase::Ended;
        self.death_cause = cause;
        self.jump.reset();
        self.sink.cancel();
        self.tank.hide();
        self.oxygen.reset();
        self.reset_steam();
        log::info!(
            "Run ended: {:?} after {} frames",
            cause,
            self.time_frames
        );

        self.emit(GameEvent::GameplayVisible(false));
        self.emit(GameEvent::Sound(SoundCue::Death));
        self.emit(GameEvent::ShowOverlay(OverlayScene::Summary(cause)));
    }

    /// Freeze a running session
    pub fn pause(&mut self) {
        if self.phase == SessionPhase::Started {
            self.phase = SessionPhase::Paused;
            log::info!("Paused");
        }
    }

    /// Continue a paused session
    pub fn resume(&mut self) {
        if self.phase == SessionPhase::Paused {
            self.phase = SessionPhase::Started;
            log::info!("Resumed");
        }
    }

    /// Place a new tank on one of the slots the character is not standing on
    pub fn spawn_tank(&mut self) {
        let slot = choose_spawn_slot(self.character.slot, &self.platforms, &mut self.rng);
        let offset = self.platforms.offset(slot);
        self.tank.spawn(slot, offset, self.tuning.tank_hover_height);
        log::info!("Tank spawned on {}", slot.as_str());
        self.emit(GameEvent::TankSpawned);
    }

    fn collect_tank(&mut self) {
        if !self.tank.collect() {
            return;
        }
        self.oxygen.refill();
        log::info!("Tank collected, oxygen {:.2}", self.oxygen.level());
        self.emit(GameEvent::TankCollected);
        self.emit(GameEvent::Sound(SoundCue::Collect));
    }

    fn back_to_splash(&mut self) {
        self.phase = SessionPhase::WillStart;
        self.platforms.reset();
        self.character = Character::default();
        self.show_splash();
    }

    fn show_splash(&mut self) {
        self.emit(GameEvent::ShowOverlay(OverlayScene::Splash));
        self.emit(GameEvent::GameplayVisible(false));
        if !self.ambience_started {
            self.ambience_started = true;
            self.emit(GameEvent::Sound(SoundCue::Ambience));
        }
    }

    pub(crate) fn reset_steam(&mut self) {
        use rand::Rng;

        self.steam_frames = 0;
        let jitter = self.tuning.steam_burst_jitter_frames;
        self.steam_threshold = self
            .tuning
            .steam_burst_base_frames
            .saturating_add(self.rng.random_range(0..=jitter));
    }
}
