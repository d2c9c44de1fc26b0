//! Jump state machine and jump arc
//!
//! A jump moves the character from one slot to a neighbouring slot. The arc is driven by
//! a virtual timeline of scheduled displacement events that mirrors the jump clip's own
//! timeline: a rise phase of 8 events followed by a fall phase of 12, then completion.
//!
//! Phases cycle `Ended -> ShouldStart -> WillStart -> Ended`. Input is only accepted in
//! `Ended`.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::slot::{JumpDirection, Platforms, Slot};
use crate::consts::{JUMP_FALL_EVENTS, JUMP_FALL_FIRST_FRAME, JUMP_RISE_EVENTS, JUMP_RISE_FIRST_FRAME};
use crate::tuning::Tuning;

/// Jump state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpPhase {
    /// Idle on a platform, accepting input
    #[default]
    Ended,
    /// Input accepted, jump starts on the next update
    ShouldStart,
    /// Jump in flight
    WillStart,
}

/// Everything about a jump that is fixed at launch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpDescriptor {
    pub direction: JumpDirection,
    pub from: Slot,
    pub to: Slot,
    /// +1 toward Right, -1 toward Left
    pub sign: f32,
    /// Destination offset minus source offset
    pub height: f32,
}

impl JumpDescriptor {
    /// Resolve a jump request. `None` when the direction leads nowhere from `from`.
    pub fn resolve(from: Slot, direction: JumpDirection, platforms: &Platforms) -> Option<Self> {
        let to = from.neighbor(direction)?;
        Some(Self {
            direction,
            from,
            to,
            sign: direction.sign(),
            height: platforms.offset(to) - platforms.offset(from),
        })
    }
}

/// Which half of the arc an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcStage {
    Rise,
    Fall,
}

impl ArcStage {
    #[inline]
    pub fn event_count(self) -> u32 {
        match self {
            ArcStage::Rise => JUMP_RISE_EVENTS,
            ArcStage::Fall => JUMP_FALL_EVENTS,
        }
    }
}

/// A displacement callback scheduled on the jump timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Virtual frame (since jump start) at which the event fires
    pub key_frame: u32,
    pub stage: ArcStage,
    /// 1-based position within its stage
    pub step: u32,
}

/// Events fired by one timeline advance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineAdvance {
    pub fired: Vec<TimelineEvent>,
    pub completed: bool,
}

/// Virtual timeline of one jump clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpTimeline {
    events: Vec<TimelineEvent>,
    cursor: usize,
    elapsed: u32,
    duration: u32,
    completed: bool,
}

impl JumpTimeline {
    /// Timeline with the standard rise/fall events and completion at `duration` frames
    pub fn new(duration: u32) -> Self {
        let rise = (1..=JUMP_RISE_EVENTS).map(|step| TimelineEvent {
            key_frame: JUMP_RISE_FIRST_FRAME + step - 1,
            stage: ArcStage::Rise,
            step,
        });
        let fall = (1..=JUMP_FALL_EVENTS).map(|step| TimelineEvent {
            key_frame: JUMP_FALL_FIRST_FRAME + step - 1,
            stage: ArcStage::Fall,
            step,
        });
        let last_event = JUMP_FALL_FIRST_FRAME + JUMP_FALL_EVENTS - 1;

        Self {
            events: rise.chain(fall).collect(),
            cursor: 0,
            elapsed: 0,
            duration: duration.max(last_event),
            completed: false,
        }
    }

    #[inline]
    pub fn elapsed_frames(&self) -> u32 {
        self.elapsed
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Move the playhead forward, firing every event whose key frame has been reached.
    /// Completion is reported once, after the last event.
    pub fn advance(&mut self, frames: u32) -> TimelineAdvance {
        if self.completed {
            return TimelineAdvance::default();
        }
        self.elapsed = self.elapsed.saturating_add(frames);

        let mut fired = Vec::new();
        while let Some(event) = self.events.get(self.cursor) {
            if event.key_frame > self.elapsed {
                break;
            }
            fired.push(*event);
            self.cursor += 1;
        }

        let completed = self.elapsed >= self.duration && self.cursor == self.events.len();
        self.completed = completed;
        TimelineAdvance { fired, completed }
    }
}

/// Displacement curve of one jump.
///
/// The rise phase covers `rise_lateral` and `hop + height/2`; the fall phase covers
/// the remaining lateral distance and `height/2 - hop`, so the net vertical change is
/// exactly `height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpArc {
    rise_end: Vec2,
    end: Vec2,
    /// Displacement applied so far (x = lateral, y = vertical)
    applied: Vec2,
}

impl JumpArc {
    pub fn new(descriptor: &JumpDescriptor, tuning: &Tuning) -> Self {
        let rise_end = Vec2::new(
            tuning.jump_rise_lateral * descriptor.sign,
            tuning.jump_hop + descriptor.height / 2.0,
        );
        let end = Vec2::new(
            (tuning.jump_rise_lateral + tuning.jump_fall_lateral) * descriptor.sign,
            descriptor.height,
        );
        Self {
            rise_end,
            end,
            applied: Vec2::ZERO,
        }
    }

    /// Total displacement applied so far (x = lateral, y = vertical)
    pub fn applied(&self) -> Vec2 {
        self.applied
    }

    /// Cumulative displacement once `event` has fired
    fn target(&self, event: &TimelineEvent) -> Vec2 {
        let count = event.stage.event_count();
        match event.stage {
            ArcStage::Rise if event.step >= count => self.rise_end,
            ArcStage::Rise => self.rise_end * (event.step as f32 / count as f32),
            ArcStage::Fall if event.step >= count => self.end,
            ArcStage::Fall => {
                self.rise_end + (self.end - self.rise_end) * (event.step as f32 / count as f32)
            }
        }
    }

    /// Apply one event and return the world-space delta (lateral on z, vertical on y).
    /// The last event of each stage applies the exact remainder.
    pub fn apply(&mut self, event: &TimelineEvent) -> Vec3 {
        let target = self.target(event);
        let delta = target - self.applied;
        self.applied = target;
        Vec3::new(0.0, delta.y, delta.x)
    }
}

/// A jump in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveJump {
    pub descriptor: JumpDescriptor,
    pub timeline: JumpTimeline,
    pub arc: JumpArc,
    /// Character displacement at launch
    pub origin: Vec3,
}

/// The character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Slot the character stands on (unchanged until a jump lands)
    pub slot: Slot,
    /// Displacement from the character's home position in the scene
    pub position: Vec3,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            slot: Slot::Center,
            position: Vec3::ZERO,
        }
    }
}

/// Result of one jump update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpUpdate {
    /// Nothing happening
    Idle,
    /// A request resolved to no jump
    NoOp,
    /// A jump started this frame
    Launched(JumpDescriptor),
    /// Jump still in flight
    InFlight,
    /// Jump finished; the character now stands on the slot
    Landed(Slot),
}

/// Jump state machine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Jump {
    phase: JumpPhase,
    requested: JumpDirection,
    active: Option<ActiveJump>,
}

impl Jump {
    #[inline]
    pub fn phase(&self) -> JumpPhase {
        self.phase
    }

    pub fn active(&self) -> Option<&ActiveJump> {
        self.active.as_ref()
    }

    /// True from the moment a request is accepted until landing
    pub fn is_pending(&self) -> bool {
        self.phase != JumpPhase::Ended
    }

    /// Destination slot and elapsed virtual frames of the jump in flight
    pub fn in_flight(&self) -> Option<(Slot, u32)> {
        self.active
            .as_ref()
            .map(|jump| (jump.descriptor.to, jump.timeline.elapsed_frames()))
    }

    /// Ask for a jump. Ignored unless idle.
    pub fn request(&mut self, direction: JumpDirection) -> bool {
        if self.phase != JumpPhase::Ended || direction == JumpDirection::None {
            return false;
        }
        self.requested = direction;
        self.phase = JumpPhase::ShouldStart;
        true
    }

    /// Drop any jump and go back to idle
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance the state machine by `frames` virtual frames
    pub fn update(
        &mut self,
        character: &mut Character,
        platforms: &Platforms,
        frames: u32,
        tuning: &Tuning,
    ) -> JumpUpdate {
        match self.phase {
            JumpPhase::Ended => JumpUpdate::Idle,
            JumpPhase::ShouldStart => self.launch(character, platforms, tuning),
            JumpPhase::WillStart => self.fly(character, frames),
        }
    }

    fn launch(&mut self, character: &Character, platforms: &Platforms, tuning: &Tuning) -> JumpUpdate {
        self.phase = JumpPhase::WillStart;
        let direction = std::mem::take(&mut self.requested);

        let Some(descriptor) = JumpDescriptor::resolve(character.slot, direction, platforms) else {
            log::debug!("Jump {:?} from {} goes nowhere", direction, character.slot.as_str());
            self.phase = JumpPhase::Ended;
            return JumpUpdate::NoOp;
        };

        log::info!(
            "Jump {} -> {} (height {:.3})",
            descriptor.from.as_str(),
            descriptor.to.as_str(),
            descriptor.height
        );
        self.active = Some(ActiveJump {
            descriptor,
            timeline: JumpTimeline::new(tuning.jump_clip_frames),
            arc: JumpArc::new(&descriptor, tuning),
            origin: character.position,
        });
        JumpUpdate::Launched(descriptor)
    }

    fn fly(&mut self, character: &mut Character, frames: u32) -> JumpUpdate {
        let Some(jump) = self.active.as_mut() else {
            self.phase = JumpPhase::Ended;
            return JumpUpdate::Idle;
        };

        let step = jump.timeline.advance(frames);
        for event in &step.fired {
            jump.arc.apply(event);
        }
        let applied = jump.arc.applied();
        character.position = jump.origin + Vec3::new(0.0, applied.y, applied.x);

        if !step.completed {
            return JumpUpdate::InFlight;
        }

        let to = jump.descriptor.to;
        character.slot = to;
        self.active = None;
        self.phase = JumpPhase::Ended;
        log::info!("Landed on {}", to.as_str());
        JumpUpdate::Landed(to)
    }
}
