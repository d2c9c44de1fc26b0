//! Per-frame simulation tick
//!
//! Each component gets its own update function; `tick` composes them in a fixed order:
//! jump, tank, oxygen, platforms, ambience.

use super::clock::FrameDelta;
use super::jump::JumpUpdate;
use super::slot::JumpDirection;
use super::state::{
    AnimationClip, ContactKind, DeathCause, GameEvent, GameState, HapticStrength, SessionPhase,
    SoundCue,
};
use crate::consts::IDLE_BLEND_OUT_SECS;

/// Input gathered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap, already mapped to a jump direction
    pub tap: Option<JumpDirection>,
    /// Contact-begin events, already classified
    pub contacts: Vec<ContactKind>,
}

/// Advance the session by one display frame
pub fn tick(state: &mut GameState, input: &TickInput, delta: FrameDelta) {
    let was_running = state.phase == SessionPhase::Started;
    for contact in &input.contacts {
        state.handle_contact(*contact);
    }
    // A contact that ended the run swallows this frame's tap
    if state.phase == SessionPhase::Ended && was_running {
        return;
    }

    if let Some(direction) = input.tap {
        state.handle_tap(direction);
        // Session transitions consume the frame
        if !was_running {
            return;
        }
    }

    if state.phase != SessionPhase::Started {
        return;
    }
    state.time_frames += delta.virtual_frames as u64;

    update_jump(state, delta);
    update_tank(state, delta);
    if !update_oxygen(state, delta) {
        return;
    }
    update_platforms(state, delta);
    update_steam(state, delta);
}

/// Launch, fly and land the character
pub fn update_jump(state: &mut GameState, delta: FrameDelta) {
    let outcome = state.jump.update(
        &mut state.character,
        &state.platforms,
        delta.virtual_frames,
        &state.tuning,
    );

    match outcome {
        JumpUpdate::Launched(descriptor) => {
            state.sink.cancel();
            state.emit(GameEvent::Haptic(HapticStrength::Medium));
            state.emit(GameEvent::StopAnimation {
                clip: AnimationClip::Idle,
                blend_out: IDLE_BLEND_OUT_SECS,
            });
            if let Some(clip) = AnimationClip::for_jump(descriptor.direction) {
                state.emit(GameEvent::PlayAnimation(clip));
            }
        }
        JumpUpdate::NoOp => {
            state.sink.arm(state.tuning.sink_debounce_secs);
        }
        JumpUpdate::Landed(_) => {
            state.sink.arm(state.tuning.sink_debounce_secs);
            state.emit(GameEvent::PlayAnimation(AnimationClip::Idle));
        }
        JumpUpdate::Idle | JumpUpdate::InFlight => {}
    }
}

/// Count down to the next tank while none is showing
pub fn update_tank(state: &mut GameState, delta: FrameDelta) {
    // Spawning mid-jump could drop the tank on the landing platform
    if state.jump.is_pending() {
        return;
    }
    let respawn = state.tuning.tank_respawn_frames;
    if state.tank.count_hidden(delta.virtual_frames, respawn) {
        state.spawn_tank();
    }
}

/// Drain oxygen. Returns false if the run ended.
pub fn update_oxygen(state: &mut GameState, delta: FrameDelta) -> bool {
    let status = state.oxygen.decay(delta.virtual_frames);
    if status.low {
        state.emit(GameEvent::Haptic(HapticStrength::Heavy));
    }
    if status.exhausted {
        state.end_session(DeathCause::Oxygen);
        return false;
    }
    true
}

/// Sink the occupied platform and recover the others
pub fn update_platforms(state: &mut GameState, delta: FrameDelta) {
    state.sink.update(
        &mut state.platforms,
        &mut state.character,
        &mut state.tank,
        &state.jump,
        delta,
        &state.tuning,
    );
}

/// Occasional steam bursts from the lava
pub fn update_steam(state: &mut GameState, delta: FrameDelta) {
    state.steam_frames = state.steam_frames.saturating_add(delta.virtual_frames);
    if state.steam_frames > state.steam_threshold {
        state.reset_steam();
        state.emit(GameEvent::Sound(SoundCue::SteamBurst));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::jump::JumpPhase;
    use crate::sim::slot::Slot;
    use crate::sim::state::OverlayScene;
    use crate::tuning::Tuning;

    fn one_frame() -> FrameDelta {
        FrameDelta::frames(1)
    }

    fn started(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        let input = TickInput {
            tap: Some(JumpDirection::Left),
            ..Default::default()
        };
        tick(&mut state, &input, one_frame());
        assert_eq!(state.phase, SessionPhase::Started);
        state.drain_events();
        state
    }

    fn tap(direction: JumpDirection) -> TickInput {
        TickInput {
            tap: Some(direction),
            ..Default::default()
        }
    }

    #[test]
    fn test_nothing_moves_before_start() {
        let mut state = GameState::new(5, Tuning::default());
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), one_frame());
        }
        assert_eq!(state.phase, SessionPhase::WillStart);
        assert_eq!(state.oxygen.level(), 1.0);
        assert_eq!(state.time_frames, 0);
    }

    #[test]
    fn test_oxygen_runs_out_after_667_frames() {
        let mut state = started(1);
        for _ in 0..666 {
            tick(&mut state, &TickInput::default(), one_frame());
            assert_eq!(state.phase, SessionPhase::Started);
        }
        tick(&mut state, &TickInput::default(), one_frame());
        assert_eq!(state.phase, SessionPhase::Ended);
        assert_eq!(state.death_cause, DeathCause::Oxygen);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ShowOverlay(OverlayScene::Summary(DeathCause::Oxygen))));
        assert!(events.contains(&GameEvent::Haptic(HapticStrength::Heavy)));
    }

    #[test]
    fn test_jump_left_lands_on_completion() {
        let mut state = started(2);
        tick(&mut state, &tap(JumpDirection::Left), one_frame());
        assert_eq!(state.jump.phase(), JumpPhase::WillStart);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Haptic(HapticStrength::Medium)));
        assert!(events.contains(&GameEvent::PlayAnimation(AnimationClip::JumpLeft)));

        let clip = state.tuning.jump_clip_frames;
        for _ in 0..clip - 1 {
            tick(&mut state, &TickInput::default(), one_frame());
            assert_eq!(state.character.slot, Slot::Center);
        }
        tick(&mut state, &TickInput::default(), one_frame());
        assert_eq!(state.character.slot, Slot::Left);
        assert_eq!(state.jump.phase(), JumpPhase::Ended);
        assert!(state.drain_events().contains(&GameEvent::PlayAnimation(AnimationClip::Idle)));
        assert!(state.sink.timer().is_armed());
    }

    #[test]
    fn test_taps_ignored_mid_jump() {
        let mut state = started(3);
        tick(&mut state, &tap(JumpDirection::Right), one_frame());
        for _ in 0..5 {
            tick(&mut state, &tap(JumpDirection::Left), one_frame());
        }
        let active = state.jump.active().unwrap();
        assert_eq!(active.descriptor.to, Slot::Right);
    }

    #[test]
    fn test_noop_jump_rearms_sink() {
        let mut state = started(4);
        // Walk to the left end first
        tick(&mut state, &tap(JumpDirection::Left), one_frame());
        for _ in 0..state.tuning.jump_clip_frames {
            tick(&mut state, &TickInput::default(), one_frame());
        }
        assert_eq!(state.character.slot, Slot::Left);

        tick(&mut state, &tap(JumpDirection::Left), one_frame());
        assert_eq!(state.jump.phase(), JumpPhase::Ended);
        assert_eq!(state.character.slot, Slot::Left);
        assert!(state.sink.timer().is_armed());
    }

    #[test]
    fn test_jump_cancels_sinking() {
        let mut state = started(5);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), one_frame());
        }
        let sunk = state.platforms.offset(Slot::Center);
        assert!(sunk < 0.0);

        tick(&mut state, &tap(JumpDirection::Right), one_frame());
        tick(&mut state, &TickInput::default(), one_frame());
        assert_eq!(state.platforms.offset(Slot::Center), sunk);
    }

    #[test]
    fn test_hazard_ends_regardless_of_oxygen() {
        let mut state = started(6);
        let input = TickInput {
            contacts: vec![ContactKind::Hazard],
            ..Default::default()
        };
        tick(&mut state, &input, one_frame());
        assert_eq!(state.phase, SessionPhase::Ended);
        assert_eq!(state.death_cause, DeathCause::Lava);
    }

    #[test]
    fn test_tank_respawns_after_181_frames() {
        let mut state = started(7);
        let input = TickInput {
            contacts: vec![ContactKind::OxygenPickup],
            ..Default::default()
        };
        tick(&mut state, &input, FrameDelta::default());
        assert!(!state.tank.visible);
        state.drain_events();

        let mut spawned_at = Vec::new();
        for frame in 1..=200 {
            tick(&mut state, &TickInput::default(), one_frame());
            let spawns = state
                .drain_events()
                .into_iter()
                .filter(|e| *e == GameEvent::TankSpawned)
                .count();
            if spawns > 0 {
                spawned_at.push((frame, spawns));
            }
        }
        assert_eq!(spawned_at, vec![(181, 1)]);
        assert!(state.tank.visible);
        assert_ne!(state.tank.slot, state.character.slot);
    }

    #[test]
    fn test_character_follows_sinking_platform() {
        let mut state = started(8);
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), one_frame());
        }
        let offset = state.platforms.offset(Slot::Center);
        assert!(offset < 0.0);
        assert!((state.character.position.y - offset).abs() < 1e-5);
    }

    #[test]
    fn test_steam_bursts_play() {
        let mut state = started(9);
        state.oxygen = crate::sim::OxygenMeter::new(0.0, 1.0, 0.2);
        let mut bursts = 0;
        for _ in 0..2700 {
            tick(&mut state, &TickInput::default(), one_frame());
            bursts += state
                .drain_events()
                .into_iter()
                .filter(|e| *e == GameEvent::Sound(SoundCue::SteamBurst))
                .count();
        }
        assert_eq!(bursts, 2);
    }

    #[test]
    fn test_tap_with_lava_contact_keeps_summary() {
        let mut state = started(8);
        let input = TickInput {
            tap: Some(JumpDirection::Left),
            contacts: vec![ContactKind::Hazard],
        };
        tick(&mut state, &input, one_frame());

        assert_eq!(state.phase, SessionPhase::Ended);
        assert_eq!(state.death_cause, DeathCause::Lava);
        let events = state.drain_events();
        assert_eq!(
            events.last(),
            Some(&GameEvent::ShowOverlay(OverlayScene::Summary(DeathCause::Lava)))
        );
        assert!(!events.contains(&GameEvent::ShowOverlay(OverlayScene::Splash)));

        // The next tap goes back to the splash
        tick(&mut state, &tap(JumpDirection::Left), one_frame());
        assert_eq!(state.phase, SessionPhase::WillStart);
    }

    #[test]
    fn test_determinism() {
        let script = |state: &mut GameState| {
            for frame in 0..400u32 {
                let input = match frame % 90 {
                    0 => tap(JumpDirection::Left),
                    45 => tap(JumpDirection::Right),
                    _ => TickInput::default(),
                };
                tick(state, &input, FrameDelta::frames(1 + frame % 3));
            }
        };

        let mut a = started(99999);
        let mut b = started(99999);
        script(&mut a);
        script(&mut b);

        assert_eq!(a.phase, b.phase);
        assert_eq!(a.platforms, b.platforms);
        assert_eq!(a.character, b.character);
        assert_eq!(a.tank, b.tank);
        assert_eq!(a.oxygen.level(), b.oxygen.level());
    }
}
