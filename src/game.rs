//! Per-frame driver
//!
//! Owns the session, the frame clock and the resolved scene handles. The host calls
//! [`Game::on_tap`] and [`Game::on_contact`] as input arrives and [`Game::on_frame`] once per
//! display frame; everything the simulation asks for is flushed to the engine at the end
//! of the frame.

use glam::Vec3;

use crate::platform::{
    HeadlessEngine, NodeAction, NodeId, NodeRole, SceneEngine, SceneError, SceneNodes, tap_direction,
};
use crate::settings::Settings;
use crate::sim::{FrameClock, GameEvent, GameState, SessionPhase, Slot, TickInput, tick};
use crate::tuning::Tuning;
use crate::ui::{Overlay, OxygenGauge};

/// Viewport width assumed until the host reports one
const DEFAULT_VIEWPORT_WIDTH: f32 = 375.0;

/// Game instance bound to a scene engine
pub struct Game<E: SceneEngine> {
    engine: E,
    nodes: SceneNodes,
    state: GameState,
    clock: FrameClock,
    settings: Settings,
    /// Scene positions of every node at setup; simulation offsets are relative to these
    anchors: [Vec3; NodeRole::COUNT],
    gauge: OxygenGauge,
    input: TickInput,
    viewport_width: f32,
}

impl<E: SceneEngine> Game<E> {
    /// Bind to the scene and show the splash. Fails if a required node is missing.
    pub fn new(engine: E, seed: u64, tuning: Tuning, settings: Settings) -> Result<Self, SceneError> {
        let nodes = SceneNodes::resolve(&engine)?;
        let anchors = NodeRole::ALL.map(|role| engine.position(nodes.get(role)));

        let mut game = Self {
            engine,
            nodes,
            state: GameState::new(seed, tuning),
            clock: FrameClock::new(),
            settings,
            anchors,
            gauge: OxygenGauge::new(),
            input: TickInput::default(),
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
        };

        let tank = game.nodes.get(NodeRole::Tank);
        let tuning = &game.state.tuning;
        let spin = NodeAction::Spin {
            radians: tuning.tank_spin_radians,
            secs: tuning.tank_spin_secs,
        };
        game.engine.run_action(tank, spin);

        game.flush_events();
        log::info!("Game initialized with seed: {}", seed);
        Ok(game)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn nodes(&self) -> &SceneNodes {
        &self.nodes
    }

    /// A tap at horizontal screen coordinate `x`. Applied on the next frame.
    pub fn on_tap(&mut self, x: f32, viewport_width: f32) {
        self.viewport_width = viewport_width;
        let direction = tap_direction(x, viewport_width);
        self.input.tap.get_or_insert(direction);
    }

    /// A contact-begin pair from the physics engine. Applied on the next frame.
    pub fn on_contact(&mut self, a: NodeId, b: NodeId) {
        let contact = self.nodes.classify_contact(a, b);
        self.input.contacts.push(contact);
    }

    /// Freeze the run (app backgrounded)
    pub fn pause(&mut self) {
        self.state.pause();
    }

    /// Continue a paused run without a catch-up delta
    pub fn resume(&mut self) {
        if self.state.phase == SessionPhase::Paused {
            self.state.resume();
            self.clock.reset();
        }
    }

    /// Run one display frame at absolute time `now` (seconds)
    pub fn on_frame(&mut self, now: f64) {
        let delta = self.clock.advance(now);
        let input = std::mem::take(&mut self.input);
        let was_paused = self.state.phase == SessionPhase::Paused;

        tick(&mut self.state, &input, delta);

        if was_paused && self.state.phase == SessionPhase::Started {
            self.clock.reset();
        }

        self.sync_nodes();
        self.flush_events();

        if self.state.phase == SessionPhase::Started {
            let reading = self.gauge.set_value(self.state.oxygen.level());
            self.engine.update_gauge(&reading);
        }
    }

    /// Move scene nodes to match the simulation
    fn sync_nodes(&mut self) {
        for slot in Slot::ALL {
            let role = NodeRole::platform(slot);
            let position = self.anchor(role) + Vec3::Y * self.state.platforms.offset(slot);
            self.engine.set_position(self.nodes.get(role), position);
        }

        let character = self.anchor(NodeRole::Character) + self.state.character.position;
        self.engine
            .set_position(self.nodes.get(NodeRole::Character), character);

        let tank = &self.state.tank;
        if tank.visible {
            let platform = self.anchor(NodeRole::platform(tank.slot));
            let position = platform + Vec3::Y * tank.height;
            self.engine.set_position(self.nodes.get(NodeRole::Tank), position);
        }
    }

    fn anchor(&self, role: NodeRole) -> Vec3 {
        self.anchors[role as usize]
    }

    /// Hand every queued side effect to the engine
    fn flush_events(&mut self) {
        for event in self.state.drain_events() {
            self.apply(event);
        }
    }

    fn apply(&mut self, event: GameEvent) {
        let tank = self.nodes.get(NodeRole::Tank);
        match event {
            GameEvent::Haptic(strength) => {
                if self.settings.haptics {
                    self.engine.haptic(strength);
                }
            }
            GameEvent::Sound(cue) => {
                let volume = self.settings.cue_volume(cue);
                self.engine.play_sound(cue, volume, cue.looping());
            }
            GameEvent::PlayAnimation(clip) => {
                self.engine.play_animation(clip);
                self.engine.set_animation_speed(clip, 1.0);
            }
            GameEvent::StopAnimation { clip, blend_out } => {
                self.engine.stop_animation(clip, blend_out);
            }
            GameEvent::TankSpawned => {
                self.sync_nodes();
                self.engine.set_hidden(tank, false);
                let secs = self.state.tuning.tank_fade_in_secs;
                self.engine.run_action(tank, NodeAction::FadeIn { secs });
            }
            GameEvent::TankCollected => {
                let secs = self.state.tuning.tank_fade_out_secs;
                self.engine.run_action(tank, NodeAction::FadeOut { secs });
                self.engine.set_hidden(tank, true);
            }
            GameEvent::GameplayVisible(visible) => {
                let character = self.nodes.get(NodeRole::Character);
                self.engine.set_hidden(character, !visible);
                for slot in Slot::ALL {
                    self.engine.set_hidden(self.nodes.platform(slot), !visible);
                }
                let tank_visible = visible && self.state.tank.visible;
                self.engine.set_hidden(tank, !tank_visible);
            }
            GameEvent::ShowOverlay(scene) => {
                self.gauge = OxygenGauge::new();
                let overlay = Overlay::for_scene(scene, self.viewport_width);
                self.engine.present_overlay(&overlay);
            }
        }
    }
}

impl Game<HeadlessEngine> {
    /// Feed the headless engine's contact-begin pairs into the next frame
    pub fn poll_contacts(&mut self) {
        for (a, b) in self.engine.detect_contacts() {
            self.on_contact(a, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::EngineCall;
    use crate::sim::{AnimationClip, DeathCause, HapticStrength, OverlayScene, SoundCue};

    /// Slightly slower than 60 Hz so every frame carries exactly one virtual frame
    const STEP: f64 = 0.017;
    const WIDTH: f32 = 400.0;

    struct Runner {
        game: Game<HeadlessEngine>,
        frame: u32,
    }

    impl Runner {
        fn new(seed: u64, settings: Settings) -> Self {
            let game = Game::new(HeadlessEngine::lava_rush(), seed, Tuning::default(), settings)
                .unwrap();
            Self { game, frame: 0 }
        }

        fn frame(&mut self) {
            self.game.poll_contacts();
            self.game.on_frame(self.frame as f64 * STEP);
            self.frame += 1;
        }

        fn frames(&mut self, n: u32) {
            for _ in 0..n {
                self.frame();
            }
        }

        /// Tap the half of the screen that jumps toward `slot`
        fn tap_toward(&mut self, slot: Slot) {
            let x = if slot == Slot::Left { 300.0 } else { 100.0 };
            self.game.on_tap(x, WIDTH);
        }

        fn started(seed: u64, settings: Settings) -> Self {
            let mut runner = Self::new(seed, settings);
            runner.frame();
            runner.game.on_tap(0.0, WIDTH);
            runner.frame();
            assert_eq!(runner.game.state().phase, SessionPhase::Started);
            runner.game.engine_mut().take_calls();
            runner
        }

        fn calls(&self) -> &[EngineCall] {
            self.game.engine().calls()
        }
    }

    #[test]
    fn test_missing_node_is_fatal() {
        let engine = HeadlessEngine::lava_rush().without("plane collider");
        let result = Game::new(engine, 1, Tuning::default(), Settings::default());
        assert!(matches!(
            result,
            Err(SceneError::MissingNode {
                role: NodeRole::LavaPlane,
                ..
            })
        ));
    }

    #[test]
    fn test_splash_on_startup() {
        let runner = Runner::new(1, Settings::default());
        let calls = runner.calls();

        assert!(calls.iter().any(|call| matches!(
            call,
            EngineCall::Overlay(overlay) if overlay.scene == OverlayScene::Splash
        )));
        assert!(calls.contains(&EngineCall::Sound {
            cue: SoundCue::Ambience,
            volume: 0.7,
            looping: true,
        }));

        let engine = runner.game.engine();
        let nodes = runner.game.nodes();
        assert!(engine.is_hidden(nodes.get(NodeRole::Character)));
        assert!(engine.is_hidden(nodes.platform(Slot::Center)));
    }

    #[test]
    fn test_tap_starts_run() {
        let mut runner = Runner::new(2, Settings::default());
        runner.frame();
        runner.game.on_tap(10.0, WIDTH);
        runner.frame();

        let game = &runner.game;
        let nodes = game.nodes();
        let engine = game.engine();
        assert_eq!(game.state().phase, SessionPhase::Started);
        assert!(!engine.is_hidden(nodes.get(NodeRole::Character)));
        assert!(!engine.is_hidden(nodes.get(NodeRole::Tank)));

        let tank = nodes.get(NodeRole::Tank);
        assert!(engine.calls().contains(&EngineCall::Action {
            node: tank,
            action: NodeAction::FadeIn { secs: 0.3 },
        }));
        assert!(engine.calls().iter().any(|call| matches!(
            call,
            EngineCall::Overlay(overlay) if overlay.scene == OverlayScene::Hud
        )));
    }

    #[test]
    fn test_standing_still_ends_in_lava() {
        let mut runner = Runner::started(3, Settings::default());
        runner.frames(600);

        let state = runner.game.state();
        assert_eq!(state.phase, SessionPhase::Ended);
        assert_eq!(state.death_cause, DeathCause::Lava);
        assert!(runner.calls().iter().any(|call| matches!(
            call,
            EngineCall::Overlay(overlay)
                if overlay.scene == OverlayScene::Summary(DeathCause::Lava)
        )));
        assert!(runner.calls().contains(&EngineCall::Sound {
            cue: SoundCue::Death,
            volume: 1.0,
            looping: false,
        }));
    }

    #[test]
    fn test_jump_onto_tank_collects_it() {
        let mut runner = Runner::started(4, Settings::default());
        let target = runner.game.state().tank.slot;
        runner.tap_toward(target);
        runner.frames(60);

        let state = runner.game.state();
        assert_eq!(state.character.slot, target);
        assert!(state.tank.collected);
        assert!(!state.tank.visible);

        let character = runner.game.nodes().get(NodeRole::Character);
        let position = runner.game.engine().position(character);
        assert!((position.z - target.lateral(state.tuning.slot_spacing)).abs() < 1e-4);

        let calls = runner.calls();
        assert!(calls.contains(&EngineCall::Haptic(HapticStrength::Medium)));
        assert!(calls.contains(&EngineCall::StopAnimation {
            clip: AnimationClip::Idle,
            blend_out: 0.1,
        }));
        assert!(calls.iter().any(|call| matches!(
            call,
            EngineCall::Sound { cue: SoundCue::Collect, .. }
        )));
    }

    #[test]
    fn test_haptics_respect_settings() {
        let settings = Settings {
            haptics: false,
            ..Default::default()
        };
        let mut runner = Runner::started(5, settings);
        runner.tap_toward(Slot::Left);
        runner.frames(5);
        assert!(runner.game.state().jump.is_pending());
        assert!(!runner
            .calls()
            .iter()
            .any(|call| matches!(call, EngineCall::Haptic(_))));
    }

    #[test]
    fn test_pause_freezes_and_resume_skips_gap() {
        let mut runner = Runner::started(6, Settings::default());
        runner.frames(10);
        let level = runner.game.state().oxygen.level();

        runner.game.pause();
        runner.frames(100);
        assert_eq!(runner.game.state().oxygen.level(), level);

        runner.game.resume();
        // Long gap while backgrounded
        runner.frame += 1000;
        runner.frame();
        assert_eq!(runner.game.state().oxygen.level(), level);
        runner.frame();
        assert!(runner.game.state().oxygen.level() < level);
    }

    #[test]
    fn test_settings_change_takes_effect_next_event() {
        let mut runner = Runner::started(9, Settings::default());
        runner.game.set_settings(Settings {
            haptics: false,
            ..Default::default()
        });
        assert!(!runner.game.settings().haptics);

        runner.tap_toward(Slot::Right);
        runner.frames(2);
        assert!(!runner
            .calls()
            .iter()
            .any(|call| matches!(call, EngineCall::Haptic(_))));
    }

    #[test]
    fn test_hud_gauge_follows_viewport_width() {
        let mut runner = Runner::new(10, Settings::default());
        runner.frame();
        runner.game.engine_mut().take_calls();
        runner.game.on_tap(100.0, 800.0);
        runner.frame();

        let hud = runner.calls().iter().find_map(|call| match call {
            EngineCall::Overlay(overlay) if overlay.scene == OverlayScene::Hud => Some(overlay),
            _ => None,
        });
        let Some(hud) = hud else {
            panic!("HUD overlay not presented");
        };
        assert!(hud.elements.iter().any(|element| matches!(
            element,
            crate::ui::OverlayElement::Gauge { offset, .. } if offset.x == -320.0
        )));
    }

    #[test]
    fn test_gauge_updates_while_running() {
        let mut runner = Runner::started(7, Settings::default());
        runner.frames(3);
        let gauges: Vec<_> = runner
            .calls()
            .iter()
            .filter_map(|call| match call {
                EngineCall::Gauge(reading) => Some(*reading),
                _ => None,
            })
            .collect();
        assert_eq!(gauges.len(), 3);
        assert!(gauges[2].value < 1.0);
    }
}
