//! Headless scene engine
//!
//! Keeps node transforms in memory and records every other call, so the game can run
//! natively without a renderer. A crude proximity check stands in for the physics
//! engine's contact-begin notifications.

use std::collections::BTreeSet;

use glam::Vec3;

use super::scene::{NodeAction, NodeId, NodeRole, SceneEngine};
use crate::sim::{AnimationClip, HapticStrength, SoundCue};
use crate::tuning::Tuning;
use crate::ui::{GaugeReading, Overlay};

/// Lateral distance at which the character touches the tank
const PICKUP_REACH: f32 = 0.5;
/// Vertical distance at which the character touches the tank
const PICKUP_HEIGHT: f32 = 1.0;

/// A recorded engine call
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    SetHidden { node: NodeId, hidden: bool },
    Action { node: NodeId, action: NodeAction },
    PlayAnimation(AnimationClip),
    StopAnimation { clip: AnimationClip, blend_out: f32 },
    AnimationSpeed { clip: AnimationClip, speed: f32 },
    Haptic(HapticStrength),
    Sound { cue: SoundCue, volume: f32, looping: bool },
    Overlay(Overlay),
    Gauge(GaugeReading),
}

#[derive(Debug, Clone)]
struct HeadlessNode {
    name: String,
    position: Vec3,
    hidden: bool,
}

/// In-memory scene engine
#[derive(Debug, Clone, Default)]
pub struct HeadlessEngine {
    nodes: Vec<HeadlessNode>,
    calls: Vec<EngineCall>,
    touching: BTreeSet<(NodeId, NodeId)>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The Lava Rush scene with default platform spacing
    pub fn lava_rush() -> Self {
        Self::lava_rush_with(&Tuning::default())
    }

    /// The Lava Rush scene: three platforms `slot_spacing` apart over a lava plane
    pub fn lava_rush_with(tuning: &Tuning) -> Self {
        let spacing = tuning.slot_spacing;
        let mut engine = Self::new();
        engine.add_node(NodeRole::Character.node_name(), Vec3::ZERO);
        engine.add_node(NodeRole::Collider.node_name(), Vec3::ZERO);
        engine.add_node(NodeRole::LeftPlatform.node_name(), Vec3::new(0.0, 0.0, -spacing));
        engine.add_node(NodeRole::CenterPlatform.node_name(), Vec3::ZERO);
        engine.add_node(NodeRole::RightPlatform.node_name(), Vec3::new(0.0, 0.0, spacing));
        engine.add_node(NodeRole::LavaPlane.node_name(), Vec3::new(0.0, -1.5, 0.0));
        let tank = engine.add_node(NodeRole::Tank.node_name(), Vec3::ZERO);
        engine.add_node(NodeRole::TankSphere.node_name(), Vec3::ZERO);
        // Tank starts detached until the first spawn
        if let Some(tank) = engine.node_mut(tank) {
            tank.hidden = true;
        }
        engine
    }

    /// Add a node and return its handle
    pub fn add_node(&mut self, name: &str, position: Vec3) -> NodeId {
        self.nodes.push(HeadlessNode {
            name: name.to_string(),
            position,
            hidden: false,
        });
        NodeId(self.nodes.len() as u32 - 1)
    }

    /// Drop a node by name (node handles of later nodes shift)
    pub fn without(mut self, name: &str) -> Self {
        self.nodes.retain(|node| node.name != name);
        self
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<EngineCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.node(node).is_none_or(|node| node.hidden)
    }

    fn node(&self, node: NodeId) -> Option<&HeadlessNode> {
        self.nodes.get(node.0 as usize)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut HeadlessNode> {
        self.nodes.get_mut(node.0 as usize)
    }

    fn visible_position(&self, name: &str) -> Option<(NodeId, Vec3)> {
        let id = self.find_node(name)?;
        let node = self.node(id)?;
        (!node.hidden).then_some((id, node.position))
    }

    /// Contact pairs that started touching since the last call, in node order.
    ///
    /// The collider rides on the character and the sphere on the tank.
    pub fn detect_contacts(&mut self) -> Vec<(NodeId, NodeId)> {
        let mut now_touching = BTreeSet::new();

        let character = self.visible_position(NodeRole::Character.node_name());
        let collider = self.find_node(NodeRole::Collider.node_name());
        if let (Some((_, body)), Some(collider)) = (character, collider) {
            if let Some((_, tank)) = self.visible_position(NodeRole::Tank.node_name()) {
                let reach = (tank.z - body.z).abs() < PICKUP_REACH
                    && (tank.y - body.y).abs() < PICKUP_HEIGHT;
                let sphere = self.find_node(NodeRole::TankSphere.node_name());
                if let Some(sphere) = sphere.filter(|_| reach) {
                    now_touching.insert((collider, sphere));
                }
            }
            if let Some(lava) = self.find_node(NodeRole::LavaPlane.node_name()) {
                let surface = self.position(lava).y;
                if body.y < surface {
                    now_touching.insert((collider, lava));
                }
            }
        }

        let began = now_touching
            .iter()
            .filter(|pair| !self.touching.contains(*pair))
            .copied()
            .collect();
        self.touching = now_touching;
        began
    }
}

impl SceneEngine for HeadlessEngine {
    fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(|index| NodeId(index as u32))
    }

    fn position(&self, node: NodeId) -> Vec3 {
        self.node(node).map(|node| node.position).unwrap_or(Vec3::ZERO)
    }

    fn set_position(&mut self, node: NodeId, position: Vec3) {
        if let Some(node) = self.node_mut(node) {
            node.position = position;
        }
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let Some(entry) = self.node_mut(node) {
            entry.hidden = hidden;
        }
        self.calls.push(EngineCall::SetHidden { node, hidden });
    }

    fn run_action(&mut self, node: NodeId, action: NodeAction) {
        self.calls.push(EngineCall::Action { node, action });
    }

    fn play_animation(&mut self, clip: AnimationClip) {
        self.calls.push(EngineCall::PlayAnimation(clip));
    }

    fn stop_animation(&mut self, clip: AnimationClip, blend_out: f32) {
        self.calls.push(EngineCall::StopAnimation { clip, blend_out });
    }

    fn set_animation_speed(&mut self, clip: AnimationClip, speed: f32) {
        self.calls.push(EngineCall::AnimationSpeed { clip, speed });
    }

    fn haptic(&mut self, strength: HapticStrength) {
        self.calls.push(EngineCall::Haptic(strength));
    }

    fn play_sound(&mut self, cue: SoundCue, volume: f32, looping: bool) {
        self.calls.push(EngineCall::Sound { cue, volume, looping });
    }

    fn present_overlay(&mut self, overlay: &Overlay) {
        self.calls.push(EngineCall::Overlay(overlay.clone()));
    }

    fn update_gauge(&mut self, reading: &GaugeReading) {
        self.calls.push(EngineCall::Gauge(*reading));
    }
}
