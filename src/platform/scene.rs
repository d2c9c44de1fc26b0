//! Scene engine boundary
//!
//! The 3D engine owns the scene graph, animation players, audio and the 2D overlay. The
//! game only talks to it through [`SceneEngine`], and only through node handles resolved
//! once at setup into a [`SceneNodes`] arena indexed by [`NodeRole`].

use glam::Vec3;
use thiserror::Error;

use crate::sim::{AnimationClip, ContactKind, HapticStrength, Slot, SoundCue};
use crate::ui::{GaugeReading, Overlay};

/// Opaque engine node handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// Every scene node the game needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Character model (animations play on it)
    Character,
    /// Character collision volume
    Collider,
    LeftPlatform,
    CenterPlatform,
    RightPlatform,
    /// Plane under the platforms; touching it means lava
    LavaPlane,
    /// Tank model
    Tank,
    /// Tank collision volume
    TankSphere,
}

impl NodeRole {
    pub const COUNT: usize = 8;

    pub const ALL: [NodeRole; Self::COUNT] = [
        NodeRole::Character,
        NodeRole::Collider,
        NodeRole::LeftPlatform,
        NodeRole::CenterPlatform,
        NodeRole::RightPlatform,
        NodeRole::LavaPlane,
        NodeRole::Tank,
        NodeRole::TankSphere,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    /// Name of the node in the scene file
    pub fn node_name(self) -> &'static str {
        match self {
            NodeRole::Character => "worker",
            NodeRole::Collider => "collider",
            NodeRole::LeftPlatform => "left platform",
            NodeRole::CenterPlatform => "middle platform",
            NodeRole::RightPlatform => "right platform",
            NodeRole::LavaPlane => "plane collider",
            NodeRole::Tank => "tank",
            NodeRole::TankSphere => "sphere",
        }
    }

    /// Platform node for a slot
    pub fn platform(slot: Slot) -> Self {
        match slot {
            Slot::Left => NodeRole::LeftPlatform,
            Slot::Center => NodeRole::CenterPlatform,
            Slot::Right => NodeRole::RightPlatform,
        }
    }
}

/// Fire-and-forget node actions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeAction {
    FadeIn { secs: f32 },
    FadeOut { secs: f32 },
    /// Rotate `radians` about the vertical axis every `secs`, forever
    Spin { radians: f32, secs: f32 },
}

/// Errors raised while binding to the scene
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene is missing node `{name}` ({role:?})")]
    MissingNode { role: NodeRole, name: &'static str },
}

/// The narrow interface to the 3D scene engine
pub trait SceneEngine {
    /// Look up a node by name anywhere in the scene
    fn find_node(&self, name: &str) -> Option<NodeId>;

    fn position(&self, node: NodeId) -> Vec3;
    fn set_position(&mut self, node: NodeId, position: Vec3);
    fn set_hidden(&mut self, node: NodeId, hidden: bool);
    fn run_action(&mut self, node: NodeId, action: NodeAction);

    /// Character animation players
    fn play_animation(&mut self, clip: AnimationClip);
    fn stop_animation(&mut self, clip: AnimationClip, blend_out: f32);
    fn set_animation_speed(&mut self, clip: AnimationClip, speed: f32);

    fn haptic(&mut self, strength: HapticStrength);
    fn play_sound(&mut self, cue: SoundCue, volume: f32, looping: bool);

    /// Replace the 2D overlay
    fn present_overlay(&mut self, overlay: &Overlay);
    /// Refresh the oxygen gauge on the current overlay
    fn update_gauge(&mut self, reading: &GaugeReading);
}

/// Typed node handles, resolved once per session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneNodes {
    nodes: [NodeId; NodeRole::COUNT],
}

impl SceneNodes {
    /// Resolve every role by name. Any missing node is fatal.
    pub fn resolve<E: SceneEngine + ?Sized>(engine: &E) -> Result<Self, SceneError> {
        let mut nodes = [NodeId(0); NodeRole::COUNT];
        for role in NodeRole::ALL {
            let name = role.node_name();
            nodes[role.index()] = engine
                .find_node(name)
                .ok_or(SceneError::MissingNode { role, name })?;
        }
        log::debug!("Resolved {} scene nodes", NodeRole::COUNT);
        Ok(Self { nodes })
    }

    #[inline]
    pub fn get(&self, role: NodeRole) -> NodeId {
        self.nodes[role.index()]
    }

    pub fn platform(&self, slot: Slot) -> NodeId {
        self.get(NodeRole::platform(slot))
    }

    /// Role of a node handle, if it is one of ours
    pub fn role_of(&self, node: NodeId) -> Option<NodeRole> {
        NodeRole::ALL.into_iter().find(|role| self.get(*role) == node)
    }

    /// Classify a contact-begin pair. Only collider + tank sphere (either order) is a
    /// pickup; every other contact is lava.
    pub fn classify_contact(&self, a: NodeId, b: NodeId) -> ContactKind {
        let collider = self.get(NodeRole::Collider);
        let sphere = self.get(NodeRole::TankSphere);
        if (a == collider && b == sphere) || (a == sphere && b == collider) {
            ContactKind::OxygenPickup
        } else {
            ContactKind::Hazard
        }
    }
}
