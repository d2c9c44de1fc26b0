//! Platform abstraction layer
//!
//! Everything the simulation needs from the outside world:
//! - Scene engine (node positions/visibility, animation, haptics, audio, overlay)
//! - Input mapping (tap position -> jump direction)
//! - A headless in-memory engine for the native runner and tests

pub mod headless;
pub mod input;
pub mod scene;

pub use headless::{EngineCall, HeadlessEngine};
pub use input::tap_direction;
pub use scene::{NodeAction, NodeId, NodeRole, SceneEngine, SceneError, SceneNodes};
