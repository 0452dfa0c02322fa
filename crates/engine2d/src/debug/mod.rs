//! Debug visualization
//!
//! Output-only: nothing in the simulation reads these back.

pub mod draw;
pub mod collision_debug;

pub use draw::{DebugDrawSystem, DebugLine, LineRendererComponent};
pub use collision_debug::{CollisionDebugSystem, DebugSyncReport};
