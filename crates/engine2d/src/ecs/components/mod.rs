//! ECS Components module
//!
//! Simulation components: spatial state, rigid body dynamics and collision shapes.

pub mod transform;
pub mod rigid_body;
pub mod collision;

pub use transform::TransformComponent;
pub use rigid_body::{ForceMode, RigidBodyComponent, RigidBodyError};
pub use collision::{ColliderComponent, ColliderType};
