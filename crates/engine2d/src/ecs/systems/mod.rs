//! ECS Systems module

pub mod physics;
pub mod collider;

pub use physics::RigidBodySystem;
pub use collider::ColliderSystem;
