//! Physics module for collision detection
//!
//! Shape geometry and AABB bounds, the pair-keyed SAT narrow phase, layer
//! filtering and the world-level pair query.

pub mod bounds;
pub mod collision;
pub mod contact;
pub mod dispatch;
pub mod collision_layers;
pub mod collision_system;

pub use bounds::Bounds;
pub use collision::{
    ColliderShape,
    Line,
    Projection,
    Ray,
    RayHit,
    ShapeGeometry,
    ShapeKind,
};
pub use contact::{CollisionContact, ContactResult};
pub use dispatch::{CollisionJumpTable, NarrowPhaseFn};
pub use collision_layers::CollisionLayers;
pub use collision_system::PhysicsCollisionSystem;
