//! Narrow-phase output types

use crate::ecs::components::ColliderComponent;
use crate::ecs::storage::ComponentHandle;
use crate::ecs::Entity;
use crate::foundation::math::Vec2;

/// Contact between two shapes, independent of who owns them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionContact {
    /// Unit normal pointing from the first shape toward the second
    pub normal: Vec2,
    /// Penetration depth along `normal`, never negative
    pub depth: f32,
}

impl CollisionContact {
    /// Create a contact; negative depths are clamped to zero
    pub fn new(normal: Vec2, depth: f32) -> Self {
        Self {
            normal,
            depth: depth.max(0.0),
        }
    }

    /// The same contact seen from the other shape
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            depth: self.depth,
        }
    }

    /// Translation that separates the second shape from the first
    pub fn separation(&self) -> Vec2 {
        self.normal * self.depth
    }
}

/// Contact between two attached colliders, handed to an external resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactResult {
    /// First collider
    pub collider_a: ComponentHandle<ColliderComponent>,
    /// Second collider
    pub collider_b: ComponentHandle<ColliderComponent>,
    /// Unit normal from `collider_a` toward `collider_b`
    pub normal: Vec2,
    /// Penetration depth
    pub depth: f32,
}

impl ContactResult {
    /// Attach pair identity to a shape contact
    pub fn new(
        collider_a: ComponentHandle<ColliderComponent>,
        collider_b: ComponentHandle<ColliderComponent>,
        contact: CollisionContact,
    ) -> Self {
        Self {
            collider_a,
            collider_b,
            normal: contact.normal,
            depth: contact.depth,
        }
    }

    /// Entity owning `collider_a`
    pub fn entity_a(&self) -> Entity {
        self.collider_a.entity()
    }

    /// Entity owning `collider_b`
    pub fn entity_b(&self) -> Entity {
        self.collider_b.entity()
    }

    /// Shape-level contact
    pub fn contact(&self) -> CollisionContact {
        CollisionContact {
            normal: self.normal,
            depth: self.depth,
        }
    }
}
