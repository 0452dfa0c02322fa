//! Collision layer masks
//!
//! A collider only tests against colliders whose layer mask shares at least
//! one bit with its own.

use bitflags::bitflags;

bitflags! {
    /// Collision layer bitmask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Layer every collider starts on
        const DEFAULT = 1 << 0;
        /// Static environment geometry
        const ENVIRONMENT = 1 << 1;
        /// Player-controlled bodies
        const PLAYER = 1 << 2;
        /// Enemy bodies
        const ENEMY = 1 << 3;
        /// Projectiles (bullets, missiles, etc.)
        const PROJECTILE = 1 << 4;
        /// Trigger volumes
        const TRIGGER = 1 << 5;
        /// Debris and small physics objects
        const DEBRIS = 1 << 6;
    }
}

impl CollisionLayers {
    /// Single user layer by bit index (0..32); out-of-range indices give an empty mask
    pub fn layer(index: u32) -> Self {
        1u32.checked_shl(index).map_or(Self::empty(), Self::from_bits_retain)
    }

    /// Check if two colliders should be tested against each other
    pub fn should_collide(self, other: CollisionLayers) -> bool {
        self.intersects(other)
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        CollisionLayers::DEFAULT
    }
}
