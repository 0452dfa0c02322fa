//! Component trait

use super::{Entity, World};

/// Trait for data attached to an entity
///
/// Attach-time constraints are declared as associated constants and checked
/// by [`World::add_component`] before the component is stored.
pub trait Component: 'static + Send + Sync {
    /// At most one component of this type per entity
    const UNIQUE: bool = false;

    /// The host entity must already carry a `TransformComponent`
    const REQUIRES_TRANSFORM: bool = false;

    /// Called once on attach, after validation and before the component is stored
    fn start(&mut self, _entity: Entity, _world: &World) {}
}
