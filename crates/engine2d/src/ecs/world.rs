//! ECS World implementation

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use slotmap::SlotMap;

use super::components::TransformComponent;
use super::storage::{ComponentHandle, ComponentStorage, ErasedStorage};
use super::{Component, Entity};
use crate::foundation::logging::{debug, warn};

/// Errors raised when attaching a component
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AttachError {
    /// The entity does not exist (never created or already destroyed)
    #[error("{0} does not exist")]
    EntityNotFound(Entity),

    /// The component needs a transform on its host
    #[error("{component} requires a TransformComponent on {entity}")]
    MissingTransform {
        /// Host entity
        entity: Entity,
        /// Component type that was rejected
        component: &'static str,
    },

    /// The component is unique and the host already carries one
    #[error("{entity} already has a {component}")]
    DuplicateComponent {
        /// Host entity
        entity: Entity,
        /// Component type that was rejected
        component: &'static str,
    },
}

/// ECS World containing all entities and components
pub struct World {
    entities: SlotMap<Entity, ()>,
    storages: HashMap<TypeId, Box<dyn ErasedStorage>>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            storages: HashMap::new(),
        }
    }

    /// Create a new entity
    pub fn create_entity(&mut self) -> Entity {
        self.entities.insert(())
    }

    /// Destroy an entity and every component it owns
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if self.entities.remove(entity).is_none() {
            return false;
        }

        let removed: usize = self
            .storages
            .values_mut()
            .map(|storage| storage.remove_entity(entity))
            .sum();
        debug!("Destroyed {} ({} components)", entity, removed);
        true
    }

    /// Whether the entity exists
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Get an iterator over all entities
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.keys()
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Add a component to an entity
    ///
    /// Attach-time constraints declared on the component type are validated
    /// first; on success the component's `start` hook runs and it is stored.
    pub fn add_component<T: Component>(
        &mut self,
        entity: Entity,
        mut component: T,
    ) -> Result<ComponentHandle<T>, AttachError> {
        if !self.is_alive(entity) {
            return Err(AttachError::EntityNotFound(entity));
        }

        if T::REQUIRES_TRANSFORM && !self.has_component::<TransformComponent>(entity) {
            return Err(AttachError::MissingTransform {
                entity,
                component: type_name::<T>(),
            });
        }

        if T::UNIQUE && self.has_component::<T>(entity) {
            return Err(AttachError::DuplicateComponent {
                entity,
                component: type_name::<T>(),
            });
        }

        component.start(entity, self);

        let handle = if let Some(storage) = self.storage_mut::<T>() {
            storage.insert(entity, component)
        } else {
            let mut storage = ComponentStorage::<T>::new();
            let handle = storage.insert(entity, component);
            self.storages.insert(TypeId::of::<T>(), Box::new(storage));
            handle
        };

        debug!("Attached {} to {}", type_name::<T>(), entity);
        Ok(handle)
    }

    /// Whether the entity carries a component of type `T`
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.storage::<T>().is_some_and(|storage| storage.contains_entity(entity))
    }

    /// Get the first component of type `T` from an entity
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.first(entity).map(|(_, component)| component)
    }

    /// Get a mutable component from an entity
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut::<T>()?.first_mut(entity)
    }

    /// Handle to the first component of type `T` on an entity
    pub fn get_component_handle<T: Component>(&self, entity: Entity) -> Option<ComponentHandle<T>> {
        self.storage::<T>()?.first(entity).map(|(handle, _)| handle)
    }

    /// All components of type `T` on an entity, in attach order
    pub fn get_components<T: Component>(&self, entity: Entity) -> impl Iterator<Item = &T> + '_ {
        self.storage::<T>()
            .into_iter()
            .flat_map(move |storage| storage.for_entity(entity).map(|(_, component)| component))
    }

    /// Resolve a component handle
    pub fn component<T: Component>(&self, handle: ComponentHandle<T>) -> Option<&T> {
        self.storage::<T>()?.get(handle)
    }

    /// Resolve a component handle mutably
    pub fn component_mut<T: Component>(&mut self, handle: ComponentHandle<T>) -> Option<&mut T> {
        self.storage_mut::<T>()?.get_mut(handle)
    }

    /// Remove a single component instance
    ///
    /// A transform is kept while other components on its host require it;
    /// detach those first or destroy the entity. Returns `None` when nothing
    /// was removed.
    pub fn remove_component<T: Component>(&mut self, handle: ComponentHandle<T>) -> Option<T> {
        if TypeId::of::<T>() == TypeId::of::<TransformComponent>() {
            let entity = handle.entity();
            if let Some(dependent) = self.storages.values().find(|storage| storage.needs_transform_of(entity)) {
                warn!(
                    "Kept the transform on {}: {} still requires it",
                    entity,
                    dependent.type_name()
                );
                return None;
            }
        }

        let removed = self.storage_mut::<T>()?.remove(handle);
        if removed.is_some() {
            debug!("Detached {} from {}", type_name::<T>(), handle.entity());
        }
        removed
    }

    /// Iterate every component of type `T`
    pub fn query<T: Component>(&self) -> impl Iterator<Item = (ComponentHandle<T>, &T)> + '_ {
        self.storage::<T>().into_iter().flat_map(ComponentStorage::iter)
    }

    /// Iterate every component of type `T` mutably
    pub fn query_mut<T: Component>(&mut self) -> impl Iterator<Item = (ComponentHandle<T>, &mut T)> + '_ {
        self.storage_mut::<T>().into_iter().flat_map(ComponentStorage::iter_mut)
    }

    /// Number of stored components of type `T`
    pub fn component_count<T: Component>(&self) -> usize {
        self.storage::<T>().map_or(0, ComponentStorage::len)
    }

    /// Storage for components of type `T`, if any were ever attached
    pub fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        self.storages
            .get(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any().downcast_ref())
    }

    /// Mutable storage for components of type `T`
    pub fn storage_mut<T: Component>(&mut self) -> Option<&mut ComponentStorage<T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any_mut().downcast_mut())
    }

    /// Run `f` with the storage of `T` split off from the rest of the world
    ///
    /// Lets a system mutate every `T` while reading or writing other component
    /// types. Inside the closure the world has no storage for `T`; components
    /// of that type attached from within the closure are discarded.
    /// Returns `None` when no `T` was ever attached.
    pub fn storage_scope<T: Component, R>(
        &mut self,
        f: impl FnOnce(&mut World, &mut ComponentStorage<T>) -> R,
    ) -> Option<R> {
        let type_id = TypeId::of::<T>();
        let mut storage = self.storages.remove(&type_id)?;

        let result = storage
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
            .map(|typed| f(self, typed));

        if let Some(stray) = self.storages.insert(type_id, storage) {
            warn!(
                "Discarded {} attached inside its own storage scope",
                stray.type_name()
            );
        }
        result
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(i32);
    impl Component for Health {}

    struct Anchor;
    impl Component for Anchor {
        const UNIQUE: bool = true;
        const REQUIRES_TRANSFORM: bool = true;
    }

    #[test]
    fn test_attach_and_get() {
        let mut world = World::new();
        let entity = world.create_entity();
        let handle = world.add_component(entity, Health(10)).unwrap();

        assert_eq!(world.get_component::<Health>(entity), Some(&Health(10)));
        world.component_mut(handle).unwrap().0 = 5;
        assert_eq!(world.component(handle), Some(&Health(5)));
        assert_eq!(world.get_component_handle::<Health>(entity), Some(handle));
    }

    #[test]
    fn test_get_components_returns_all_instances() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, Health(1)).unwrap();
        world.add_component(entity, Health(2)).unwrap();

        let values: Vec<i32> = world.get_components::<Health>(entity).map(|h| h.0).collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_attach_requires_transform() {
        let mut world = World::new();
        let entity = world.create_entity();

        assert!(matches!(
            world.add_component(entity, Anchor),
            Err(AttachError::MissingTransform { .. })
        ));
    }

    #[test]
    fn test_attach_rejects_duplicate_unique_component() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, TransformComponent::default()).unwrap();
        world.add_component(entity, Anchor).unwrap();

        assert!(matches!(
            world.add_component(entity, Anchor),
            Err(AttachError::DuplicateComponent { .. })
        ));
    }

    #[test]
    fn test_attach_to_destroyed_entity_fails() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, Health(1)).unwrap();
        assert!(world.destroy_entity(entity));

        assert_eq!(world.component_count::<Health>(), 0);
        assert_eq!(
            world.add_component(entity, Health(2)).err(),
            Some(AttachError::EntityNotFound(entity))
        );
    }

    #[test]
    fn test_remove_component() {
        let mut world = World::new();
        let entity = world.create_entity();
        let handle = world.add_component(entity, Health(3)).unwrap();

        assert_eq!(world.remove_component(handle), Some(Health(3)));
        assert!(!world.has_component::<Health>(entity));
        assert_eq!(world.remove_component(handle), None);
    }

    #[test]
    fn test_transform_is_kept_while_required() {
        let mut world = World::new();
        let entity = world.create_entity();
        let transform = world.add_component(entity, TransformComponent::default()).unwrap();
        let anchor = world.add_component(entity, Anchor).unwrap();

        assert!(world.remove_component(transform).is_none());
        assert!(world.has_component::<TransformComponent>(entity));

        assert!(world.remove_component(anchor).is_some());
        assert!(world.remove_component(transform).is_some());
        assert!(!world.has_component::<TransformComponent>(entity));
    }

    #[test]
    fn test_storage_scope_splits_borrows() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, Health(4)).unwrap();
        world.add_component(entity, TransformComponent::default()).unwrap();

        let touched = world.storage_scope::<Health, _>(|world, healths| {
            let mut touched = 0;
            for (handle, health) in healths.iter_mut() {
                if let Some(transform) = world.get_component_mut::<TransformComponent>(handle.entity()) {
                    transform.position.x += health.0 as f32;
                    health.0 = 0;
                    touched += 1;
                }
            }
            touched
        });

        assert_eq!(touched, Some(1));
        assert_eq!(world.get_component::<Health>(entity), Some(&Health(0)));
        assert_eq!(world.get_component::<TransformComponent>(entity).unwrap().position.x, 4.0);
    }
}
