//! Component storage
//!
//! Components of one type live in a single slot map. A secondary map indexes
//! the slots owned by each entity so sibling lookups stay cheap.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use slotmap::{SecondaryMap, SlotMap};

use super::{Component, Entity};

slotmap::new_key_type! {
    /// Slot key inside a single component storage
    pub struct ComponentKey;
}

/// Typed, non-owning reference to a stored component
///
/// Handles stay valid until the component (or its entity) is removed; after
/// that every lookup through them returns `None`.
pub struct ComponentHandle<T> {
    entity: Entity,
    key: ComponentKey,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ComponentHandle<T> {
    fn new(entity: Entity, key: ComponentKey) -> Self {
        Self {
            entity,
            key,
            _marker: PhantomData,
        }
    }

    /// Entity owning the component
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Slot key of the component
    pub fn key(&self) -> ComponentKey {
        self.key
    }
}

impl<T> Clone for ComponentHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentHandle<T> {}

impl<T> PartialEq for ComponentHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity && self.key == other.key
    }
}

impl<T> Eq for ComponentHandle<T> {}

impl<T> Hash for ComponentHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entity.hash(state);
        self.key.hash(state);
    }
}

impl<T> fmt::Debug for ComponentHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentHandle")
            .field("type", &std::any::type_name::<T>())
            .field("entity", &self.entity)
            .field("key", &self.key)
            .finish()
    }
}

/// Storage for every component of type `T`
pub struct ComponentStorage<T: Component> {
    components: SlotMap<ComponentKey, (Entity, T)>,
    by_entity: SecondaryMap<Entity, Vec<ComponentKey>>,
}

impl<T: Component> ComponentStorage<T> {
    /// Create an empty storage
    pub fn new() -> Self {
        Self {
            components: SlotMap::with_key(),
            by_entity: SecondaryMap::new(),
        }
    }

    /// Insert a component for `entity`
    pub fn insert(&mut self, entity: Entity, component: T) -> ComponentHandle<T> {
        let key = self.components.insert((entity, component));
        match self.by_entity.get_mut(entity) {
            Some(keys) => keys.push(key),
            None => {
                self.by_entity.insert(entity, vec![key]);
            }
        }
        ComponentHandle::new(entity, key)
    }

    /// Resolve a handle
    pub fn get(&self, handle: ComponentHandle<T>) -> Option<&T> {
        self.components
            .get(handle.key)
            .filter(|(owner, _)| *owner == handle.entity)
            .map(|(_, component)| component)
    }

    /// Resolve a handle mutably
    pub fn get_mut(&mut self, handle: ComponentHandle<T>) -> Option<&mut T> {
        self.components
            .get_mut(handle.key)
            .filter(|(owner, _)| *owner == handle.entity)
            .map(|(_, component)| component)
    }

    /// Remove the component behind a handle
    pub fn remove(&mut self, handle: ComponentHandle<T>) -> Option<T> {
        if self.get(handle).is_none() {
            return None;
        }

        let (entity, component) = self.components.remove(handle.key)?;
        if let Some(keys) = self.by_entity.get_mut(entity) {
            keys.retain(|key| *key != handle.key);
            if keys.is_empty() {
                self.by_entity.remove(entity);
            }
        }
        Some(component)
    }

    /// Remove every component owned by `entity`, returning how many were dropped
    pub fn remove_entity(&mut self, entity: Entity) -> usize {
        let Some(keys) = self.by_entity.remove(entity) else {
            return 0;
        };
        keys.into_iter()
            .filter(|key| self.components.remove(*key).is_some())
            .count()
    }

    /// Whether `entity` owns at least one component of this type
    pub fn contains_entity(&self, entity: Entity) -> bool {
        self.by_entity.get(entity).is_some_and(|keys| !keys.is_empty())
    }

    /// First component owned by `entity`, in attach order
    pub fn first(&self, entity: Entity) -> Option<(ComponentHandle<T>, &T)> {
        self.for_entity(entity).next()
    }

    /// Mutable access to the first component owned by `entity`
    pub fn first_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let key = *self.by_entity.get(entity)?.first()?;
        self.components.get_mut(key).map(|(_, component)| component)
    }

    /// All components owned by `entity`, in attach order
    pub fn for_entity(&self, entity: Entity) -> impl Iterator<Item = (ComponentHandle<T>, &T)> + '_ {
        self.by_entity
            .get(entity)
            .into_iter()
            .flatten()
            .filter_map(move |&key| {
                self.components
                    .get(key)
                    .map(|(owner, component)| (ComponentHandle::new(*owner, key), component))
            })
    }

    /// Iterate every component
    pub fn iter(&self) -> impl Iterator<Item = (ComponentHandle<T>, &T)> + '_ {
        self.components
            .iter()
            .map(|(key, (entity, component))| (ComponentHandle::new(*entity, key), component))
    }

    /// Iterate every component mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ComponentHandle<T>, &mut T)> + '_ {
        self.components
            .iter_mut()
            .map(|(key, (entity, component))| (ComponentHandle::new(*entity, key), component))
    }

    /// Number of stored components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the storage is empty
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<T: Component> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view used by the world to manage heterogeneous storages
pub trait ErasedStorage: Send + Sync {
    /// Drop every component owned by `entity`
    fn remove_entity(&mut self, entity: Entity) -> usize;

    /// Component type name, for diagnostics
    fn type_name(&self) -> &'static str;

    /// Whether `entity` holds a component of this type that needs its transform
    fn needs_transform_of(&self, entity: Entity) -> bool;

    /// Downcast helper
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast helper
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedStorage for ComponentStorage<T> {
    fn remove_entity(&mut self, entity: Entity) -> usize {
        ComponentStorage::remove_entity(self, entity)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn needs_transform_of(&self, entity: Entity) -> bool {
        T::REQUIRES_TRANSFORM && self.contains_entity(entity)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker(u32);
    impl Component for Marker {}

    fn entities(count: usize) -> Vec<Entity> {
        let mut map: SlotMap<Entity, ()> = SlotMap::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_insert_and_lookup_by_entity() {
        let ids = entities(2);
        let mut storage = ComponentStorage::new();
        let a = storage.insert(ids[0], Marker(1));
        storage.insert(ids[0], Marker(2));
        storage.insert(ids[1], Marker(3));

        assert_eq!(storage.len(), 3);
        assert_eq!(storage.get(a).map(|m| m.0), Some(1));
        let values: Vec<u32> = storage.for_entity(ids[0]).map(|(_, m)| m.0).collect();
        assert_eq!(values, vec![1, 2]);
        assert_eq!(storage.first(ids[1]).map(|(_, m)| m.0), Some(3));
    }

    #[test]
    fn test_removed_handle_no_longer_resolves() {
        let ids = entities(1);
        let mut storage = ComponentStorage::new();
        let handle = storage.insert(ids[0], Marker(7));

        assert_eq!(storage.remove(handle).map(|m| m.0), Some(7));
        assert!(storage.get(handle).is_none());
        assert!(storage.remove(handle).is_none());
        assert!(!storage.contains_entity(ids[0]));
    }

    #[test]
    fn test_remove_entity_drops_all_components() {
        let ids = entities(2);
        let mut storage = ComponentStorage::new();
        storage.insert(ids[0], Marker(1));
        storage.insert(ids[0], Marker(2));
        storage.insert(ids[1], Marker(3));

        assert_eq!(storage.remove_entity(ids[0]), 2);
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.remove_entity(ids[0]), 0);
    }
}
