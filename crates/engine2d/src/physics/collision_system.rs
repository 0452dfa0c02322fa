//! Pair query over every attached collider
//!
//! Broad phase: layer masks, then AABB overlap. Narrow phase: the collision
//! jump table. Results are plain [`ContactResult`]s; resolving them is left
//! to the caller.

use crate::ecs::components::ColliderComponent;
use crate::ecs::scheduler::SystemPhase;
use crate::ecs::storage::ComponentHandle;
use crate::ecs::system::{SimulationContext, System};
use crate::ecs::World;
use crate::foundation::logging::trace;
use crate::foundation::math::Vec2;

use super::collision::{Ray, RayHit};
use super::collision_layers::CollisionLayers;
use super::contact::ContactResult;
use super::dispatch::CollisionJumpTable;

/// Collision detection over the world's colliders
#[derive(Debug, Default)]
pub struct PhysicsCollisionSystem {
    jump_table: CollisionJumpTable,
    contacts: Vec<ContactResult>,
    broad_phase_pairs: usize,
}

impl PhysicsCollisionSystem {
    /// Create a system with the built-in jump table
    pub fn new() -> Self {
        Self::with_jump_table(CollisionJumpTable::new())
    }

    /// Create a system with a custom jump table
    pub fn with_jump_table(jump_table: CollisionJumpTable) -> Self {
        Self {
            jump_table,
            contacts: Vec::new(),
            broad_phase_pairs: 0,
        }
    }

    /// Narrow-phase dispatch table
    pub fn jump_table(&self) -> &CollisionJumpTable {
        &self.jump_table
    }

    /// Mutable dispatch table, for registering custom pair tests
    pub fn jump_table_mut(&mut self) -> &mut CollisionJumpTable {
        &mut self.jump_table
    }

    /// Contacts found by the most recent fixed step
    pub fn contacts(&self) -> &[ContactResult] {
        &self.contacts
    }

    /// Take the most recent contacts, leaving the buffer empty
    pub fn take_contacts(&mut self) -> Vec<ContactResult> {
        std::mem::take(&mut self.contacts)
    }

    /// Pairs that passed the broad phase in the most recent fixed step
    pub fn broad_phase_pairs(&self) -> usize {
        self.broad_phase_pairs
    }

    /// Find every contact between colliders on different entities
    pub fn detect(&self, world: &World) -> Vec<ContactResult> {
        let mut contacts = Vec::new();
        self.detect_into(world, &mut contacts);
        contacts
    }

    fn detect_into(&self, world: &World, contacts: &mut Vec<ContactResult>) -> usize {
        let colliders: Vec<(ComponentHandle<ColliderComponent>, &ColliderComponent)> =
            world.query::<ColliderComponent>().collect();

        let mut candidates = 0;
        for (i, (handle_a, a)) in colliders.iter().enumerate() {
            for (handle_b, b) in &colliders[i + 1..] {
                if handle_a.entity() == handle_b.entity() {
                    continue;
                }
                if !a.layer.should_collide(b.layer) || !a.bounds().intersects(b.bounds()) {
                    continue;
                }

                candidates += 1;
                if let Some(contact) = a.collide(b, &self.jump_table) {
                    contacts.push(ContactResult::new(*handle_a, *handle_b, contact));
                }
            }
        }

        trace!(
            "{} colliders, {} broad-phase pairs, {} contacts",
            colliders.len(),
            candidates,
            contacts.len()
        );
        candidates
    }

    /// Colliders whose shape contains `point`
    pub fn colliders_containing(world: &World, point: &Vec2) -> Vec<ComponentHandle<ColliderComponent>> {
        world
            .query::<ColliderComponent>()
            .filter(|(_, collider)| collider.bounds().contains_point(point) && collider.contains(point))
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Closest collider hit by `ray` on any of `layers`
    pub fn ray_cast(
        world: &World,
        ray: &Ray,
        layers: CollisionLayers,
    ) -> Option<RayHit<ComponentHandle<ColliderComponent>>> {
        world
            .query::<ColliderComponent>()
            .filter(|(_, collider)| collider.layer.should_collide(layers))
            .filter_map(|(handle, collider)| {
                collider.geometry().ray_distance(ray).map(|distance| RayHit {
                    target: handle,
                    distance,
                    point: ray.point_at(distance),
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl System for PhysicsCollisionSystem {
    fn name(&self) -> &str {
        "PhysicsCollisionSystem"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::PostStep
    }

    fn fixed_update(&mut self, world: &mut World, _ctx: &SimulationContext, _alpha: f32) {
        let mut contacts = std::mem::take(&mut self.contacts);
        contacts.clear();
        self.broad_phase_pairs = self.detect_into(world, &mut contacts);
        self.contacts = contacts;
    }
}
