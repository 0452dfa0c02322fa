//! Collider geometry refresh system

use crate::ecs::components::{ColliderComponent, RigidBodyComponent, TransformComponent};
use crate::ecs::scheduler::SystemPhase;
use crate::ecs::system::{SimulationContext, System};
use crate::ecs::World;
use crate::foundation::logging::warn;

/// Recomputes world-space geometry and bounds of every collider
///
/// Runs after integration so geometry reflects this step's transforms. The
/// link to the host's rigid body is re-resolved on the same pass, so attach
/// order and later removals don't leave a stale body type.
#[derive(Debug, Default)]
pub struct ColliderSystem;

impl ColliderSystem {
    /// Create the system
    pub fn new() -> Self {
        Self
    }

    /// Refresh every collider from its host transform
    pub fn refresh_all(world: &mut World) -> usize {
        world
            .storage_scope::<ColliderComponent, _>(|world, colliders| {
                let mut refreshed = 0;
                for (handle, collider) in colliders.iter_mut() {
                    collider.link_rigid_body(world.get_component_handle::<RigidBodyComponent>(handle.entity()));
                    match world.get_component::<TransformComponent>(handle.entity()) {
                        Some(transform) => {
                            collider.refresh(transform);
                            refreshed += 1;
                        }
                        None => warn!("Collider on {} has no transform, geometry is stale", handle.entity()),
                    }
                }
                refreshed
            })
            .unwrap_or(0)
    }
}

impl System for ColliderSystem {
    fn name(&self) -> &str {
        "ColliderSystem"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Geometry
    }

    fn fixed_update(&mut self, world: &mut World, _ctx: &SimulationContext, _alpha: f32) {
        Self::refresh_all(world);
    }
}
