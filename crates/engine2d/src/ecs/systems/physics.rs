//! Rigid body integration system

use crate::ecs::components::{RigidBodyComponent, TransformComponent};
use crate::ecs::scheduler::SystemPhase;
use crate::ecs::system::{SimulationContext, System};
use crate::ecs::World;
use crate::foundation::logging::warn;

/// Integrates every rigid body into its host transform
#[derive(Debug, Default)]
pub struct RigidBodySystem;

impl RigidBodySystem {
    /// Create the system
    pub fn new() -> Self {
        Self
    }

    /// Integrate all bodies for one (possibly partial) step
    ///
    /// Returns the number of bodies integrated.
    pub fn integrate(world: &mut World, ctx: &SimulationContext, alpha: f32) -> usize {
        world
            .storage_scope::<RigidBodyComponent, _>(|world, bodies| {
                let mut integrated = 0;
                for (handle, body) in bodies.iter_mut() {
                    let entity = handle.entity();
                    match world.get_component_mut::<TransformComponent>(entity) {
                        Some(transform) => {
                            body.fixed_update(alpha, ctx, transform);
                            integrated += 1;
                        }
                        None => warn!("Rigid body on {} has no transform, skipping", entity),
                    }
                }
                integrated
            })
            .unwrap_or(0)
    }
}

impl System for RigidBodySystem {
    fn name(&self) -> &str {
        "RigidBodySystem"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Integration
    }

    fn fixed_update(&mut self, world: &mut World, ctx: &SimulationContext, alpha: f32) {
        Self::integrate(world, ctx, alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::ForceMode;
    use crate::foundation::math::Vec2;
    use approx::assert_relative_eq;

    #[test]
    fn test_integrates_every_body() {
        let mut world = World::new();
        let ctx = SimulationContext::new(0.5, Vec2::zeros());
        let mut bodies = Vec::new();
        for x in 0..3 {
            let entity = world.create_entity();
            world
                .add_component(entity, TransformComponent::from_position(Vec2::new(x as f32, 0.0)))
                .unwrap();
            let handle = world
                .add_component(entity, RigidBodyComponent::new().with_velocity(Vec2::new(0.0, 2.0)))
                .unwrap();
            bodies.push(handle);
        }

        world
            .component_mut(bodies[0])
            .unwrap()
            .add_force(Vec2::new(4.0, 0.0), ForceMode::VelocityChange);

        assert_eq!(RigidBodySystem::integrate(&mut world, &ctx, 1.0), 3);

        let first = world.get_component::<TransformComponent>(bodies[0].entity()).unwrap();
        assert_relative_eq!(first.position, Vec2::new(2.0, 1.0));
        let last = world.get_component::<TransformComponent>(bodies[2].entity()).unwrap();
        assert_relative_eq!(last.position, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_empty_world_is_a_no_op() {
        let mut world = World::new();
        let ctx = SimulationContext::new(1.0 / 60.0, Vec2::zeros());
        assert_eq!(RigidBodySystem::integrate(&mut world, &ctx, 1.0), 0);
    }
}
