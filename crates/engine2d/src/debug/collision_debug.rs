//! Collider debug feed
//!
//! Once per frame, every collider with its debug flag set gets a closed
//! [`LineRendererComponent`] on its host fed with the current world-space
//! outline. Clearing the flag detaches the renderer again.

use crate::debug::draw::LineRendererComponent;
use crate::ecs::components::ColliderComponent;
use crate::ecs::scheduler::SystemPhase;
use crate::ecs::storage::ComponentHandle;
use crate::ecs::system::{SimulationContext, System};
use crate::ecs::World;
use crate::foundation::logging::debug;

/// What one sync pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugSyncReport {
    /// Renderers attached this pass
    pub attached: usize,
    /// Renderers fed with fresh outlines
    pub fed: usize,
    /// Renderers detached this pass
    pub detached: usize,
}

/// Keeps collider debug renderers in sync with collider geometry
#[derive(Debug, Default)]
pub struct CollisionDebugSystem {
    /// Draw every collider, ignoring the per-collider flag
    pub draw_all: bool,
}

impl CollisionDebugSystem {
    /// Create the system
    pub fn new(draw_all: bool) -> Self {
        Self { draw_all }
    }

    /// Attach, feed and detach debug renderers
    pub fn sync(&self, world: &mut World) -> DebugSyncReport {
        let draw_all = self.draw_all;
        let mut report = world
            .storage_scope::<ColliderComponent, _>(|world, colliders| {
                let mut report = DebugSyncReport::default();
                for (handle, collider) in colliders.iter_mut() {
                    if draw_all || collider.debug {
                        Self::feed(world, handle, collider, &mut report);
                    } else if let Some(renderer) = collider.debug_renderer.take() {
                        if world.remove_component(renderer).is_some() {
                            report.detached += 1;
                        }
                    }
                }
                report
            })
            .unwrap_or_default();

        report.detached += Self::remove_orphans(world);
        report
    }

    fn feed(
        world: &mut World,
        handle: ComponentHandle<ColliderComponent>,
        collider: &mut ColliderComponent,
        report: &mut DebugSyncReport,
    ) {
        let existing = collider
            .debug_renderer
            .filter(|renderer| world.component(*renderer).is_some());

        let renderer = match existing {
            Some(renderer) => renderer,
            None => match world.add_component(handle.entity(), LineRendererComponent::for_collider(handle)) {
                Ok(renderer) => {
                    report.attached += 1;
                    renderer
                }
                Err(err) => {
                    debug!("Could not attach collider debug renderer: {}", err);
                    collider.debug_renderer = None;
                    return;
                }
            },
        };
        collider.debug_renderer = Some(renderer);

        if let Some(line_renderer) = world.component_mut(renderer) {
            collider.geometry().outline_into(line_renderer.points_mut());
            report.fed += 1;
        }
    }

    /// Detach renderers whose collider is gone
    fn remove_orphans(world: &mut World) -> usize {
        let orphans: Vec<ComponentHandle<LineRendererComponent>> = world
            .query::<LineRendererComponent>()
            .filter(|(_, renderer)| {
                renderer
                    .source()
                    .is_some_and(|collider| world.component(collider).is_none())
            })
            .map(|(handle, _)| handle)
            .collect();

        orphans
            .into_iter()
            .filter(|handle| world.remove_component(*handle).is_some())
            .count()
    }
}

impl System for CollisionDebugSystem {
    fn name(&self) -> &str {
        "CollisionDebugSystem"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::PostStep
    }

    fn fixed_update(&mut self, _world: &mut World, _ctx: &SimulationContext, _alpha: f32) {}

    fn update(&mut self, world: &mut World, _ctx: &SimulationContext) {
        self.sync(world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::TransformComponent;
    use crate::foundation::math::Vec2;
    use crate::physics::collision::CIRCLE_OUTLINE_SEGMENTS;

    fn scene(collider: ColliderComponent) -> (World, ComponentHandle<ColliderComponent>) {
        let mut world = World::new();
        let entity = world.create_entity();
        world
            .add_component(entity, TransformComponent::from_position(Vec2::new(1.0, 1.0)))
            .unwrap();
        let handle = world.add_component(entity, collider).unwrap();
        (world, handle)
    }

    #[test]
    fn test_debug_flag_attaches_and_feeds_renderer() {
        let (mut world, handle) = scene(ColliderComponent::rect(2.0, 2.0).with_debug(true));
        let system = CollisionDebugSystem::default();

        let report = system.sync(&mut world);
        assert_eq!(report.attached, 1);
        assert_eq!(report.fed, 1);

        let renderer = world.component(handle).unwrap().debug_renderer().unwrap();
        let line_renderer = world.component(renderer).unwrap();
        assert!(line_renderer.close_path);
        assert_eq!(line_renderer.points(), world.component(handle).unwrap().geometry().points());

        let report = system.sync(&mut world);
        assert_eq!(report.attached, 0);
        assert_eq!(world.component_count::<LineRendererComponent>(), 1);
    }

    #[test]
    fn test_clearing_flag_detaches_renderer() {
        let (mut world, handle) = scene(ColliderComponent::rect(1.0, 1.0).with_debug(true));
        let system = CollisionDebugSystem::default();
        system.sync(&mut world);

        world.component_mut(handle).unwrap().debug = false;
        let report = system.sync(&mut world);

        assert_eq!(report.detached, 1);
        assert_eq!(world.component_count::<LineRendererComponent>(), 0);
        assert!(world.component(handle).unwrap().debug_renderer().is_none());
    }

    #[test]
    fn test_circle_outline_is_approximated() {
        let (mut world, _) = scene(ColliderComponent::circle(1.0));
        CollisionDebugSystem::new(true).sync(&mut world);

        let (_, renderer) = world.query::<LineRendererComponent>().next().unwrap();
        assert_eq!(renderer.points().len(), CIRCLE_OUTLINE_SEGMENTS);
    }

    #[test]
    fn test_renderer_removed_with_its_collider() {
        let (mut world, handle) = scene(ColliderComponent::rect(1.0, 1.0).with_debug(true));
        let system = CollisionDebugSystem::default();
        system.sync(&mut world);

        world.remove_component(handle);
        let report = system.sync(&mut world);

        assert_eq!(report.detached, 1);
        assert_eq!(world.component_count::<LineRendererComponent>(), 0);
    }
}
