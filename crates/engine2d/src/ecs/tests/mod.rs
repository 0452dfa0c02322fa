//! Integration tests driving the world through the engine
//!
//! Covers the full fixed step: scheduler, integration, geometry refresh and
//! the pair query, plus attach-time validation.

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use crate::config::ConfigError;
use crate::core::config::SimulationConfig;
use crate::debug::LineRendererComponent;
use crate::ecs::components::{ColliderComponent, ColliderType, RigidBodyComponent, TransformComponent};
use crate::ecs::scheduler::SystemPhase;
use crate::ecs::system::{SimulationContext, System};
use crate::ecs::{AttachError, Entity, World};
use crate::foundation::math::Vec2;
use crate::{Engine, EngineError};
use approx::assert_relative_eq;

fn engine_with_step(fixed_delta_time_ms: f32) -> Engine {
    Engine::new(SimulationConfig::new().with_fixed_delta_time_ms(fixed_delta_time_ms)).unwrap()
}

fn spawn_body(world: &mut World, position: Vec2, body: RigidBodyComponent, collider: ColliderComponent) -> Entity {
    let entity = world.create_entity();
    world.add_component(entity, TransformComponent::from_position(position)).unwrap();
    world.add_component(entity, body).unwrap();
    world.add_component(entity, collider).unwrap();
    entity
}

/// Records every fixed step alpha it sees
struct AlphaRecorder {
    alphas: Rc<RefCell<Vec<f32>>>,
}

impl System for AlphaRecorder {
    fn name(&self) -> &str {
        "AlphaRecorder"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::PostStep
    }

    fn fixed_update(&mut self, _world: &mut World, _ctx: &SimulationContext, alpha: f32) {
        self.alphas.borrow_mut().push(alpha);
    }
}

#[test]
fn test_geometry_follows_integration_within_the_step() {
    let mut engine = engine_with_step(10.0);
    let entity = spawn_body(
        engine.world_mut(),
        Vec2::zeros(),
        RigidBodyComponent::new().with_velocity(Vec2::new(1.0, 0.0)),
        ColliderComponent::rect(2.0, 2.0),
    );

    let report = engine.tick(10.0);
    assert_eq!(report.total_steps(), 1);

    let world = engine.world();
    let transform = world.get_component::<TransformComponent>(entity).unwrap();
    let collider = world.get_component::<ColliderComponent>(entity).unwrap();
    assert_relative_eq!(transform.position.x, 0.01, epsilon = 1e-6);
    assert_relative_eq!(collider.bounds().center, transform.position, epsilon = 1e-6);
    assert_relative_eq!(collider.geometry().center(), transform.position, epsilon = 1e-6);
}

#[test]
fn test_collider_links_sibling_body() {
    let mut engine = engine_with_step(10.0);
    let entity = spawn_body(
        engine.world_mut(),
        Vec2::zeros(),
        RigidBodyComponent::new(),
        ColliderComponent::circle(1.0),
    );

    let world = engine.world();
    let collider = world.get_component::<ColliderComponent>(entity).unwrap();
    assert_eq!(collider.body_type(), ColliderType::Rigidbody);
    assert_eq!(collider.rigid_body(), world.get_component_handle::<RigidBodyComponent>(entity));
}

#[test]
fn test_long_frame_is_bounded_by_the_accumulator_cap() {
    let mut engine = Engine::new(
        SimulationConfig::new()
            .with_fixed_delta_time_ms(16.67)
            .with_max_accumulator_ms(200.0),
    )
    .unwrap();

    let report = engine.tick(1000.0);
    assert!(report.clamped);
    assert_eq!(report.full_steps, 11);
    assert!(report.partial_alpha.is_some());
    assert_eq!(engine.time().fixed_step_count(), 12);
    assert_eq!(engine.time().frame_count(), 1);
}

#[test]
fn test_partial_step_alphas_reach_registered_systems() {
    let alphas = Rc::new(RefCell::new(Vec::new()));
    let mut engine = engine_with_step(10.0);
    engine.add_system(Box::new(AlphaRecorder { alphas: Rc::clone(&alphas) }));

    engine.tick(25.0);

    let seen = alphas.borrow();
    assert_eq!(seen.len(), 3);
    assert_relative_eq!(seen[0], 1.0);
    assert_relative_eq!(seen[1], 1.0);
    assert_relative_eq!(seen[2], 0.5, epsilon = 1e-5);
}

#[test]
fn test_paused_engine_ignores_ticks() {
    let mut engine = engine_with_step(10.0);
    let entity = spawn_body(
        engine.world_mut(),
        Vec2::zeros(),
        RigidBodyComponent::new().with_velocity(Vec2::new(0.0, 1.0)),
        ColliderComponent::circle(0.5),
    );

    engine.pause();
    assert!(engine.is_paused());
    let report = engine.tick(100.0);
    assert_eq!(report.total_steps(), 0);
    assert_eq!(engine.time().fixed_step_count(), 0);

    let position = engine.world().get_component::<TransformComponent>(entity).unwrap().position;
    assert_eq!(position, Vec2::zeros());

    engine.resume();
    engine.tick(10.0);
    let position = engine.world().get_component::<TransformComponent>(entity).unwrap().position;
    assert_relative_eq!(position.y, 0.01, epsilon = 1e-6);
}

#[test]
fn test_update_steps_by_wall_clock() {
    let mut engine = engine_with_step(1.0);
    let entity = spawn_body(
        engine.world_mut(),
        Vec2::zeros(),
        RigidBodyComponent::new().with_velocity(Vec2::new(1.0, 0.0)),
        ColliderComponent::circle(0.5),
    );

    thread::sleep(Duration::from_millis(10));
    let report = engine.update();

    assert!(report.full_steps >= 9);
    assert_eq!(u64::from(report.total_steps()), engine.time().fixed_step_count());
    assert_eq!(engine.time().frame_count(), 1);
    let position = engine.world().get_component::<TransformComponent>(entity).unwrap().position;
    assert!(position.x > 0.008);
}

#[test]
fn test_resume_skips_paused_wall_clock_time() {
    let config = SimulationConfig::new()
        .with_fixed_delta_time_ms(10.0)
        .with_max_accumulator_ms(50.0);

    let mut running = Engine::new(config.clone()).unwrap();
    thread::sleep(Duration::from_millis(80));
    assert!(running.update().clamped);

    let mut engine = Engine::new(config).unwrap();
    engine.pause();
    thread::sleep(Duration::from_millis(80));
    assert_eq!(engine.update().total_steps(), 0);

    engine.resume();
    let report = engine.update();
    assert!(!report.clamped);
    assert!(report.total_steps() >= 1);
}

#[test]
fn test_attach_constraints() {
    let mut engine = engine_with_step(10.0);
    let world = engine.world_mut();

    let bare = world.create_entity();
    let err = world.add_component(bare, ColliderComponent::rect(1.0, 1.0)).unwrap_err();
    assert!(matches!(err, AttachError::MissingTransform { entity, .. } if entity == bare));
    assert!(matches!(EngineError::from(err), EngineError::Attach(_)));

    let body = world.create_entity();
    world.add_component(body, TransformComponent::identity()).unwrap();
    world.add_component(body, RigidBodyComponent::new()).unwrap();
    let err = world.add_component(body, RigidBodyComponent::new()).unwrap_err();
    assert!(matches!(err, AttachError::DuplicateComponent { .. }));
    assert_eq!(world.component_count::<RigidBodyComponent>(), 1);

    world.destroy_entity(body);
    let err = world.add_component(body, TransformComponent::identity()).unwrap_err();
    assert_eq!(err, AttachError::EntityNotFound(body));
}

#[test]
fn test_falling_box_reports_ground_contact() {
    let mut engine = Engine::new(SimulationConfig::default()).unwrap();
    let world = engine.world_mut();

    let ground = world.create_entity();
    world
        .add_component(ground, TransformComponent::from_position(Vec2::new(0.0, -50.0)))
        .unwrap();
    world.add_component(ground, ColliderComponent::rect(100.0, 100.0)).unwrap();

    let falling = spawn_body(
        world,
        Vec2::new(0.0, 2.0),
        RigidBodyComponent::new().with_gravity(true),
        ColliderComponent::rect(1.0, 1.0),
    );

    engine.tick(1000.0 / 60.0);
    assert!(engine.contacts().is_empty());

    for _ in 0..60 {
        engine.tick(1000.0 / 60.0);
    }

    let contacts = engine.contacts();
    assert_eq!(contacts.len(), 1);
    let contact = &contacts[0];
    let mut entities = [contact.entity_a(), contact.entity_b()];
    entities.sort();
    let mut expected = [ground, falling];
    expected.sort();
    assert_eq!(entities, expected);
    assert!(contact.depth > 0.0);
    assert_relative_eq!(contact.normal.norm(), 1.0, epsilon = 1e-5);

    assert_eq!(engine.detect_contacts().len(), 1);
    assert_eq!(engine.take_contacts().len(), 1);
    assert!(engine.contacts().is_empty());
}

#[test]
fn test_debug_colliders_feed_renderers() {
    let mut engine = Engine::new(SimulationConfig::new().with_debug_colliders(true)).unwrap();
    let world = engine.world_mut();
    let entity = world.create_entity();
    world.add_component(entity, TransformComponent::identity()).unwrap();
    world.add_component(entity, ColliderComponent::rect(2.0, 2.0)).unwrap();

    engine.tick(1000.0 / 60.0);

    let world = engine.world();
    let handle = world
        .get_component::<ColliderComponent>(entity)
        .and_then(ColliderComponent::debug_renderer)
        .unwrap();
    let renderer = world.component::<LineRendererComponent>(handle).unwrap();
    assert_eq!(renderer.points().len(), 4);
    assert!(renderer.close_path);
}

#[test]
fn test_invalid_config_is_rejected() {
    let result = Engine::new(SimulationConfig::new().with_fixed_delta_time_ms(0.0));
    assert!(matches!(
        result,
        Err(EngineError::Config(ConfigError::InvalidValue { field: "fixed_delta_time_ms", .. }))
    ));

    let result = Engine::new(SimulationConfig::new().with_max_accumulator_ms(1.0));
    assert!(matches!(
        result,
        Err(EngineError::Config(ConfigError::InvalidValue { field: "max_accumulator_ms", .. }))
    ));
}
