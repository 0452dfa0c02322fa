//! Headless sandbox scene
//!
//! Drops a handful of boxes and circles onto a static floor and steps the
//! engine with a synthetic 60 Hz clock, logging the contacts it finds.
//!
//! Usage: `sandbox [config.toml|config.ron] [frames]`

use engine2d::foundation::logging;
use engine2d::prelude::*;
use log::{info, warn};

const FRAME_MS: f32 = 1000.0 / 60.0;
const DEFAULT_FRAMES: u32 = 240;

struct SandboxScene {
    engine: Engine,
    bodies: Vec<Entity>,
}

impl SandboxScene {
    fn new(config: SimulationConfig) -> Result<Self, EngineError> {
        info!("Creating sandbox scene...");
        let mut engine = Engine::new(config)?;
        let world = engine.world_mut();

        let floor = world.create_entity();
        world.add_component(floor, TransformComponent::from_position(Vec2::new(0.0, -1.0)))?;
        world.add_component(
            floor,
            ColliderComponent::rect(40.0, 2.0).with_layer(CollisionLayers::ENVIRONMENT | CollisionLayers::DEFAULT),
        )?;

        let mut bodies = Vec::new();
        for i in 0..4u8 {
            let x = f32::from(i) * 2.5 - 3.75;
            let entity = world.create_entity();
            world.add_component(
                entity,
                TransformComponent::from_position_rotation(Vec2::new(x, 3.0 + f32::from(i)), 0.2 * f32::from(i)),
            )?;
            world.add_component(entity, RigidBodyComponent::with_mass(1.0 + f32::from(i))?.with_gravity(true))?;

            let collider = if i % 2 == 0 {
                ColliderComponent::rect(1.0, 1.0)
            } else {
                ColliderComponent::circle(0.5)
            };
            world.add_component(entity, collider.with_debug(true))?;
            bodies.push(entity);
        }

        // A sideways shove on the first body, applied on the next step
        if let Some(body) = bodies.first().and_then(|&e| world.get_component_mut::<RigidBodyComponent>(e)) {
            body.add_force(Vec2::new(2.0, 0.0), ForceMode::VelocityChange);
            body.add_torque(50.0, ForceMode::Impulse);
        }

        info!("Sandbox scene ready with {} entities", world.entity_count());
        Ok(Self { engine, bodies })
    }

    fn run(&mut self, frames: u32) {
        let mut touching = 0;
        for frame in 0..frames {
            let report = self.engine.tick(FRAME_MS);
            if report.clamped {
                warn!("Frame {} hit the accumulator cap", frame);
            }

            let contacts = self.engine.contacts();
            if contacts.len() != touching {
                touching = contacts.len();
                info!("Frame {}: {} contact(s)", frame, touching);
                for contact in contacts {
                    info!(
                        "  {} <-> {}: normal ({:.3}, {:.3}), depth {:.4}",
                        contact.entity_a(),
                        contact.entity_b(),
                        contact.normal.x,
                        contact.normal.y,
                        contact.depth
                    );
                }
            }
        }

        let world = self.engine.world();
        for &entity in &self.bodies {
            if let Some(transform) = world.get_component::<TransformComponent>(entity) {
                info!(
                    "{} rests at ({:.3}, {:.3}), rotation {:.3}",
                    entity, transform.position.x, transform.position.y, transform.rotation
                );
            }
        }
        let mut debug_draw = DebugDrawSystem::new();
        info!("{} collider outline segments to draw", debug_draw.collect(world).len());
        info!(
            "Ran {} frames, {} fixed steps",
            self.engine.time().frame_count(),
            self.engine.time().fixed_step_count()
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            info!("Loading simulation config from {}", path);
            SimulationConfig::load_from_file(&path)?
        }
        None => SimulationConfig::default(),
    };
    let frames = match args.next() {
        Some(frames) => frames.parse()?,
        None => DEFAULT_FRAMES,
    };

    let mut scene = SandboxScene::new(config)?;
    scene.run(frames);
    Ok(())
}
