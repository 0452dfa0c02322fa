//! # engine2d
//!
//! Fixed-timestep 2D simulation core: rigid-body integration, collider
//! geometry and SAT collision detection on top of a small ECS.
//!
//! ## Features
//!
//! - **Fixed-step scheduler**: accumulator loop with a bounded catch-up
//! - **Rigid bodies**: per-mode force and torque accumulation, drag, gravity
//! - **Colliders**: box and circle shapes with cached world geometry and AABBs
//! - **Narrow phase**: pair-keyed jump table of SAT tests
//! - **Debug draw**: collider outlines fed into line renderers
//!
//! ## Quick Start
//!
//! ```rust
//! use engine2d::prelude::*;
//!
//! fn main() -> Result<(), EngineError> {
//!     let mut engine = Engine::new(SimulationConfig::default())?;
//!
//!     let world = engine.world_mut();
//!     let ground = world.create_entity();
//!     world.add_component(ground, TransformComponent::from_position(Vec2::new(0.0, -50.0)))?;
//!     world.add_component(ground, ColliderComponent::rect(100.0, 100.0))?;
//!
//!     let crate_box = world.create_entity();
//!     world.add_component(crate_box, TransformComponent::from_position(Vec2::new(0.0, 2.0)))?;
//!     world.add_component(crate_box, RigidBodyComponent::new().with_gravity(true))?;
//!     world.add_component(crate_box, ColliderComponent::rect(1.0, 1.0))?;
//!
//!     for _ in 0..60 {
//!         engine.tick(1000.0 / 60.0);
//!     }
//!     assert!(!engine.contacts().is_empty());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::must_use_candidate)]

// Core engine modules
pub mod core;
pub mod config;

pub mod foundation;
pub mod ecs;
pub mod physics;
pub mod debug;

mod engine;

pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Engine, EngineError,
        core::config::{Config, ConfigError, SimulationConfig},
        foundation::{
            math::{Vec2, Vec4},
            time::{Time, Timer},
        },
        ecs::{
            AttachError, Component, ComponentHandle, Entity, SimulationContext, StepReport, System,
            SystemPhase, World,
            components::{
                ColliderComponent, ColliderType, ForceMode, RigidBodyComponent, RigidBodyError,
                TransformComponent,
            },
        },
        physics::{
            Bounds, ColliderShape, CollisionContact, CollisionJumpTable, CollisionLayers, ContactResult,
            Ray, RayHit, ShapeKind,
        },
        debug::{CollisionDebugSystem, DebugDrawSystem, LineRendererComponent},
    };
}
