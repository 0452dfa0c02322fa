//! Core engine implementation
//!
//! [`Engine`] owns the world and drives it: every tick converts frame time
//! into fixed steps (integration, geometry refresh, contact query), then
//! runs the per-frame pass.

use std::path::Path;

use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::core::config::SimulationConfig;
use crate::debug::CollisionDebugSystem;
use crate::ecs::components::RigidBodyError;
use crate::ecs::scheduler::{FixedStepScheduler, StepReport, SystemSchedule};
use crate::ecs::system::{SimulationContext, System};
use crate::ecs::systems::{ColliderSystem, RigidBodySystem};
use crate::ecs::{AttachError, World};
use crate::foundation::logging::{info, trace};
use crate::foundation::time::{Time, Timer};
use crate::physics::{CollisionJumpTable, ContactResult, PhysicsCollisionSystem};

/// Main engine struct
pub struct Engine {
    world: World,
    time: Time,
    timer: Timer,
    scheduler: FixedStepScheduler,
    schedule: SystemSchedule,
    collision: PhysicsCollisionSystem,
    config: SimulationConfig,
    paused: bool,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: SimulationConfig) -> Result<Self, EngineError> {
        Self::with_jump_table(config, CollisionJumpTable::new())
    }

    /// Create an engine with a custom narrow-phase table
    pub fn with_jump_table(config: SimulationConfig, jump_table: CollisionJumpTable) -> Result<Self, EngineError> {
        config.validate()?;

        info!(
            "Initializing engine: {:.3} ms fixed step, {:.1} ms cap, gravity ({}, {})",
            config.fixed_delta_time_ms, config.max_accumulator_ms, config.gravity.x, config.gravity.y
        );

        let mut schedule = SystemSchedule::new();
        schedule.add_system(Box::new(RigidBodySystem::new()));
        schedule.add_system(Box::new(ColliderSystem::new()));
        schedule.add_system(Box::new(CollisionDebugSystem::new(config.debug_colliders)));

        Ok(Self {
            world: World::new(),
            time: Time::new(config.fixed_delta_time_ms),
            timer: Timer::new(),
            scheduler: FixedStepScheduler::new(config.fixed_delta_time_ms, config.max_accumulator_ms),
            schedule,
            collision: PhysicsCollisionSystem::with_jump_table(jump_table),
            config,
            paused: false,
        })
    }

    /// Create an engine from a TOML or RON configuration file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let config = SimulationConfig::load_from_file(path)?;
        info!("Loaded simulation config from {}", path.display());
        Self::new(config)
    }

    /// Register an additional system; it runs in its phase after built-in ones
    pub fn add_system(&mut self, system: Box<dyn System>) {
        info!("Registered system {}", system.name());
        self.schedule.add_system(system);
    }

    /// Advance by an externally measured frame delta in milliseconds
    ///
    /// Runs up to `max_accumulator_ms / fixed_delta_time_ms` full steps plus
    /// one partial step, then the per-frame pass. A paused engine does nothing.
    pub fn tick(&mut self, frame_delta_ms: f32) -> StepReport {
        if self.paused {
            return StepReport::default();
        }

        let ctx = self.context();
        let Self {
            world,
            time,
            scheduler,
            schedule,
            collision,
            ..
        } = self;

        let report = scheduler.advance(frame_delta_ms, |alpha| {
            time.fixed_update(frame_delta_ms, alpha);
            trace!("Fixed step {} (alpha {:.3})", time.fixed_step_count(), alpha);
            schedule.run_fixed(world, &ctx, alpha);
            collision.fixed_update(world, &ctx, alpha);
        });

        time.update(frame_delta_ms);
        schedule.run_frame(world, &ctx);
        report
    }

    /// Advance by the wall-clock time since the previous call
    pub fn update(&mut self) -> StepReport {
        self.timer.update();
        self.tick(self.timer.delta_time_ms())
    }

    /// Stop advancing; ticks are ignored until [`Engine::resume`]
    pub fn pause(&mut self) {
        if !self.paused {
            info!("Simulation paused");
            self.paused = true;
        }
    }

    /// Resume after a pause without catching up on the paused time
    pub fn resume(&mut self) {
        if self.paused {
            info!("Simulation resumed");
            self.paused = false;
            self.scheduler.reset();
            self.timer.reset();
        }
    }

    /// Whether the engine is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Context handed to systems each step
    pub fn context(&self) -> SimulationContext {
        SimulationContext::new(self.time.fixed_delta_time_in_second(), self.config.gravity)
    }

    /// Get the ECS world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Simulation clock
    pub fn time(&self) -> &Time {
        &self.time
    }

    /// Active configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Contacts found by the most recent fixed step
    pub fn contacts(&self) -> &[ContactResult] {
        self.collision.contacts()
    }

    /// Take the most recent contacts
    pub fn take_contacts(&mut self) -> Vec<ContactResult> {
        self.collision.take_contacts()
    }

    /// Run the pair query against the current geometry, outside of a step
    pub fn detect_contacts(&self) -> Vec<ContactResult> {
        self.collision.detect(&self.world)
    }

    /// Collision system (jump table, last contacts)
    pub fn collision_system(&self) -> &PhysicsCollisionSystem {
        &self.collision
    }

    /// Mutable collision system
    pub fn collision_system_mut(&mut self) -> &mut PhysicsCollisionSystem {
        &mut self.collision
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Component attach error
    #[error("Attach error: {0}")]
    Attach(#[from] AttachError),

    /// Rigid body configuration error
    #[error("Rigid body error: {0}")]
    RigidBody(#[from] RigidBodyError),
}
