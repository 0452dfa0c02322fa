//! # Simulation Configuration
//!
//! Tunables for the fixed-step loop and the global physics environment.
//! Values can be loaded from TOML or RON through the [`Config`] trait and
//! are validated once, when the engine is built.
//!
//! ```toml
//! fixed_delta_time_ms = 16.666666
//! max_accumulator_ms = 200.0
//! gravity = [0.0, -10.0]
//! debug_colliders = false
//! ```

use serde::{Serialize, Deserialize};

use crate::ecs::scheduler::full_step_bound;
use crate::foundation::math::Vec2;
use crate::foundation::time::DEFAULT_FIXED_DELTA_TIME_MS;

pub use crate::config::{Config, ConfigError};

/// Default accumulator cap in milliseconds
pub const DEFAULT_MAX_ACCUMULATOR_MS: f32 = 200.0;

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Size of one fixed step in milliseconds
    pub fixed_delta_time_ms: f32,
    /// Upper bound on carried-over frame time in milliseconds
    pub max_accumulator_ms: f32,
    /// Global gravity, applied as an acceleration to bodies using gravity
    pub gravity: Vec2,
    /// Draw every collider outline, regardless of the collider's own flag
    pub debug_colliders: bool,
}

impl SimulationConfig {
    /// Create a configuration with engine defaults
    pub fn new() -> Self {
        Self {
            fixed_delta_time_ms: DEFAULT_FIXED_DELTA_TIME_MS,
            max_accumulator_ms: DEFAULT_MAX_ACCUMULATOR_MS,
            gravity: Vec2::new(0.0, -10.0),
            debug_colliders: false,
        }
    }

    /// Set the fixed step
    pub fn with_fixed_delta_time_ms(mut self, fixed_delta_time_ms: f32) -> Self {
        self.fixed_delta_time_ms = fixed_delta_time_ms;
        self
    }

    /// Set the accumulator cap
    pub fn with_max_accumulator_ms(mut self, max_accumulator_ms: f32) -> Self {
        self.max_accumulator_ms = max_accumulator_ms;
        self
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Draw every collider outline
    pub fn with_debug_colliders(mut self, enabled: bool) -> Self {
        self.debug_colliders = enabled;
        self
    }

    /// Worst-case number of full fixed steps a single tick can run
    pub fn max_steps_per_tick(&self) -> u32 {
        full_step_bound(self.fixed_delta_time_ms, self.max_accumulator_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_delta_time_ms.is_finite() && self.fixed_delta_time_ms > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "fixed_delta_time_ms",
                reason: format!("must be positive and finite, got {}", self.fixed_delta_time_ms),
            });
        }

        if !self.max_accumulator_ms.is_finite() || self.max_accumulator_ms < self.fixed_delta_time_ms {
            return Err(ConfigError::InvalidValue {
                field: "max_accumulator_ms",
                reason: format!(
                    "must be finite and at least one fixed step ({} ms), got {}",
                    self.fixed_delta_time_ms, self.max_accumulator_ms
                ),
            });
        }

        if !(self.gravity.x.is_finite() && self.gravity.y.is_finite()) {
            return Err(ConfigError::InvalidValue {
                field: "gravity",
                reason: "components must be finite".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for SimulationConfig {}
