//! Fixed-step scheduling
//!
//! [`FixedStepScheduler`] turns irregular frame deltas into a bounded number
//! of fixed-size steps. [`SystemSchedule`] runs the registered systems of one
//! step in phase order, so integration always finishes before geometry is
//! refreshed from the new transforms.

use super::system::{SimulationContext, System};
use super::World;
use crate::foundation::logging::{trace, warn};

/// System execution phases with explicit ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SystemPhase {
    /// Force integration, writes transforms
    Integration = 0,
    /// Collider geometry and bounds refresh, reads transforms
    Geometry = 1,
    /// Queries that need the refreshed geometry of this step
    PostStep = 2,
}

/// Outcome of one scheduler tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    /// Number of full (`alpha = 1`) steps executed
    pub full_steps: u32,
    /// Alpha of the trailing partial step, `None` if no step ran at all
    pub partial_alpha: Option<f32>,
    /// Whether the accumulator hit its cap this tick
    pub clamped: bool,
}

impl StepReport {
    /// Total steps executed, partial step included
    pub fn total_steps(&self) -> u32 {
        self.full_steps + u32::from(self.partial_alpha.is_some())
    }
}

/// Accumulator loop converting frame time into fixed steps
#[derive(Debug, Clone)]
pub struct FixedStepScheduler {
    fixed_delta_time_ms: f32,
    max_accumulator_ms: f32,
    accumulator: f32,
}

impl FixedStepScheduler {
    /// Create a scheduler; both values are in milliseconds
    pub fn new(fixed_delta_time_ms: f32, max_accumulator_ms: f32) -> Self {
        Self {
            fixed_delta_time_ms,
            max_accumulator_ms,
            accumulator: 0.0,
        }
    }

    /// Fixed step length in milliseconds
    pub fn fixed_delta_time_ms(&self) -> f32 {
        self.fixed_delta_time_ms
    }

    /// Accumulator cap in milliseconds
    pub fn max_accumulator_ms(&self) -> f32 {
        self.max_accumulator_ms
    }

    /// Upper bound on full steps for a single tick
    pub fn max_full_steps(&self) -> u32 {
        full_step_bound(self.fixed_delta_time_ms, self.max_accumulator_ms)
    }

    /// Time carried between ticks (always zero after a tick completes)
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Drop any carried time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Advance by one frame, calling `step(alpha)` for every fixed step
    ///
    /// Full steps run while the accumulator exceeds one step; the leftover
    /// fraction then runs as a single partial step and the accumulator is
    /// reset. Negative deltas are treated as zero.
    pub fn advance(&mut self, frame_delta_ms: f32, mut step: impl FnMut(f32)) -> StepReport {
        self.accumulator += frame_delta_ms.max(0.0);

        let clamped = self.accumulator > self.max_accumulator_ms;
        if clamped {
            warn!(
                "Frame delta {:.1} ms exceeds the {:.1} ms cap, dropping {:.1} ms",
                frame_delta_ms,
                self.max_accumulator_ms,
                self.accumulator - self.max_accumulator_ms
            );
            self.accumulator = self.max_accumulator_ms;
        }

        let mut full_steps = 0;
        while self.accumulator > self.fixed_delta_time_ms {
            step(1.0);
            self.accumulator -= self.fixed_delta_time_ms;
            full_steps += 1;
        }

        let alpha = self.accumulator / self.fixed_delta_time_ms;
        step(alpha);
        self.accumulator = 0.0;

        StepReport {
            full_steps,
            partial_alpha: Some(alpha),
            clamped,
        }
    }
}

/// Whole fixed steps that fit in the accumulator cap
///
/// Saturates at `u32::MAX`; a NaN or non-positive ratio yields zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn full_step_bound(fixed_delta_time_ms: f32, max_accumulator_ms: f32) -> u32 {
    let steps = (max_accumulator_ms / fixed_delta_time_ms).floor();
    if steps.is_nan() || steps <= 0.0 {
        0
    } else if steps >= u32::MAX as f32 {
        u32::MAX
    } else {
        steps as u32
    }
}

/// Ordered set of systems run once per fixed step
#[derive(Default)]
pub struct SystemSchedule {
    systems: Vec<Box<dyn System>>,
}

impl SystemSchedule {
    /// Create an empty schedule
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a system; systems of the same phase keep insertion order
    pub fn add_system(&mut self, system: Box<dyn System>) {
        let phase = system.phase();
        let index = self
            .systems
            .iter()
            .position(|existing| existing.phase() > phase)
            .unwrap_or(self.systems.len());
        self.systems.insert(index, system);
    }

    /// Number of registered systems
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether no systems are registered
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// System names in execution order
    pub fn system_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.systems.iter().map(|system| system.name())
    }

    /// Run one fixed step
    pub fn run_fixed(&mut self, world: &mut World, ctx: &SimulationContext, alpha: f32) {
        for system in &mut self.systems {
            trace!("{} fixed_update (alpha {:.3})", system.name(), alpha);
            system.fixed_update(world, ctx, alpha);
        }
    }

    /// Run the per-frame pass
    pub fn run_frame(&mut self, world: &mut World, ctx: &SimulationContext) {
        for system in &mut self.systems {
            system.update(world, ctx);
        }
    }
}
