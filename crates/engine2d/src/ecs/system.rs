//! System trait and the per-step simulation context

use super::scheduler::SystemPhase;
use super::World;
use crate::foundation::math::Vec2;

/// Explicit simulation context handed to every system
///
/// Carries the fixed step size and global environment so systems never read
/// global state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationContext {
    /// Fixed step length in seconds
    pub fixed_delta_time_in_second: f32,
    /// Global gravity acceleration
    pub gravity: Vec2,
}

impl SimulationContext {
    /// Create a context
    pub fn new(fixed_delta_time_in_second: f32, gravity: Vec2) -> Self {
        Self {
            fixed_delta_time_in_second,
            gravity,
        }
    }

    /// Effective step length for a (possibly partial) step
    pub fn step_seconds(&self, alpha: f32) -> f32 {
        self.fixed_delta_time_in_second * alpha
    }
}

/// System trait for processing entities and components
pub trait System {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Which phase of the fixed step this system belongs to
    fn phase(&self) -> SystemPhase;

    /// Run one fixed step; `alpha` is 1 for full steps and the leftover
    /// fraction for the trailing partial step
    fn fixed_update(&mut self, world: &mut World, ctx: &SimulationContext, alpha: f32);

    /// Run once per frame, after all fixed steps of that frame
    fn update(&mut self, _world: &mut World, _ctx: &SimulationContext) {}
}
