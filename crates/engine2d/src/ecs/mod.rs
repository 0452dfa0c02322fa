//! Entity-Component-System implementation
//!
//! Entities are generational keys, components live in per-type slot maps,
//! and systems run once per fixed step in phase order.

pub mod world;
pub mod entity;
pub mod component;
pub mod storage;
pub mod system;
pub mod scheduler;
pub mod components;
pub mod systems;

#[cfg(test)]
mod tests;

pub use world::{World, AttachError};
pub use entity::Entity;
pub use component::Component;
pub use storage::{ComponentHandle, ComponentStorage};
pub use system::{System, SimulationContext};
pub use scheduler::{FixedStepScheduler, StepReport, SystemPhase, SystemSchedule};
