//! # Core Engine Module
//!
//! Shared abstractions that the other subsystems depend on.
//!
//! ## Organization
//!
//! - **Config**: Simulation configuration consumed by the engine facade

pub mod config;


pub use config::{SimulationConfig, Config, ConfigError};
