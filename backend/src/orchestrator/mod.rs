//! Orchestrator - main simulation loop
//!
//! Owns the simulation state and exposes the command/query surface.
//!
//! See `engine.rs` for the tick loop.

pub mod checkpoint;
mod commands;
pub mod engine;
mod queries;

// Re-export main types for convenience
pub use engine::{DaySummary, Orchestrator, OrchestratorConfig, SimulationError, TickResult};
pub use queries::RouteStatistics;

// Re-export checkpoint types
pub use checkpoint::{compute_config_hash, validate_snapshot, StateSnapshot};
