//! Airline Simulator Core - Rust Engine
//!
//! Tick-driven airline operations simulator with deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Time management and calendar
//! - **catalog**: Static reference data (geography, vehicle types)
//! - **models**: Domain types (Route, Flight, Gate, Fleet, State)
//! - **demand**: Passenger demand generation, decay and pickup
//! - **flights**: Flight engine (phase progression, boarding)
//! - **gates**: Gate inventories, slot booking and dynamic pricing
//! - **ledger**: Cash ledger and same-day revenue consolidation
//! - **events**: Scheduled scenario events
//! - **orchestrator**: Main simulation loop and command surface
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (whole currency units)
//! 2. All randomness is deterministic (seeded RNG)
//! 3. Ledger balance always equals initial balance plus all transactions
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod catalog;
pub mod core;
pub mod demand;
pub mod events;
pub mod flights;
pub mod gates;
pub mod ledger;
pub mod models;
pub mod orchestrator;
pub mod rng;

// Re-exports for convenience
pub use core::time::{SimTimestamp, TimeManager};
pub use ledger::{Ledger, LedgerError, LedgerTransaction, TransactionCategory};
pub use models::{
    event::{Event, EventLog},
    state::SimulationState,
};
pub use orchestrator::{
    DaySummary, Orchestrator, OrchestratorConfig, RouteStatistics, SimulationError, StateSnapshot,
    TickResult,
};
pub use rng::RngManager;

// FFI module (when feature enabled)
#[cfg(feature = "python")]
pub mod ffi;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn airline_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::orchestrator::PyOrchestrator>()?;
    Ok(())
}
