//! Scenario events: scheduled state changes injected into a run

pub mod handler;
pub mod types;

pub use handler::ScenarioEventHandler;
pub use types::{EventSchedule, ScenarioEvent, ScheduledEvent};
