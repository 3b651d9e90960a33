//! Domain models for the airline simulator

pub mod event;
pub mod fleet;
pub mod flight;
pub mod gate;
pub mod passenger;
pub mod route;
pub mod state;

// Re-exports
pub use event::{Event, EventLog};
pub use fleet::{Fleet, FleetConfig, FleetError, Vehicle, VehicleConfig, VehicleStatus};
pub use flight::{CompletedFlight, Flight, FlightPhase, FlightTiming, Leg};
pub use gate::{Gate, GateBooking, GateType, Slot, SlotPolicy, SlotStatus, TimeWindow};
pub use passenger::PassengerAggregate;
pub use route::{Route, RouteEnd, ScheduleEntry};
pub use state::SimulationState;
