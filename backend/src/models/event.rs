//! Event logging for auditing and analysis.
//!
//! Every significant state change during a tick or a command is captured
//! as an [`Event`]. Events are logged in the order they occur and carry
//! the tick at which they happened.
//!
//! # Event Types
//!
//! - **Demand**: daily generation
//! - **Flight**: boarding, cycle completion, pause/resume
//! - **Ledger**: revenue posting, rejected expenses, adjustments
//! - **Gate**: purchase, booking, cancellation
//! - **Route**: creation, deletion, vehicle assignment
//! - **EOD**: end-of-day consolidation
//!
//! # Example
//!
//! ```rust
//! use airline_simulator_core_rs::models::Event;
//!
//! let event = Event::PassengersBoarded {
//!     tick: 10,
//!     route_id: "route_0001".to_string(),
//!     vehicle_id: "V1".to_string(),
//!     leg: "outbound".to_string(),
//!     passengers: 150,
//!     revenue: 30_000,
//! };
//!
//! assert_eq!(event.tick(), 10);
//! assert_eq!(event.route_id(), Some("route_0001"));
//! ```

use serde::{Deserialize, Serialize};

/// Simulation event capturing a state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Daily demand generated across all cities
    DemandGenerated {
        tick: usize,
        day: usize,
        units: u64,
        aggregates_touched: usize,
    },

    /// A pickup happened at a boarding edge
    PassengersBoarded {
        tick: usize,
        route_id: String,
        vehicle_id: String,
        leg: String,
        passengers: u32,
        revenue: i64,
    },

    /// A round trip finished and a new one began in the same tick
    FlightCycleCompleted {
        tick: usize,
        route_id: String,
        vehicle_id: String,
        passengers: u32,
        load_factor: f64,
        revenue: i64,
    },

    /// Flight frozen because its vehicle is unavailable
    FlightPaused {
        tick: usize,
        route_id: String,
        vehicle_id: String,
    },

    /// Frozen flight continues where it stopped
    FlightResumed {
        tick: usize,
        route_id: String,
        vehicle_id: String,
        paused_ticks: usize,
    },

    /// Consolidated same-day revenue posted for one route leg
    RevenuePosted {
        tick: usize,
        route_id: String,
        leg: String,
        amount: i64,
        description: String,
    },

    GatePurchased {
        tick: usize,
        location_id: String,
        gate_id: String,
        gate_type: String,
        cost: i64,
    },

    GateBooked {
        tick: usize,
        booking_id: String,
        route_id: String,
        vehicle_id: String,
        gate_id: String,
        slot_count: usize,
        cost: i64,
    },

    GateBookingCancelled {
        tick: usize,
        booking_id: String,
        route_id: String,
        slots_released: usize,
    },

    RouteCreated {
        tick: usize,
        route_id: String,
        origin_id: String,
        destination_id: String,
    },

    RouteDeleted {
        tick: usize,
        route_id: String,
    },

    VehicleAssigned {
        tick: usize,
        route_id: String,
        vehicle_id: String,
        daily_flights: u32,
    },

    VehicleRemoved {
        tick: usize,
        route_id: String,
        vehicle_id: String,
    },

    VehicleMaintenanceStarted {
        tick: usize,
        vehicle_id: String,
        until_tick: Option<usize>,
    },

    VehicleMaintenanceEnded {
        tick: usize,
        vehicle_id: String,
    },

    /// The ledger refused an expense
    TransactionRejected {
        tick: usize,
        category: String,
        amount: i64,
        balance: i64,
    },

    /// A scheduled scenario event fired
    ScenarioEventExecuted {
        tick: usize,
        event_type: String,
        details: serde_json::Value,
    },

    /// End-of-day consolidation ran
    EndOfDay {
        tick: usize,
        day: usize,
        revenue_posted: i64,
        aggregates_pruned: usize,
        waiting_passengers: u64,
    },
}

impl Event {
    /// Get the tick number when this event occurred
    pub fn tick(&self) -> usize {
        match self {
            Event::DemandGenerated { tick, .. }
            | Event::PassengersBoarded { tick, .. }
            | Event::FlightCycleCompleted { tick, .. }
            | Event::FlightPaused { tick, .. }
            | Event::FlightResumed { tick, .. }
            | Event::RevenuePosted { tick, .. }
            | Event::GatePurchased { tick, .. }
            | Event::GateBooked { tick, .. }
            | Event::GateBookingCancelled { tick, .. }
            | Event::RouteCreated { tick, .. }
            | Event::RouteDeleted { tick, .. }
            | Event::VehicleAssigned { tick, .. }
            | Event::VehicleRemoved { tick, .. }
            | Event::VehicleMaintenanceStarted { tick, .. }
            | Event::VehicleMaintenanceEnded { tick, .. }
            | Event::TransactionRejected { tick, .. }
            | Event::ScenarioEventExecuted { tick, .. }
            | Event::EndOfDay { tick, .. } => *tick,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::DemandGenerated { .. } => "DemandGenerated",
            Event::PassengersBoarded { .. } => "PassengersBoarded",
            Event::FlightCycleCompleted { .. } => "FlightCycleCompleted",
            Event::FlightPaused { .. } => "FlightPaused",
            Event::FlightResumed { .. } => "FlightResumed",
            Event::RevenuePosted { .. } => "RevenuePosted",
            Event::GatePurchased { .. } => "GatePurchased",
            Event::GateBooked { .. } => "GateBooked",
            Event::GateBookingCancelled { .. } => "GateBookingCancelled",
            Event::RouteCreated { .. } => "RouteCreated",
            Event::RouteDeleted { .. } => "RouteDeleted",
            Event::VehicleAssigned { .. } => "VehicleAssigned",
            Event::VehicleRemoved { .. } => "VehicleRemoved",
            Event::VehicleMaintenanceStarted { .. } => "VehicleMaintenanceStarted",
            Event::VehicleMaintenanceEnded { .. } => "VehicleMaintenanceEnded",
            Event::TransactionRejected { .. } => "TransactionRejected",
            Event::ScenarioEventExecuted { .. } => "ScenarioEventExecuted",
            Event::EndOfDay { .. } => "EndOfDay",
        }
    }

    /// Get route ID if event relates to a specific route
    pub fn route_id(&self) -> Option<&str> {
        match self {
            Event::PassengersBoarded { route_id, .. }
            | Event::FlightCycleCompleted { route_id, .. }
            | Event::FlightPaused { route_id, .. }
            | Event::FlightResumed { route_id, .. }
            | Event::RevenuePosted { route_id, .. }
            | Event::GateBooked { route_id, .. }
            | Event::GateBookingCancelled { route_id, .. }
            | Event::RouteCreated { route_id, .. }
            | Event::RouteDeleted { route_id, .. }
            | Event::VehicleAssigned { route_id, .. }
            | Event::VehicleRemoved { route_id, .. } => Some(route_id),
            _ => None,
        }
    }

    /// Get vehicle ID if event relates to a specific vehicle
    pub fn vehicle_id(&self) -> Option<&str> {
        match self {
            Event::PassengersBoarded { vehicle_id, .. }
            | Event::FlightCycleCompleted { vehicle_id, .. }
            | Event::FlightPaused { vehicle_id, .. }
            | Event::FlightResumed { vehicle_id, .. }
            | Event::GateBooked { vehicle_id, .. }
            | Event::VehicleAssigned { vehicle_id, .. }
            | Event::VehicleRemoved { vehicle_id, .. }
            | Event::VehicleMaintenanceStarted { vehicle_id, .. }
            | Event::VehicleMaintenanceEnded { vehicle_id, .. } => Some(vehicle_id),
            _ => None,
        }
    }
}

/// Event log for storing and querying simulation events.
///
/// A thin wrapper around `Vec<Event>`. Long runs should drain it
/// periodically with [`EventLog::take`].
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_at_tick(&self, tick: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_route(&self, route_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.route_id() == Some(route_id))
            .collect()
    }

    pub fn events_for_vehicle(&self, vehicle_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.vehicle_id() == Some(vehicle_id))
            .collect()
    }

    /// Remove and return every logged event
    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
