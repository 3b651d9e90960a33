//! Orchestrator Engine
//!
//! Main simulation loop integrating all components:
//! - Scenario events (scheduled state changes)
//! - Demand model (decay, daily generation)
//! - Flight engine (progression, boarding, cycle completion)
//! - End-of-day consolidation (revenue posting, slot regeneration, pruning)
//! - Event logging (complete simulation history)
//!
//! # Architecture
//!
//! ```text
//! For each tick t (one simulated hour):
//! 1. Expire timed vehicle maintenance
//! 2. Execute scenario events scheduled for t
//! 3. Decay demand
//! 4. Generate the day's demand (first hour of the day)
//! 5. Advance flights (pickups feed the revenue buffer)
//! 6. End-of-day consolidation (last hour of the day)
//! 7. Advance time
//! ```
//!
//! Fresh demand is generated after decay so it is not decayed on the tick
//! it appears. Flight pickups read the demand the previous steps produced.
//!
//! # Example
//!
//! ```rust
//! use airline_simulator_core_rs::catalog::{City, Coordinates, Location, VehicleType};
//! use airline_simulator_core_rs::models::fleet::VehicleConfig;
//! use airline_simulator_core_rs::orchestrator::{Orchestrator, OrchestratorConfig};
//!
//! let city = |id: &str, lon: f64| City {
//!     id: id.to_string(),
//!     name: id.to_string(),
//!     country: "US".to_string(),
//!     population: 5_000_000,
//!     coordinates: Coordinates::new(40.0, lon),
//! };
//! let location = |id: &str, city_id: &str, lon: f64| Location {
//!     id: id.to_string(),
//!     name: id.to_string(),
//!     city_id: city_id.to_string(),
//!     country: "US".to_string(),
//!     coordinates: Coordinates::new(40.0, lon),
//!     turn_time_modifier: 1.0,
//!     operating_hours: (5, 23),
//! };
//!
//! let config = OrchestratorConfig {
//!     cities: vec![city("NYC", -74.0), city("CHI", -87.6)],
//!     locations: vec![location("JFK", "NYC", -73.8), location("ORD", "CHI", -87.9)],
//!     vehicle_types: vec![VehicleType {
//!         id: "A320".to_string(),
//!         name: "A320".to_string(),
//!         capacity: 150,
//!         range_km: 6000.0,
//!         speed_kmh: 830.0,
//!         base_turn_time_hours: 1.0,
//!         tonnage: 42.0,
//!         reliability: 0.95,
//!     }],
//!     vehicles: vec![VehicleConfig { id: "V1".to_string(), type_id: "A320".to_string() }],
//!     ..OrchestratorConfig::default()
//! };
//!
//! let mut orchestrator = Orchestrator::new(config).unwrap();
//! let route_id = orchestrator.create_route("JFK", "ORD", 180).unwrap();
//! orchestrator.assign_vehicle_to_route(&route_id, "V1", 3).unwrap();
//!
//! for _ in 0..48 {
//!     orchestrator.tick().unwrap();
//! }
//! assert_eq!(orchestrator.current_tick(), 48);
//! ```

use crate::catalog::{City, Geography, GeographyCatalog, Location, VehicleType};
use crate::core::time::{CalendarConfig, SimTimestamp, TimeManager};
use crate::demand::{self, DemandConfig};
use crate::events::{ScenarioEventHandler, ScheduledEvent};
use crate::flights::{self, FlightClock};
use crate::gates::{GateDefaults, GateError, GateInventory, PricingConfig};
use crate::ledger::{Ledger, LedgerError, TransactionCategory};
use crate::models::event::{Event, EventLog};
use crate::models::fleet::{Fleet, FleetConfig, FleetError, Vehicle, VehicleConfig};
use crate::models::gate::GateConfig;
use crate::models::state::SimulationState;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, info, warn};

// ============================================================================
// Configuration Types
// ============================================================================

fn default_history_retention_days() -> usize {
    28
}

/// Complete orchestrator configuration
///
/// Loadable from JSON; every tuning section falls back to its `Default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// RNG seed for deterministic simulation
    pub rng_seed: u64,

    /// Opening cash balance
    pub initial_balance: i64,

    pub cities: Vec<City>,
    pub locations: Vec<Location>,
    pub vehicle_types: Vec<VehicleType>,
    pub vehicles: Vec<VehicleConfig>,

    /// Gates present at simulation start
    #[serde(default)]
    pub initial_gates: Vec<GateConfig>,

    #[serde(default)]
    pub demand: DemandConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub fleet: FleetConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Days of completed-flight history kept for statistics
    #[serde(default = "default_history_retention_days")]
    pub history_retention_days: usize,

    #[serde(default)]
    pub scenario_events: Vec<ScheduledEvent>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            rng_seed: 12345,
            initial_balance: 10_000_000,
            cities: Vec::new(),
            locations: Vec::new(),
            vehicle_types: Vec::new(),
            vehicles: Vec::new(),
            initial_gates: Vec::new(),
            demand: DemandConfig::default(),
            pricing: PricingConfig::default(),
            fleet: FleetConfig::default(),
            calendar: CalendarConfig::default(),
            history_retention_days: default_history_retention_days(),
            scenario_events: Vec::new(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Simulation error types
///
/// Every user-facing failure is one of these; a failing command leaves the
/// state untouched.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimulationError {
    /// Bad input: unknown reference, out-of-range value, rule violation
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    /// No compatible gate slot for the request
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("State validation error: {0}")]
    StateValidationError(String),
}

impl SimulationError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        SimulationError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

impl From<LedgerError> for SimulationError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InsufficientFunds {
                required,
                available,
            } => SimulationError::InsufficientFunds {
                required,
                available,
            },
            overflow @ LedgerError::Overflow { .. } => {
                SimulationError::Validation(overflow.to_string())
            }
        }
    }
}

impl From<FleetError> for SimulationError {
    fn from(e: FleetError) -> Self {
        match e {
            FleetError::VehicleNotFound(id) => SimulationError::not_found("Vehicle", id),
            FleetError::TypeNotFound(id) => SimulationError::not_found("Vehicle type", id),
            other => SimulationError::Validation(other.to_string()),
        }
    }
}

impl From<GateError> for SimulationError {
    fn from(e: GateError) -> Self {
        match e {
            GateError::GateNotFound { gate_id } => SimulationError::not_found("Gate", gate_id),
            GateError::SlotNotFound { slot_id } => SimulationError::not_found("Slot", slot_id),
            GateError::BookingNotFound { booking_id } => {
                SimulationError::not_found("Booking", booking_id)
            }
            e @ (GateError::BookingInactive { .. }
            | GateError::NoWindows
            | GateError::InvalidWindow { .. }) => SimulationError::Validation(e.to_string()),
            e @ (GateError::SlotNotAvailable { .. }
            | GateError::NoSuitableGate { .. }
            | GateError::NoAvailableSlots { .. }) => {
                SimulationError::ResourceUnavailable(e.to_string())
            }
        }
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Main orchestrator owning the simulation state and tick loop
///
/// # Determinism
///
/// All randomness is via `rng_manager` with seeded xorshift64*, and every
/// collection is iterated in key order. Same seed + same config + same
/// command sequence = identical results.
pub struct Orchestrator {
    pub(crate) config: OrchestratorConfig,

    /// Reference data built from the config
    pub(crate) geography: GeographyCatalog,

    /// Simulation state (routes, flights, gates, demand, ledger)
    pub(crate) state: SimulationState,

    pub(crate) time_manager: TimeManager,

    pub(crate) rng_manager: RngManager,

    pub(crate) scenario_handler: ScenarioEventHandler,

    pub(crate) event_log: EventLog,
}

/// Result of a single tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    pub tick: usize,
    pub timestamp: SimTimestamp,

    pub scenario_events_executed: usize,

    /// Passengers removed by decay this tick
    pub passengers_decayed: u64,

    /// Units generated (first hour of a day only)
    pub demand_generated: u64,

    pub flights_advanced: usize,
    pub flights_paused: usize,
    pub passengers_boarded: u64,
    pub revenue_accrued: i64,
    pub cycles_completed: usize,

    /// Present on the last hour of a day
    pub end_of_day: Option<DaySummary>,
}

/// Outcome of end-of-day consolidation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub day: usize,
    pub revenue_posted: i64,
    pub revenue_transactions: usize,
    pub aggregates_pruned: usize,
    pub history_pruned: usize,
    pub waiting_passengers: u64,
    pub balance: i64,
}

impl Orchestrator {
    /// Create a new orchestrator from configuration
    ///
    /// Validates the configuration, builds the fleet and ledger, opens the
    /// initial gates and generates day 0 slots.
    pub fn new(config: OrchestratorConfig) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let geography = GeographyCatalog::new(config.cities.clone(), config.locations.clone());
        let fleet = Fleet::new(
            config.vehicle_types.clone(),
            config
                .vehicles
                .iter()
                .map(|v| Vehicle::new(v.id.clone(), v.type_id.clone()))
                .collect(),
            &config.fleet,
        );
        let mut state = SimulationState::new(fleet, Ledger::new(config.initial_balance));

        for location in &config.locations {
            state
                .gates
                .insert(location.id.clone(), GateInventory::new(location.id.clone()));
        }
        for gate in &config.initial_gates {
            let hours = geography
                .location(&gate.location_id)
                .map(|l| l.operating_hours)
                .ok_or_else(|| {
                    SimulationError::InvalidConfig(format!(
                        "Gate references unknown location {}",
                        gate.location_id
                    ))
                })?;
            if let Some(inventory) = state.gates.get_mut(&gate.location_id) {
                inventory.add_gate(
                    gate.gate_type,
                    &GateDefaults {
                        slot_policy: gate.slot_policy,
                        max_size: gate.max_size,
                        base_price: gate.base_price,
                    },
                    hours,
                    0,
                );
            }
        }

        info!(
            cities = config.cities.len(),
            locations = config.locations.len(),
            vehicles = config.vehicles.len(),
            gates = config.initial_gates.len(),
            seed = config.rng_seed,
            "orchestrator initialised"
        );

        Ok(Self {
            rng_manager: RngManager::new(config.rng_seed),
            scenario_handler: ScenarioEventHandler::new(config.scenario_events.clone()),
            geography,
            state,
            time_manager: TimeManager::new(),
            event_log: EventLog::new(),
            config,
        })
    }

    /// Validate configuration parameters
    fn validate_config(config: &OrchestratorConfig) -> Result<(), SimulationError> {
        let invalid = |msg: String| Err(SimulationError::InvalidConfig(msg));

        let mut city_ids = BTreeSet::new();
        for city in &config.cities {
            if !city_ids.insert(city.id.as_str()) {
                return invalid(format!("Duplicate city id: {}", city.id));
            }
        }

        let mut location_ids = BTreeSet::new();
        for location in &config.locations {
            if !location_ids.insert(location.id.as_str()) {
                return invalid(format!("Duplicate location id: {}", location.id));
            }
            if !city_ids.contains(location.city_id.as_str()) {
                return invalid(format!(
                    "Location {} references unknown city {}",
                    location.id, location.city_id
                ));
            }
            let (open, close) = location.operating_hours;
            if open >= close || close > 24 {
                return invalid(format!(
                    "Location {} has invalid operating hours {}-{}",
                    location.id, open, close
                ));
            }
            if !(location.turn_time_modifier > 0.0) {
                return invalid(format!(
                    "Location {} turn time modifier must be positive",
                    location.id
                ));
            }
        }

        let mut type_ids = BTreeSet::new();
        for vtype in &config.vehicle_types {
            if !type_ids.insert(vtype.id.as_str()) {
                return invalid(format!("Duplicate vehicle type id: {}", vtype.id));
            }
            if vtype.capacity == 0 || !(vtype.speed_kmh > 0.0) || !(vtype.reliability > 0.0) {
                return invalid(format!(
                    "Vehicle type {} needs positive capacity, speed and reliability",
                    vtype.id
                ));
            }
        }

        let mut vehicle_ids = BTreeSet::new();
        for vehicle in &config.vehicles {
            if !vehicle_ids.insert(vehicle.id.as_str()) {
                return invalid(format!("Duplicate vehicle id: {}", vehicle.id));
            }
            if !type_ids.contains(vehicle.type_id.as_str()) {
                return invalid(format!(
                    "Vehicle {} references unknown type {}",
                    vehicle.id, vehicle.type_id
                ));
            }
        }

        for gate in &config.initial_gates {
            if !location_ids.contains(gate.location_id.as_str()) {
                return invalid(format!(
                    "Gate references unknown location {}",
                    gate.location_id
                ));
            }
            if gate.base_price < 0 {
                return invalid(format!("Gate at {} has negative base price", gate.location_id));
            }
        }

        if config.initial_balance < 0 {
            return invalid("Initial balance must be non-negative".to_string());
        }
        if !(config.demand.decay_factor >= 0.0 && config.demand.decay_factor <= 1.0) {
            return invalid("Demand decay factor must be within [0, 1]".to_string());
        }
        if !(config.fleet.reference_speed_kmh > 0.0) {
            return invalid("Reference speed must be positive".to_string());
        }

        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn current_tick(&self) -> usize {
        self.time_manager.current_tick()
    }

    pub fn current_day(&self) -> usize {
        self.time_manager.current_day()
    }

    pub fn current_timestamp(&self) -> SimTimestamp {
        self.time_manager.timestamp()
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn geography(&self) -> &GeographyCatalog {
        &self.geography
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Drain the event log
    pub fn take_events(&mut self) -> Vec<Event> {
        self.event_log.take()
    }

    pub(crate) fn log_event(&mut self, event: Event) {
        self.event_log.log(event);
    }

    pub(crate) fn flight_clock(&self) -> FlightClock {
        FlightClock {
            tick: self.current_tick(),
            day: self.current_day(),
            timestamp: self.current_timestamp(),
        }
    }

    // ========================================================================
    // Tick Loop Implementation
    // ========================================================================

    /// Execute one simulation tick (one simulated hour)
    pub fn tick(&mut self) -> Result<TickResult, SimulationError> {
        let clock = self.flight_clock();
        let current_tick = clock.tick;
        let current_day = clock.day;

        // STEP 1: MAINTENANCE EXPIRY
        for vehicle_id in self.state.fleet.expire_maintenance(current_tick) {
            self.log_event(Event::VehicleMaintenanceEnded {
                tick: current_tick,
                vehicle_id,
            });
        }

        // STEP 2: SCENARIO EVENTS
        let (scenario_events_executed, failures) = self.scenario_handler.execute_tick_events(
            &mut self.state,
            current_tick,
            &mut self.event_log,
        );
        for failure in failures {
            warn!(tick = current_tick, "scenario event failed: {}", failure);
        }

        // STEP 3: DEMAND DECAY
        let passengers_decayed = self.state.demand.decay(self.config.demand.decay_factor);

        // STEP 4: DAILY DEMAND GENERATION
        let mut demand_generated = 0;
        if self.time_manager.is_start_of_day() && self.state.demand.needs_generation(current_day)
        {
            let generated = demand::generate_daily_demand(
                &mut self.state.demand,
                &self.geography,
                &self.config.demand,
                &mut self.rng_manager,
                current_day,
            );
            demand_generated = generated.units_generated;
            self.log_event(Event::DemandGenerated {
                tick: current_tick,
                day: current_day,
                units: generated.units_generated,
                aggregates_touched: generated.aggregates_touched,
            });
        }

        // STEP 5: FLIGHT PROGRESSION
        let flight_result = flights::advance_flights(&mut self.state, clock, &mut self.event_log);

        // STEP 6: END-OF-DAY CONSOLIDATION
        let end_of_day = if self.time_manager.is_end_of_day() {
            Some(self.handle_end_of_day()?)
        } else {
            None
        };

        // STEP 7: ADVANCE TIME
        self.time_manager.advance_tick();

        debug!(
            tick = current_tick,
            decayed = passengers_decayed,
            generated = demand_generated,
            boarded = flight_result.passengers_boarded,
            "tick complete"
        );

        Ok(TickResult {
            tick: current_tick,
            timestamp: clock.timestamp,
            scenario_events_executed,
            passengers_decayed,
            demand_generated,
            flights_advanced: flight_result.flights_advanced,
            flights_paused: flight_result.flights_paused,
            passengers_boarded: flight_result.passengers_boarded,
            revenue_accrued: flight_result.revenue_accrued,
            cycles_completed: flight_result.cycles_completed,
            end_of_day,
        })
    }

    /// Run `hours` ticks, returning every result
    pub fn run(&mut self, hours: usize) -> Result<Vec<TickResult>, SimulationError> {
        (0..hours).map(|_| self.tick()).collect()
    }

    /// Handle end-of-day processing
    ///
    /// Posts one ledger transaction per non-empty revenue bucket,
    /// regenerates every gate's slots for the next day, prunes stale
    /// demand and old flight history.
    fn handle_end_of_day(&mut self) -> Result<DaySummary, SimulationError> {
        let tick = self.current_tick();
        let day = self.current_day();
        let timestamp = self.current_timestamp();

        // Revenue consolidation
        let mut revenue_posted = 0;
        let mut revenue_transactions = 0;
        for bucket in self.state.revenue_buffer.drain() {
            if bucket.revenue == 0 {
                continue;
            }
            let description = bucket.summary();
            self.state.ledger.add_transaction(
                bucket.revenue,
                TransactionCategory::FlightRevenue,
                description.clone(),
                timestamp,
                tick,
            )?;
            revenue_posted += bucket.revenue;
            revenue_transactions += 1;
            self.log_event(Event::RevenuePosted {
                tick,
                route_id: bucket.route_id,
                leg: bucket.leg.as_str().to_string(),
                amount: bucket.revenue,
                description,
            });
        }

        // Slots for tomorrow
        for (location_id, inventory) in self.state.gates.iter_mut() {
            let Some(location) = self.geography.location(location_id) else {
                continue;
            };
            inventory.regenerate(location.operating_hours, day + 1, self.state.bookings.values());
        }

        let aggregates_pruned = self
            .state
            .demand
            .prune(day, self.config.demand.prune_after_days);
        let history_pruned = self
            .state
            .prune_history(day, self.config.history_retention_days);

        let summary = DaySummary {
            day,
            revenue_posted,
            revenue_transactions,
            aggregates_pruned,
            history_pruned,
            waiting_passengers: self.state.demand.total_waiting(),
            balance: self.state.ledger.balance(),
        };

        self.log_event(Event::EndOfDay {
            tick,
            day,
            revenue_posted,
            aggregates_pruned,
            waiting_passengers: summary.waiting_passengers,
        });
        info!(
            day,
            revenue = revenue_posted,
            balance = summary.balance,
            waiting = summary.waiting_passengers,
            "end of day"
        );

        Ok(summary)
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("current_tick", &self.current_tick())
            .field("routes", &self.state.num_routes())
            .field("flights", &self.state.num_flights())
            .field("balance", &self.state.ledger.balance())
            .field("event_count", &self.event_log.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
