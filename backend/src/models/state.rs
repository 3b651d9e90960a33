//! Simulation State
//!
//! The single authoritative state tree of the airline simulation. It is
//! owned by the orchestrator and is exactly what a checkpoint persists.
//!
//! # Critical Invariants
//!
//! 1. **One flight per vehicle**: `flights` is keyed by vehicle id, and a
//!    flight exists iff its vehicle is assigned to the flight's route
//! 2. **Slot ownership**: a slot is Booked iff an active booking references it
//! 3. **Ledger balance**: balance equals initial balance plus all accepted amounts
//! 4. **Deterministic order**: every map is a `BTreeMap`

use crate::demand::DemandPool;
use crate::gates::GateInventory;
use crate::ledger::{Ledger, RevenueBuffer};
use crate::models::fleet::Fleet;
use crate::models::flight::{CompletedFlight, Flight};
use crate::models::gate::GateBooking;
use crate::models::route::Route;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete simulation state
///
/// Fields are public so engine functions can borrow disjoint parts
/// (e.g. the demand pool and a flight) at the same time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Routes by id (`route_0001`, ...)
    pub routes: BTreeMap<String, Route>,

    /// Live flights by vehicle id
    pub flights: BTreeMap<String, Flight>,

    /// Completed cycles, oldest first, pruned to the retention window
    pub completed_flights: Vec<CompletedFlight>,

    pub fleet: Fleet,

    /// Gate inventories by location id
    pub gates: BTreeMap<String, GateInventory>,

    /// Every booking ever made, active or cancelled, by id
    pub bookings: BTreeMap<String, GateBooking>,

    pub demand: DemandPool,

    /// Pickup revenue awaiting end-of-day posting
    pub revenue_buffer: RevenueBuffer,

    pub ledger: Ledger,

    pub next_route_number: u32,
    pub next_booking_number: u32,
}

impl SimulationState {
    pub fn new(fleet: Fleet, ledger: Ledger) -> Self {
        Self {
            routes: BTreeMap::new(),
            flights: BTreeMap::new(),
            completed_flights: Vec::new(),
            fleet,
            gates: BTreeMap::new(),
            bookings: BTreeMap::new(),
            demand: DemandPool::new(),
            revenue_buffer: RevenueBuffer::new(),
            ledger,
            next_route_number: 1,
            next_booking_number: 1,
        }
    }

    /// Allocate the next route id
    pub fn allocate_route_id(&mut self) -> String {
        let id = format!("route_{:04}", self.next_route_number);
        self.next_route_number += 1;
        id
    }

    /// The id the next booking will receive, without consuming it
    pub fn next_booking_id(&self) -> String {
        format!("booking_{:06}", self.next_booking_number)
    }

    /// Allocate the next booking id
    pub fn allocate_booking_id(&mut self) -> String {
        let id = self.next_booking_id();
        self.next_booking_number += 1;
        id
    }

    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    pub fn num_flights(&self) -> usize {
        self.flights.len()
    }

    /// The live flight of a vehicle on a specific route
    pub fn flight_on_route(&self, route_id: &str, vehicle_id: &str) -> Option<&Flight> {
        self.flights
            .get(vehicle_id)
            .filter(|f| f.route_id() == route_id)
    }

    /// Active bookings held by a route, optionally limited to one vehicle
    pub fn active_booking_ids(&self, route_id: &str, vehicle_id: Option<&str>) -> Vec<String> {
        self.bookings
            .values()
            .filter(|b| b.active && b.route_id == route_id)
            .filter(|b| vehicle_id.map_or(true, |v| b.vehicle_id == v))
            .map(|b| b.id.clone())
            .collect()
    }

    /// Drop completed-flight records older than `retention_days`
    pub fn prune_history(&mut self, current_day: usize, retention_days: usize) -> usize {
        let before = self.completed_flights.len();
        self.completed_flights
            .retain(|f| current_day.saturating_sub(f.completed_day) < retention_days);
        before - self.completed_flights.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fleet::FleetConfig;

    fn state() -> SimulationState {
        let fleet = Fleet::new(Vec::new(), Vec::new(), &FleetConfig::default());
        SimulationState::new(fleet, Ledger::new(0))
    }

    #[test]
    fn test_sequential_ids() {
        let mut s = state();
        assert_eq!(s.allocate_route_id(), "route_0001");
        assert_eq!(s.allocate_route_id(), "route_0002");
        assert_eq!(s.next_booking_id(), "booking_000001");
        assert_eq!(s.next_booking_id(), "booking_000001");
        assert_eq!(s.allocate_booking_id(), "booking_000001");
        assert_eq!(s.next_booking_id(), "booking_000002");
    }
}
