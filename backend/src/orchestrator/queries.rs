//! Read-only queries over the orchestrator state

use crate::demand::PassengerStatistics;
use crate::gates::{GateAvailability, GateStatistics, PriceContext};
use crate::ledger::LedgerTransaction;
use crate::models::flight::{CompletedFlight, Flight};
use crate::models::gate::TimeWindow;
use crate::models::route::Route;
use crate::orchestrator::{Orchestrator, SimulationError};
use serde::{Deserialize, Serialize};

/// Performance summary of one route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStatistics {
    pub route_id: String,
    pub code: String,
    pub vehicles: usize,

    /// Lifetime completed round trips
    pub total_flights: u64,
    pub total_revenue: i64,

    /// Running mean over every completed cycle
    pub average_load_factor: f64,

    /// Mean over cycles still in the retained history window
    pub recent_load_factor: f64,
    pub recent_cycles: usize,

    pub active_bookings: usize,

    /// Seats offered per day across both legs of every scheduled trip
    pub daily_seat_capacity: u64,
}

impl Orchestrator {
    // ========================================================================
    // Routes and Flights
    // ========================================================================

    pub fn get_route(&self, route_id: &str) -> Option<&Route> {
        self.state.routes.get(route_id)
    }

    /// All routes in id order
    pub fn get_all_routes(&self) -> Vec<&Route> {
        self.state.routes.values().collect()
    }

    pub fn get_route_statistics(&self, route_id: &str) -> Option<RouteStatistics> {
        let route = self.state.routes.get(route_id)?;

        let recent: Vec<&CompletedFlight> = self
            .state
            .completed_flights
            .iter()
            .filter(|f| f.route_id == route_id)
            .collect();
        let recent_load_factor = if recent.is_empty() {
            0.0
        } else {
            recent.iter().map(|f| f.load_factor).sum::<f64>() / recent.len() as f64
        };

        let daily_seat_capacity = route
            .schedule()
            .iter()
            .map(|entry| {
                let capacity = self
                    .state
                    .fleet
                    .spec_of(&entry.vehicle_id)
                    .map_or(0, |t| t.capacity);
                2 * entry.daily_flights as u64 * capacity as u64
            })
            .sum();

        Some(RouteStatistics {
            route_id: route.id().to_string(),
            code: route.code().to_string(),
            vehicles: route.schedule().len(),
            total_flights: route.total_flights(),
            total_revenue: route.total_revenue(),
            average_load_factor: route.average_load_factor(),
            recent_load_factor,
            recent_cycles: recent.len(),
            active_bookings: self.state.active_booking_ids(route_id, None).len(),
            daily_seat_capacity,
        })
    }

    /// The live flight of a vehicle
    pub fn flight(&self, vehicle_id: &str) -> Option<&Flight> {
        self.state.flights.get(vehicle_id)
    }

    pub fn flights(&self) -> Vec<&Flight> {
        self.state.flights.values().collect()
    }

    /// Completed cycles within the retention window, oldest first
    pub fn completed_flights(&self) -> &[CompletedFlight] {
        &self.state.completed_flights
    }

    // ========================================================================
    // Gates
    // ========================================================================

    /// Gates at a location with free slots overlapping `window`
    ///
    /// With a vehicle id, each result says whether the gate fits that
    /// vehicle's size class. Prices are quoted for a domestic route on
    /// today's date.
    pub fn check_gate_availability(
        &self,
        location_id: &str,
        window: TimeWindow,
        vehicle_id: Option<&str>,
    ) -> Result<Vec<GateAvailability>, SimulationError> {
        let inventory = self
            .state
            .gates
            .get(location_id)
            .ok_or_else(|| SimulationError::not_found("Location", location_id))?;
        if !window.is_valid() {
            return Err(SimulationError::Validation(format!(
                "Invalid window: start {} duration {}",
                window.start_minute, window.duration_minutes
            )));
        }
        let size = vehicle_id
            .map(|id| self.state.fleet.spec_of(id).map(|t| t.size_class()))
            .transpose()?;

        let timestamp = self.current_timestamp();
        let prices = PriceContext {
            pricing: &self.config.pricing,
            international: false,
            date: self.config.calendar.date_context(&timestamp),
        };
        Ok(inventory.check_availability(&window, size, &prices))
    }

    pub fn get_gate_statistics(&self, location_id: &str) -> Option<GateStatistics> {
        self.state
            .gates
            .get(location_id)
            .map(|inventory| inventory.statistics(self.state.bookings.values()))
    }

    // ========================================================================
    // Demand
    // ========================================================================

    /// Passengers waiting at a location for a destination city
    pub fn get_waiting_passengers(&self, departure_id: &str, destination_city_id: &str) -> u32 {
        self.state.demand.waiting(departure_id, destination_city_id)
    }

    pub fn get_passenger_statistics(&self, top_n: usize) -> PassengerStatistics {
        self.state.demand.statistics(top_n)
    }

    // ========================================================================
    // Ledger
    // ========================================================================

    pub fn balance(&self) -> i64 {
        self.state.ledger.balance()
    }

    pub fn transactions(&self) -> &[LedgerTransaction] {
        self.state.ledger.transactions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::engine::tests::create_test_config;

    #[test]
    fn test_route_statistics_after_two_days() {
        let mut orch = Orchestrator::new(create_test_config()).unwrap();
        let route = orch.create_route("AAA", "BBB", 120).unwrap();
        orch.assign_vehicle_to_route(&route, "V1", 2).unwrap();
        orch.run(48).unwrap();

        let stats = orch.get_route_statistics(&route).unwrap();
        assert_eq!(stats.code, "AAA-BBB");
        assert_eq!(stats.vehicles, 1);
        assert_eq!(stats.daily_seat_capacity, 600);
        assert!(stats.total_flights > 0);
        assert_eq!(stats.recent_cycles as u64, stats.total_flights);
        assert!((0.0..=1.0).contains(&stats.recent_load_factor));
    }

    #[test]
    fn test_unknown_route_statistics() {
        let orch = Orchestrator::new(create_test_config()).unwrap();
        assert!(orch.get_route_statistics("route_9999").is_none());
    }

    #[test]
    fn test_gate_availability_unknown_location() {
        let orch = Orchestrator::new(create_test_config()).unwrap();
        assert!(matches!(
            orch.check_gate_availability("ZZZ", TimeWindow::at_hour(8, 60), None),
            Err(SimulationError::NotFound { .. })
        ));
    }

    #[test]
    fn test_gate_statistics_empty_location() {
        let orch = Orchestrator::new(create_test_config()).unwrap();
        let stats = orch.get_gate_statistics("AAA").unwrap();
        assert_eq!(stats.total_gates, 0);
        assert_eq!(stats.utilisation, 0.0);
    }
}
