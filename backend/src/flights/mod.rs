//! Flight Engine
//!
//! Advances every live flight by one simulated hour. Boarding is
//! edge-triggered off phase transitions:
//!
//! ```text
//! cycle start (0%)          → board outbound  route origin → destination city
//! first step into DestTurn  → board return    route destination → origin city
//! progress ≥ 100%           → snapshot cycle, wear vehicle, start next cycle
//!                             (carrying the excess) and board outbound again
//! ```
//!
//! # Unavailable vehicles
//!
//! A flight whose vehicle is not operational (maintenance) is frozen:
//! phase, progress and passengers stay untouched and it resumes exactly
//! where it stopped once the vehicle returns. Each transition emits one
//! `FlightPaused` / `FlightResumed` event.
//!
//! # Critical Invariants
//!
//! 1. **Exactly-once boarding**: each leg boards once per cycle
//! 2. **No idle gap**: a completed cycle restarts within the same tick
//! 3. **Capacity**: a pickup never exceeds the vehicle capacity

use crate::core::SimTimestamp;
use crate::models::event::{Event, EventLog};
use crate::models::flight::{CompletedFlight, Flight, FlightTiming, Leg};
use crate::models::state::SimulationState;
use tracing::debug;

/// Where in simulated time the engine is running
#[derive(Debug, Clone, Copy)]
pub struct FlightClock {
    pub tick: usize,
    pub day: usize,
    pub timestamp: SimTimestamp,
}

/// Aggregate outcome of one engine step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightTickResult {
    pub flights_advanced: usize,
    pub flights_paused: usize,
    pub passengers_boarded: u64,
    pub revenue_accrued: i64,
    pub cycles_completed: usize,
}

/// Outcome of a single pickup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boarding {
    pub passengers: u32,
    pub revenue: i64,
}

/// Put a vehicle's flight on a route and board its first outbound leg
pub fn start_flight(
    state: &mut SimulationState,
    route_id: &str,
    vehicle_id: &str,
    timing: FlightTiming,
    capacity: u32,
    clock: FlightClock,
    events: &mut EventLog,
) -> Boarding {
    debug_assert!(
        !state.flights.contains_key(vehicle_id),
        "vehicle {} already has a flight",
        vehicle_id
    );
    state.flights.insert(
        vehicle_id.to_string(),
        Flight::new(
            route_id.to_string(),
            vehicle_id.to_string(),
            timing,
            capacity,
            clock.tick,
        ),
    );
    board_leg(state, vehicle_id, Leg::Outbound, clock, events)
}

/// Pick up waiting passengers for one leg of a vehicle's flight
///
/// Amount = min(waiting for the od-pair, capacity). Revenue goes to the
/// route's lifetime total and the same-day consolidation buffer.
pub fn board_leg(
    state: &mut SimulationState,
    vehicle_id: &str,
    leg: Leg,
    clock: FlightClock,
    events: &mut EventLog,
) -> Boarding {
    let none = Boarding {
        passengers: 0,
        revenue: 0,
    };
    let Some(flight) = state.flights.get_mut(vehicle_id) else {
        return none;
    };
    let Some(route) = state.routes.get_mut(flight.route_id()) else {
        debug_assert!(false, "flight on unknown route {}", flight.route_id());
        return none;
    };

    let (departure_id, destination_city_id) = match leg {
        Leg::Outbound => (route.origin_id(), route.destination_city_id()),
        Leg::Return => (route.destination_id(), route.origin_city_id()),
    };
    let passengers = state.demand.pickup(
        departure_id,
        destination_city_id,
        flight.capacity(),
        clock.day,
    );
    let revenue = passengers as i64 * route.price_per_passenger();

    flight.board(leg, passengers, revenue);
    route.record_revenue(revenue);
    state.revenue_buffer.add(
        route.id(),
        route.code(),
        leg,
        vehicle_id,
        passengers,
        revenue,
    );

    if passengers > 0 {
        events.log(Event::PassengersBoarded {
            tick: clock.tick,
            route_id: route.id().to_string(),
            vehicle_id: vehicle_id.to_string(),
            leg: leg.as_str().to_string(),
            passengers,
            revenue,
        });
    }

    Boarding {
        passengers,
        revenue,
    }
}

/// Snapshot a finished cycle, wear the vehicle and start the next cycle
fn complete_cycle(
    state: &mut SimulationState,
    vehicle_id: &str,
    clock: FlightClock,
    events: &mut EventLog,
) -> Boarding {
    let Some(flight) = state.flights.get_mut(vehicle_id) else {
        return Boarding {
            passengers: 0,
            revenue: 0,
        };
    };

    let record = CompletedFlight::from_flight(flight, clock.tick, clock.day, clock.timestamp);
    flight.begin_next_cycle(clock.tick);

    if let Err(e) = state
        .fleet
        .record_flight_hours(vehicle_id, record.round_trip_hours)
    {
        debug_assert!(false, "flight hours for {}: {}", vehicle_id, e);
    }
    if let Some(route) = state.routes.get_mut(&record.route_id) {
        route.record_cycle(record.load_factor);
    }

    events.log(Event::FlightCycleCompleted {
        tick: clock.tick,
        route_id: record.route_id.clone(),
        vehicle_id: vehicle_id.to_string(),
        passengers: record.outbound_passengers + record.return_passengers,
        load_factor: record.load_factor,
        revenue: record.revenue,
    });
    state.completed_flights.push(record);

    board_leg(state, vehicle_id, Leg::Outbound, clock, events)
}

/// Advance every live flight by one hour
pub fn advance_flights(
    state: &mut SimulationState,
    clock: FlightClock,
    events: &mut EventLog,
) -> FlightTickResult {
    let mut result = FlightTickResult::default();
    let vehicle_ids: Vec<String> = state.flights.keys().cloned().collect();

    for vehicle_id in vehicle_ids {
        let operational = state
            .fleet
            .vehicle(&vehicle_id)
            .map_or(false, |v| v.is_operational());

        let Some(flight) = state.flights.get_mut(&vehicle_id) else {
            continue;
        };
        let route_id = flight.route_id().to_string();

        // Freeze while the vehicle is unavailable
        if !operational {
            if !flight.is_paused() {
                flight.pause(clock.tick);
                events.log(Event::FlightPaused {
                    tick: clock.tick,
                    route_id,
                    vehicle_id: vehicle_id.clone(),
                });
            }
            result.flights_paused += 1;
            continue;
        }

        if let Some(paused_ticks) = flight.resume(clock.tick) {
            events.log(Event::FlightResumed {
                tick: clock.tick,
                route_id,
                vehicle_id: vehicle_id.clone(),
                paused_ticks,
            });
        }

        let step = flight.advance_hour();
        result.flights_advanced += 1;

        if step.reached_destination() {
            let boarding = board_leg(state, &vehicle_id, Leg::Return, clock, events);
            result.passengers_boarded += boarding.passengers as u64;
            result.revenue_accrued += boarding.revenue;
        }

        if step.completed_cycle {
            let boarding = complete_cycle(state, &vehicle_id, clock, events);
            result.passengers_boarded += boarding.passengers as u64;
            result.revenue_accrued += boarding.revenue;
            result.cycles_completed += 1;
        }
    }

    debug!(
        tick = clock.tick,
        advanced = result.flights_advanced,
        paused = result.flights_paused,
        boarded = result.passengers_boarded,
        "flights advanced"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VehicleType;
    use crate::ledger::Ledger;
    use crate::models::fleet::{Fleet, FleetConfig, Vehicle};
    use crate::models::flight::FlightPhase;
    use crate::models::route::Route;

    fn state() -> SimulationState {
        let vtype = VehicleType {
            id: "T1".to_string(),
            name: "Test".to_string(),
            capacity: 100,
            range_km: 5000.0,
            speed_kmh: 800.0,
            base_turn_time_hours: 1.5,
            tonnage: 40.0,
            reliability: 1.0,
        };
        let mut fleet = Fleet::new(
            vec![vtype],
            vec![Vehicle::new("V1".to_string(), "T1".to_string())],
            &FleetConfig::default(),
        );
        fleet.assign("V1", "route_0001").unwrap();

        let mut s = SimulationState::new(fleet, Ledger::new(0));
        s.routes.insert(
            "route_0001".to_string(),
            Route::new(
                "route_0001".to_string(),
                "AAA".to_string(),
                "BBB".to_string(),
                "CA".to_string(),
                "CB".to_string(),
                1000.0,
                1.8,
                100,
                0,
            ),
        );
        s
    }

    fn clock(tick: usize) -> FlightClock {
        FlightClock {
            tick,
            day: tick / 24,
            timestamp: SimTimestamp::from_tick(tick),
        }
    }

    fn timing() -> FlightTiming {
        FlightTiming::compute(1000.0, 800.0, 1.5, 1.0, 1.0)
    }

    #[test]
    fn test_start_flight_boards_outbound() {
        let mut s = state();
        s.demand.add("AAA", "CB", 150, 0);
        let mut log = EventLog::new();

        let boarding = start_flight(&mut s, "route_0001", "V1", timing(), 100, clock(0), &mut log);

        assert_eq!(boarding.passengers, 100);
        assert_eq!(boarding.revenue, 10_000);
        assert_eq!(s.demand.waiting("AAA", "CB"), 50);
        assert_eq!(s.routes["route_0001"].total_revenue(), 10_000);
        assert_eq!(s.revenue_buffer.pending_revenue(), 10_000);
    }

    #[test]
    fn test_return_leg_boards_exactly_once_per_cycle() {
        let mut s = state();
        s.demand.add("BBB", "CA", 1_000, 0);
        let mut log = EventLog::new();
        start_flight(&mut s, "route_0001", "V1", timing(), 100, clock(0), &mut log);

        // 6.6h round trip: within the first 6 hours the return leg boards once
        for tick in 1..=6 {
            advance_flights(&mut s, clock(tick), &mut log);
        }
        assert_eq!(s.demand.waiting("BBB", "CA"), 900);
        assert_eq!(log.events_of_type("PassengersBoarded").len(), 1);
        assert_eq!(s.flights["V1"].phase(), FlightPhase::Return);
    }

    #[test]
    fn test_cycle_completion_restarts_without_gap() {
        let mut s = state();
        let mut log = EventLog::new();
        start_flight(&mut s, "route_0001", "V1", timing(), 100, clock(0), &mut log);

        let mut completed = 0;
        for tick in 1..=7 {
            completed += advance_flights(&mut s, clock(tick), &mut log).cycles_completed;
        }

        assert_eq!(completed, 1);
        assert_eq!(s.completed_flights.len(), 1);
        let flight = &s.flights["V1"];
        assert_eq!(flight.cycles_completed(), 1);
        // 7 × (100 / 6.6) − 100 of excess carried over
        assert!(flight.progress() > 0.0 && flight.progress() < 100.0 / 6.6 + 1e-9);
        assert!((s.fleet.vehicle("V1").unwrap().flight_hours() - 6.6).abs() < 1e-9);
        assert_eq!(s.routes["route_0001"].total_flights(), 1);
    }

    #[test]
    fn test_maintenance_freezes_and_resumes() {
        let mut s = state();
        let mut log = EventLog::new();
        start_flight(&mut s, "route_0001", "V1", timing(), 100, clock(0), &mut log);
        advance_flights(&mut s, clock(1), &mut log);
        let frozen_progress = s.flights["V1"].progress();

        s.fleet.begin_maintenance("V1", None).unwrap();
        for tick in 2..5 {
            let r = advance_flights(&mut s, clock(tick), &mut log);
            assert_eq!(r.flights_paused, 1);
        }
        assert_eq!(s.flights["V1"].progress(), frozen_progress);
        assert_eq!(log.events_of_type("FlightPaused").len(), 1);

        s.fleet.end_maintenance("V1").unwrap();
        advance_flights(&mut s, clock(5), &mut log);
        assert!(s.flights["V1"].progress() > frozen_progress);
        assert!(!s.flights["V1"].is_paused());

        let resumed = log.events_of_type("FlightResumed");
        assert_eq!(resumed.len(), 1);
        assert!(matches!(resumed[0], Event::FlightResumed { paused_ticks: 3, .. }));
    }
}
