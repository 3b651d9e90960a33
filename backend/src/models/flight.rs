//! Flight model
//!
//! A flight is the live, perpetually cycling state of one vehicle on one
//! route. Each round-trip cycle passes through four phases:
//!
//! ```text
//! 0%                                                             100%
//! | origin turn | outbound flight | destination turn | return flight |
//! ```
//!
//! Boundaries are cumulative fractions of the round-trip time. Progress
//! advances by `100 / round_trip_hours` percent per tick. On reaching
//! 100% the cycle is snapshotted and a new one starts in the same tick,
//! carrying the excess progress.

use crate::core::time::SimTimestamp;
use serde::{Deserialize, Serialize};

/// Hours in a day, for max-daily-flights
const HOURS_PER_DAY: f64 = 24.0;

/// One-way flight time in hours, rounded to one decimal
///
/// Includes a fixed half hour for taxi, climb and descent.
///
/// # Example
/// ```
/// use airline_simulator_core_rs::models::flight::flight_time_hours;
///
/// assert_eq!(flight_time_hours(1000.0, 800.0), 1.8);
/// ```
pub fn flight_time_hours(distance_km: f64, speed_kmh: f64) -> f64 {
    ((distance_km / speed_kmh + 0.5) * 10.0).round() / 10.0
}

/// Phase of a round-trip cycle, in cycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightPhase {
    OriginTurn,
    Outbound,
    DestinationTurn,
    Return,
}

/// Direction of a leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    Outbound,
    Return,
}

impl Leg {
    pub fn as_str(&self) -> &'static str {
        match self {
            Leg::Outbound => "outbound",
            Leg::Return => "return",
        }
    }
}

/// Cumulative phase-end percentages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseBoundaries {
    pub origin_turn_end: f64,
    pub outbound_end: f64,
    pub destination_turn_end: f64,
    pub return_end: f64,
}

impl PhaseBoundaries {
    /// Phase containing a progress percentage (clamped to Return at 100+)
    pub fn phase_at(&self, progress: f64) -> FlightPhase {
        if progress < self.origin_turn_end {
            FlightPhase::OriginTurn
        } else if progress < self.outbound_end {
            FlightPhase::Outbound
        } else if progress < self.destination_turn_end {
            FlightPhase::DestinationTurn
        } else {
            FlightPhase::Return
        }
    }
}

/// Durations of one round trip for a vehicle on a route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightTiming {
    pub origin_turn_hours: f64,
    pub flight_time_hours: f64,
    pub destination_turn_hours: f64,
}

impl FlightTiming {
    /// Timing from route distance, vehicle performance and location modifiers
    ///
    /// Turn time at a location = base turn time × location modifier.
    ///
    /// # Example
    /// ```
    /// use airline_simulator_core_rs::models::flight::FlightTiming;
    ///
    /// let t = FlightTiming::compute(1000.0, 800.0, 1.5, 1.0, 1.0);
    /// assert!((t.round_trip_hours() - 6.6).abs() < 1e-9);
    /// assert_eq!(t.max_daily_flights(), 3);
    /// ```
    pub fn compute(
        distance_km: f64,
        speed_kmh: f64,
        base_turn_time_hours: f64,
        origin_turn_modifier: f64,
        destination_turn_modifier: f64,
    ) -> Self {
        Self {
            origin_turn_hours: base_turn_time_hours * origin_turn_modifier,
            flight_time_hours: flight_time_hours(distance_km, speed_kmh),
            destination_turn_hours: base_turn_time_hours * destination_turn_modifier,
        }
    }

    /// originTurn + flightTime + destinationTurn + flightTime
    pub fn round_trip_hours(&self) -> f64 {
        self.origin_turn_hours
            + self.flight_time_hours
            + self.destination_turn_hours
            + self.flight_time_hours
    }

    pub fn boundaries(&self) -> PhaseBoundaries {
        let total = self.round_trip_hours();
        let origin_turn_end = self.origin_turn_hours / total * 100.0;
        let outbound_end = origin_turn_end + self.flight_time_hours / total * 100.0;
        let destination_turn_end = outbound_end + self.destination_turn_hours / total * 100.0;
        PhaseBoundaries {
            origin_turn_end,
            outbound_end,
            destination_turn_end,
            return_end: 100.0,
        }
    }

    /// Whole round trips that fit in one day
    pub fn max_daily_flights(&self) -> u32 {
        (HOURS_PER_DAY / self.round_trip_hours()).floor() as u32
    }

    /// Progress percentage gained per simulated hour
    pub fn progress_per_hour(&self) -> f64 {
        100.0 / self.round_trip_hours()
    }
}

/// Phase transition produced by one hour of progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightStep {
    pub previous_phase: FlightPhase,
    pub new_phase: FlightPhase,
    pub completed_cycle: bool,
}

impl FlightStep {
    /// True once per cycle: the step that reaches the destination turn
    ///
    /// Compares phase ordinals so a step jumping over a short
    /// destination turn still counts.
    pub fn reached_destination(&self) -> bool {
        self.previous_phase < FlightPhase::DestinationTurn
            && self.new_phase >= FlightPhase::DestinationTurn
    }
}

/// Live operational state of one vehicle on one route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    route_id: String,
    vehicle_id: String,
    timing: FlightTiming,
    boundaries: PhaseBoundaries,

    /// Seats available per leg
    capacity: u32,

    phase: FlightPhase,

    /// Percent through the current cycle, [0, 100)
    progress: f64,

    remaining_hours: f64,

    /// Passengers currently aboard
    passengers: u32,

    outbound_passengers: u32,
    return_passengers: u32,

    /// Revenue earned in the current cycle
    cycle_revenue: i64,

    cycle_started_tick: usize,
    cycles_completed: u64,

    /// Set while the vehicle is unavailable; progress is frozen
    paused_since_tick: Option<usize>,
}

impl Flight {
    /// Start a fresh cycle at 0% in the origin turn
    pub fn new(
        route_id: String,
        vehicle_id: String,
        timing: FlightTiming,
        capacity: u32,
        tick: usize,
    ) -> Self {
        Self {
            route_id,
            vehicle_id,
            boundaries: timing.boundaries(),
            timing,
            capacity,
            phase: FlightPhase::OriginTurn,
            progress: 0.0,
            remaining_hours: timing.round_trip_hours(),
            passengers: 0,
            outbound_passengers: 0,
            return_passengers: 0,
            cycle_revenue: 0,
            cycle_started_tick: tick,
            cycles_completed: 0,
            paused_since_tick: None,
        }
    }

    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    pub fn timing(&self) -> &FlightTiming {
        &self.timing
    }

    pub fn boundaries(&self) -> &PhaseBoundaries {
        &self.boundaries
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn remaining_hours(&self) -> f64 {
        self.remaining_hours
    }

    pub fn passengers(&self) -> u32 {
        self.passengers
    }

    pub fn outbound_passengers(&self) -> u32 {
        self.outbound_passengers
    }

    pub fn return_passengers(&self) -> u32 {
        self.return_passengers
    }

    pub fn cycle_revenue(&self) -> i64 {
        self.cycle_revenue
    }

    pub fn cycle_started_tick(&self) -> usize {
        self.cycle_started_tick
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn paused_since_tick(&self) -> Option<usize> {
        self.paused_since_tick
    }

    pub fn is_paused(&self) -> bool {
        self.paused_since_tick.is_some()
    }

    pub fn pause(&mut self, tick: usize) {
        if self.paused_since_tick.is_none() {
            self.paused_since_tick = Some(tick);
        }
    }

    /// Resume after a pause; returns how many ticks it was frozen
    pub fn resume(&mut self, tick: usize) -> Option<usize> {
        self.paused_since_tick
            .take()
            .map(|since| tick.saturating_sub(since))
    }

    /// Advance one simulated hour
    ///
    /// Progress is left at or above 100 on completion; the caller
    /// snapshots the cycle and then calls `begin_next_cycle`.
    pub fn advance_hour(&mut self) -> FlightStep {
        let previous_phase = self.phase;
        self.progress += self.timing.progress_per_hour();
        self.phase = self.boundaries.phase_at(self.progress);
        self.remaining_hours =
            (self.timing.round_trip_hours() * (1.0 - self.progress / 100.0)).max(0.0);

        FlightStep {
            previous_phase,
            new_phase: self.phase,
            completed_cycle: self.progress >= self.boundaries.return_end,
        }
    }

    /// Board passengers for a leg and book the revenue
    ///
    /// Boarding the return leg replaces the outbound load.
    pub fn board(&mut self, leg: Leg, passengers: u32, revenue: i64) {
        debug_assert!(passengers <= self.capacity, "boarded over capacity");
        match leg {
            Leg::Outbound => self.outbound_passengers = passengers,
            Leg::Return => self.return_passengers = passengers,
        }
        self.passengers = passengers;
        self.cycle_revenue += revenue;
    }

    /// Load factor of the current cycle over both legs
    pub fn load_factor(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        (self.outbound_passengers + self.return_passengers) as f64 / (2 * self.capacity) as f64
    }

    /// Reset for the next cycle, keeping the progress overshoot
    pub fn begin_next_cycle(&mut self, tick: usize) {
        let excess = (self.progress - self.boundaries.return_end).max(0.0);
        self.progress = excess;
        self.phase = self.boundaries.phase_at(excess);
        self.remaining_hours = self.timing.round_trip_hours() * (1.0 - excess / 100.0);
        self.passengers = 0;
        self.outbound_passengers = 0;
        self.return_passengers = 0;
        self.cycle_revenue = 0;
        self.cycle_started_tick = tick;
        self.cycles_completed += 1;
    }
}

/// Snapshot of a finished round trip, kept for load-factor statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedFlight {
    pub route_id: String,
    pub vehicle_id: String,
    pub outbound_passengers: u32,
    pub return_passengers: u32,
    pub capacity: u32,
    pub revenue: i64,
    pub load_factor: f64,
    pub round_trip_hours: f64,
    pub completed_tick: usize,
    pub completed_day: usize,
    pub timestamp: SimTimestamp,
}

impl CompletedFlight {
    pub fn from_flight(flight: &Flight, tick: usize, day: usize, timestamp: SimTimestamp) -> Self {
        Self {
            route_id: flight.route_id.clone(),
            vehicle_id: flight.vehicle_id.clone(),
            outbound_passengers: flight.outbound_passengers,
            return_passengers: flight.return_passengers,
            capacity: flight.capacity,
            revenue: flight.cycle_revenue,
            load_factor: flight.load_factor(),
            round_trip_hours: flight.timing.round_trip_hours(),
            completed_tick: tick,
            completed_day: day,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> FlightTiming {
        // 1000 km at 800 km/h, 1.5h turns
        FlightTiming::compute(1000.0, 800.0, 1.5, 1.0, 1.0)
    }

    #[test]
    fn test_boundaries_non_decreasing_and_end_at_100() {
        let b = timing().boundaries();
        assert!(b.origin_turn_end <= b.outbound_end);
        assert!(b.outbound_end <= b.destination_turn_end);
        assert!(b.destination_turn_end <= b.return_end);
        assert_eq!(b.return_end, 100.0);
    }

    #[test]
    fn test_phase_sequence_over_one_cycle() {
        let mut flight = Flight::new("r".to_string(), "v".to_string(), timing(), 100, 0);
        let mut phases = vec![flight.phase()];
        let mut completed = false;

        for _ in 0..7 {
            let step = flight.advance_hour();
            phases.push(step.new_phase);
            if step.completed_cycle {
                completed = true;
                break;
            }
        }

        assert!(completed, "6.6h cycle must complete within 7 ticks");
        assert!(phases.windows(2).all(|w| w[0] <= w[1]));
        assert!(phases.contains(&FlightPhase::DestinationTurn));
    }

    #[test]
    fn test_begin_next_cycle_carries_excess() {
        let mut flight = Flight::new("r".to_string(), "v".to_string(), timing(), 100, 0);
        for _ in 0..7 {
            flight.advance_hour();
        }
        let expected_excess = flight.progress() - 100.0;
        flight.begin_next_cycle(7);

        assert!((flight.progress() - expected_excess).abs() < 1e-9);
        assert_eq!(flight.cycles_completed(), 1);
        assert_eq!(flight.passengers(), 0);
        assert_eq!(flight.cycle_started_tick(), 7);
    }

    #[test]
    fn test_reached_destination_when_turn_skipped() {
        let step = FlightStep {
            previous_phase: FlightPhase::Outbound,
            new_phase: FlightPhase::Return,
            completed_cycle: false,
        };
        assert!(step.reached_destination());

        let step = FlightStep {
            previous_phase: FlightPhase::DestinationTurn,
            new_phase: FlightPhase::Return,
            completed_cycle: false,
        };
        assert!(!step.reached_destination());
    }

    #[test]
    fn test_pause_and_resume() {
        let mut flight = Flight::new("r".to_string(), "v".to_string(), timing(), 100, 0);
        flight.pause(5);
        flight.pause(6);
        assert_eq!(flight.paused_since_tick(), Some(5));
        assert_eq!(flight.resume(9), Some(4));
        assert!(!flight.is_paused());
        assert_eq!(flight.resume(10), None);
    }

    #[test]
    fn test_load_factor() {
        let mut flight = Flight::new("r".to_string(), "v".to_string(), timing(), 100, 0);
        flight.board(Leg::Outbound, 80, 8000);
        flight.board(Leg::Return, 40, 4000);
        assert!((flight.load_factor() - 0.6).abs() < 1e-12);
        assert_eq!(flight.cycle_revenue(), 12000);
        assert_eq!(flight.passengers(), 40);
    }
}
