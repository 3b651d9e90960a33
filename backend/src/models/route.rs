//! Route model
//!
//! A route is a persistent origin/destination pairing with a fare, a
//! schedule of assigned vehicles, references to the gate bookings made for
//! it, and lifetime counters.
//!
//! CRITICAL: All money values are i64 (whole currency units)

use serde::{Deserialize, Serialize};

/// One vehicle's slot in a route schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub vehicle_id: String,
    pub daily_flights: u32,
}

/// Which end of a route a gate booking serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteEnd {
    Origin,
    Destination,
}

/// A route between two locations
///
/// # Example
/// ```
/// use airline_simulator_core_rs::models::route::Route;
///
/// let route = Route::new(
///     "route_0001".to_string(),
///     "JFK".to_string(),
///     "LAX".to_string(),
///     "NYC".to_string(),
///     "LA".to_string(),
///     3983.0,
///     5.5,
///     250,
///     0,
/// );
/// assert_eq!(route.code(), "JFK-LAX");
/// assert!(!route.has_vehicles());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    id: String,
    code: String,
    origin_id: String,
    destination_id: String,

    /// Cities served at each end (demand keys use the far end's city)
    origin_city_id: String,
    destination_city_id: String,

    distance_km: f64,

    /// Nominal one-way flight time at the reference speed
    base_flight_time_hours: f64,

    price_per_passenger: i64,

    schedule: Vec<ScheduleEntry>,

    /// Booking ids at the origin, including cancelled ones
    origin_bookings: Vec<String>,

    /// Booking ids at the destination, including cancelled ones
    destination_bookings: Vec<String>,

    total_flights: u64,
    total_revenue: i64,
    average_load_factor: f64,
    created_tick: usize,
}

impl Route {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        origin_id: String,
        destination_id: String,
        origin_city_id: String,
        destination_city_id: String,
        distance_km: f64,
        base_flight_time_hours: f64,
        price_per_passenger: i64,
        created_tick: usize,
    ) -> Self {
        let code = format!("{}-{}", origin_id, destination_id);
        Self {
            id,
            code,
            origin_id,
            destination_id,
            origin_city_id,
            destination_city_id,
            distance_km,
            base_flight_time_hours,
            price_per_passenger,
            schedule: Vec::new(),
            origin_bookings: Vec::new(),
            destination_bookings: Vec::new(),
            total_flights: 0,
            total_revenue: 0,
            average_load_factor: 0.0,
            created_tick,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn origin_id(&self) -> &str {
        &self.origin_id
    }

    pub fn destination_id(&self) -> &str {
        &self.destination_id
    }

    pub fn origin_city_id(&self) -> &str {
        &self.origin_city_id
    }

    pub fn destination_city_id(&self) -> &str {
        &self.destination_city_id
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn base_flight_time_hours(&self) -> f64 {
        self.base_flight_time_hours
    }

    pub fn price_per_passenger(&self) -> i64 {
        self.price_per_passenger
    }

    pub fn schedule(&self) -> &[ScheduleEntry] {
        &self.schedule
    }

    pub fn origin_bookings(&self) -> &[String] {
        &self.origin_bookings
    }

    pub fn destination_bookings(&self) -> &[String] {
        &self.destination_bookings
    }

    pub fn total_flights(&self) -> u64 {
        self.total_flights
    }

    pub fn total_revenue(&self) -> i64 {
        self.total_revenue
    }

    pub fn average_load_factor(&self) -> f64 {
        self.average_load_factor
    }

    pub fn created_tick(&self) -> usize {
        self.created_tick
    }

    pub fn has_vehicles(&self) -> bool {
        !self.schedule.is_empty()
    }

    pub fn has_vehicle(&self, vehicle_id: &str) -> bool {
        self.schedule.iter().any(|e| e.vehicle_id == vehicle_id)
    }

    /// Which end of the route a location is, if either
    pub fn end_at(&self, location_id: &str) -> Option<RouteEnd> {
        if location_id == self.origin_id {
            Some(RouteEnd::Origin)
        } else if location_id == self.destination_id {
            Some(RouteEnd::Destination)
        } else {
            None
        }
    }

    pub fn add_schedule_entry(&mut self, vehicle_id: String, daily_flights: u32) {
        debug_assert!(!self.has_vehicle(&vehicle_id), "vehicle scheduled twice");
        self.schedule.push(ScheduleEntry {
            vehicle_id,
            daily_flights,
        });
    }

    pub fn remove_schedule_entry(&mut self, vehicle_id: &str) -> Option<ScheduleEntry> {
        let pos = self.schedule.iter().position(|e| e.vehicle_id == vehicle_id)?;
        Some(self.schedule.remove(pos))
    }

    /// Change a vehicle's daily flight count; false if not scheduled
    pub fn set_daily_flights(&mut self, vehicle_id: &str, daily_flights: u32) -> bool {
        match self.schedule.iter_mut().find(|e| e.vehicle_id == vehicle_id) {
            Some(entry) => {
                entry.daily_flights = daily_flights;
                true
            }
            None => false,
        }
    }

    pub fn add_booking(&mut self, end: RouteEnd, booking_id: String) {
        match end {
            RouteEnd::Origin => self.origin_bookings.push(booking_id),
            RouteEnd::Destination => self.destination_bookings.push(booking_id),
        }
    }

    /// All booking ids referenced by the route
    pub fn booking_ids(&self) -> impl Iterator<Item = &String> {
        self.origin_bookings.iter().chain(self.destination_bookings.iter())
    }

    pub fn record_revenue(&mut self, amount: i64) {
        self.total_revenue += amount;
    }

    /// Count a completed round trip and fold its load factor into the mean
    pub fn record_cycle(&mut self, load_factor: f64) {
        self.total_flights += 1;
        let n = self.total_flights as f64;
        self.average_load_factor += (load_factor - self.average_load_factor) / n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> Route {
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
        )
    }

    #[test]
    fn test_schedule_entries() {
        let mut r = route();
        r.add_schedule_entry("V1".to_string(), 2);
        assert!(r.has_vehicle("V1"));
        assert!(r.set_daily_flights("V1", 3));
        assert!(!r.set_daily_flights("V2", 3));
        assert_eq!(r.schedule()[0].daily_flights, 3);

        let removed = r.remove_schedule_entry("V1").unwrap();
        assert_eq!(removed.vehicle_id, "V1");
        assert!(!r.has_vehicles());
    }

    #[test]
    fn test_running_load_factor() {
        let mut r = route();
        r.record_cycle(0.5);
        r.record_cycle(1.0);
        assert_eq!(r.total_flights(), 2);
        assert!((r.average_load_factor() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_end_at() {
        let r = route();
        assert_eq!(r.end_at("AAA"), Some(RouteEnd::Origin));
        assert_eq!(r.end_at("BBB"), Some(RouteEnd::Destination));
        assert_eq!(r.end_at("CCC"), None);
    }
}
