//! Passenger aggregate model
//!
//! Demand is stored as counts per (departure location → destination city)
//! pair, never as individual passengers, so memory is bounded by the
//! number of pairs rather than by simulated time.

use serde::{Deserialize, Serialize};

/// Map key for an od-pair, `departure->destination`
///
/// # Example
/// ```
/// use airline_simulator_core_rs::models::passenger::aggregate_key;
///
/// assert_eq!(aggregate_key("JFK", "LA"), "JFK->LA");
/// ```
pub fn aggregate_key(departure_id: &str, destination_city_id: &str) -> String {
    format!("{}->{}", departure_id, destination_city_id)
}

/// Waiting passengers for one od-pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerAggregate {
    pub departure_id: String,
    pub destination_city_id: String,

    /// Always > 0 while stored
    pub count: u32,

    /// Absolute day of the last generation or pickup
    pub last_updated_day: usize,
}

impl PassengerAggregate {
    pub fn key(&self) -> String {
        aggregate_key(&self.departure_id, &self.destination_city_id)
    }
}
