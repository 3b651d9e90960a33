//! Geography reference data
//!
//! Cities generate demand, locations (airports) host gates and serve as
//! route endpoints. Both are read-only lookups for the simulation core.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Latitude/longitude in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine distance in kilometres
    ///
    /// # Example
    /// ```
    /// use airline_simulator_core_rs::catalog::Coordinates;
    ///
    /// let a = Coordinates::new(0.0, 0.0);
    /// let b = Coordinates::new(0.0, 1.0);
    /// assert!((a.distance_km(&b) - 111.19).abs() < 0.1);
    /// ```
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

/// A population centre that generates passenger demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
    pub country: String,
    pub population: u64,
    pub coordinates: Coordinates,
}

/// An airport: route endpoint and gate host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub city_id: String,
    pub country: String,
    pub coordinates: Coordinates,

    /// Multiplier applied to a vehicle type's base turn time here
    pub turn_time_modifier: f64,

    /// Operating window as (open_hour, close_hour), close may be 24
    pub operating_hours: (u32, u32),
}

/// Read-only geography lookups consumed by the core
pub trait Geography {
    fn location(&self, id: &str) -> Option<&Location>;

    fn city(&self, id: &str) -> Option<&City>;

    fn cities(&self) -> Vec<&City>;

    fn locations(&self) -> Vec<&Location>;

    /// City served by a location
    fn city_of_location(&self, location_id: &str) -> Option<&City> {
        self.location(location_id)
            .and_then(|loc| self.city(&loc.city_id))
    }

    /// Great-circle distance between two locations
    fn distance_km(&self, from_location: &str, to_location: &str) -> Option<f64> {
        let a = self.location(from_location)?;
        let b = self.location(to_location)?;
        Some(a.coordinates.distance_km(&b.coordinates))
    }
}

/// Geography backed by configuration data
///
/// BTreeMaps keep iteration order stable, which demand sampling relies on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeographyCatalog {
    cities: BTreeMap<String, City>,
    locations: BTreeMap<String, Location>,
}

impl GeographyCatalog {
    pub fn new(cities: Vec<City>, locations: Vec<Location>) -> Self {
        Self {
            cities: cities.into_iter().map(|c| (c.id.clone(), c)).collect(),
            locations: locations.into_iter().map(|l| (l.id.clone(), l)).collect(),
        }
    }
}

impl Geography for GeographyCatalog {
    fn location(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    fn city(&self, id: &str) -> Option<&City> {
        self.cities.get(id)
    }

    fn cities(&self) -> Vec<&City> {
        self.cities.values().collect()
    }

    fn locations(&self) -> Vec<&Location> {
        self.locations.values().collect()
    }
}
