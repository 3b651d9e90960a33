//! Shared fixtures for integration tests

#![allow(dead_code)]

use airline_simulator_core_rs::catalog::{City, Coordinates, Location, SizeClass, VehicleType};
use airline_simulator_core_rs::models::fleet::VehicleConfig;
use airline_simulator_core_rs::models::gate::{GateConfig, GateType, SlotPolicy};
use airline_simulator_core_rs::OrchestratorConfig;

pub fn city(id: &str, country: &str, population: u64, lat: f64, lon: f64) -> City {
    City {
        id: id.to_string(),
        name: id.to_string(),
        country: country.to_string(),
        population,
        coordinates: Coordinates::new(lat, lon),
    }
}

pub fn location(id: &str, city_id: &str, country: &str, lat: f64, lon: f64) -> Location {
    Location {
        id: id.to_string(),
        name: id.to_string(),
        city_id: city_id.to_string(),
        country: country.to_string(),
        coordinates: Coordinates::new(lat, lon),
        turn_time_modifier: 1.0,
        operating_hours: (5, 23),
    }
}

pub fn narrowbody() -> VehicleType {
    VehicleType {
        id: "NB".to_string(),
        name: "Narrowbody".to_string(),
        capacity: 150,
        range_km: 6000.0,
        speed_kmh: 800.0,
        base_turn_time_hours: 1.0,
        tonnage: 42.0,
        reliability: 0.95,
    }
}

pub fn regional() -> VehicleType {
    VehicleType {
        id: "RJ".to_string(),
        name: "Regional".to_string(),
        capacity: 70,
        range_km: 3000.0,
        speed_kmh: 750.0,
        base_turn_time_hours: 0.5,
        tonnage: 20.0,
        reliability: 0.99,
    }
}

pub fn vehicle(id: &str, type_id: &str) -> VehicleConfig {
    VehicleConfig {
        id: id.to_string(),
        type_id: type_id.to_string(),
    }
}

pub fn gate(location_id: &str, gate_type: GateType, max_size: SizeClass) -> GateConfig {
    GateConfig {
        location_id: location_id.to_string(),
        gate_type,
        slot_policy: SlotPolicy::Flexible,
        max_size,
        base_price: 400,
    }
}

/// Three cities, four locations, two countries
///
/// AAA and AAB serve city AC; BBB serves BC; CCC serves CC abroad.
pub fn create_config(seed: u64) -> OrchestratorConfig {
    OrchestratorConfig {
        rng_seed: seed,
        initial_balance: 5_000_000,
        cities: vec![
            city("AC", "X", 6_000_000, 40.0, 0.0),
            city("BC", "X", 3_000_000, 40.0, 10.0),
            city("CC", "Y", 2_000_000, 45.0, 5.0),
        ],
        locations: vec![
            location("AAA", "AC", "X", 40.0, 0.1),
            location("AAB", "AC", "X", 40.2, -0.1),
            location("BBB", "BC", "X", 40.0, 10.1),
            location("CCC", "CC", "Y", 45.0, 5.1),
        ],
        vehicle_types: vec![narrowbody(), regional()],
        vehicles: vec![
            vehicle("V1", "NB"),
            vehicle("V2", "NB"),
            vehicle("R1", "RJ"),
        ],
        initial_gates: vec![
            gate("AAA", GateType::Common, SizeClass::Large),
            gate("AAA", GateType::Exclusive, SizeClass::Large),
            gate("BBB", GateType::Common, SizeClass::Medium),
        ],
        ..OrchestratorConfig::default()
    }
}
