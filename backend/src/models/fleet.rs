//! Fleet model
//!
//! Owns every vehicle and the type catalog they reference. A vehicle is:
//! - Available (parked, unassigned)
//! - InFlight (assigned to a route and cycling)
//! - Maintenance (held by an external process; its flight is frozen)
//!
//! Flight hours and condition wear are updated once per completed
//! round-trip cycle.

use crate::catalog::VehicleType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Condition of a brand-new vehicle
pub const FULL_CONDITION: f64 = 100.0;

/// Errors that can occur during fleet operations
#[derive(Debug, Error, PartialEq)]
pub enum FleetError {
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    #[error("Vehicle type not found: {0}")]
    TypeNotFound(String),

    #[error("Vehicle {vehicle_id} already assigned to route {route_id}")]
    AlreadyAssigned { vehicle_id: String, route_id: String },

    #[error("Vehicle {0} is in maintenance")]
    InMaintenance(String),
}

/// Operational status of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    InFlight,
    Maintenance,
}

/// Fleet tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Condition points lost per flight hour at reliability 1.0
    pub wear_per_flight_hour: f64,

    /// Speed used for a route's nominal flight time
    pub reference_speed_kmh: f64,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            wear_per_flight_hour: 0.01,
            reference_speed_kmh: 800.0,
        }
    }
}

/// Initial vehicle declaration in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleConfig {
    pub id: String,
    pub type_id: String,
}

/// A single aircraft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: String,
    type_id: String,
    status: VehicleStatus,

    /// Route this vehicle is flying, if any
    assigned_route: Option<String>,

    /// Cumulative flight hours
    flight_hours: f64,

    /// 0-100, decreases with wear
    condition: f64,

    /// Tick at which scheduled maintenance ends automatically
    maintenance_until_tick: Option<usize>,
}

impl Vehicle {
    /// Create a new, unassigned vehicle in full condition
    ///
    /// # Example
    /// ```
    /// use airline_simulator_core_rs::models::fleet::{Vehicle, VehicleStatus};
    ///
    /// let v = Vehicle::new("V1".to_string(), "A320".to_string());
    /// assert_eq!(v.status(), VehicleStatus::Available);
    /// assert_eq!(v.condition(), 100.0);
    /// ```
    pub fn new(id: String, type_id: String) -> Self {
        Self {
            id,
            type_id,
            status: VehicleStatus::Available,
            assigned_route: None,
            flight_hours: 0.0,
            condition: FULL_CONDITION,
            maintenance_until_tick: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn status(&self) -> VehicleStatus {
        self.status
    }

    pub fn assigned_route(&self) -> Option<&str> {
        self.assigned_route.as_deref()
    }

    pub fn flight_hours(&self) -> f64 {
        self.flight_hours
    }

    pub fn condition(&self) -> f64 {
        self.condition
    }

    pub fn maintenance_until_tick(&self) -> Option<usize> {
        self.maintenance_until_tick
    }

    /// Whether the flight engine may advance this vehicle
    pub fn is_operational(&self) -> bool {
        self.status != VehicleStatus::Maintenance
    }

    /// Status to return to once maintenance ends
    fn resting_status(&self) -> VehicleStatus {
        if self.assigned_route.is_some() {
            VehicleStatus::InFlight
        } else {
            VehicleStatus::Available
        }
    }
}

/// All vehicles plus the type catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    vehicle_types: BTreeMap<String, VehicleType>,
    vehicles: BTreeMap<String, Vehicle>,
    wear_per_flight_hour: f64,
}

impl Fleet {
    pub fn new(vehicle_types: Vec<VehicleType>, vehicles: Vec<Vehicle>, config: &FleetConfig) -> Self {
        Self {
            vehicle_types: vehicle_types
                .into_iter()
                .map(|t| (t.id.clone(), t))
                .collect(),
            vehicles: vehicles.into_iter().map(|v| (v.id.clone(), v)).collect(),
            wear_per_flight_hour: config.wear_per_flight_hour,
        }
    }

    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.get(id)
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    pub fn vehicle_type(&self, type_id: &str) -> Option<&VehicleType> {
        self.vehicle_types.get(type_id)
    }

    /// Type specification of a vehicle
    pub fn spec_of(&self, vehicle_id: &str) -> Result<&VehicleType, FleetError> {
        let vehicle = self
            .vehicle(vehicle_id)
            .ok_or_else(|| FleetError::VehicleNotFound(vehicle_id.to_string()))?;
        self.vehicle_type(&vehicle.type_id)
            .ok_or_else(|| FleetError::TypeNotFound(vehicle.type_id.clone()))
    }

    fn vehicle_mut(&mut self, id: &str) -> Result<&mut Vehicle, FleetError> {
        self.vehicles
            .get_mut(id)
            .ok_or_else(|| FleetError::VehicleNotFound(id.to_string()))
    }

    /// Check that a vehicle may be assigned, without mutating
    pub fn check_assignable(&self, vehicle_id: &str) -> Result<(), FleetError> {
        let vehicle = self
            .vehicle(vehicle_id)
            .ok_or_else(|| FleetError::VehicleNotFound(vehicle_id.to_string()))?;

        if let Some(route_id) = &vehicle.assigned_route {
            return Err(FleetError::AlreadyAssigned {
                vehicle_id: vehicle_id.to_string(),
                route_id: route_id.clone(),
            });
        }
        if vehicle.status == VehicleStatus::Maintenance {
            return Err(FleetError::InMaintenance(vehicle_id.to_string()));
        }
        Ok(())
    }

    /// Put a vehicle on a route
    pub fn assign(&mut self, vehicle_id: &str, route_id: &str) -> Result<(), FleetError> {
        self.check_assignable(vehicle_id)?;
        let vehicle = self.vehicle_mut(vehicle_id)?;
        vehicle.assigned_route = Some(route_id.to_string());
        vehicle.status = VehicleStatus::InFlight;
        Ok(())
    }

    /// Take a vehicle off its route
    ///
    /// A vehicle in maintenance stays in maintenance.
    pub fn release(&mut self, vehicle_id: &str) -> Result<(), FleetError> {
        let vehicle = self.vehicle_mut(vehicle_id)?;
        vehicle.assigned_route = None;
        if vehicle.status != VehicleStatus::Maintenance {
            vehicle.status = VehicleStatus::Available;
        }
        Ok(())
    }

    /// Place a vehicle into maintenance, optionally until a given tick
    pub fn begin_maintenance(
        &mut self,
        vehicle_id: &str,
        until_tick: Option<usize>,
    ) -> Result<(), FleetError> {
        let vehicle = self.vehicle_mut(vehicle_id)?;
        vehicle.status = VehicleStatus::Maintenance;
        vehicle.maintenance_until_tick = until_tick;
        Ok(())
    }

    /// Return a vehicle from maintenance to its resting status
    pub fn end_maintenance(&mut self, vehicle_id: &str) -> Result<(), FleetError> {
        let vehicle = self.vehicle_mut(vehicle_id)?;
        if vehicle.status == VehicleStatus::Maintenance {
            vehicle.status = vehicle.resting_status();
            vehicle.maintenance_until_tick = None;
        }
        Ok(())
    }

    /// End every timed maintenance due at or before `tick`
    ///
    /// Returns the ids of vehicles released.
    pub fn expire_maintenance(&mut self, tick: usize) -> Vec<String> {
        let mut released = Vec::new();
        for vehicle in self.vehicles.values_mut() {
            if vehicle.status != VehicleStatus::Maintenance {
                continue;
            }
            if matches!(vehicle.maintenance_until_tick, Some(until) if until <= tick) {
                vehicle.status = vehicle.resting_status();
                vehicle.maintenance_until_tick = None;
                released.push(vehicle.id.clone());
            }
        }
        released
    }

    /// Add flight hours and apply condition wear
    ///
    /// Wear = hours × wear_per_flight_hour / reliability, floored at 0.
    pub fn record_flight_hours(&mut self, vehicle_id: &str, hours: f64) -> Result<(), FleetError> {
        let reliability = self.spec_of(vehicle_id)?.reliability.max(0.01);
        let wear = hours * self.wear_per_flight_hour / reliability;

        let vehicle = self.vehicle_mut(vehicle_id)?;
        vehicle.flight_hours += hours;
        vehicle.condition = (vehicle.condition - wear).max(0.0);
        Ok(())
    }
}
