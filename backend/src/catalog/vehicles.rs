//! Vehicle type catalog
//!
//! Static performance data per aircraft type, plus the size bucket used
//! for gate compatibility.

use serde::{Deserialize, Serialize};

/// Tonnage at or below which a vehicle is small
pub const SMALL_MAX_TONNAGE: f64 = 35.0;

/// Tonnage at or below which a vehicle is medium
pub const MEDIUM_MAX_TONNAGE: f64 = 45.0;

/// Gate/vehicle size bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    /// Size bucket for a vehicle weight
    ///
    /// # Example
    /// ```
    /// use airline_simulator_core_rs::catalog::SizeClass;
    ///
    /// assert_eq!(SizeClass::from_tonnage(35.0), SizeClass::Small);
    /// assert_eq!(SizeClass::from_tonnage(45.0), SizeClass::Medium);
    /// assert_eq!(SizeClass::from_tonnage(45.1), SizeClass::Large);
    /// ```
    pub fn from_tonnage(tonnage: f64) -> Self {
        if tonnage <= SMALL_MAX_TONNAGE {
            SizeClass::Small
        } else if tonnage <= MEDIUM_MAX_TONNAGE {
            SizeClass::Medium
        } else {
            SizeClass::Large
        }
    }

    /// Whether a vehicle of this size fits a gate rated `gate_max`
    ///
    /// Small fits any gate, medium fits medium and large, large fits large.
    pub fn fits(self, gate_max: SizeClass) -> bool {
        self <= gate_max
    }
}

/// Aircraft type specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleType {
    pub id: String,
    pub name: String,

    /// Maximum passengers per leg
    pub capacity: u32,

    pub range_km: f64,
    pub speed_kmh: f64,

    /// Ground time at a location before modifiers
    pub base_turn_time_hours: f64,

    pub tonnage: f64,

    /// 0.0-1.0, higher wears slower
    pub reliability: f64,
}

impl VehicleType {
    pub fn size_class(&self) -> SizeClass {
        SizeClass::from_tonnage(self.tonnage)
    }
}
