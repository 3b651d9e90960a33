//! Dynamic gate pricing
//!
//! ```text
//! price = base × type × international × time_of_day × weekend × holiday × location_size
//! ```
//!
//! All factors compose multiplicatively and the result is rounded to the
//! nearest currency unit.

use crate::catalog::SizeClass;
use crate::core::DateContext;
use crate::models::gate::{GateType, SlotPolicy};
use serde::{Deserialize, Serialize};

/// A gate-count threshold and the multiplier applying up to it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeTier {
    pub max_gates: usize,
    pub multiplier: f64,
}

/// Parameters a newly purchased gate of a type receives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDefaults {
    pub slot_policy: SlotPolicy,
    pub max_size: SizeClass,
    pub base_price: i64,
}

/// All pricing constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub exclusive_multiplier: f64,
    pub preferential_multiplier: f64,
    pub common_multiplier: f64,

    pub international_multiplier: f64,

    pub peak_multiplier: f64,
    /// Inclusive hour ranges counted as peak
    pub peak_hours: Vec<(u32, u32)>,

    pub night_multiplier: f64,
    /// Night runs from `night_start_hour` through midnight to `night_end_hour` inclusive
    pub night_start_hour: u32,
    pub night_end_hour: u32,

    pub weekend_multiplier: f64,
    pub holiday_multiplier: f64,

    /// Slot price tiers; counts above the last tier use `location_size_top`
    pub location_size_tiers: Vec<SizeTier>,
    pub location_size_top: f64,

    /// Purchase cost tiers; counts above the last tier use `purchase_size_top`
    pub purchase_size_tiers: Vec<SizeTier>,
    pub purchase_size_top: f64,

    pub exclusive_purchase_cost: i64,
    pub preferential_purchase_cost: i64,
    pub common_purchase_cost: i64,

    pub exclusive_defaults: GateDefaults,
    pub preferential_defaults: GateDefaults,
    pub common_defaults: GateDefaults,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            exclusive_multiplier: 1.5,
            preferential_multiplier: 1.2,
            common_multiplier: 1.0,
            international_multiplier: 1.3,
            peak_multiplier: 1.25,
            peak_hours: vec![(6, 9), (17, 20)],
            night_multiplier: 0.9,
            night_start_hour: 23,
            night_end_hour: 5,
            weekend_multiplier: 0.9,
            holiday_multiplier: 1.15,
            location_size_tiers: vec![
                SizeTier { max_gates: 5, multiplier: 0.8 },
                SizeTier { max_gates: 10, multiplier: 1.0 },
                SizeTier { max_gates: 15, multiplier: 1.2 },
            ],
            location_size_top: 1.4,
            purchase_size_tiers: vec![
                SizeTier { max_gates: 5, multiplier: 0.8 },
                SizeTier { max_gates: 10, multiplier: 1.0 },
            ],
            purchase_size_top: 1.3,
            exclusive_purchase_cost: 2_000_000,
            preferential_purchase_cost: 1_200_000,
            common_purchase_cost: 600_000,
            exclusive_defaults: GateDefaults {
                slot_policy: SlotPolicy::FixedBlocks,
                max_size: SizeClass::Large,
                base_price: 800,
            },
            preferential_defaults: GateDefaults {
                slot_policy: SlotPolicy::Mixed,
                max_size: SizeClass::Large,
                base_price: 600,
            },
            common_defaults: GateDefaults {
                slot_policy: SlotPolicy::Flexible,
                max_size: SizeClass::Medium,
                base_price: 400,
            },
        }
    }
}

fn tiered(tiers: &[SizeTier], top: f64, gate_count: usize) -> f64 {
    tiers
        .iter()
        .find(|t| gate_count <= t.max_gates)
        .map(|t| t.multiplier)
        .unwrap_or(top)
}

impl PricingConfig {
    pub fn type_multiplier(&self, gate_type: GateType) -> f64 {
        match gate_type {
            GateType::Exclusive => self.exclusive_multiplier,
            GateType::Preferential => self.preferential_multiplier,
            GateType::Common => self.common_multiplier,
        }
    }

    pub fn is_peak(&self, hour: u32) -> bool {
        self.peak_hours.iter().any(|&(from, to)| hour >= from && hour <= to)
    }

    pub fn is_night(&self, hour: u32) -> bool {
        hour >= self.night_start_hour || hour <= self.night_end_hour
    }

    pub fn time_of_day_multiplier(&self, hour: u32) -> f64 {
        if self.is_peak(hour) {
            self.peak_multiplier
        } else if self.is_night(hour) {
            self.night_multiplier
        } else {
            1.0
        }
    }

    pub fn location_size_multiplier(&self, gate_count: usize) -> f64 {
        tiered(&self.location_size_tiers, self.location_size_top, gate_count)
    }

    pub fn purchase_size_multiplier(&self, gate_count: usize) -> f64 {
        tiered(&self.purchase_size_tiers, self.purchase_size_top, gate_count)
    }

    /// Price of one slot starting in `hour`
    ///
    /// # Example
    /// ```
    /// use airline_simulator_core_rs::core::DateContext;
    /// use airline_simulator_core_rs::gates::PricingConfig;
    /// use airline_simulator_core_rs::models::gate::GateType;
    ///
    /// let pricing = PricingConfig::default();
    /// let weekend = DateContext { is_weekend: true, is_holiday: false };
    /// // 400 × 1.0 × 1.3 × 1.25 × 0.9 × 1.2
    /// assert_eq!(pricing.slot_price(GateType::Common, 400, 8, true, weekend, 12), 702);
    /// ```
    pub fn slot_price(
        &self,
        gate_type: GateType,
        base_price: i64,
        hour: u32,
        international: bool,
        date: DateContext,
        gate_count: usize,
    ) -> i64 {
        let international = if international {
            self.international_multiplier
        } else {
            1.0
        };
        let weekend = if date.is_weekend {
            self.weekend_multiplier
        } else {
            1.0
        };
        let holiday = if date.is_holiday {
            self.holiday_multiplier
        } else {
            1.0
        };

        let price = base_price as f64
            * self.type_multiplier(gate_type)
            * international
            * self.time_of_day_multiplier(hour)
            * weekend
            * holiday
            * self.location_size_multiplier(gate_count);
        price.round() as i64
    }

    pub fn purchase_base_cost(&self, gate_type: GateType) -> i64 {
        match gate_type {
            GateType::Exclusive => self.exclusive_purchase_cost,
            GateType::Preferential => self.preferential_purchase_cost,
            GateType::Common => self.common_purchase_cost,
        }
    }

    /// Cost of buying a gate at a location that currently has `gate_count` gates
    pub fn purchase_cost(&self, gate_type: GateType, gate_count: usize) -> i64 {
        (self.purchase_base_cost(gate_type) as f64 * self.purchase_size_multiplier(gate_count))
            .round() as i64
    }

    pub fn defaults_for(&self, gate_type: GateType) -> &GateDefaults {
        match gate_type {
            GateType::Exclusive => &self.exclusive_defaults,
            GateType::Preferential => &self.preferential_defaults,
            GateType::Common => &self.common_defaults,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day_bands() {
        let p = PricingConfig::default();
        for hour in [6, 9, 17, 20] {
            assert_eq!(p.time_of_day_multiplier(hour), 1.25, "hour {}", hour);
        }
        for hour in [23, 0, 3, 5] {
            assert_eq!(p.time_of_day_multiplier(hour), 0.9, "hour {}", hour);
        }
        for hour in [10, 12, 16, 21, 22] {
            assert_eq!(p.time_of_day_multiplier(hour), 1.0, "hour {}", hour);
        }
    }

    #[test]
    fn test_location_size_tiers() {
        let p = PricingConfig::default();
        assert_eq!(p.location_size_multiplier(0), 0.8);
        assert_eq!(p.location_size_multiplier(5), 0.8);
        assert_eq!(p.location_size_multiplier(6), 1.0);
        assert_eq!(p.location_size_multiplier(10), 1.0);
        assert_eq!(p.location_size_multiplier(15), 1.2);
        assert_eq!(p.location_size_multiplier(16), 1.4);
    }

    #[test]
    fn test_purchase_cost_tiers() {
        let p = PricingConfig::default();
        assert_eq!(p.purchase_cost(GateType::Common, 3), 480_000);
        assert_eq!(p.purchase_cost(GateType::Preferential, 8), 1_200_000);
        assert_eq!(p.purchase_cost(GateType::Exclusive, 11), 2_600_000);
    }

    #[test]
    fn test_all_factors_compose() {
        let p = PricingConfig::default();
        let holiday = DateContext {
            is_weekend: false,
            is_holiday: true,
        };
        // 1000 × 1.5 × 1.0 × 1.0 × 1.0 × 1.15 × 0.8
        assert_eq!(p.slot_price(GateType::Exclusive, 1000, 12, false, holiday, 2), 1380);
    }
}
