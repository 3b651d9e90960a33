//! Same-day revenue consolidation
//!
//! Pickups do not hit the ledger directly. Their revenue is accumulated
//! per (route, leg) during the day and posted as one transaction per
//! bucket at the day boundary.

use crate::models::flight::Leg;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Revenue accumulated for one route leg during the current day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueBucket {
    pub route_id: String,
    pub route_code: String,
    pub leg: Leg,
    pub revenue: i64,
    pub passengers: u64,
    pub flights: u32,
    pub vehicles: BTreeSet<String>,
}

impl RevenueBucket {
    /// Ledger description, e.g. `JFK-LAX outbound: 2 vehicles, 5 flights, 812 passengers`
    pub fn summary(&self) -> String {
        format!(
            "{} {}: {} vehicle{}, {} flight{}, {} passengers",
            self.route_code,
            self.leg.as_str(),
            self.vehicles.len(),
            if self.vehicles.len() == 1 { "" } else { "s" },
            self.flights,
            if self.flights == 1 { "" } else { "s" },
            self.passengers,
        )
    }
}

/// Buckets keyed by `route_id|leg`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueBuffer {
    buckets: BTreeMap<String, RevenueBucket>,
}

impl RevenueBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn buckets(&self) -> impl Iterator<Item = &RevenueBucket> {
        self.buckets.values()
    }

    /// Pending (not yet posted) revenue across all buckets
    pub fn pending_revenue(&self) -> i64 {
        self.buckets.values().map(|b| b.revenue).sum()
    }

    /// Fold one pickup into its bucket
    ///
    /// Legs that board nobody still count as flights; buckets without
    /// revenue are skipped when the day is posted.
    pub fn add(
        &mut self,
        route_id: &str,
        route_code: &str,
        leg: Leg,
        vehicle_id: &str,
        passengers: u32,
        revenue: i64,
    ) {
        let bucket = self
            .buckets
            .entry(format!("{}|{}", route_id, leg.as_str()))
            .or_insert_with(|| RevenueBucket {
                route_id: route_id.to_string(),
                route_code: route_code.to_string(),
                leg,
                revenue: 0,
                passengers: 0,
                flights: 0,
                vehicles: BTreeSet::new(),
            });
        bucket.revenue += revenue;
        bucket.passengers += passengers as u64;
        bucket.flights += 1;
        bucket.vehicles.insert(vehicle_id.to_string());
    }

    /// Remove and return every bucket in key order
    pub fn drain(&mut self) -> Vec<RevenueBucket> {
        std::mem::take(&mut self.buckets).into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_split_by_leg() {
        let mut buffer = RevenueBuffer::new();
        buffer.add("route_0001", "JFK-LAX", Leg::Outbound, "V1", 100, 10_000);
        buffer.add("route_0001", "JFK-LAX", Leg::Outbound, "V2", 50, 5_000);
        buffer.add("route_0001", "JFK-LAX", Leg::Return, "V1", 80, 8_000);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.pending_revenue(), 23_000);

        let drained = buffer.drain();
        assert!(buffer.is_empty());
        assert_eq!(drained[0].leg, Leg::Outbound);
        assert_eq!(
            drained[0].summary(),
            "JFK-LAX outbound: 2 vehicles, 2 flights, 150 passengers"
        );
        assert_eq!(
            drained[1].summary(),
            "JFK-LAX return: 1 vehicle, 1 flight, 80 passengers"
        );
    }

    #[test]
    fn test_empty_legs_still_count_as_flights() {
        let mut buffer = RevenueBuffer::new();
        buffer.add("route_0001", "JFK-LAX", Leg::Return, "V1", 80, 8_000);
        buffer.add("route_0001", "JFK-LAX", Leg::Return, "V2", 0, 0);
        buffer.add("route_0002", "LAX-SFO", Leg::Outbound, "V3", 0, 0);

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.pending_revenue(), 8_000);

        let drained = buffer.drain();
        assert_eq!(
            drained[0].summary(),
            "JFK-LAX return: 2 vehicles, 2 flights, 80 passengers"
        );
        assert_eq!(drained[1].revenue, 0);
        assert_eq!(drained[1].flights, 1);
    }
}
