//! Aggregate demand pool
//!
//! Holds every waiting od-pair count and applies decay, pruning and
//! pickups.
//!
//! # Critical Invariants
//!
//! 1. **Non-negative**: counts are unsigned and never underflow
//! 2. **No zero entries**: an aggregate reaching 0 is removed immediately
//! 3. **Bounded**: aggregates untouched for longer than the prune horizon
//!    are removed regardless of count

use crate::models::passenger::{aggregate_key, PassengerAggregate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Guards floor() against products like 8.999999999 for exact integers
const DECAY_EPSILON: f64 = 1e-9;

/// Snapshot of the demand pool for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerStatistics {
    pub total_waiting: u64,
    pub aggregate_count: usize,
    pub waiting_by_departure: BTreeMap<String, u64>,

    /// Largest pairs as (key, count), descending
    pub top_pairs: Vec<(String, u32)>,

    pub total_generated: u64,
    pub total_delivered: u64,
    pub total_decayed: u64,
    pub total_pruned: u64,
}

/// All waiting passenger aggregates plus lifetime counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandPool {
    aggregates: BTreeMap<String, PassengerAggregate>,

    /// Day demand was last generated for
    last_generated_day: Option<usize>,

    /// Scales daily generation (scenario events)
    rate_multiplier: f64,

    total_generated: u64,
    total_delivered: u64,
    total_decayed: u64,
    total_pruned: u64,
}

impl Default for DemandPool {
    fn default() -> Self {
        Self::new()
    }
}

impl DemandPool {
    pub fn new() -> Self {
        Self {
            aggregates: BTreeMap::new(),
            last_generated_day: None,
            rate_multiplier: 1.0,
            total_generated: 0,
            total_delivered: 0,
            total_decayed: 0,
            total_pruned: 0,
        }
    }

    pub fn aggregates(&self) -> &BTreeMap<String, PassengerAggregate> {
        &self.aggregates
    }

    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }

    pub fn rate_multiplier(&self) -> f64 {
        self.rate_multiplier
    }

    pub fn set_rate_multiplier(&mut self, multiplier: f64) {
        self.rate_multiplier = multiplier.max(0.0);
    }

    pub fn last_generated_day(&self) -> Option<usize> {
        self.last_generated_day
    }

    /// Whether daily generation still has to run for `day`
    pub fn needs_generation(&self, day: usize) -> bool {
        self.last_generated_day != Some(day)
    }

    pub fn mark_generated(&mut self, day: usize) {
        self.last_generated_day = Some(day);
    }

    /// Add newly generated passengers to a pair
    pub fn add(&mut self, departure_id: &str, destination_city_id: &str, count: u32, day: usize) {
        if count == 0 {
            return;
        }
        let aggregate = self
            .aggregates
            .entry(aggregate_key(departure_id, destination_city_id))
            .or_insert_with(|| PassengerAggregate {
                departure_id: departure_id.to_string(),
                destination_city_id: destination_city_id.to_string(),
                count: 0,
                last_updated_day: day,
            });
        aggregate.count = aggregate.count.saturating_add(count);
        aggregate.last_updated_day = day;
        self.total_generated += count as u64;
    }

    /// Waiting count for a pair (0 when absent)
    pub fn waiting(&self, departure_id: &str, destination_city_id: &str) -> u32 {
        self.aggregates
            .get(&aggregate_key(departure_id, destination_city_id))
            .map(|a| a.count)
            .unwrap_or(0)
    }

    pub fn total_waiting(&self) -> u64 {
        self.aggregates.values().map(|a| a.count as u64).sum()
    }

    /// Multiply every count by `factor` and floor, dropping zeros
    ///
    /// Returns the number of passengers removed.
    ///
    /// # Example
    /// ```
    /// use airline_simulator_core_rs::demand::DemandPool;
    ///
    /// let mut pool = DemandPool::new();
    /// pool.add("JFK", "LA", 100, 0);
    /// pool.decay(0.9);
    /// pool.decay(0.9);
    /// pool.decay(0.9);
    /// assert_eq!(pool.waiting("JFK", "LA"), 72);
    /// ```
    pub fn decay(&mut self, factor: f64) -> u64 {
        let mut removed = 0u64;
        self.aggregates.retain(|_, aggregate| {
            let decayed = ((aggregate.count as f64) * factor + DECAY_EPSILON).floor();
            let decayed = (decayed.max(0.0) as u32).min(aggregate.count);
            removed += (aggregate.count - decayed) as u64;
            aggregate.count = decayed;
            decayed > 0
        });
        self.total_decayed += removed;
        removed
    }

    /// Drop aggregates last touched more than `horizon_days` before `current_day`
    ///
    /// Returns the number of aggregates removed.
    pub fn prune(&mut self, current_day: usize, horizon_days: usize) -> usize {
        let before = self.aggregates.len();
        let mut pruned_passengers = 0u64;
        self.aggregates.retain(|_, aggregate| {
            let stale = current_day.saturating_sub(aggregate.last_updated_day) > horizon_days;
            if stale {
                pruned_passengers += aggregate.count as u64;
            }
            !stale
        });
        self.total_pruned += pruned_passengers;
        before - self.aggregates.len()
    }

    /// Take up to `requested` passengers from a pair
    ///
    /// Delivers `min(available, requested)`; delivering zero is not an error.
    pub fn pickup(
        &mut self,
        departure_id: &str,
        destination_city_id: &str,
        requested: u32,
        day: usize,
    ) -> u32 {
        let key = aggregate_key(departure_id, destination_city_id);
        let Some(aggregate) = self.aggregates.get_mut(&key) else {
            return 0;
        };

        let delivered = aggregate.count.min(requested);
        aggregate.count -= delivered;
        aggregate.last_updated_day = day;
        if aggregate.count == 0 {
            self.aggregates.remove(&key);
        }

        self.total_delivered += delivered as u64;
        delivered
    }

    pub fn statistics(&self, top_n: usize) -> PassengerStatistics {
        let mut waiting_by_departure: BTreeMap<String, u64> = BTreeMap::new();
        for aggregate in self.aggregates.values() {
            *waiting_by_departure
                .entry(aggregate.departure_id.clone())
                .or_insert(0) += aggregate.count as u64;
        }

        let mut top_pairs: Vec<(String, u32)> = self
            .aggregates
            .iter()
            .map(|(k, a)| (k.clone(), a.count))
            .collect();
        top_pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_pairs.truncate(top_n);

        PassengerStatistics {
            total_waiting: self.total_waiting(),
            aggregate_count: self.aggregates.len(),
            waiting_by_departure,
            top_pairs,
            total_generated: self.total_generated,
            total_delivered: self.total_delivered,
            total_decayed: self.total_decayed,
            total_pruned: self.total_pruned,
        }
    }
}
