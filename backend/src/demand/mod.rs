//! Passenger demand generation, decay and pickup
//!
//! Demand is generated once per simulated day and per origin city, then
//! decays every tick. All generation is deterministic based on the RNG
//! seed.
//!
//! # Generation
//!
//! ```text
//! totalNew = floor(population × weekly_rate / 7 × rate_multiplier)
//!
//! destination weight ∝ sqrt(pop_millions) × exp(-distance / 2000) × domestic
//! departure weight   ∝ exp(-distance_to_location / 100) × domestic
//! domestic = 1.3 if same country else 0.7
//! ```
//!
//! Each unit samples a destination city, then a departure location, and
//! is folded into the (departure location → destination city) aggregate.
//!
//! # Example
//!
//! ```
//! use airline_simulator_core_rs::demand::{DemandConfig, DemandPool};
//!
//! let config = DemandConfig::default();
//! let mut pool = DemandPool::new();
//! pool.add("JFK", "LA", 100, 0);
//! pool.decay(config.decay_factor);
//! assert_eq!(pool.waiting("JFK", "LA"), 90);
//! ```

mod pool;

pub use pool::{DemandPool, PassengerStatistics};

use crate::catalog::{City, Geography, Location};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Demand model tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandConfig {
    /// Share of a city's population wanting to fly per week
    pub weekly_rate: f64,

    /// Per-tick multiplier applied to every aggregate
    pub decay_factor: f64,

    /// Aggregates untouched for longer than this are pruned
    pub prune_after_days: usize,

    /// Distance scale for destination attractiveness
    pub destination_distance_scale_km: f64,

    /// Distance scale for picking a departure location
    pub departure_distance_scale_km: f64,

    pub domestic_factor: f64,
    pub international_factor: f64,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            weekly_rate: 0.001,
            decay_factor: 0.9,
            prune_after_days: 28,
            destination_distance_scale_km: 2000.0,
            departure_distance_scale_km: 100.0,
            domestic_factor: 1.3,
            international_factor: 0.7,
        }
    }
}

impl DemandConfig {
    pub fn daily_rate(&self) -> f64 {
        self.weekly_rate / 7.0
    }

    fn country_factor(&self, a: &str, b: &str) -> f64 {
        if a == b {
            self.domestic_factor
        } else {
            self.international_factor
        }
    }

    /// Relative pull of a destination city from an origin city
    pub fn destination_weight(&self, origin: &City, destination: &City) -> f64 {
        let distance = origin.coordinates.distance_km(&destination.coordinates);
        let population_millions = destination.population as f64 / 1_000_000.0;
        population_millions.sqrt()
            * (-distance / self.destination_distance_scale_km).exp()
            * self.country_factor(&origin.country, &destination.country)
    }

    /// Relative likelihood of departing from a location
    pub fn departure_weight(&self, origin: &City, location: &Location) -> f64 {
        let distance = origin.coordinates.distance_km(&location.coordinates);
        (-distance / self.departure_distance_scale_km).exp()
            * self.country_factor(&origin.country, &location.country)
    }
}

/// Outcome of one day's generation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemandGenerationResult {
    pub units_generated: u64,
    pub aggregates_touched: usize,
}

fn cumulative(weights: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut total = 0.0;
    weights
        .map(|w| {
            total += w.max(0.0);
            total
        })
        .collect()
}

/// Generate one day of demand into the pool
///
/// Cities and locations are visited in id order so the RNG stream maps
/// to the same passengers on every run.
pub fn generate_daily_demand<G: Geography>(
    pool: &mut DemandPool,
    geography: &G,
    config: &DemandConfig,
    rng: &mut RngManager,
    day: usize,
) -> DemandGenerationResult {
    let cities = geography.cities();
    let locations = geography.locations();
    let daily_rate = config.daily_rate() * pool.rate_multiplier();

    let mut counts: BTreeMap<(usize, usize), u32> = BTreeMap::new();
    let mut units_generated = 0u64;

    for (origin_idx, origin) in cities.iter().enumerate() {
        let total_new = (origin.population as f64 * daily_rate).floor() as u64;
        if total_new == 0 {
            continue;
        }

        let destination_table = cumulative(cities.iter().enumerate().map(|(idx, dest)| {
            if idx == origin_idx {
                0.0
            } else {
                config.destination_weight(origin, dest)
            }
        }));

        // Departure tables depend on the destination (its own locations are excluded)
        let mut departure_tables: Vec<Option<Vec<f64>>> = vec![None; cities.len()];

        for _ in 0..total_new {
            let Some(dest_idx) = rng.weighted_index(&destination_table) else {
                break;
            };
            let destination = cities[dest_idx];

            let table = departure_tables[dest_idx].get_or_insert_with(|| {
                cumulative(locations.iter().map(|loc| {
                    if loc.city_id == destination.id {
                        0.0
                    } else {
                        config.departure_weight(origin, loc)
                    }
                }))
            });

            let Some(loc_idx) = rng.weighted_index(table) else {
                continue;
            };

            *counts.entry((loc_idx, dest_idx)).or_insert(0) += 1;
            units_generated += 1;
        }
    }

    for ((loc_idx, dest_idx), count) in &counts {
        pool.add(&locations[*loc_idx].id, &cities[*dest_idx].id, *count, day);
    }
    pool.mark_generated(day);

    DemandGenerationResult {
        units_generated,
        aggregates_touched: counts.len(),
    }
}
