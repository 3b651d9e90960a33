//! Demand model: generation, decay, pickup and pruning

mod common;

use airline_simulator_core_rs::catalog::GeographyCatalog;
use airline_simulator_core_rs::demand::{generate_daily_demand, DemandConfig, DemandPool};
use airline_simulator_core_rs::{Orchestrator, RngManager};
use proptest::prelude::*;

fn geography() -> GeographyCatalog {
    let config = common::create_config(1);
    GeographyCatalog::new(config.cities, config.locations)
}

// ============================================================================
// Generation
// ============================================================================

#[test]
fn test_generation_never_targets_origin_city_locations() {
    let geo = geography();
    let config = DemandConfig {
        weekly_rate: 0.01,
        ..DemandConfig::default()
    };
    let mut pool = DemandPool::new();
    let mut rng = RngManager::new(77);

    let result = generate_daily_demand(&mut pool, &geo, &config, &mut rng, 0);
    assert!(result.units_generated > 0);

    // Departing from a location inside the destination city makes no sense
    assert_eq!(pool.waiting("AAA", "AC"), 0);
    assert_eq!(pool.waiting("AAB", "AC"), 0);
    assert_eq!(pool.waiting("BBB", "BC"), 0);
    assert_eq!(pool.waiting("CCC", "CC"), 0);
    for aggregate in pool.aggregates().values() {
        assert!(aggregate.count > 0);
        assert_eq!(aggregate.last_updated_day, 0);
    }
}

#[test]
fn test_generation_volume_matches_population() {
    let geo = geography();
    let config = DemandConfig {
        weekly_rate: 0.007,
        ..DemandConfig::default()
    };
    let mut pool = DemandPool::new();
    let result = generate_daily_demand(&mut pool, &geo, &config, &mut RngManager::new(5), 0);

    // floor(pop × 0.001) per city: 6000 + 3000 + 2000
    assert_eq!(result.units_generated, 11_000);
    assert_eq!(pool.total_waiting(), 11_000);
    assert_eq!(pool.statistics(0).total_generated, 11_000);
}

#[test]
fn test_domestic_destinations_dominate() {
    let geo = geography();
    let config = DemandConfig {
        weekly_rate: 0.007,
        ..DemandConfig::default()
    };
    let mut pool = DemandPool::new();
    generate_daily_demand(&mut pool, &geo, &config, &mut RngManager::new(5), 0);

    // From AC, BC is domestic and bigger than the foreign CC
    let to_bc = pool.waiting("AAA", "BC") + pool.waiting("AAB", "BC");
    let to_cc = pool.waiting("AAA", "CC") + pool.waiting("AAB", "CC");
    assert!(to_bc > to_cc);
}

#[test]
fn test_orchestrator_generates_once_per_day() {
    let mut orchestrator = Orchestrator::new(common::create_config(3)).unwrap();

    let results = orchestrator.run(48).unwrap();
    let generating: Vec<usize> = results
        .iter()
        .filter(|r| r.demand_generated > 0)
        .map(|r| r.tick)
        .collect();
    assert_eq!(generating, vec![0, 24]);

    // Decay does not touch demand on the tick it was created
    assert_eq!(results[0].passengers_decayed, 0);
    assert!(results[1].passengers_decayed > 0);
}

// ============================================================================
// Pickup and pruning
// ============================================================================

#[test]
fn test_pickup_removes_exhausted_aggregate() {
    let mut pool = DemandPool::new();
    pool.add("AAA", "BC", 30, 0);

    assert_eq!(pool.pickup("AAA", "BC", 50, 0), 30);
    assert!(pool.is_empty());
    assert_eq!(pool.pickup("AAA", "BC", 50, 0), 0);
    assert_eq!(pool.statistics(0).total_delivered, 30);
}

#[test]
fn test_prune_drops_stale_aggregates_only() {
    let mut pool = DemandPool::new();
    pool.add("AAA", "BC", 500, 0);
    pool.add("BBB", "AC", 500, 10);

    assert_eq!(pool.prune(29, 28), 1);
    assert_eq!(pool.waiting("AAA", "BC"), 0);
    assert_eq!(pool.waiting("BBB", "AC"), 500);
    assert_eq!(pool.statistics(0).total_pruned, 500);
}

#[test]
fn test_pickup_refreshes_prune_clock() {
    let mut pool = DemandPool::new();
    pool.add("AAA", "BC", 500, 0);
    pool.pickup("AAA", "BC", 10, 20);

    assert_eq!(pool.prune(40, 28), 0);
    assert_eq!(pool.waiting("AAA", "BC"), 490);
}

#[test]
fn test_statistics_top_pairs_sorted() {
    let mut pool = DemandPool::new();
    pool.add("AAA", "BC", 10, 0);
    pool.add("BBB", "AC", 30, 0);
    pool.add("CCC", "AC", 20, 0);

    let stats = pool.statistics(2);
    assert_eq!(stats.total_waiting, 60);
    assert_eq!(stats.aggregate_count, 3);
    assert_eq!(stats.top_pairs.len(), 2);
    assert_eq!(stats.top_pairs[0].1, 30);
    assert_eq!(stats.top_pairs[1].1, 20);
    assert_eq!(stats.waiting_by_departure.get("AAA"), Some(&10));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_decay_is_monotone_non_increasing(
        initial in 1u32..100_000,
        factor in 0.0f64..=1.0,
        rounds in 1usize..40,
    ) {
        let mut pool = DemandPool::new();
        pool.add("AAA", "BC", initial, 0);

        let mut previous = pool.waiting("AAA", "BC");
        let mut removed = 0u64;
        for _ in 0..rounds {
            removed += pool.decay(factor);
            let current = pool.waiting("AAA", "BC");
            prop_assert!(current <= previous);
            previous = current;
        }
        prop_assert_eq!(removed + previous as u64, initial as u64);
        prop_assert!(pool.aggregates().values().all(|a| a.count > 0));
    }

    #[test]
    fn prop_pickup_bounded_by_available_and_requested(
        available in 0u32..1_000,
        requests in prop::collection::vec(0u32..400, 1..10),
    ) {
        let mut pool = DemandPool::new();
        pool.add("AAA", "BC", available, 0);

        let mut remaining = available;
        for requested in requests {
            let delivered = pool.pickup("AAA", "BC", requested, 0);
            prop_assert!(delivered <= requested);
            prop_assert!(delivered <= remaining);
            prop_assert_eq!(delivered, requested.min(remaining));
            remaining -= delivered;
            prop_assert_eq!(pool.waiting("AAA", "BC"), remaining);
        }
    }

    #[test]
    fn prop_generation_deterministic_per_seed(seed in any::<u64>()) {
        let geo = geography();
        let config = DemandConfig::default();

        let mut a = DemandPool::new();
        let mut b = DemandPool::new();
        generate_daily_demand(&mut a, &geo, &config, &mut RngManager::new(seed), 0);
        generate_daily_demand(&mut b, &geo, &config, &mut RngManager::new(seed), 0);
        prop_assert_eq!(a, b);
    }
}
