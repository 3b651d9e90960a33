//! Same seed, same run

mod common;

use airline_simulator_core_rs::models::gate::{GateType, TimeWindow};
use airline_simulator_core_rs::{Orchestrator, TickResult};

fn run_with_seed(seed: u64, hours: usize) -> (Orchestrator, Vec<TickResult>) {
    let mut orchestrator = Orchestrator::new(common::create_config(seed)).unwrap();
    let first = orchestrator.create_route("AAA", "BBB", 150).unwrap();
    let second = orchestrator.create_route("BBB", "CCC", 220).unwrap();
    orchestrator.assign_vehicle_to_route(&first, "V1", 2).unwrap();
    orchestrator.assign_vehicle_to_route(&first, "V2", 1).unwrap();
    orchestrator.assign_vehicle_to_route(&second, "R1", 2).unwrap();
    orchestrator
        .book_gate_slot(
            &first,
            "V1",
            "AAA",
            Some(GateType::Common),
            vec![TimeWindow::at_hour(6, 60), TimeWindow::at_hour(18, 60)],
        )
        .unwrap();

    let results = orchestrator.run(hours).unwrap();
    (orchestrator, results)
}

#[test]
fn test_same_seed_identical_outcomes() {
    let (a, results_a) = run_with_seed(42, 24 * 5);
    let (b, results_b) = run_with_seed(42, 24 * 5);

    assert_eq!(results_a, results_b);
    assert_eq!(a.balance(), b.balance());
    assert_eq!(a.get_passenger_statistics(10), b.get_passenger_statistics(10));
    assert_eq!(a.state().demand, b.state().demand);
    assert_eq!(a.state().flights, b.state().flights);

    for route in a.get_all_routes() {
        let other = b.get_route(route.id()).unwrap();
        assert_eq!(route.total_flights(), other.total_flights());
        assert_eq!(route.total_revenue(), other.total_revenue());
        assert_eq!(
            a.get_route_statistics(route.id()),
            b.get_route_statistics(route.id())
        );
    }

    let amounts = |o: &Orchestrator| -> Vec<(usize, i64)> {
        o.transactions().iter().map(|t| (t.tick, t.amount)).collect()
    };
    assert_eq!(amounts(&a), amounts(&b));
}

#[test]
fn test_different_seeds_diverge() {
    let (a, _) = run_with_seed(1, 24 * 2);
    let (b, _) = run_with_seed(2, 24 * 2);

    assert_ne!(a.state().demand, b.state().demand);
}

#[test]
fn test_event_streams_match() {
    let (mut a, _) = run_with_seed(9, 48);
    let (mut b, _) = run_with_seed(9, 48);

    let events_a = a.take_events();
    let events_b = b.take_events();
    assert!(!events_a.is_empty());
    assert_eq!(events_a, events_b);
}
