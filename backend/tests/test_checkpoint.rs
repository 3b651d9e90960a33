//! Save/load: restored runs continue exactly like uninterrupted ones

mod common;

use airline_simulator_core_rs::models::gate::{GateType, TimeWindow};
use airline_simulator_core_rs::{Orchestrator, SimulationError, StateSnapshot};
use serde_json::Value;

/// Orchestrator with two routes, a booking and some history
fn busy_orchestrator(seed: u64) -> Orchestrator {
    let mut orchestrator = Orchestrator::new(common::create_config(seed)).unwrap();
    let first = orchestrator.create_route("AAA", "BBB", 120).unwrap();
    let second = orchestrator.create_route("CCC", "AAB", 200).unwrap();
    orchestrator.assign_vehicle_to_route(&first, "V1", 2).unwrap();
    orchestrator.assign_vehicle_to_route(&second, "R1", 1).unwrap();
    orchestrator
        .book_gate_slot(
            &first,
            "V1",
            "AAA",
            Some(GateType::Exclusive),
            vec![TimeWindow::at_hour(7, 60)],
        )
        .unwrap();
    orchestrator.run(30).unwrap();
    orchestrator
}

/// State as JSON without the random transaction ids
fn comparable(orchestrator: &Orchestrator) -> Value {
    let mut value = serde_json::to_value(orchestrator.state()).unwrap();
    for tx in value["ledger"]["transactions"].as_array_mut().unwrap() {
        tx.as_object_mut().unwrap().remove("id");
    }
    value
}

#[test]
fn test_restored_run_matches_uninterrupted_run() {
    let mut original = busy_orchestrator(21);
    let json = original.save_state().unwrap();

    let mut restored = Orchestrator::load_state(common::create_config(21), &json).unwrap();
    assert_eq!(restored.current_tick(), 30);
    assert_eq!(comparable(&restored), comparable(&original));

    let original_results = original.run(60).unwrap();
    let restored_results = restored.run(60).unwrap();

    assert_eq!(original_results, restored_results);
    assert_eq!(comparable(&restored), comparable(&original));
    assert_eq!(restored.balance(), original.balance());
}

#[test]
fn test_snapshot_records_tick_and_rng() {
    let orchestrator = busy_orchestrator(4);
    let snapshot = orchestrator.snapshot().unwrap();

    assert_eq!(snapshot.current_tick, 30);
    assert_ne!(snapshot.rng_state, 0);
    assert_eq!(snapshot.config_hash.len(), 64);

    let parsed: StateSnapshot = serde_json::from_str(&orchestrator.save_state().unwrap()).unwrap();
    assert_eq!(parsed.current_tick, snapshot.current_tick);
    assert_eq!(parsed.rng_state, snapshot.rng_state);
}

#[test]
fn test_event_log_not_restored() {
    let orchestrator = busy_orchestrator(8);
    assert!(!orchestrator.event_log().is_empty());

    let restored =
        Orchestrator::load_state(common::create_config(8), &orchestrator.save_state().unwrap())
            .unwrap();
    assert!(restored.event_log().is_empty());
}

#[test]
fn test_load_with_different_config_rejected() {
    let orchestrator = busy_orchestrator(5);
    let json = orchestrator.save_state().unwrap();

    let mut other = common::create_config(5);
    other.initial_balance += 1;

    assert!(matches!(
        Orchestrator::load_state(other, &json),
        Err(SimulationError::StateValidationError(_))
    ));
}

#[test]
fn test_malformed_json_rejected() {
    assert!(matches!(
        Orchestrator::load_state(common::create_config(5), "{\"current_tick\": "),
        Err(SimulationError::SerializationError(_))
    ));
}

#[test]
fn test_inconsistent_assignment_rejected() {
    let orchestrator = busy_orchestrator(6);
    let mut snapshot = orchestrator.snapshot().unwrap();

    // Vehicles stay assigned but their flights vanish
    snapshot.state.flights.clear();

    assert!(matches!(
        Orchestrator::from_snapshot(common::create_config(6), snapshot),
        Err(SimulationError::StateValidationError(_))
    ));
}

#[test]
fn test_orphaned_booking_reference_rejected() {
    let orchestrator = busy_orchestrator(7);
    let mut snapshot = orchestrator.snapshot().unwrap();

    // Slots stay booked while nothing holds them
    snapshot.state.bookings.clear();

    assert!(matches!(
        Orchestrator::from_snapshot(common::create_config(7), snapshot),
        Err(SimulationError::StateValidationError(_))
    ));
}

#[test]
fn test_overlapping_booking_windows_rejected() {
    let mut orchestrator = busy_orchestrator(9);
    let route_id = orchestrator
        .get_all_routes()
        .iter()
        .find(|r| r.origin_id() == "AAA")
        .map(|r| r.id().to_string())
        .unwrap();
    let first = orchestrator
        .book_gate_slot(&route_id, "V1", "BBB", None, vec![TimeWindow::at_hour(10, 60)])
        .unwrap();
    let second = orchestrator
        .book_gate_slot(&route_id, "V1", "BBB", None, vec![TimeWindow::at_hour(12, 60)])
        .unwrap();

    let mut snapshot = orchestrator.snapshot().unwrap();
    assert_eq!(
        snapshot.state.bookings[&first].gate_id,
        snapshot.state.bookings[&second].gate_id
    );
    // Slots still agree, only the recorded windows collide
    snapshot.state.bookings.get_mut(&first).unwrap().windows = vec![TimeWindow::at_hour(11, 120)];

    assert!(matches!(
        Orchestrator::from_snapshot(common::create_config(9), snapshot),
        Err(SimulationError::StateValidationError(_))
    ));
}
