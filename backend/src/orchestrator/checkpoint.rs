//! Checkpoint - Save/Load Simulation State
//!
//! Enables serialization and deserialization of complete orchestrator state
//! for pause/resume functionality.
//!
//! # Critical Invariants
//!
//! - **Determinism**: A restored run continues exactly like the original
//! - **Ledger Consistency**: Balance equals initial balance plus all transactions
//! - **Assignment Integrity**: Flights, schedules and fleet agree on who flies where
//! - **Slot Integrity**: A slot is booked iff an active booking holds it
//! - **Config Matching**: State can only be loaded with matching config

use crate::core::time::TimeManager;
use crate::models::gate::{SlotStatus, TimeWindow};
use crate::models::state::SimulationState;
use crate::models::EventLog;
use crate::orchestrator::{Orchestrator, OrchestratorConfig, SimulationError};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::info;

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete orchestrator state snapshot
///
/// This structure captures all state necessary to resume a simulation
/// from an arbitrary point in time. The event log is not part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Current tick position
    pub current_tick: usize,

    /// RNG state at time of snapshot (CRITICAL for determinism)
    pub rng_state: u64,

    /// SHA256 hash of original config (for validation)
    pub config_hash: String,

    pub state: SimulationState,
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic hash of configuration
///
/// Uses canonical JSON serialization with sorted keys to ensure
/// identical configs produce identical hashes.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    // Recursively sort all object keys for canonical representation
    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation Functions
// ============================================================================

fn invalid(msg: String) -> Result<(), SimulationError> {
    Err(SimulationError::StateValidationError(msg))
}

/// Validate state snapshot integrity
///
/// Checks critical invariants:
/// - Config hash matches
/// - Flight / schedule / fleet assignment agreement
/// - Slot booking referential integrity and no double-booked windows
/// - Ledger consistency
/// - No empty demand aggregates
pub fn validate_snapshot(
    snapshot: &StateSnapshot,
    expected_config_hash: &str,
) -> Result<(), SimulationError> {
    // 1. Config match
    if snapshot.config_hash != expected_config_hash {
        return invalid(format!(
            "Config hash mismatch: snapshot {}, expected {}",
            snapshot.config_hash, expected_config_hash
        ));
    }

    let state = &snapshot.state;

    // 2. Assignment integrity
    for (vehicle_id, flight) in &state.flights {
        let Some(route) = state.routes.get(flight.route_id()) else {
            return invalid(format!(
                "Flight of {} references unknown route {}",
                vehicle_id,
                flight.route_id()
            ));
        };
        if !route.has_vehicle(vehicle_id) {
            return invalid(format!(
                "Vehicle {} flies {} without a schedule entry",
                vehicle_id,
                route.id()
            ));
        }
    }
    for route in state.routes.values() {
        for entry in route.schedule() {
            if state.flight_on_route(route.id(), &entry.vehicle_id).is_none() {
                return invalid(format!(
                    "Scheduled vehicle {} on {} has no flight",
                    entry.vehicle_id,
                    route.id()
                ));
            }
            let assigned = state
                .fleet
                .vehicle(&entry.vehicle_id)
                .and_then(|v| v.assigned_route());
            if assigned != Some(route.id()) {
                return invalid(format!(
                    "Vehicle {} scheduled on {} but assigned to {:?}",
                    entry.vehicle_id,
                    route.id(),
                    assigned
                ));
            }
        }
    }

    // 3. Slot integrity
    for inventory in state.gates.values() {
        for gate in inventory.gates() {
            for slot in gate.slots() {
                let held_by_active = slot
                    .booking_id
                    .as_ref()
                    .and_then(|id| state.bookings.get(id))
                    .is_some_and(|b| b.active && b.slot_ids.contains(&slot.id));
                if (slot.status == SlotStatus::Booked) != held_by_active {
                    return invalid(format!(
                        "Slot {} status {:?} disagrees with its booking",
                        slot.id, slot.status
                    ));
                }
            }
        }
    }

    let mut owners: BTreeMap<(&str, &str), &str> = BTreeMap::new();
    for booking in state.bookings.values().filter(|b| b.active) {
        for slot_id in &booking.slot_ids {
            if let Some(other) =
                owners.insert((booking.gate_id.as_str(), slot_id.as_str()), booking.id.as_str())
            {
                return invalid(format!(
                    "Slot {} held by both {} and {}",
                    slot_id, other, booking.id
                ));
            }
        }
    }

    // Booked windows on one gate never overlap
    let mut windows_by_gate: BTreeMap<&str, Vec<(&str, &TimeWindow)>> = BTreeMap::new();
    for booking in state.bookings.values().filter(|b| b.active) {
        let held = windows_by_gate.entry(booking.gate_id.as_str()).or_default();
        for window in &booking.windows {
            if let Some((other, _)) = held
                .iter()
                .find(|(id, w)| *id != booking.id.as_str() && w.overlaps(window))
            {
                return invalid(format!(
                    "Bookings {} and {} overlap on gate {}",
                    other, booking.id, booking.gate_id
                ));
            }
        }
        held.extend(booking.windows.iter().map(|w| (booking.id.as_str(), w)));
    }

    // 4. Ledger consistency
    if !state.ledger.is_consistent() {
        return invalid(format!(
            "Ledger balance {} does not match its transactions",
            state.ledger.balance()
        ));
    }

    // 5. Demand aggregates
    if let Some(empty) = state.demand.aggregates().values().find(|a| a.count == 0) {
        return invalid(format!("Empty demand aggregate {}", empty.key()));
    }

    Ok(())
}

// ============================================================================
// Save / Load
// ============================================================================

impl Orchestrator {
    /// Capture the current state as a snapshot
    pub fn snapshot(&self) -> Result<StateSnapshot, SimulationError> {
        Ok(StateSnapshot {
            current_tick: self.current_tick(),
            rng_state: self.rng_manager.get_state(),
            config_hash: compute_config_hash(&self.config)?,
            state: self.state.clone(),
        })
    }

    /// Serialize the current state to JSON
    pub fn save_state(&self) -> Result<String, SimulationError> {
        let snapshot = self.snapshot()?;
        serde_json::to_string(&snapshot).map_err(|e| {
            SimulationError::SerializationError(format!("Snapshot serialization failed: {}", e))
        })
    }

    /// Restore an orchestrator from a snapshot taken with the same config
    pub fn from_snapshot(
        config: OrchestratorConfig,
        snapshot: StateSnapshot,
    ) -> Result<Self, SimulationError> {
        let expected_hash = compute_config_hash(&config)?;
        validate_snapshot(&snapshot, &expected_hash)?;

        // Builds geography and the scenario schedule from the config
        let mut orchestrator = Orchestrator::new(config)?;
        orchestrator.state = snapshot.state;
        orchestrator.time_manager = TimeManager::starting_at(snapshot.current_tick);
        orchestrator.rng_manager = RngManager::new(snapshot.rng_state);
        orchestrator.event_log = EventLog::new();

        info!(tick = snapshot.current_tick, "state restored from checkpoint");
        Ok(orchestrator)
    }

    /// Restore an orchestrator from JSON produced by [`Orchestrator::save_state`]
    pub fn load_state(config: OrchestratorConfig, json: &str) -> Result<Self, SimulationError> {
        let snapshot: StateSnapshot = serde_json::from_str(json).map_err(|e| {
            SimulationError::SerializationError(format!("Snapshot parse failed: {}", e))
        })?;
        Self::from_snapshot(config, snapshot)
    }
}
