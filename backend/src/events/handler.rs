//! Scenario event execution and scheduling
//!
//! This module handles:
//! - Scheduling events by tick
//! - Executing events to modify state
//! - Logging executed events

use crate::core::SimTimestamp;
use crate::events::types::{ScenarioEvent, ScheduledEvent};
use crate::ledger::TransactionCategory;
use crate::models::{state::SimulationState, Event, EventLog};
use serde_json::json;

/// Handles scenario event scheduling and execution
#[derive(Debug, Clone, Default)]
pub struct ScenarioEventHandler {
    events: Vec<ScheduledEvent>,
}

impl ScenarioEventHandler {
    /// Create a new event handler with the given events
    pub fn new(events: Vec<ScheduledEvent>) -> Self {
        Self { events }
    }

    /// Get all events scheduled for a specific tick
    pub fn get_events_for_tick(&self, tick: usize) -> Vec<&ScenarioEvent> {
        self.events
            .iter()
            .filter(|scheduled| scheduled.schedule.should_execute(tick))
            .map(|scheduled| &scheduled.event)
            .collect()
    }

    /// Execute all events scheduled for the given tick
    ///
    /// A failing event does not stop the others. Returns the number that
    /// succeeded and the error messages of those that failed.
    pub fn execute_tick_events(
        &self,
        state: &mut SimulationState,
        tick: usize,
        log: &mut EventLog,
    ) -> (usize, Vec<String>) {
        let mut executed = 0;
        let mut failures = Vec::new();

        for event in self.get_events_for_tick(tick) {
            match event.execute(state, tick, log) {
                Ok(()) => executed += 1,
                Err(e) => failures.push(format!("{}: {}", event.event_type(), e)),
            }
        }

        (executed, failures)
    }
}

impl ScenarioEvent {
    /// Execute this event, modifying the given state
    ///
    /// # Returns
    /// Ok(()) if successful, Err with description if failed
    pub fn execute(
        &self,
        state: &mut SimulationState,
        tick: usize,
        log: &mut EventLog,
    ) -> Result<(), String> {
        match self {
            ScenarioEvent::VehicleMaintenance {
                vehicle_id,
                duration_hours,
            } => execute_vehicle_maintenance(state, tick, log, vehicle_id, *duration_hours),

            ScenarioEvent::CashAdjustment {
                amount,
                description,
            } => execute_cash_adjustment(state, tick, log, *amount, description),

            ScenarioEvent::DemandRateChange { multiplier } => {
                execute_demand_rate_change(state, tick, log, *multiplier)
            }
        }
    }
}

// ============================================================================
// Event Execution Functions
// ============================================================================

fn execute_vehicle_maintenance(
    state: &mut SimulationState,
    tick: usize,
    log: &mut EventLog,
    vehicle_id: &str,
    duration_hours: usize,
) -> Result<(), String> {
    let until_tick = tick + duration_hours;
    state
        .fleet
        .begin_maintenance(vehicle_id, Some(until_tick))
        .map_err(|e| e.to_string())?;

    log.log(Event::VehicleMaintenanceStarted {
        tick,
        vehicle_id: vehicle_id.to_string(),
        until_tick: Some(until_tick),
    });
    log_scenario_event(
        log,
        tick,
        "vehicle_maintenance",
        json!({
            "vehicle_id": vehicle_id,
            "duration_hours": duration_hours,
            "until_tick": until_tick,
        }),
    );

    Ok(())
}

fn execute_cash_adjustment(
    state: &mut SimulationState,
    tick: usize,
    log: &mut EventLog,
    amount: i64,
    description: &str,
) -> Result<(), String> {
    let balance_before = state.ledger.balance();
    if let Err(e) = state.ledger.add_transaction(
        amount,
        TransactionCategory::Adjustment,
        description,
        SimTimestamp::from_tick(tick),
        tick,
    ) {
        log.log(Event::TransactionRejected {
            tick,
            category: TransactionCategory::Adjustment.as_str().to_string(),
            amount,
            balance: balance_before,
        });
        return Err(e.to_string());
    }

    log_scenario_event(
        log,
        tick,
        "cash_adjustment",
        json!({
            "amount": amount,
            "description": description,
            "balance_after": state.ledger.balance(),
        }),
    );

    Ok(())
}

fn execute_demand_rate_change(
    state: &mut SimulationState,
    tick: usize,
    log: &mut EventLog,
    multiplier: f64,
) -> Result<(), String> {
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(format!("Invalid demand multiplier: {}", multiplier));
    }

    let old_multiplier = state.demand.rate_multiplier();
    state.demand.set_rate_multiplier(multiplier);

    log_scenario_event(
        log,
        tick,
        "demand_rate_change",
        json!({
            "old_multiplier": old_multiplier,
            "new_multiplier": multiplier,
        }),
    );

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn log_scenario_event(log: &mut EventLog, tick: usize, event_type: &str, details: serde_json::Value) {
    log.log(Event::ScenarioEventExecuted {
        tick,
        event_type: event_type.to_string(),
        details,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VehicleType;
    use crate::events::types::EventSchedule;
    use crate::ledger::Ledger;
    use crate::models::fleet::{Fleet, FleetConfig, Vehicle, VehicleStatus};

    fn state() -> SimulationState {
        let vtype = VehicleType {
            id: "T1".to_string(),
            name: "Test".to_string(),
            capacity: 100,
            range_km: 5000.0,
            speed_kmh: 800.0,
            base_turn_time_hours: 1.0,
            tonnage: 30.0,
            reliability: 1.0,
        };
        let fleet = Fleet::new(
            vec![vtype],
            vec![Vehicle::new("V1".to_string(), "T1".to_string())],
            &FleetConfig::default(),
        );
        SimulationState::new(fleet, Ledger::new(1_000))
    }

    #[test]
    fn test_event_handler_get_events_for_tick() {
        let handler = ScenarioEventHandler::new(vec![ScheduledEvent {
            event: ScenarioEvent::DemandRateChange { multiplier: 2.0 },
            schedule: EventSchedule::OneTime { tick: 10 },
        }]);

        assert_eq!(handler.get_events_for_tick(10).len(), 1);
        assert_eq!(handler.get_events_for_tick(11).len(), 0);
    }

    #[test]
    fn test_vehicle_maintenance_sets_until_tick() {
        let mut s = state();
        let mut log = EventLog::new();
        ScenarioEvent::VehicleMaintenance {
            vehicle_id: "V1".to_string(),
            duration_hours: 12,
        }
        .execute(&mut s, 5, &mut log)
        .unwrap();

        let vehicle = s.fleet.vehicle("V1").unwrap();
        assert_eq!(vehicle.status(), VehicleStatus::Maintenance);
        assert_eq!(vehicle.maintenance_until_tick(), Some(17));
        assert_eq!(log.events_of_type("ScenarioEventExecuted").len(), 1);
    }

    #[test]
    fn test_failed_cash_adjustment_is_reported_not_applied() {
        let mut s = state();
        let mut log = EventLog::new();
        let handler = ScenarioEventHandler::new(vec![
            ScheduledEvent {
                event: ScenarioEvent::CashAdjustment {
                    amount: -5_000,
                    description: "fine".to_string(),
                },
                schedule: EventSchedule::OneTime { tick: 0 },
            },
            ScheduledEvent {
                event: ScenarioEvent::CashAdjustment {
                    amount: 500,
                    description: "grant".to_string(),
                },
                schedule: EventSchedule::OneTime { tick: 0 },
            },
        ]);

        let (executed, failures) = handler.execute_tick_events(&mut s, 0, &mut log);
        assert_eq!(executed, 1);
        assert_eq!(failures.len(), 1);
        assert_eq!(s.ledger.balance(), 1_500);
        assert_eq!(log.events_of_type("TransactionRejected").len(), 1);
    }

    #[test]
    fn test_unknown_vehicle_maintenance_fails() {
        let mut s = state();
        let mut log = EventLog::new();
        let result = ScenarioEvent::VehicleMaintenance {
            vehicle_id: "NOPE".to_string(),
            duration_hours: 1,
        }
        .execute(&mut s, 0, &mut log);
        assert!(result.is_err());
        assert!(log.is_empty());
    }
}
