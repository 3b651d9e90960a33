//! Scenario event types for simulation configuration
//!
//! Scenario events modify simulation state at specific ticks: vehicle
//! groundings, cash injections or charges, demand surges and slumps.
//!
//! # Design Principles
//!
//! 1. **Determinism**: All events are deterministically scheduled and executed
//! 2. **Money is i64**: All monetary values are whole currency units
//! 3. **Self-contained**: Events include all data needed for execution
//! 4. **Logged**: All executions are logged to the event log

use serde::{Deserialize, Serialize};

/// A scenario event that modifies simulation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioEvent {
    /// Ground a vehicle for a number of hours
    ///
    /// Its flight freezes until maintenance ends.
    ///
    /// # Example
    /// Unscheduled engine inspection for 12 hours
    VehicleMaintenance {
        vehicle_id: String,
        duration_hours: usize,
    },

    /// Post a manual ledger entry
    ///
    /// Positive amounts are income; negative amounts are rejected like any
    /// other expense when funds are insufficient.
    ///
    /// # Example
    /// Government subsidy of 250,000
    CashAdjustment { amount: i64, description: String },

    /// Scale daily demand generation
    ///
    /// # Example
    /// Holiday travel rush: 50% more passengers (multiply by 1.5)
    DemandRateChange {
        multiplier: f64, // OK to use float for rates (not money)
    },
}

impl ScenarioEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            ScenarioEvent::VehicleMaintenance { .. } => "vehicle_maintenance",
            ScenarioEvent::CashAdjustment { .. } => "cash_adjustment",
            ScenarioEvent::DemandRateChange { .. } => "demand_rate_change",
        }
    }
}

/// When to execute a scenario event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventSchedule {
    /// Execute once at a specific tick
    OneTime { tick: usize },

    /// Execute at regular intervals starting from start_tick
    Repeating { start_tick: usize, interval: usize },
}

impl EventSchedule {
    /// Check if this schedule triggers at the given tick
    pub fn should_execute(&self, tick: usize) -> bool {
        match self {
            EventSchedule::OneTime { tick: event_tick } => tick == *event_tick,
            EventSchedule::Repeating {
                start_tick,
                interval,
            } => *interval > 0 && tick >= *start_tick && (tick - start_tick) % interval == 0,
        }
    }
}

/// A scenario event paired with its schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub event: ScenarioEvent,
    pub schedule: EventSchedule,
}
