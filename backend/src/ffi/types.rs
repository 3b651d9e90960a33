//! Conversions between Rust results and Python values
//!
//! Structured payloads cross the boundary as JSON strings; tick results
//! become plain dicts since Python drivers read them every hour.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use serde::Serialize;

use crate::orchestrator::{OrchestratorConfig, TickResult};

/// Parse an `OrchestratorConfig` from JSON
pub fn parse_orchestrator_config(json: &str) -> PyResult<OrchestratorConfig> {
    serde_json::from_str(json)
        .map_err(|e| PyValueError::new_err(format!("Invalid orchestrator config: {}", e)))
}

/// Serialize any query result to JSON, or `None` if it cannot be
pub fn to_json<T: Serialize>(value: &T) -> Option<String> {
    serde_json::to_string(value).ok()
}

/// Convert a tick result into a Python dict
pub fn tick_result_to_py(py: Python<'_>, result: &TickResult) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("tick", result.tick)?;
    dict.set_item("timestamp", result.timestamp.to_string())?;
    dict.set_item("scenario_events_executed", result.scenario_events_executed)?;
    dict.set_item("passengers_decayed", result.passengers_decayed)?;
    dict.set_item("demand_generated", result.demand_generated)?;
    dict.set_item("flights_advanced", result.flights_advanced)?;
    dict.set_item("flights_paused", result.flights_paused)?;
    dict.set_item("passengers_boarded", result.passengers_boarded)?;
    dict.set_item("revenue_accrued", result.revenue_accrued)?;
    dict.set_item("cycles_completed", result.cycles_completed)?;

    match &result.end_of_day {
        Some(summary) => {
            let eod = PyDict::new_bound(py);
            eod.set_item("day", summary.day)?;
            eod.set_item("revenue_posted", summary.revenue_posted)?;
            eod.set_item("revenue_transactions", summary.revenue_transactions)?;
            eod.set_item("aggregates_pruned", summary.aggregates_pruned)?;
            eod.set_item("history_pruned", summary.history_pruned)?;
            eod.set_item("waiting_passengers", summary.waiting_passengers)?;
            eod.set_item("balance", summary.balance)?;
            dict.set_item("end_of_day", eod)?;
        }
        None => dict.set_item("end_of_day", py.None())?,
    }

    Ok(dict.unbind())
}
