//! PyO3 wrapper for Orchestrator
//!
//! Commands return `False`/`None` on failure rather than raising; only
//! construction and checkpoint loading raise.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{parse_orchestrator_config, tick_result_to_py, to_json};
use crate::models::gate::{GateType, TimeWindow};
use crate::orchestrator::Orchestrator as RustOrchestrator;

fn parse_gate_type(name: &str) -> Option<GateType> {
    GateType::ALL.into_iter().find(|t| t.as_str() == name)
}

/// Python wrapper for Rust Orchestrator
///
/// # Example (from Python)
///
/// ```python
/// from airline_simulator_core_rs import Orchestrator
///
/// orch = Orchestrator.new(open("scenario_config.json").read())
/// route = orch.create_route("JFK", "LAX", 250)
/// orch.assign_vehicle_to_route(route, "N101", 2)
/// for _ in range(24):
///     result = orch.tick()
/// print(orch.balance())
/// ```
#[pyclass(name = "Orchestrator")]
pub struct PyOrchestrator {
    inner: RustOrchestrator,
}

#[pymethods]
impl PyOrchestrator {
    /// Create a new orchestrator from a JSON configuration
    ///
    /// Raises ValueError for malformed or invalid configuration.
    #[staticmethod]
    fn new(config_json: &str) -> PyResult<Self> {
        let config = parse_orchestrator_config(config_json)?;
        let inner = RustOrchestrator::new(config)
            .map_err(|e| PyValueError::new_err(format!("Failed to create orchestrator: {}", e)))?;
        Ok(PyOrchestrator { inner })
    }

    /// Restore from a checkpoint produced by `save_state`
    #[staticmethod]
    fn load_state(config_json: &str, state_json: &str) -> PyResult<Self> {
        let config = parse_orchestrator_config(config_json)?;
        let inner = RustOrchestrator::load_state(config, state_json)
            .map_err(|e| PyValueError::new_err(format!("Failed to load state: {}", e)))?;
        Ok(PyOrchestrator { inner })
    }

    /// Advance one simulated hour
    fn tick(&mut self, py: Python) -> PyResult<Py<PyDict>> {
        let result = self
            .inner
            .tick()
            .map_err(|e| PyRuntimeError::new_err(format!("Tick execution failed: {}", e)))?;
        tick_result_to_py(py, &result)
    }

    fn save_state(&self) -> Option<String> {
        self.inner.save_state().ok()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    fn current_tick(&self) -> usize {
        self.inner.current_tick()
    }

    fn current_day(&self) -> usize {
        self.inner.current_day()
    }

    fn current_timestamp(&self) -> String {
        self.inner.current_timestamp().to_string()
    }

    fn balance(&self) -> i64 {
        self.inner.balance()
    }

    fn transactions(&self) -> Option<String> {
        to_json(&self.inner.transactions())
    }

    fn get_route(&self, route_id: &str) -> Option<String> {
        self.inner.get_route(route_id).and_then(to_json)
    }

    fn get_all_routes(&self) -> Option<String> {
        to_json(&self.inner.get_all_routes())
    }

    fn get_route_statistics(&self, route_id: &str) -> Option<String> {
        self.inner
            .get_route_statistics(route_id)
            .as_ref()
            .and_then(to_json)
    }

    fn flight(&self, vehicle_id: &str) -> Option<String> {
        self.inner.flight(vehicle_id).and_then(to_json)
    }

    fn flights(&self) -> Option<String> {
        to_json(&self.inner.flights())
    }

    fn completed_flights(&self) -> Option<String> {
        to_json(&self.inner.completed_flights())
    }

    /// Availability of gates at a location for `[start_minute, start_minute + duration)`
    #[pyo3(signature = (location_id, start_minute, duration_minutes, vehicle_id=None))]
    fn check_gate_availability(
        &self,
        location_id: &str,
        start_minute: u32,
        duration_minutes: u32,
        vehicle_id: Option<&str>,
    ) -> Option<String> {
        self.inner
            .check_gate_availability(
                location_id,
                TimeWindow::new(start_minute, duration_minutes),
                vehicle_id,
            )
            .ok()
            .as_ref()
            .and_then(to_json)
    }

    fn get_gate_statistics(&self, location_id: &str) -> Option<String> {
        self.inner
            .get_gate_statistics(location_id)
            .as_ref()
            .and_then(to_json)
    }

    fn get_waiting_passengers(&self, departure_id: &str, destination_city_id: &str) -> u32 {
        self.inner
            .get_waiting_passengers(departure_id, destination_city_id)
    }

    #[pyo3(signature = (top_n=10))]
    fn get_passenger_statistics(&self, top_n: usize) -> Option<String> {
        to_json(&self.inner.get_passenger_statistics(top_n))
    }

    /// Drain and return the event log as a JSON array
    fn take_events(&mut self) -> Option<String> {
        to_json(&self.inner.take_events())
    }

    // ========================================================================
    // Commands
    // ========================================================================

    fn create_route(
        &mut self,
        origin_id: &str,
        destination_id: &str,
        price_per_passenger: i64,
    ) -> Option<String> {
        self.inner
            .create_route(origin_id, destination_id, price_per_passenger)
            .ok()
    }

    fn delete_route(&mut self, route_id: &str) -> bool {
        self.inner.delete_route(route_id).is_ok()
    }

    fn assign_vehicle_to_route(
        &mut self,
        route_id: &str,
        vehicle_id: &str,
        daily_flights: u32,
    ) -> bool {
        self.inner
            .assign_vehicle_to_route(route_id, vehicle_id, daily_flights)
            .is_ok()
    }

    fn remove_vehicle_from_route(&mut self, route_id: &str, vehicle_id: &str) -> bool {
        self.inner
            .remove_vehicle_from_route(route_id, vehicle_id)
            .is_ok()
    }

    fn update_vehicle_schedule(
        &mut self,
        route_id: &str,
        vehicle_id: &str,
        daily_flights: u32,
    ) -> bool {
        self.inner
            .update_vehicle_schedule(route_id, vehicle_id, daily_flights)
            .is_ok()
    }

    /// Gate type is "exclusive", "preferential" or "common"
    fn purchase_gate(&mut self, location_id: &str, gate_type: &str) -> Option<String> {
        let gate_type = parse_gate_type(gate_type)?;
        self.inner.purchase_gate(location_id, gate_type).ok()
    }

    /// Windows are `(start_minute, duration_minutes)` pairs
    #[pyo3(signature = (route_id, vehicle_id, location_id, windows, preferred_type=None))]
    fn book_gate_slot(
        &mut self,
        route_id: &str,
        vehicle_id: &str,
        location_id: &str,
        windows: Vec<(u32, u32)>,
        preferred_type: Option<&str>,
    ) -> Option<String> {
        let preferred = match preferred_type {
            Some(name) => Some(parse_gate_type(name)?),
            None => None,
        };
        let windows = windows
            .into_iter()
            .map(|(start, duration)| TimeWindow::new(start, duration))
            .collect();
        self.inner
            .book_gate_slot(route_id, vehicle_id, location_id, preferred, windows)
            .ok()
    }

    fn cancel_gate_booking(&mut self, booking_id: &str) -> bool {
        self.inner.cancel_gate_booking(booking_id).is_ok()
    }

    fn block_gate_slot(&mut self, location_id: &str, gate_id: &str, slot_id: &str) -> bool {
        self.inner
            .block_gate_slot(location_id, gate_id, slot_id)
            .is_ok()
    }

    #[pyo3(signature = (vehicle_id, duration_hours=None))]
    fn set_vehicle_maintenance(&mut self, vehicle_id: &str, duration_hours: Option<usize>) -> bool {
        self.inner
            .set_vehicle_maintenance(vehicle_id, duration_hours)
            .is_ok()
    }

    fn end_vehicle_maintenance(&mut self, vehicle_id: &str) -> bool {
        self.inner.end_vehicle_maintenance(vehicle_id).is_ok()
    }
}
