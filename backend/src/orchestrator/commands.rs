//! Orchestrator commands
//!
//! Every command validates its inputs before touching state, so an `Err`
//! leaves the simulation exactly as it was. Successful commands log one
//! or more [`Event`]s at the current tick.

use crate::catalog::Geography;
use crate::flights;
use crate::gates::{GateInventory, PriceContext};
use crate::ledger::TransactionCategory;
use crate::models::event::Event;
use crate::models::fleet::VehicleStatus;
use crate::models::flight::{flight_time_hours, FlightTiming};
use crate::models::gate::{GateBooking, GateType, TimeWindow};
use crate::models::route::Route;
use crate::orchestrator::{Orchestrator, SimulationError};
use tracing::{info, warn};

impl Orchestrator {
    // ========================================================================
    // Routes
    // ========================================================================

    /// Open a route between two locations
    ///
    /// The base flight time uses the configured reference cruise speed.
    /// Returns the new route id.
    pub fn create_route(
        &mut self,
        origin_id: &str,
        destination_id: &str,
        price_per_passenger: i64,
    ) -> Result<String, SimulationError> {
        let origin = self
            .geography
            .location(origin_id)
            .ok_or_else(|| SimulationError::not_found("Location", origin_id))?;
        let destination = self
            .geography
            .location(destination_id)
            .ok_or_else(|| SimulationError::not_found("Location", destination_id))?;

        if origin_id == destination_id {
            return Err(SimulationError::Validation(format!(
                "Route endpoints must differ: {}",
                origin_id
            )));
        }
        if price_per_passenger < 0 {
            return Err(SimulationError::Validation(format!(
                "Ticket price must be non-negative, got {}",
                price_per_passenger
            )));
        }

        let distance_km = origin.coordinates.distance_km(&destination.coordinates);
        let base_flight_time =
            flight_time_hours(distance_km, self.config.fleet.reference_speed_kmh);
        let (origin_city_id, destination_city_id) =
            (origin.city_id.clone(), destination.city_id.clone());

        let tick = self.current_tick();
        let route_id = self.state.allocate_route_id();
        self.state.routes.insert(
            route_id.clone(),
            Route::new(
                route_id.clone(),
                origin_id.to_string(),
                destination_id.to_string(),
                origin_city_id,
                destination_city_id,
                distance_km,
                base_flight_time,
                price_per_passenger,
                tick,
            ),
        );

        self.log_event(Event::RouteCreated {
            tick,
            route_id: route_id.clone(),
            origin_id: origin_id.to_string(),
            destination_id: destination_id.to_string(),
        });
        info!(route = %route_id, origin = origin_id, destination = destination_id, distance_km, "route created");

        Ok(route_id)
    }

    /// Delete a route with no vehicles, cancelling its gate bookings
    pub fn delete_route(&mut self, route_id: &str) -> Result<(), SimulationError> {
        let route = self
            .state
            .routes
            .get(route_id)
            .ok_or_else(|| SimulationError::not_found("Route", route_id))?;
        if route.has_vehicles() {
            return Err(SimulationError::Validation(format!(
                "Route {} still has {} vehicle(s) assigned",
                route_id,
                route.schedule().len()
            )));
        }

        for booking_id in self.state.active_booking_ids(route_id, None) {
            self.cancel_gate_booking(&booking_id)?;
        }
        self.state.routes.remove(route_id);

        self.log_event(Event::RouteDeleted {
            tick: self.current_tick(),
            route_id: route_id.to_string(),
        });
        info!(route = route_id, "route deleted");
        Ok(())
    }

    // ========================================================================
    // Vehicle Assignment
    // ========================================================================

    fn flight_timing(&self, route: &Route, vehicle_id: &str) -> Result<FlightTiming, SimulationError> {
        let vtype = self.state.fleet.spec_of(vehicle_id)?;
        let turn_modifier = |id: &str| {
            self.geography
                .location(id)
                .map(|l| l.turn_time_modifier)
                .ok_or_else(|| SimulationError::not_found("Location", id))
        };

        Ok(FlightTiming::compute(
            route.distance_km(),
            vtype.speed_kmh,
            vtype.base_turn_time_hours,
            turn_modifier(route.origin_id())?,
            turn_modifier(route.destination_id())?,
        ))
    }

    fn check_daily_flights(
        timing: &FlightTiming,
        daily_flights: u32,
    ) -> Result<(), SimulationError> {
        // A cycle longer than a day still allows one flight per day
        let max = timing.max_daily_flights().max(1);
        if daily_flights == 0 || daily_flights > max {
            return Err(SimulationError::Validation(format!(
                "Daily flights must be within 1..={}, got {}",
                max, daily_flights
            )));
        }
        Ok(())
    }

    /// Put a vehicle on a route and start its first cycle
    ///
    /// The vehicle must be unassigned, not in maintenance and able to
    /// cover the route distance. Its first outbound leg boards at once.
    pub fn assign_vehicle_to_route(
        &mut self,
        route_id: &str,
        vehicle_id: &str,
        daily_flights: u32,
    ) -> Result<(), SimulationError> {
        let route = self
            .state
            .routes
            .get(route_id)
            .ok_or_else(|| SimulationError::not_found("Route", route_id))?;
        self.state.fleet.check_assignable(vehicle_id)?;

        let vtype = self.state.fleet.spec_of(vehicle_id)?;
        if vtype.range_km < route.distance_km() {
            return Err(SimulationError::Validation(format!(
                "Vehicle {} range {:.0} km is short of route distance {:.0} km",
                vehicle_id,
                vtype.range_km,
                route.distance_km()
            )));
        }
        let capacity = vtype.capacity;
        let timing = self.flight_timing(route, vehicle_id)?;
        Self::check_daily_flights(&timing, daily_flights)?;

        self.state.fleet.assign(vehicle_id, route_id)?;
        if let Some(route) = self.state.routes.get_mut(route_id) {
            route.add_schedule_entry(vehicle_id.to_string(), daily_flights);
        }

        let clock = self.flight_clock();
        self.log_event(Event::VehicleAssigned {
            tick: clock.tick,
            route_id: route_id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            daily_flights,
        });
        let boarding = flights::start_flight(
            &mut self.state,
            route_id,
            vehicle_id,
            timing,
            capacity,
            clock,
            &mut self.event_log,
        );

        info!(
            route = route_id,
            vehicle = vehicle_id,
            daily_flights,
            round_trip_hours = timing.round_trip_hours(),
            boarded = boarding.passengers,
            "vehicle assigned"
        );
        Ok(())
    }

    /// Take a vehicle off a route, cancelling its bookings there
    ///
    /// Passengers already aboard are carried no further; their revenue
    /// stays recorded.
    pub fn remove_vehicle_from_route(
        &mut self,
        route_id: &str,
        vehicle_id: &str,
    ) -> Result<(), SimulationError> {
        let route = self
            .state
            .routes
            .get(route_id)
            .ok_or_else(|| SimulationError::not_found("Route", route_id))?;
        if !route.has_vehicle(vehicle_id) {
            return Err(SimulationError::Validation(format!(
                "Vehicle {} is not assigned to {}",
                vehicle_id, route_id
            )));
        }

        for booking_id in self.state.active_booking_ids(route_id, Some(vehicle_id)) {
            self.cancel_gate_booking(&booking_id)?;
        }
        if let Some(route) = self.state.routes.get_mut(route_id) {
            route.remove_schedule_entry(vehicle_id);
        }
        self.state.flights.remove(vehicle_id);
        self.state.fleet.release(vehicle_id)?;

        self.log_event(Event::VehicleRemoved {
            tick: self.current_tick(),
            route_id: route_id.to_string(),
            vehicle_id: vehicle_id.to_string(),
        });
        info!(route = route_id, vehicle = vehicle_id, "vehicle removed");
        Ok(())
    }

    /// Change how many round trips per day a vehicle is scheduled for
    pub fn update_vehicle_schedule(
        &mut self,
        route_id: &str,
        vehicle_id: &str,
        daily_flights: u32,
    ) -> Result<(), SimulationError> {
        let route = self
            .state
            .routes
            .get(route_id)
            .ok_or_else(|| SimulationError::not_found("Route", route_id))?;
        let flight = self
            .state
            .flight_on_route(route_id, vehicle_id)
            .ok_or_else(|| {
                SimulationError::Validation(format!(
                    "Vehicle {} is not flying {}",
                    vehicle_id, route_id
                ))
            })?;
        Self::check_daily_flights(flight.timing(), daily_flights)?;
        debug_assert!(route.has_vehicle(vehicle_id));

        if let Some(route) = self.state.routes.get_mut(route_id) {
            route.set_daily_flights(vehicle_id, daily_flights);
        }
        info!(route = route_id, vehicle = vehicle_id, daily_flights, "schedule updated");
        Ok(())
    }

    // ========================================================================
    // Vehicle Maintenance
    // ========================================================================

    /// Ground a vehicle, for `duration_hours` or until ended explicitly
    ///
    /// A vehicle on a route keeps its assignment; its flight freezes.
    pub fn set_vehicle_maintenance(
        &mut self,
        vehicle_id: &str,
        duration_hours: Option<usize>,
    ) -> Result<(), SimulationError> {
        let tick = self.current_tick();
        let until_tick = duration_hours.map(|h| tick + h);
        self.state.fleet.begin_maintenance(vehicle_id, until_tick)?;

        self.log_event(Event::VehicleMaintenanceStarted {
            tick,
            vehicle_id: vehicle_id.to_string(),
            until_tick,
        });
        info!(vehicle = vehicle_id, ?until_tick, "maintenance started");
        Ok(())
    }

    pub fn end_vehicle_maintenance(&mut self, vehicle_id: &str) -> Result<(), SimulationError> {
        let was_grounded = self
            .state
            .fleet
            .vehicle(vehicle_id)
            .ok_or_else(|| SimulationError::not_found("Vehicle", vehicle_id))?
            .status()
            == VehicleStatus::Maintenance;
        self.state.fleet.end_maintenance(vehicle_id)?;

        if was_grounded {
            self.log_event(Event::VehicleMaintenanceEnded {
                tick: self.current_tick(),
                vehicle_id: vehicle_id.to_string(),
            });
            info!(vehicle = vehicle_id, "maintenance ended");
        }
        Ok(())
    }

    // ========================================================================
    // Gates
    // ========================================================================

    /// Buy a new gate at a location
    ///
    /// Cost depends on gate type and how many gates the location already
    /// has. The gate takes its type's configured defaults and gets
    /// today's slots. Returns the gate id.
    pub fn purchase_gate(
        &mut self,
        location_id: &str,
        gate_type: GateType,
    ) -> Result<String, SimulationError> {
        let operating_hours = self
            .geography
            .location(location_id)
            .map(|l| l.operating_hours)
            .ok_or_else(|| SimulationError::not_found("Location", location_id))?;
        let gate_count = self
            .state
            .gates
            .get(location_id)
            .map_or(0, |inv| inv.gates().len());
        let cost = self.config.pricing.purchase_cost(gate_type, gate_count);

        let tick = self.current_tick();
        let description = format!("{} gate at {}", gate_type.as_str(), location_id);
        self.charge(cost, TransactionCategory::GatePurchase, description)?;

        let defaults = self.config.pricing.defaults_for(gate_type).clone();
        let day = self.current_day();
        let gate_id = self
            .state
            .gates
            .entry(location_id.to_string())
            .or_insert_with(|| GateInventory::new(location_id))
            .add_gate(gate_type, &defaults, operating_hours, day);

        self.log_event(Event::GatePurchased {
            tick,
            location_id: location_id.to_string(),
            gate_id: gate_id.clone(),
            gate_type: gate_type.as_str().to_string(),
            cost,
        });
        info!(gate = %gate_id, cost, "gate purchased");
        Ok(gate_id)
    }

    /// Reserve one slot per required window for a route's vehicle
    ///
    /// All windows are placed on a single gate; the preferred type is
    /// tried first. Nothing is reserved or charged unless every window
    /// fits and the ledger can pay. Returns the booking id.
    pub fn book_gate_slot(
        &mut self,
        route_id: &str,
        vehicle_id: &str,
        location_id: &str,
        preferred_type: Option<GateType>,
        windows: Vec<TimeWindow>,
    ) -> Result<String, SimulationError> {
        let route = self
            .state
            .routes
            .get(route_id)
            .ok_or_else(|| SimulationError::not_found("Route", route_id))?;
        if !route.has_vehicle(vehicle_id) {
            return Err(SimulationError::Validation(format!(
                "Vehicle {} is not assigned to {}",
                vehicle_id, route_id
            )));
        }
        let end = route.end_at(location_id).ok_or_else(|| {
            SimulationError::Validation(format!(
                "Location {} is not an endpoint of {}",
                location_id, route_id
            ))
        })?;
        let international = self.is_international(route.origin_id(), route.destination_id());
        let size = self.state.fleet.spec_of(vehicle_id)?.size_class();

        let timestamp = self.current_timestamp();
        let prices = PriceContext {
            pricing: &self.config.pricing,
            international,
            date: self.config.calendar.date_context(&timestamp),
        };
        let inventory = self
            .state
            .gates
            .get(location_id)
            .ok_or_else(|| SimulationError::not_found("Location", location_id))?;
        let plan = inventory.plan_booking(preferred_type, &windows, size, &prices)?;

        if !self.state.ledger.can_afford(plan.total_cost) {
            return Err(self.reject(plan.total_cost, TransactionCategory::GateBooking));
        }

        // Consumed only once the charge goes through
        let booking_id = self.state.next_booking_id();
        if let Some(inventory) = self.state.gates.get_mut(location_id) {
            inventory.commit(&plan, &booking_id, route_id, vehicle_id)?;
        }

        let tick = self.current_tick();
        let booking = GateBooking {
            id: booking_id.clone(),
            route_id: route_id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            location_id: location_id.to_string(),
            gate_id: plan.gate_id.clone(),
            slot_ids: plan.slot_ids.clone(),
            windows: plan.windows.clone(),
            total_cost: plan.total_cost,
            active: true,
            created_tick: tick,
            cancelled_tick: None,
        };

        let description = format!("{} slot(s) at {} for {}", plan.slot_ids.len(), plan.gate_id, route_id);
        if let Err(e) = self.charge(plan.total_cost, TransactionCategory::GateBooking, description) {
            if let Some(inventory) = self.state.gates.get_mut(location_id) {
                inventory.release(&booking);
            }
            return Err(e);
        }
        let allocated = self.state.allocate_booking_id();
        debug_assert_eq!(allocated, booking_id);

        self.state.bookings.insert(booking_id.clone(), booking);
        if let Some(route) = self.state.routes.get_mut(route_id) {
            route.add_booking(end, booking_id.clone());
        }

        self.log_event(Event::GateBooked {
            tick,
            booking_id: booking_id.clone(),
            route_id: route_id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            gate_id: plan.gate_id.clone(),
            slot_count: plan.slot_ids.len(),
            cost: plan.total_cost,
        });
        info!(booking = %booking_id, gate = %plan.gate_id, cost = plan.total_cost, "gate slots booked");
        Ok(booking_id)
    }

    /// Release a booking's slots; returns how many were freed
    ///
    /// Booking costs are not refunded.
    pub fn cancel_gate_booking(&mut self, booking_id: &str) -> Result<usize, SimulationError> {
        let booking = self
            .state
            .bookings
            .get(booking_id)
            .ok_or_else(|| SimulationError::not_found("Booking", booking_id))?;
        if !booking.active {
            return Err(SimulationError::Validation(format!(
                "Booking {} is already cancelled",
                booking_id
            )));
        }

        let released = self
            .state
            .gates
            .get_mut(&booking.location_id)
            .map_or(0, |inventory| inventory.release(booking));

        let tick = self.current_tick();
        let route_id = booking.route_id.clone();
        if let Some(booking) = self.state.bookings.get_mut(booking_id) {
            booking.active = false;
            booking.cancelled_tick = Some(tick);
        }

        self.log_event(Event::GateBookingCancelled {
            tick,
            booking_id: booking_id.to_string(),
            route_id,
            slots_released: released,
        });
        info!(booking = booking_id, released, "gate booking cancelled");
        Ok(released)
    }

    /// Close an available slot for the rest of the day
    pub fn block_gate_slot(
        &mut self,
        location_id: &str,
        gate_id: &str,
        slot_id: &str,
    ) -> Result<(), SimulationError> {
        self.state
            .gates
            .get_mut(location_id)
            .ok_or_else(|| SimulationError::not_found("Location", location_id))?
            .block_slot(gate_id, slot_id)?;
        info!(gate = gate_id, slot = slot_id, "slot blocked");
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    pub(crate) fn is_international(&self, a: &str, b: &str) -> bool {
        match (self.geography.location(a), self.geography.location(b)) {
            (Some(a), Some(b)) => a.country != b.country,
            _ => false,
        }
    }

    /// Post an expense, logging a rejection if the ledger refuses it
    fn charge(
        &mut self,
        cost: i64,
        category: TransactionCategory,
        description: String,
    ) -> Result<(), SimulationError> {
        if !self.state.ledger.can_afford(cost) {
            return Err(self.reject(cost, category));
        }
        let timestamp = self.current_timestamp();
        let tick = self.current_tick();
        self.state
            .ledger
            .add_transaction(-cost, category, description, timestamp, tick)?;
        Ok(())
    }

    fn reject(&mut self, cost: i64, category: TransactionCategory) -> SimulationError {
        let balance = self.state.ledger.balance();
        self.log_event(Event::TransactionRejected {
            tick: self.current_tick(),
            category: category.as_str().to_string(),
            amount: -cost,
            balance,
        });
        warn!(category = category.as_str(), cost, balance, "insufficient funds");
        SimulationError::InsufficientFunds {
            required: cost,
            available: balance,
        }
    }
}
