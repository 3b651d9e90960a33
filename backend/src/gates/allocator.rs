//! Per-location gate inventory and slot allocation
//!
//! Booking is two-phase: [`GateInventory::plan_booking`] finds one gate
//! that can serve every requested window without touching any state, and
//! [`GateInventory::commit`] marks the planned slots booked. Each window
//! takes every slot it touches. A plan is all-or-nothing: if any window
//! cannot be covered no slot is consumed.

use crate::catalog::SizeClass;
use crate::core::DateContext;
use crate::gates::pricing::{GateDefaults, PricingConfig};
use crate::models::gate::{Gate, GateBooking, GateType, SlotStatus, TimeWindow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by gate operations
#[derive(Debug, Error, PartialEq)]
pub enum GateError {
    #[error("Gate not found: {gate_id}")]
    GateNotFound { gate_id: String },

    #[error("Slot not found: {slot_id}")]
    SlotNotFound { slot_id: String },

    #[error("Slot {slot_id} is not available")]
    SlotNotAvailable { slot_id: String },

    #[error("Booking not found: {booking_id}")]
    BookingNotFound { booking_id: String },

    #[error("Booking {booking_id} is already cancelled")]
    BookingInactive { booking_id: String },

    #[error("Booking needs at least one time window")]
    NoWindows,

    #[error("Invalid time window: start {start_minute}, duration {duration_minutes}")]
    InvalidWindow {
        start_minute: u32,
        duration_minutes: u32,
    },

    #[error("No gate at {location_id} suits a {size:?} vehicle")]
    NoSuitableGate {
        location_id: String,
        size: SizeClass,
    },

    #[error("No single gate at {location_id} can serve all {windows} requested window(s)")]
    NoAvailableSlots { location_id: String, windows: usize },
}

/// Inputs for dynamic slot pricing at booking time
#[derive(Debug, Clone, Copy)]
pub struct PriceContext<'a> {
    pub pricing: &'a PricingConfig,
    pub international: bool,
    pub date: DateContext,
}

impl PriceContext<'_> {
    fn price(&self, gate: &Gate, hour: u32, gate_count: usize) -> i64 {
        self.pricing.slot_price(
            gate.gate_type(),
            gate.base_price(),
            hour,
            self.international,
            self.date,
            gate_count,
        )
    }
}

/// One gate's answer to an availability query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateAvailability {
    pub gate_id: String,
    pub gate_type: GateType,
    pub max_size: SizeClass,

    /// Available slots overlapping the queried window
    pub slot_ids: Vec<String>,

    pub min_price: i64,
    pub max_price: i64,

    /// Whether the queried vehicle fits (true when no vehicle given)
    pub suitable: bool,
}

/// A validated, not yet committed booking
#[derive(Debug, Clone, PartialEq)]
pub struct BookingPlan {
    pub gate_id: String,
    pub slot_ids: Vec<String>,
    pub windows: Vec<TimeWindow>,
    pub total_cost: i64,
}

/// Gate usage summary for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateStatistics {
    pub location_id: String,
    pub total_gates: usize,
    pub active_gates: usize,
    pub gates_by_type: BTreeMap<GateType, usize>,
    pub available_slots: usize,
    pub booked_slots: usize,
    pub blocked_slots: usize,

    /// Booked share of all slots today, 0.0 when there are none
    pub utilisation: f64,

    pub active_bookings: usize,
    pub total_booking_spend: i64,
}

/// All gates at one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateInventory {
    location_id: String,
    gates: Vec<Gate>,
    next_gate_number: u32,
}

impl GateInventory {
    pub fn new(location_id: impl Into<String>) -> Self {
        Self {
            location_id: location_id.into(),
            gates: Vec::new(),
            next_gate_number: 1,
        }
    }

    pub fn location_id(&self) -> &str {
        &self.location_id
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn gate(&self, gate_id: &str) -> Option<&Gate> {
        self.gates.iter().find(|g| g.id() == gate_id)
    }

    fn gate_mut(&mut self, gate_id: &str) -> Result<&mut Gate, GateError> {
        self.gates
            .iter_mut()
            .find(|g| g.id() == gate_id)
            .ok_or_else(|| GateError::GateNotFound {
                gate_id: gate_id.to_string(),
            })
    }

    pub fn active_gate_count(&self) -> usize {
        self.gates.iter().filter(|g| g.is_active()).count()
    }

    /// Open a gate with the next sequential id (`<LOC>-G<n>`)
    ///
    /// The new gate gets today's slots right away; other gates are untouched.
    pub fn add_gate(
        &mut self,
        gate_type: GateType,
        defaults: &GateDefaults,
        operating_hours: (u32, u32),
        day: usize,
    ) -> String {
        let id = format!("{}-G{}", self.location_id, self.next_gate_number);
        self.next_gate_number += 1;

        let mut gate = Gate::new(
            id.clone(),
            self.location_id.clone(),
            gate_type,
            defaults.slot_policy,
            defaults.max_size,
            defaults.base_price,
        );
        gate.regenerate_slots(operating_hours, day);
        self.gates.push(gate);
        id
    }

    /// Rebuild every active gate's slots for `day` and re-apply bookings
    ///
    /// Active bookings recur daily, so their slot ids are marked booked
    /// again on the fresh slot lists.
    pub fn regenerate<'a>(
        &mut self,
        operating_hours: (u32, u32),
        day: usize,
        bookings: impl IntoIterator<Item = &'a GateBooking>,
    ) {
        for gate in self.gates.iter_mut().filter(|g| g.is_active()) {
            gate.regenerate_slots(operating_hours, day);
        }

        for booking in bookings {
            if !booking.active || booking.location_id != self.location_id {
                continue;
            }
            let Ok(gate) = self.gate_mut(&booking.gate_id) else {
                continue;
            };
            for slot_id in &booking.slot_ids {
                let rebooked =
                    gate.book_slot(slot_id, &booking.id, &booking.route_id, &booking.vehicle_id);
                debug_assert!(rebooked, "recurring slot {} lost on regeneration", slot_id);
            }
        }
    }

    /// Active gates with free slots overlapping `window`
    pub fn check_availability(
        &self,
        window: &TimeWindow,
        size: Option<SizeClass>,
        prices: &PriceContext<'_>,
    ) -> Vec<GateAvailability> {
        let gate_count = self.active_gate_count();

        self.gates
            .iter()
            .filter(|g| g.is_active())
            .filter_map(|gate| {
                let slots: Vec<_> = gate.available_overlapping(window).collect();
                if slots.is_empty() {
                    return None;
                }
                let slot_prices: Vec<i64> = slots
                    .iter()
                    .map(|s| prices.price(gate, s.window.start_hour(), gate_count))
                    .collect();

                Some(GateAvailability {
                    gate_id: gate.id().to_string(),
                    gate_type: gate.gate_type(),
                    max_size: gate.max_size(),
                    slot_ids: slots.iter().map(|s| s.id.clone()).collect(),
                    min_price: slot_prices.iter().copied().min().unwrap_or(0),
                    max_price: slot_prices.iter().copied().max().unwrap_or(0),
                    suitable: size.map_or(true, |s| gate.suits(s)),
                })
            })
            .collect()
    }

    /// Find one gate able to serve every window
    ///
    /// Gates of the preferred type are tried first, then every other
    /// suitable gate, each group in inventory order. Nothing is mutated.
    pub fn plan_booking(
        &self,
        preferred: Option<GateType>,
        windows: &[TimeWindow],
        size: SizeClass,
        prices: &PriceContext<'_>,
    ) -> Result<BookingPlan, GateError> {
        if windows.is_empty() {
            return Err(GateError::NoWindows);
        }
        if let Some(bad) = windows.iter().find(|w| !w.is_valid()) {
            return Err(GateError::InvalidWindow {
                start_minute: bad.start_minute,
                duration_minutes: bad.duration_minutes,
            });
        }

        let suitable = || self.gates.iter().filter(move |g| g.is_active() && g.suits(size));
        let candidates: Vec<&Gate> = suitable()
            .filter(|g| Some(g.gate_type()) == preferred)
            .chain(suitable().filter(|g| Some(g.gate_type()) != preferred))
            .collect();

        if candidates.is_empty() {
            return Err(GateError::NoSuitableGate {
                location_id: self.location_id.clone(),
                size,
            });
        }

        let gate_count = self.active_gate_count();
        for gate in candidates {
            if let Some(plan) = Self::plan_on_gate(gate, windows, prices, gate_count) {
                return Ok(plan);
            }
        }

        Err(GateError::NoAvailableSlots {
            location_id: self.location_id.clone(),
            windows: windows.len(),
        })
    }

    fn plan_on_gate(
        gate: &Gate,
        windows: &[TimeWindow],
        prices: &PriceContext<'_>,
        gate_count: usize,
    ) -> Option<BookingPlan> {
        let mut slot_ids: Vec<String> = Vec::new();
        let mut total_cost = 0i64;

        for window in windows {
            for slot in gate.covering_slots(window)? {
                // Two windows touching one slot cannot both own it
                if slot_ids.contains(&slot.id) {
                    return None;
                }
                total_cost += prices.price(gate, slot.window.start_hour(), gate_count);
                slot_ids.push(slot.id.clone());
            }
        }

        Some(BookingPlan {
            gate_id: gate.id().to_string(),
            slot_ids,
            windows: windows.to_vec(),
            total_cost,
        })
    }

    /// Mark every planned slot booked, or none of them
    pub fn commit(
        &mut self,
        plan: &BookingPlan,
        booking_id: &str,
        route_id: &str,
        vehicle_id: &str,
    ) -> Result<(), GateError> {
        let gate = self.gate_mut(&plan.gate_id)?;

        for (idx, slot_id) in plan.slot_ids.iter().enumerate() {
            if !gate.book_slot(slot_id, booking_id, route_id, vehicle_id) {
                for reserved in &plan.slot_ids[..idx] {
                    gate.release_slot(reserved, booking_id);
                }
                return Err(GateError::SlotNotAvailable {
                    slot_id: slot_id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Return a booking's slots to Available; returns how many were freed
    pub fn release(&mut self, booking: &GateBooking) -> usize {
        let Ok(gate) = self.gate_mut(&booking.gate_id) else {
            return 0;
        };
        booking
            .slot_ids
            .iter()
            .filter(|slot_id| gate.release_slot(slot_id, &booking.id))
            .count()
    }

    /// Close an available slot until the next regeneration
    pub fn block_slot(&mut self, gate_id: &str, slot_id: &str) -> Result<(), GateError> {
        let gate = self.gate_mut(gate_id)?;
        if gate.slot(slot_id).is_none() {
            return Err(GateError::SlotNotFound {
                slot_id: slot_id.to_string(),
            });
        }
        if gate.block_slot(slot_id) {
            Ok(())
        } else {
            Err(GateError::SlotNotAvailable {
                slot_id: slot_id.to_string(),
            })
        }
    }

    pub fn statistics<'a>(
        &self,
        bookings: impl IntoIterator<Item = &'a GateBooking>,
    ) -> GateStatistics {
        let mut gates_by_type: BTreeMap<GateType, usize> = BTreeMap::new();
        let (mut available, mut booked, mut blocked) = (0, 0, 0);

        for gate in &self.gates {
            *gates_by_type.entry(gate.gate_type()).or_insert(0) += 1;
            available += gate.count_slots(SlotStatus::Available);
            booked += gate.count_slots(SlotStatus::Booked);
            blocked += gate.count_slots(SlotStatus::Blocked);
        }

        let (mut active_bookings, mut total_booking_spend) = (0, 0i64);
        for booking in bookings
            .into_iter()
            .filter(|b| b.location_id == self.location_id)
        {
            if booking.active {
                active_bookings += 1;
            }
            total_booking_spend += booking.total_cost;
        }

        let total_slots = available + booked + blocked;
        GateStatistics {
            location_id: self.location_id.clone(),
            total_gates: self.gates.len(),
            active_gates: self.active_gate_count(),
            gates_by_type,
            available_slots: available,
            booked_slots: booked,
            blocked_slots: blocked,
            utilisation: if total_slots == 0 {
                0.0
            } else {
                booked as f64 / total_slots as f64
            },
            active_bookings,
            total_booking_spend,
        }
    }
}
