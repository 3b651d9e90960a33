//! Gate model
//!
//! A gate is a bookable resource at a location. Every simulated day its
//! slot list is rebuilt from the location's operating hours, sliced into
//! fixed-duration units according to the gate's slot policy.
//!
//! # Critical Invariants
//!
//! 1. **Slot ownership**: a slot is Booked iff an active booking references it
//! 2. **No overlap**: slots on one gate never overlap and a booked window
//!    owns every slot it touches, so two active bookings on the same gate
//!    never hold overlapping windows
//! 3. **Stable slot ids**: `<gate>@<start_minute>` survives regeneration

use crate::catalog::SizeClass;
use serde::{Deserialize, Serialize};

/// Minutes in a day
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Commercial gate category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateType {
    Exclusive,
    Preferential,
    Common,
}

impl GateType {
    pub const ALL: [GateType; 3] = [GateType::Exclusive, GateType::Preferential, GateType::Common];

    pub fn as_str(&self) -> &'static str {
        match self {
            GateType::Exclusive => "exclusive",
            GateType::Preferential => "preferential",
            GateType::Common => "common",
        }
    }
}

/// How a gate's day is sliced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotPolicy {
    /// 60-minute slots
    Flexible,
    /// 90-minute slots
    Mixed,
    /// 120-minute slots
    FixedBlocks,
}

impl SlotPolicy {
    pub fn duration_minutes(&self) -> u32 {
        match self {
            SlotPolicy::Flexible => 60,
            SlotPolicy::Mixed => 90,
            SlotPolicy::FixedBlocks => 120,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Available,
    Booked,
    Blocked,
}

/// Half-open interval `[start, start + duration)` in minutes since midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_minute: u32,
    pub duration_minutes: u32,
}

impl TimeWindow {
    pub fn new(start_minute: u32, duration_minutes: u32) -> Self {
        Self {
            start_minute,
            duration_minutes,
        }
    }

    /// Window starting on the hour
    pub fn at_hour(hour: u32, duration_minutes: u32) -> Self {
        Self::new(hour * 60, duration_minutes)
    }

    pub fn end_minute(&self) -> u32 {
        self.start_minute + self.duration_minutes
    }

    pub fn start_hour(&self) -> u32 {
        self.start_minute / 60
    }

    /// Non-empty and inside one day
    pub fn is_valid(&self) -> bool {
        self.duration_minutes > 0 && self.end_minute() <= MINUTES_PER_DAY
    }

    /// # Example
    /// ```
    /// use airline_simulator_core_rs::models::gate::TimeWindow;
    ///
    /// let a = TimeWindow::new(60, 60);
    /// assert!(a.overlaps(&TimeWindow::new(90, 60)));
    /// assert!(!a.overlaps(&TimeWindow::new(120, 60)));
    /// ```
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start_minute < other.end_minute() && other.start_minute < self.end_minute()
    }
}

/// A bookable time unit on a gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub id: String,
    pub window: TimeWindow,
    pub status: SlotStatus,
    pub price: i64,
    pub booking_id: Option<String>,
    pub route_id: Option<String>,
    pub vehicle_id: Option<String>,
}

impl Slot {
    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }
}

/// Gate declaration in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    pub location_id: String,
    pub gate_type: GateType,
    pub slot_policy: SlotPolicy,
    pub max_size: SizeClass,
    pub base_price: i64,
}

/// A gate and its slots for the current day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    id: String,
    location_id: String,
    gate_type: GateType,
    slot_policy: SlotPolicy,
    max_size: SizeClass,
    base_price: i64,
    active: bool,
    slots: Vec<Slot>,

    /// Absolute day the slots were generated for
    slots_day: usize,
}

impl Gate {
    pub fn new(
        id: String,
        location_id: String,
        gate_type: GateType,
        slot_policy: SlotPolicy,
        max_size: SizeClass,
        base_price: i64,
    ) -> Self {
        Self {
            id,
            location_id,
            gate_type,
            slot_policy,
            max_size,
            base_price,
            active: true,
            slots: Vec::new(),
            slots_day: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn location_id(&self) -> &str {
        &self.location_id
    }

    pub fn gate_type(&self) -> GateType {
        self.gate_type
    }

    pub fn slot_policy(&self) -> SlotPolicy {
        self.slot_policy
    }

    pub fn max_size(&self) -> SizeClass {
        self.max_size
    }

    pub fn base_price(&self) -> i64 {
        self.base_price
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slots_day(&self) -> usize {
        self.slots_day
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether a vehicle of the given size may use this gate
    pub fn suits(&self, size: SizeClass) -> bool {
        size.fits(self.max_size)
    }

    pub fn slot_id_for(&self, start_minute: u32) -> String {
        format!("{}@{:04}", self.id, start_minute)
    }

    /// Rebuild the slot list for a day
    ///
    /// Full-length slots are laid from `open_hour` to `close_hour`, every
    /// slot starting Available at the gate's base price.
    ///
    /// # Example
    /// ```
    /// use airline_simulator_core_rs::catalog::SizeClass;
    /// use airline_simulator_core_rs::models::gate::{Gate, GateType, SlotPolicy};
    ///
    /// let mut gate = Gate::new("JFK-G1".into(), "JFK".into(), GateType::Common,
    ///                          SlotPolicy::FixedBlocks, SizeClass::Large, 400);
    /// gate.regenerate_slots((6, 22), 0);
    /// assert_eq!(gate.slots().len(), 8);
    /// assert_eq!(gate.slots()[0].id, "JFK-G1@0360");
    /// ```
    pub fn regenerate_slots(&mut self, operating_hours: (u32, u32), day: usize) {
        let (open_hour, close_hour) = operating_hours;
        let open = open_hour * 60;
        let close = (close_hour * 60).min(MINUTES_PER_DAY);
        let duration = self.slot_policy.duration_minutes();

        let mut slots = Vec::new();
        let mut start = open;
        while start + duration <= close {
            slots.push(Slot {
                id: self.slot_id_for(start),
                window: TimeWindow::new(start, duration),
                status: SlotStatus::Available,
                price: self.base_price,
                booking_id: None,
                route_id: None,
                vehicle_id: None,
            });
            start += duration;
        }

        self.slots = slots;
        self.slots_day = day;
    }

    pub fn slot(&self, slot_id: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == slot_id)
    }

    fn slot_mut(&mut self, slot_id: &str) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.id == slot_id)
    }

    /// Available slots overlapping a window
    pub fn available_overlapping(&self, window: &TimeWindow) -> impl Iterator<Item = &Slot> {
        let window = *window;
        self.slots
            .iter()
            .filter(move |s| s.is_available() && s.window.overlaps(&window))
    }

    /// Every slot a window touches, if together they cover it and are all available
    ///
    /// Slots are contiguous in start order, so the window is covered when
    /// the first touched slot starts at or before it, the last ends at or
    /// after it and no gap separates neighbours.
    ///
    /// # Example
    /// ```
    /// use airline_simulator_core_rs::catalog::SizeClass;
    /// use airline_simulator_core_rs::models::gate::{Gate, GateType, SlotPolicy, TimeWindow};
    ///
    /// let mut gate = Gate::new("BBB-G1".into(), "BBB".into(), GateType::Common,
    ///                          SlotPolicy::Flexible, SizeClass::Medium, 400);
    /// gate.regenerate_slots((6, 22), 0);
    /// let slots = gate.covering_slots(&TimeWindow::at_hour(10, 120)).unwrap();
    /// assert_eq!(slots.len(), 2);
    /// assert!(gate.covering_slots(&TimeWindow::at_hour(21, 120)).is_none());
    /// ```
    pub fn covering_slots(&self, window: &TimeWindow) -> Option<Vec<&Slot>> {
        let touched: Vec<&Slot> = self
            .slots
            .iter()
            .filter(|s| s.window.overlaps(window))
            .collect();

        let first = touched.first()?;
        let last = touched.last()?;
        if first.window.start_minute > window.start_minute
            || last.window.end_minute() < window.end_minute()
        {
            return None;
        }
        let contiguous = touched
            .windows(2)
            .all(|pair| pair[0].window.end_minute() == pair[1].window.start_minute);
        if !contiguous || !touched.iter().all(|s| s.is_available()) {
            return None;
        }
        Some(touched)
    }

    /// Mark a slot booked for an owner; false if missing or not available
    pub fn book_slot(
        &mut self,
        slot_id: &str,
        booking_id: &str,
        route_id: &str,
        vehicle_id: &str,
    ) -> bool {
        match self.slot_mut(slot_id) {
            Some(slot) if slot.is_available() => {
                slot.status = SlotStatus::Booked;
                slot.booking_id = Some(booking_id.to_string());
                slot.route_id = Some(route_id.to_string());
                slot.vehicle_id = Some(vehicle_id.to_string());
                true
            }
            _ => false,
        }
    }

    /// Return a slot held by `booking_id` to Available
    pub fn release_slot(&mut self, slot_id: &str, booking_id: &str) -> bool {
        match self.slot_mut(slot_id) {
            Some(slot) if slot.booking_id.as_deref() == Some(booking_id) => {
                slot.status = SlotStatus::Available;
                slot.booking_id = None;
                slot.route_id = None;
                slot.vehicle_id = None;
                true
            }
            _ => false,
        }
    }

    /// Block an available slot for the rest of the day
    pub fn block_slot(&mut self, slot_id: &str) -> bool {
        match self.slot_mut(slot_id) {
            Some(slot) if slot.is_available() => {
                slot.status = SlotStatus::Blocked;
                true
            }
            _ => false,
        }
    }

    pub fn count_slots(&self, status: SlotStatus) -> usize {
        self.slots.iter().filter(|s| s.status == status).count()
    }
}

/// A reservation of one or more slots on a gate for a route+vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateBooking {
    pub id: String,
    pub route_id: String,
    pub vehicle_id: String,
    pub location_id: String,
    pub gate_id: String,
    pub slot_ids: Vec<String>,
    pub windows: Vec<TimeWindow>,
    pub total_cost: i64,
    pub active: bool,
    pub created_tick: usize,
    pub cancelled_tick: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(policy: SlotPolicy) -> Gate {
        Gate::new(
            "AAA-G1".to_string(),
            "AAA".to_string(),
            GateType::Common,
            policy,
            SizeClass::Medium,
            400,
        )
    }

    #[test]
    fn test_regenerate_full_slots_only() {
        let mut g = gate(SlotPolicy::Mixed);
        g.regenerate_slots((5, 23), 3);
        // 18h = 1080 min / 90 = 12
        assert_eq!(g.slots().len(), 12);
        assert_eq!(g.slots_day(), 3);
        assert!(g.slots().iter().all(|s| s.price == 400 && s.is_available()));
        assert!(g.slots().windows(2).all(|w| !w[0].window.overlaps(&w[1].window)));
    }

    #[test]
    fn test_book_and_release_slot() {
        let mut g = gate(SlotPolicy::Flexible);
        g.regenerate_slots((0, 24), 0);
        let id = g.slot_id_for(600);

        assert!(g.book_slot(&id, "b1", "r1", "v1"));
        assert!(!g.book_slot(&id, "b2", "r1", "v2"));
        assert!(!g.release_slot(&id, "b2"));
        assert!(g.release_slot(&id, "b1"));

        let slot = g.slot(&id).unwrap();
        assert!(slot.is_available());
        assert!(slot.booking_id.is_none() && slot.vehicle_id.is_none());
    }

    #[test]
    fn test_covering_slots_within_one_slot() {
        let mut g = gate(SlotPolicy::FixedBlocks);
        g.regenerate_slots((0, 24), 0);

        let slots = g.covering_slots(&TimeWindow::new(130, 30)).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].window.start_minute, 120);

        g.block_slot(&g.slot_id_for(120));
        assert!(g.covering_slots(&TimeWindow::new(130, 30)).is_none());
    }

    #[test]
    fn test_covering_slots_spans_every_touched_slot() {
        let mut g = gate(SlotPolicy::Flexible);
        g.regenerate_slots((6, 22), 0);

        let ids: Vec<_> = g
            .covering_slots(&TimeWindow::new(630, 90))
            .unwrap()
            .iter()
            .map(|s| s.id.clone())
            .collect();
        assert_eq!(ids, vec!["AAA-G1@0600", "AAA-G1@0660"]);

        // Any booked slot inside the window rejects it
        assert!(g.book_slot("AAA-G1@0660", "b1", "r1", "v1"));
        assert!(g.covering_slots(&TimeWindow::at_hour(10, 120)).is_none());
        assert!(g.covering_slots(&TimeWindow::at_hour(10, 60)).is_some());
    }

    #[test]
    fn test_covering_slots_rejects_windows_past_operating_hours() {
        let mut g = gate(SlotPolicy::Mixed);
        g.regenerate_slots((6, 22), 0);
        // Last 90-minute slot ends 21:00
        assert!(g.covering_slots(&TimeWindow::at_hour(20, 90)).is_none());
        assert!(g.covering_slots(&TimeWindow::at_hour(5, 90)).is_none());
        assert!(g.covering_slots(&TimeWindow::at_hour(6, 180)).is_some());
    }

    #[test]
    fn test_window_validity() {
        assert!(TimeWindow::new(0, 60).is_valid());
        assert!(!TimeWindow::new(0, 0).is_valid());
        assert!(!TimeWindow::new(1400, 60).is_valid());
    }
}
