//! Time management for the simulation
//!
//! The simulation operates in discrete ticks of one simulated hour.
//! 24 ticks form a day; days roll up into a fixed calendar of
//! 7-day weeks, 4-week months and 12-month years.
//! This module provides deterministic time advancement.

use serde::{Deserialize, Serialize};

/// Hours in one simulated day
pub const HOURS_PER_DAY: usize = 24;

/// Days in one simulated week
pub const DAYS_PER_WEEK: usize = 7;

/// Weeks in one simulated month
pub const WEEKS_PER_MONTH: usize = 4;

/// Months in one simulated year
pub const MONTHS_PER_YEAR: usize = 12;

/// Days in one simulated year
pub const DAYS_PER_YEAR: usize = DAYS_PER_WEEK * WEEKS_PER_MONTH * MONTHS_PER_YEAR;

/// Calendar position of a tick
///
/// `hour` is 0-based; `day`, `week`, `month` and `year` are 1-based,
/// the way a ledger entry would print them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTimestamp {
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: u32,
}

impl SimTimestamp {
    /// Build the calendar position for an absolute tick
    ///
    /// # Example
    /// ```
    /// use airline_simulator_core_rs::core::time::SimTimestamp;
    ///
    /// let ts = SimTimestamp::from_tick(24 * 7 + 5);
    /// assert_eq!(ts.hour, 5);
    /// assert_eq!(ts.day, 1);
    /// assert_eq!(ts.week, 2);
    /// ```
    pub fn from_tick(tick: usize) -> Self {
        let hour = tick % HOURS_PER_DAY;
        let absolute_day = tick / HOURS_PER_DAY;
        let day = absolute_day % DAYS_PER_WEEK;
        let absolute_week = absolute_day / DAYS_PER_WEEK;
        let week = absolute_week % WEEKS_PER_MONTH;
        let absolute_month = absolute_week / WEEKS_PER_MONTH;
        let month = absolute_month % MONTHS_PER_YEAR;
        let year = absolute_month / MONTHS_PER_YEAR;

        Self {
            hour: hour as u32,
            day: day as u32 + 1,
            week: week as u32 + 1,
            month: month as u32 + 1,
            year: year as u32 + 1,
        }
    }

    /// 1-based day within the year
    pub fn day_of_year(&self) -> u32 {
        let weeks_before = (self.month - 1) * WEEKS_PER_MONTH as u32 + (self.week - 1);
        weeks_before * DAYS_PER_WEEK as u32 + self.day
    }
}

impl std::fmt::Display for SimTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Y{} M{} W{} D{} {:02}:00",
            self.year, self.month, self.week, self.day, self.hour
        )
    }
}

/// Date facts that influence gate pricing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateContext {
    pub is_weekend: bool,
    pub is_holiday: bool,
}

/// Which days count as weekend and holiday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// 1-based days of the week treated as weekend
    pub weekend_days: Vec<u32>,

    /// 1-based days of the year treated as holidays
    pub holidays: Vec<u32>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            weekend_days: vec![6, 7],
            holidays: Vec::new(),
        }
    }
}

impl CalendarConfig {
    /// Date context for a calendar position
    pub fn date_context(&self, ts: &SimTimestamp) -> DateContext {
        DateContext {
            is_weekend: self.weekend_days.contains(&ts.day),
            is_holiday: self.holidays.contains(&ts.day_of_year()),
        }
    }
}

/// Manages simulation time in discrete hourly ticks
///
/// # Example
/// ```
/// use airline_simulator_core_rs::TimeManager;
///
/// let mut time = TimeManager::new();
/// assert_eq!(time.current_tick(), 0);
/// assert_eq!(time.current_day(), 0);
///
/// time.advance_tick();
/// assert_eq!(time.current_tick(), 1);
/// assert_eq!(time.hour_of_day(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeManager {
    /// Total ticks elapsed since simulation start
    current_tick: usize,
}

impl TimeManager {
    /// Create a new TimeManager at tick 0
    pub fn new() -> Self {
        Self { current_tick: 0 }
    }

    /// Resume from a given tick (checkpoint restore)
    pub fn starting_at(tick: usize) -> Self {
        Self { current_tick: tick }
    }

    /// Advance time by one tick (one simulated hour)
    pub fn advance_tick(&mut self) {
        self.current_tick += 1;
    }

    /// Get the current tick (total hours since start)
    pub fn current_tick(&self) -> usize {
        self.current_tick
    }

    /// Get the current absolute day (0-indexed)
    ///
    /// # Example
    /// ```
    /// use airline_simulator_core_rs::TimeManager;
    ///
    /// let mut time = TimeManager::new();
    /// for _ in 0..24 {
    ///     time.advance_tick();
    /// }
    /// assert_eq!(time.current_day(), 1);
    /// ```
    pub fn current_day(&self) -> usize {
        self.current_tick / HOURS_PER_DAY
    }

    /// Get the hour within the current day (0-23)
    pub fn hour_of_day(&self) -> usize {
        self.current_tick % HOURS_PER_DAY
    }

    /// Check if current tick is the first hour of the day
    pub fn is_start_of_day(&self) -> bool {
        self.hour_of_day() == 0
    }

    /// Check if current tick is the last hour of the day
    pub fn is_end_of_day(&self) -> bool {
        self.hour_of_day() == HOURS_PER_DAY - 1
    }

    /// Calendar position of the current tick
    pub fn timestamp(&self) -> SimTimestamp {
        SimTimestamp::from_tick(self.current_tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_rollover() {
        let ts = SimTimestamp::from_tick(0);
        assert_eq!((ts.hour, ts.day, ts.week, ts.month, ts.year), (0, 1, 1, 1, 1));

        let ts = SimTimestamp::from_tick(DAYS_PER_YEAR * HOURS_PER_DAY + 23);
        assert_eq!((ts.hour, ts.day, ts.week, ts.month, ts.year), (23, 1, 1, 1, 2));
    }

    #[test]
    fn test_day_of_year() {
        assert_eq!(SimTimestamp::from_tick(0).day_of_year(), 1);
        let last = SimTimestamp::from_tick((DAYS_PER_YEAR - 1) * HOURS_PER_DAY);
        assert_eq!(last.day_of_year(), DAYS_PER_YEAR as u32);
    }

    #[test]
    fn test_date_context_weekend_and_holiday() {
        let calendar = CalendarConfig {
            weekend_days: vec![6, 7],
            holidays: vec![6],
        };
        // Day 6 of week 1 is day-of-year 6
        let ts = SimTimestamp::from_tick(5 * HOURS_PER_DAY);
        let ctx = calendar.date_context(&ts);
        assert!(ctx.is_weekend);
        assert!(ctx.is_holiday);

        let ctx = calendar.date_context(&SimTimestamp::from_tick(0));
        assert_eq!(ctx, DateContext::default());
    }
}
