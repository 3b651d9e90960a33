//! Core simulation primitives (time, calendar)

pub mod time;

pub use time::{CalendarConfig, DateContext, SimTimestamp, TimeManager};
