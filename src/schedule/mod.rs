//! Biweekly (week A / week B) site schedules.
//!
//! - `resolver` — which week type applies to a date, and that day's turns
//! - `validation` — turn invariants enforced before a day is stored
//! - `editor` — validated editing session over one schedule
//! - `availability` — open/closed queries built on the resolver
//!
//! Everything here is pure: no I/O, no shared state.

pub mod availability;
pub mod editor;
pub mod resolver;
pub mod validation;

pub use availability::*;
pub use editor::ScheduleEditor;
pub use resolver::*;
pub use validation::*;

use thiserror::Error;

use crate::models::Interval;

#[derive(Error, Debug)]
pub enum ScheduleError {
    /// No anchor configured. Availability is unknown, never defaulted.
    #[error("Schedule has no anchor date/week type configured")]
    MissingAnchor,

    #[error("Invalid interval {start}-{end}: start must be before end")]
    InvalidInterval { start: String, end: String },

    #[error("Overlapping intervals {first} and {second}")]
    OverlappingInterval { first: Interval, second: Interval },

    #[error("Stored day is not ordered by start time")]
    UnsortedDay,

    /// Two keys of one stored week name the same day once accents are folded.
    #[error("Duplicate day in stored week: {0}")]
    DuplicateDay(String),

    #[error("Invalid time of day (expected HH:MM): {0}")]
    InvalidTime(String),

    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
