//! Week-type resolution for anchored biweekly schedules.
//!
//! The cycle is counted in ISO weeks (Monday start) on plain calendar dates:
//!
//! ```text
//!          Mo Tu We Th Fr Sa Su
//! offset -1 30 31  1  2  3  4  5   B   (Dec 2024 / Jan 2025)
//! offset  0  6  7  8  9 10 11 12   A   <- anchor 2025-01-08, A
//! offset  1 13 14 15 16 17 18 19   B
//! offset  2 20 21 22 23 24 25 26   A
//! ```
//!
//! Even offsets keep the anchor's type, odd offsets flip it. The anchor does
//! not need to be a Monday: it only selects its week.

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{Anchor, BiweeklySchedule, Interval, WeekType, Weekday};

use super::ScheduleError;

/// Monday of the ISO week containing `date`.
///
/// `None` only for the first days chrono can represent, whose Monday falls
/// before `NaiveDate::MIN`.
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_signed(Duration::days(date.weekday().num_days_from_monday() as i64))
}

/// Day number of the (possibly unrepresentable) Monday of `date`'s week.
fn monday_day_number(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64 - date.weekday().num_days_from_monday() as i64
}

/// Signed number of whole ISO weeks from the anchor's week to `date`'s week.
///
/// Plain integer arithmetic, so it is defined for every representable date.
pub fn week_offset(anchor_date: NaiveDate, date: NaiveDate) -> i64 {
    // both are Monday day numbers, so the difference is an exact multiple of 7
    (monday_day_number(date) - monday_day_number(anchor_date)).div_euclid(7)
}

/// Week type in effect for `date` under a given anchor.
pub fn week_type_for(anchor: &Anchor, date: NaiveDate) -> WeekType {
    if week_offset(anchor.date, date).rem_euclid(2) == 0 {
        anchor.week_type
    } else {
        anchor.week_type.flipped()
    }
}

/// Which pattern (A or B) applies on `target`.
///
/// Fails with `MissingAnchor` when the schedule has not been pinned to the
/// calendar yet.
pub fn resolve_week_type(
    schedule: &BiweeklySchedule,
    target: NaiveDate,
) -> Result<WeekType, ScheduleError> {
    let anchor = schedule.anchor()?;
    let week = week_type_for(&anchor, target);
    tracing::debug!(date = %target, anchor = %anchor.date, week = %week, "Resolved week type");
    Ok(week)
}

/// Opening turns for `target`, borrowed from the selected pattern.
/// An empty slice means the site is closed that day.
pub fn resolve_day_intervals(
    schedule: &BiweeklySchedule,
    target: NaiveDate,
) -> Result<&[Interval], ScheduleError> {
    let week = resolve_week_type(schedule, target)?;
    Ok(schedule.pattern(week).day(Weekday::from(target.weekday())))
}
