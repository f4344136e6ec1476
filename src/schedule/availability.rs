//! Open/closed queries over a resolved schedule.
//!
//! Inputs are local civil date-times of the site. Nothing here looks at
//! time zones: the week type comes from the calendar date alone.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::{BiweeklySchedule, Interval, TimeOfDay, WeekType};

use super::resolver::{resolve_day_intervals, resolve_week_type};
use super::ScheduleError;

/// One calendar day of a resolved schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub week_type: WeekType,
    pub intervals: Vec<Interval>,
}

impl DaySchedule {
    pub fn is_closed(&self) -> bool {
        self.intervals.is_empty()
    }
}

/// Whether the site is open at a local date-time.
pub fn is_open_at(schedule: &BiweeklySchedule, at: NaiveDateTime) -> Result<bool, ScheduleError> {
    let time = TimeOfDay::from_naive_time(at.time());
    Ok(resolve_day_intervals(schedule, at.date())?
        .iter()
        .any(|turn| turn.contains(time)))
}

/// Resolved turns for every date in `from..=to`. Empty when `from > to`.
pub fn intervals_between(
    schedule: &BiweeklySchedule,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DaySchedule>, ScheduleError> {
    let mut days = Vec::new();
    let mut next = Some(from);
    while let Some(date) = next.filter(|d| *d <= to) {
        days.push(DaySchedule {
            date,
            week_type: resolve_week_type(schedule, date)?,
            intervals: resolve_day_intervals(schedule, date)?.to_vec(),
        });
        // None past NaiveDate::MAX ends the range
        next = date.succ_opt();
    }
    Ok(days)
}

/// Earliest moment at or after `at` when the site is open, looking ahead at
/// most `horizon_days` full days. Returns `at` itself if already open.
///
/// The cycle repeats every 14 days, so any horizon of 14 or more is
/// exhaustive; `None` then means the site is closed in both weeks.
pub fn next_opening(
    schedule: &BiweeklySchedule,
    at: NaiveDateTime,
    horizon_days: u32,
) -> Result<Option<NaiveDateTime>, ScheduleError> {
    let now = TimeOfDay::from_naive_time(at.time());

    let today = resolve_day_intervals(schedule, at.date())?;
    if today.iter().any(|turn| turn.contains(now)) {
        return Ok(Some(at));
    }
    if let Some(turn) = today.iter().find(|turn| turn.start > now) {
        return Ok(Some(at.date().and_time(turn.start.to_naive_time())));
    }

    for offset in 1..=horizon_days as i64 {
        let Some(date) = at.date().checked_add_signed(Duration::days(offset)) else {
            break;
        };
        if let Some(turn) = resolve_day_intervals(schedule, date)?.first() {
            return Ok(Some(date.and_time(turn.start.to_naive_time())));
        }
    }
    Ok(None)
}

/// Open minutes of each week pattern, A then B.
pub fn open_minutes_by_week(schedule: &BiweeklySchedule) -> [(WeekType, u32); 2] {
    [
        (WeekType::A, schedule.week_a.open_minutes()),
        (WeekType::B, schedule.week_b.open_minutes()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    use crate::models::{Anchor, WeeklyPattern, Weekday};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn turn(start: &str, end: &str) -> Interval {
        Interval::parse(start, end).unwrap()
    }

    /// A: Mon 09-14. B: Wed 09-13 + 16-20. Anchor Monday 2025-01-06 = A.
    fn schedule() -> BiweeklySchedule {
        let week_a = WeeklyPattern::closed()
            .with_day(Weekday::Monday, vec![turn("09:00", "14:00")])
            .unwrap();
        let week_b = WeeklyPattern::closed()
            .with_day(Weekday::Wednesday, vec![turn("09:00", "13:00"), turn("16:00", "20:00")])
            .unwrap();
        BiweeklySchedule::new(week_a, week_b, Some(Anchor::new(date("2025-01-06"), WeekType::A)))
    }

    #[test]
    fn open_inside_turn_closed_at_end() {
        let s = schedule();
        assert!(is_open_at(&s, at("2025-01-06 09:00")).unwrap());
        assert!(is_open_at(&s, at("2025-01-06 13:59")).unwrap());
        assert!(!is_open_at(&s, at("2025-01-06 14:00")).unwrap());
        // B week Monday
        assert!(!is_open_at(&s, at("2025-01-13 10:00")).unwrap());
        // B week Wednesday lunch gap
        assert!(!is_open_at(&s, at("2025-01-15 14:30")).unwrap());
        assert!(is_open_at(&s, at("2025-01-15 16:30")).unwrap());
    }

    #[test]
    fn range_lists_each_day_with_its_week_type() {
        let days = intervals_between(&schedule(), date("2025-01-11"), date("2025-01-15")).unwrap();
        assert_eq!(days.len(), 5);
        assert_eq!(days[0].date, date("2025-01-11"));
        assert_eq!(days[0].week_type, WeekType::A);
        assert!(days[0].is_closed());
        assert_eq!(days[2].week_type, WeekType::B);
        assert!(days[2].is_closed());
        assert_eq!(days[4].intervals, vec![turn("09:00", "13:00"), turn("16:00", "20:00")]);
    }

    #[test]
    fn reversed_range_is_empty() {
        let days = intervals_between(&schedule(), date("2025-01-15"), date("2025-01-11")).unwrap();
        assert!(days.is_empty());
    }

    #[test]
    fn next_opening_when_already_open() {
        let now = at("2025-01-06 10:15");
        assert_eq!(next_opening(&schedule(), now, 14).unwrap(), Some(now));
    }

    #[test]
    fn next_opening_later_same_day() {
        assert_eq!(
            next_opening(&schedule(), at("2025-01-15 13:30"), 14).unwrap(),
            Some(at("2025-01-15 16:00"))
        );
    }

    #[test]
    fn next_opening_skips_closed_week() {
        // Monday A after closing: next is Wednesday of week B
        assert_eq!(
            next_opening(&schedule(), at("2025-01-06 15:00"), 14).unwrap(),
            Some(at("2025-01-15 09:00"))
        );
        // After Wednesday B closes: next is Monday of the following A week
        assert_eq!(
            next_opening(&schedule(), at("2025-01-15 20:00"), 14).unwrap(),
            Some(at("2025-01-20 09:00"))
        );
    }

    #[test]
    fn next_opening_respects_horizon() {
        assert_eq!(next_opening(&schedule(), at("2025-01-06 15:00"), 3).unwrap(), None);
    }

    #[test]
    fn next_opening_none_when_always_closed() {
        let mut s = BiweeklySchedule::empty();
        s.anchor = Some(Anchor::new(date("2025-01-06"), WeekType::B));
        assert_eq!(next_opening(&s, at("2025-01-06 08:00"), 28).unwrap(), None);
    }

    #[test]
    fn range_ending_at_calendar_end() {
        let s = schedule();
        let days = intervals_between(&s, NaiveDate::MAX, NaiveDate::MAX).unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, NaiveDate::MAX);

        let from = NaiveDate::MAX - Duration::days(3);
        let days = intervals_between(&s, from, NaiveDate::MAX).unwrap();
        assert_eq!(days.len(), 4);
        assert_eq!(days.last().map(|d| d.date), Some(NaiveDate::MAX));
    }

    #[test]
    fn range_starting_at_calendar_start() {
        let from = NaiveDate::MIN;
        let days = intervals_between(&schedule(), from, from + Duration::days(6)).unwrap();
        assert_eq!(days.len(), 7);
    }

    #[test]
    fn next_opening_stops_at_calendar_end() {
        let mut s = BiweeklySchedule::empty();
        s.anchor = Some(Anchor::new(date("2025-01-06"), WeekType::A));
        let late = NaiveDate::MAX.and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(next_opening(&s, late, 14).unwrap(), None);

        let open_last_weekday = WeeklyPattern::closed()
            .with_day(Weekday::from(NaiveDate::MAX.weekday()), vec![turn("09:00", "10:00")])
            .unwrap();
        let s = BiweeklySchedule::new(
            open_last_weekday.clone(),
            open_last_weekday,
            Some(Anchor::new(date("2025-01-06"), WeekType::A)),
        );
        let day_before = (NaiveDate::MAX - Duration::days(1)).and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(
            next_opening(&s, day_before, 14).unwrap(),
            Some(NaiveDate::MAX.and_hms_opt(9, 0, 0).unwrap())
        );
    }

    #[test]
    fn queries_propagate_missing_anchor() {
        let mut s = schedule();
        s.anchor = None;
        assert!(matches!(is_open_at(&s, at("2025-01-06 10:00")), Err(ScheduleError::MissingAnchor)));
        assert!(intervals_between(&s, date("2025-01-06"), date("2025-01-07")).is_err());
        assert!(next_opening(&s, at("2025-01-06 10:00"), 14).is_err());
    }

    #[test]
    fn open_minutes_per_week() {
        assert_eq!(
            open_minutes_by_week(&schedule()),
            [(WeekType::A, 300), (WeekType::B, 480)]
        );
    }
}
