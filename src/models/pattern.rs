use super::enums::Weekday;
use super::interval::Interval;
use crate::schedule::{validation, ScheduleError};

/// Opening turns for each day of one week. A day with no turns is closed.
///
/// All seven days always exist; the array is indexed by `Weekday::index`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyPattern {
    days: [Vec<Interval>; 7],
}

impl WeeklyPattern {
    /// Every day closed.
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn day(&self, day: Weekday) -> &[Interval] {
        &self.days[day.index()]
    }

    /// Replace a day without validation. Callers outside this crate go
    /// through `ScheduleEditor` or `with_day`.
    pub(crate) fn set_day_unchecked(&mut self, day: Weekday, intervals: Vec<Interval>) {
        self.days[day.index()] = intervals;
    }

    /// Builder-style validated setter.
    pub fn with_day(mut self, day: Weekday, intervals: Vec<Interval>) -> Result<Self, ScheduleError> {
        let normalized = validation::validate_day_intervals(intervals)?;
        self.set_day_unchecked(day, normalized);
        Ok(self)
    }

    pub fn is_open_on(&self, day: Weekday) -> bool {
        !self.day(day).is_empty()
    }

    pub fn is_closed_all_week(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }

    /// `(day, turns)` in Monday-first order.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[Interval])> + '_ {
        Weekday::ALL.into_iter().map(move |d| (d, self.day(d)))
    }

    /// Check every day against the turn invariants.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for (_, turns) in self.iter() {
            let normalized = validation::validate_day_intervals(turns.to_vec())?;
            if normalized != turns {
                // valid but unsorted; stored days must already be ordered
                return Err(ScheduleError::UnsortedDay);
            }
        }
        Ok(())
    }

    /// Total open minutes across the week.
    pub fn open_minutes(&self) -> u32 {
        self.days
            .iter()
            .flatten()
            .map(|turn| turn.duration_minutes() as u32)
            .sum()
    }
}
