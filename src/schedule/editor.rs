use chrono::NaiveDate;

use crate::models::{Anchor, BiweeklySchedule, Interval, WeekType, Weekday};

use super::validation::{validate_day_intervals, validate_raw_day};
use super::ScheduleError;

/// Editing session over one site's biweekly schedule.
///
/// Every day written through the editor is validated first; a rejected edit
/// leaves the schedule untouched, so `finish()` always yields a schedule that
/// satisfies the turn invariants.
#[derive(Debug, Clone, Default)]
pub struct ScheduleEditor {
    schedule: BiweeklySchedule,
}

impl ScheduleEditor {
    /// Start from both weeks closed and no anchor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume editing a stored schedule.
    pub fn from_schedule(schedule: BiweeklySchedule) -> Result<Self, ScheduleError> {
        schedule.validate()?;
        Ok(Self { schedule })
    }

    pub fn schedule(&self) -> &BiweeklySchedule {
        &self.schedule
    }

    pub fn set_day(
        &mut self,
        week: WeekType,
        day: Weekday,
        intervals: Vec<Interval>,
    ) -> Result<&[Interval], ScheduleError> {
        let normalized = validate_day_intervals(intervals)?;
        tracing::debug!(%week, %day, turns = normalized.len(), "Schedule day updated");
        self.schedule.pattern_mut(week).set_day_unchecked(day, normalized);
        Ok(self.schedule.pattern(week).day(day))
    }

    /// Same as `set_day` but from the raw `HH:MM` strings of the form.
    pub fn set_day_raw<S: AsRef<str>>(
        &mut self,
        week: WeekType,
        day: Weekday,
        pairs: &[(S, S)],
    ) -> Result<&[Interval], ScheduleError> {
        let intervals = validate_raw_day(pairs)?;
        self.set_day(week, day, intervals)
    }

    pub fn clear_day(&mut self, week: WeekType, day: Weekday) {
        self.schedule.pattern_mut(week).set_day_unchecked(day, Vec::new());
    }

    /// Overwrite week `to` with a copy of week `from`.
    pub fn copy_week(&mut self, from: WeekType, to: WeekType) {
        if from == to {
            return;
        }
        let source = self.schedule.pattern(from).clone();
        *self.schedule.pattern_mut(to) = source;
        tracing::debug!(%from, %to, "Schedule week copied");
    }

    pub fn set_anchor(&mut self, date: NaiveDate, week_type: WeekType) {
        self.schedule.anchor = Some(Anchor::new(date, week_type));
        tracing::debug!(%date, %week_type, "Schedule anchor set");
    }

    pub fn clear_anchor(&mut self) {
        self.schedule.anchor = None;
    }

    pub fn finish(self) -> BiweeklySchedule {
        self.schedule
    }
}
