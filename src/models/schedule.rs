use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::WeekType;
use super::pattern::WeeklyPattern;
use crate::schedule::ScheduleError;

/// Reference point pinning the A/B cycle to the calendar: the ISO week that
/// contains `date` is a `week_type` week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub date: NaiveDate,
    pub week_type: WeekType,
}

impl Anchor {
    pub fn new(date: NaiveDate, week_type: WeekType) -> Self {
        Self { date, week_type }
    }
}

/// Two alternating week patterns plus the anchor that orders them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BiweeklySchedule {
    pub week_a: WeeklyPattern,
    pub week_b: WeeklyPattern,
    pub anchor: Option<Anchor>,
}

impl BiweeklySchedule {
    /// Both weeks closed, no anchor.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(week_a: WeeklyPattern, week_b: WeeklyPattern, anchor: Option<Anchor>) -> Self {
        Self {
            week_a,
            week_b,
            anchor,
        }
    }

    pub fn pattern(&self, week: WeekType) -> &WeeklyPattern {
        match week {
            WeekType::A => &self.week_a,
            WeekType::B => &self.week_b,
        }
    }

    pub(crate) fn pattern_mut(&mut self, week: WeekType) -> &mut WeeklyPattern {
        match week {
            WeekType::A => &mut self.week_a,
            WeekType::B => &mut self.week_b,
        }
    }

    pub fn anchor(&self) -> Result<Anchor, ScheduleError> {
        self.anchor.ok_or(ScheduleError::MissingAnchor)
    }

    pub fn has_anchor(&self) -> bool {
        self.anchor.is_some()
    }

    /// Same pattern in both weeks: the site effectively runs a weekly schedule.
    pub fn is_effectively_weekly(&self) -> bool {
        self.week_a == self.week_b
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        self.week_a.validate()?;
        self.week_b.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_schedule_is_closed_without_anchor() {
        let schedule = BiweeklySchedule::empty();
        assert!(schedule.week_a.is_closed_all_week());
        assert!(schedule.week_b.is_closed_all_week());
        assert!(!schedule.has_anchor());
        assert!(matches!(schedule.anchor(), Err(ScheduleError::MissingAnchor)));
        assert!(schedule.validate().is_ok());
    }

    #[test]
    fn pattern_selects_by_week_type() {
        let mut schedule = BiweeklySchedule::empty();
        schedule.pattern_mut(WeekType::B).set_day_unchecked(
            crate::models::Weekday::Saturday,
            vec![crate::models::Interval::parse("10:00", "13:00").unwrap()],
        );
        assert!(schedule.pattern(WeekType::A).is_closed_all_week());
        assert!(!schedule.pattern(WeekType::B).is_closed_all_week());
        assert!(!schedule.is_effectively_weekly());
    }
}
