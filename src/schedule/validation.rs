use crate::models::Interval;

use super::ScheduleError;

/// Normalize one day's turns as entered by the operator.
///
/// Rejects any turn with `start >= end`, sorts by start, then rejects the
/// first pair of neighbours that overlap. Nothing is merged or dropped.
/// Re-validating the output returns it unchanged.
pub fn validate_day_intervals(mut intervals: Vec<Interval>) -> Result<Vec<Interval>, ScheduleError> {
    if let Some(bad) = intervals.iter().find(|i| !i.is_well_formed()) {
        return Err(ScheduleError::InvalidInterval {
            start: bad.start.to_string(),
            end: bad.end.to_string(),
        });
    }

    intervals.sort_by_key(|i| (i.start, i.end));

    if let Some(pair) = intervals.windows(2).find(|w| w[1].start < w[0].end) {
        return Err(ScheduleError::OverlappingInterval {
            first: pair[0],
            second: pair[1],
        });
    }

    Ok(intervals)
}

/// Parse raw `HH:MM` pairs from the editor form, then validate.
pub fn validate_raw_day<S: AsRef<str>>(pairs: &[(S, S)]) -> Result<Vec<Interval>, ScheduleError> {
    let intervals = pairs
        .iter()
        .map(|(start, end)| Interval::parse(start.as_ref(), end.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    validate_day_intervals(intervals)
}
