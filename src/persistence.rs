//! Persisted shape of a site and its schedule.
//!
//! The CRM stores the schedule as a JSON document next to the site record:
//!
//! ```json
//! {
//!   "weekA": { "lunes": [["09:00", "14:00"]], "martes": [], ... },
//!   "weekB": { "lunes": [], ... }
//! }
//! ```
//!
//! with `anchor_date` (`YYYY-MM-DD`) and `anchor_week_type` (`"A"`/`"B"`) as
//! sibling columns. This module converts between that shape and the domain
//! types; day names never travel past it.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Anchor, BiweeklySchedule, Sede, WeekType, WeeklyPattern, Weekday};
use crate::schedule::{validate_raw_day, ScheduleError};

/// Day name -> list of `[start, end]` pairs.
pub type WeekDocument = BTreeMap<String, Vec<[String; 2]>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    #[serde(rename = "weekA", default)]
    pub week_a: WeekDocument,
    #[serde(rename = "weekB", default)]
    pub week_b: WeekDocument,
}

/// Site row as read from / written to the data store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub arrival_instructions: Option<String>,
    #[serde(default)]
    pub schedule: ScheduleDocument,
    #[serde(default)]
    pub anchor_date: Option<String>,
    #[serde(default)]
    pub anchor_week_type: Option<String>,
}

impl SiteRecord {
    pub fn from_json(json: &str) -> Result<Self, ScheduleError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ScheduleError> {
        Ok(serde_json::to_string(self)?)
    }
}

// ─── Day names ────────────────────────────────────────────────────────────────

/// Accept accented spellings written by older clients (`miércoles`, `sábado`).
fn parse_day_name(raw: &str) -> Result<Weekday, ScheduleError> {
    let folded: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            other => other,
        })
        .collect();
    Weekday::from_str(&folded).map_err(|_| ScheduleError::InvalidEnum {
        field: "Weekday".into(),
        value: raw.into(),
    })
}

// ─── Decoding ─────────────────────────────────────────────────────────────────

pub fn decode_week(doc: &WeekDocument) -> Result<WeeklyPattern, ScheduleError> {
    let mut pattern = WeeklyPattern::closed();
    let mut seen = [false; 7];

    for (name, pairs) in doc {
        let day = parse_day_name(name)?;
        if seen[day.index()] {
            return Err(ScheduleError::DuplicateDay(name.clone()));
        }
        seen[day.index()] = true;

        let tuples: Vec<(&str, &str)> = pairs.iter().map(|[s, e]| (s.as_str(), e.as_str())).collect();
        pattern.set_day_unchecked(day, validate_raw_day(&tuples)?);
    }

    for day in Weekday::ALL {
        if !seen[day.index()] {
            tracing::debug!(day = day.as_str(), "Missing day in stored week, treating as closed");
        }
    }
    Ok(pattern)
}

pub fn decode_anchor(
    anchor_date: Option<&str>,
    anchor_week_type: Option<&str>,
) -> Result<Option<Anchor>, ScheduleError> {
    match (anchor_date, anchor_week_type) {
        (Some(raw_date), Some(raw_type)) => {
            let date = NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d")
                .map_err(|_| ScheduleError::InvalidDate(raw_date.to_string()))?;
            let week_type = WeekType::from_str(raw_type.trim())?;
            Ok(Some(Anchor::new(date, week_type)))
        }
        (None, None) => Ok(None),
        (date, week_type) => {
            tracing::warn!(
                anchor_date = ?date,
                anchor_week_type = ?week_type,
                "Half-configured schedule anchor, treating as unset"
            );
            Ok(None)
        }
    }
}

pub fn decode_schedule(
    doc: &ScheduleDocument,
    anchor_date: Option<&str>,
    anchor_week_type: Option<&str>,
) -> Result<BiweeklySchedule, ScheduleError> {
    Ok(BiweeklySchedule::new(
        decode_week(&doc.week_a)?,
        decode_week(&doc.week_b)?,
        decode_anchor(anchor_date, anchor_week_type)?,
    ))
}

impl TryFrom<SiteRecord> for Sede {
    type Error = ScheduleError;

    fn try_from(record: SiteRecord) -> Result<Self, Self::Error> {
        let schedule = decode_schedule(
            &record.schedule,
            record.anchor_date.as_deref(),
            record.anchor_week_type.as_deref(),
        )?;
        Ok(Sede {
            id: record.id,
            name: record.name,
            address: record.address,
            arrival_instructions: record.arrival_instructions,
            schedule,
        })
    }
}

// ─── Encoding ─────────────────────────────────────────────────────────────────

/// Always writes all seven days so readers never see a missing key.
pub fn encode_week(pattern: &WeeklyPattern) -> WeekDocument {
    pattern
        .iter()
        .map(|(day, turns)| {
            (
                day.as_str().to_string(),
                turns.iter().map(|t| t.to_pair()).collect(),
            )
        })
        .collect()
}

pub fn encode_schedule(schedule: &BiweeklySchedule) -> ScheduleDocument {
    ScheduleDocument {
        week_a: encode_week(&schedule.week_a),
        week_b: encode_week(&schedule.week_b),
    }
}

impl From<&Sede> for SiteRecord {
    fn from(site: &Sede) -> Self {
        let anchor = site.schedule.anchor;
        SiteRecord {
            id: site.id,
            name: site.name.clone(),
            address: site.address.clone(),
            arrival_instructions: site.arrival_instructions.clone(),
            schedule: encode_schedule(&site.schedule),
            anchor_date: anchor.map(|a| a.date.format("%Y-%m-%d").to_string()),
            anchor_week_type: anchor.map(|a| a.week_type.as_str().to_string()),
        }
    }
}
