use uuid::Uuid;

use super::schedule::BiweeklySchedule;

/// A physical clinic location (sede). Each site owns exactly one schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sede {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub arrival_instructions: Option<String>,
    pub schedule: BiweeklySchedule,
}

impl Sede {
    /// New site with a fresh id and an empty schedule.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address: None,
            arrival_instructions: None,
            schedule: BiweeklySchedule::empty(),
        }
    }
}
