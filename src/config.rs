use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "clinic-schedule";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default cache lifetime for loaded site schedules.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// One full A/B cycle: any opening that exists is found within it.
pub const DEFAULT_HORIZON_DAYS: u32 = 14;

const CACHE_TTL_ENV: &str = "CLINIC_SCHEDULE_CACHE_TTL_SECS";
const HORIZON_ENV: &str = "CLINIC_SCHEDULE_HORIZON_DAYS";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "clinic_schedule_lib=info"
}

/// Runtime knobs for the site schedule service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub cache_ttl: Duration,
    pub next_opening_horizon_days: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            next_opening_horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

impl ScheduleConfig {
    /// Defaults overridden by `CLINIC_SCHEDULE_CACHE_TTL_SECS` and
    /// `CLINIC_SCHEDULE_HORIZON_DAYS` when set to valid numbers.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(CACHE_TTL_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config.cache_ttl = Duration::from_secs(secs),
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid {CACHE_TTL_ENV}"),
            }
        }
        if let Some(raw) = lookup(HORIZON_ENV) {
            match raw.trim().parse::<u32>() {
                Ok(days) => config.next_opening_horizon_days = days,
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid {HORIZON_ENV}"),
            }
        }
        config
    }
}
