pub mod cache;
pub mod config;
pub mod models;
pub mod persistence;
pub mod schedule; // Week A / week B resolution, validation, editor
pub mod service;
pub mod store;

pub use models::{Anchor, BiweeklySchedule, Interval, Sede, TimeOfDay, WeekType, WeeklyPattern, Weekday};
pub use schedule::{resolve_day_intervals, resolve_week_type, validate_day_intervals, ScheduleError};

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber for embedding binaries and ad-hoc tools.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let initialized = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if initialized {
        tracing::info!("{} v{} tracing initialized", config::APP_NAME, config::APP_VERSION);
    }
}
