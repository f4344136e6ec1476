//! Site schedule lookups for the rest of the CRM.
//!
//! Sites are loaded from the `ScheduleStore` through a `QueryCache` and
//! decoded once; resolver calls then run on the cached `Sede`. Saving a site
//! writes through to the store and drops every cached query tagged with it.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::cache::QueryCache;
use crate::config::ScheduleConfig;
use crate::models::{Interval, Sede, WeekType};
use crate::persistence::SiteRecord;
use crate::schedule::{self, ScheduleError};
use crate::store::{ScheduleStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Site not found: {0}")]
    SiteNotFound(Uuid),
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

fn site_tag(site_id: &Uuid) -> String {
    format!("site:{site_id}")
}

pub struct SiteScheduleService<S: ScheduleStore> {
    store: S,
    sites: QueryCache<Uuid, Arc<Sede>>,
    config: ScheduleConfig,
}

impl<S: ScheduleStore> SiteScheduleService<S> {
    pub fn new(store: S, config: ScheduleConfig) -> Self {
        Self {
            sites: QueryCache::new(config.cache_ttl),
            store,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Decoded site, from cache when fresh.
    pub fn site(&self, site_id: &Uuid) -> Result<Arc<Sede>, ServiceError> {
        let tag = site_tag(site_id);
        self.sites.get_or_try_load(*site_id, &[tag.as_str()], || {
            tracing::debug!(site_id = %site_id, "Loading site schedule");
            let record = self
                .store
                .load_site(site_id)?
                .ok_or(ServiceError::SiteNotFound(*site_id))?;
            Ok(Arc::new(Sede::try_from(record)?))
        })
    }

    pub fn week_type(&self, site_id: &Uuid, date: NaiveDate) -> Result<WeekType, ServiceError> {
        let site = self.site(site_id)?;
        Ok(schedule::resolve_week_type(&site.schedule, date)?)
    }

    /// Owned copy: the cached site is shared between callers.
    pub fn day_intervals(&self, site_id: &Uuid, date: NaiveDate) -> Result<Vec<Interval>, ServiceError> {
        let site = self.site(site_id)?;
        Ok(schedule::resolve_day_intervals(&site.schedule, date)?.to_vec())
    }

    pub fn is_open_at(&self, site_id: &Uuid, at: NaiveDateTime) -> Result<bool, ServiceError> {
        let site = self.site(site_id)?;
        Ok(schedule::is_open_at(&site.schedule, at)?)
    }

    /// Next opening within the configured horizon.
    pub fn next_opening(
        &self,
        site_id: &Uuid,
        at: NaiveDateTime,
    ) -> Result<Option<NaiveDateTime>, ServiceError> {
        let site = self.site(site_id)?;
        Ok(schedule::next_opening(
            &site.schedule,
            at,
            self.config.next_opening_horizon_days,
        )?)
    }

    /// Validate, write through, and invalidate cached queries for the site.
    pub fn save_site(&self, site: &Sede) -> Result<(), ServiceError> {
        site.schedule.validate()?;
        self.store.save_site(SiteRecord::from(site))?;
        let dropped = self.invalidate_site(&site.id);
        tracing::info!(
            site_id = %site.id,
            anchored = site.schedule.has_anchor(),
            dropped,
            "Site schedule saved"
        );
        Ok(())
    }

    pub fn invalidate_site(&self, site_id: &Uuid) -> usize {
        self.sites.invalidate_tag(&site_tag(site_id))
    }
}
