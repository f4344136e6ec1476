//! Boundary to the data store holding site records.
//!
//! The CRM reads and writes sites through remote query/RPC calls; this crate
//! only needs the two operations below. `InMemoryScheduleStore` backs tests
//! and embedded use.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::persistence::SiteRecord;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Store lock poisoned")]
    LockPoisoned,
}

pub trait ScheduleStore: Send + Sync {
    /// `Ok(None)` when no site has this id.
    fn load_site(&self, site_id: &Uuid) -> Result<Option<SiteRecord>, StoreError>;

    /// Insert or replace. Concurrent writers: last write wins.
    fn save_site(&self, record: SiteRecord) -> Result<(), StoreError>;
}

#[derive(Default)]
pub struct InMemoryScheduleStore {
    sites: RwLock<HashMap<Uuid, SiteRecord>>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sites.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScheduleStore for InMemoryScheduleStore {
    fn load_site(&self, site_id: &Uuid) -> Result<Option<SiteRecord>, StoreError> {
        let sites = self.sites.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(sites.get(site_id).cloned())
    }

    fn save_site(&self, record: SiteRecord) -> Result<(), StoreError> {
        let mut sites = self.sites.write().map_err(|_| StoreError::LockPoisoned)?;
        sites.insert(record.id, record);
        Ok(())
    }
}
