//! In-memory store backend.
//!
//! The in-process implementation of [`PageStore`], used by tests and by
//! deployments where an external backend has not been wired up. All
//! operations take the write lock only as long as the mutation itself.

use std::collections::HashMap;
use std::sync::RwLock;

use mosaic_blocks::{Page, PageId, PageStatus, is_valid_slug};

use crate::store::{PageRecord, PageStore, StoreError};

/// Thread-safe in-memory [`PageStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<PageId, PageRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a record, bypassing version checks.
    ///
    /// Test/bootstrap convenience; the record is stored as-is.
    #[must_use]
    pub fn with_record(self, record: PageRecord) -> Self {
        self.records
            .write()
            .expect("store lock poisoned")
            .insert(record.page.id, record);
        self
    }

    /// Number of stored pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().expect("store lock poisoned").len()
    }

    /// True when the store holds no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PageStore for MemoryStore {
    fn find_by_id(&self, id: PageId) -> Result<PageRecord, StoreError> {
        self.records
            .read()
            .expect("store lock poisoned")
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn find_by_slug(&self, slug: &str) -> Result<PageRecord, StoreError> {
        self.records
            .read()
            .expect("store lock poisoned")
            .values()
            .find(|r| r.page.slug == slug)
            .cloned()
            .ok_or_else(|| StoreError::SlugNotFound(slug.to_owned()))
    }

    fn find_by_status(&self, status: PageStatus) -> Vec<PageRecord> {
        let mut records: Vec<PageRecord> = self
            .records
            .read()
            .expect("store lock poisoned")
            .values()
            .filter(|r| r.page.status == status)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.page
                .created_at
                .cmp(&a.page.created_at)
                .then_with(|| a.page.id.cmp(&b.page.id))
        });
        records
    }

    fn pages_by_status(&self, status: PageStatus) -> Vec<Page> {
        let mut pages: Vec<Page> = self
            .records
            .read()
            .expect("store lock poisoned")
            .values()
            .filter(|r| r.page.status == status)
            .map(|r| r.page.clone())
            .collect();
        pages.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        pages
    }

    fn save(&self, mut record: PageRecord) -> Result<PageRecord, StoreError> {
        if !is_valid_slug(&record.page.slug) {
            return Err(StoreError::InvalidSlug(record.page.slug.clone()));
        }

        let mut records = self.records.write().expect("store lock poisoned");

        let slug_owner = records
            .values()
            .find(|r| r.page.slug == record.page.slug && r.page.id != record.page.id);
        if slug_owner.is_some() {
            return Err(StoreError::SlugTaken(record.page.slug.clone()));
        }

        if let Some(stored) = records.get(&record.page.id) {
            if stored.page.version != record.page.version {
                return Err(StoreError::Conflict {
                    page: record.page.id,
                    expected: record.page.version,
                    actual: stored.page.version,
                });
            }
        }

        record.page.version += 1;
        tracing::debug!(page = %record.page.id, version = record.page.version, "page saved");
        records.insert(record.page.id, record.clone());
        Ok(record)
    }

    fn delete(&self, id: PageId) -> Result<(), StoreError> {
        self.records
            .write()
            .expect("store lock poisoned")
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
