//! Persistence store: insert a person record, find it again by generated id.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use dashmap::DashMap;
use serde::Serialize;

use crate::engine::{BenchError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonRecord {
    /// `None` until the store assigns one.
    pub id: Option<u64>,
    pub name: String,
    pub age: u32,
}

impl PersonRecord {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self { id: None, name: name.into(), age }
    }
}

/// Synchronous store contract. A lookup miss is `Ok(None)`, not an error.
pub trait PersistenceStore: Send + Sync {
    fn insert(&self, record: PersonRecord) -> Result<PersonRecord>;

    fn find_by_id(&self, id: u64) -> Result<Option<PersonRecord>>;
}

/// Identity-generating table held in a `DashMap`.
///
/// `set_available(false)` simulates a store outage: every call then fails with
/// `CollaboratorUnavailable`.
#[derive(Debug)]
pub struct InMemoryPersonStore {
    rows: DashMap<u64, PersonRecord>,
    next_id: AtomicU64,
    available: AtomicBool,
}

impl Default for InMemoryPersonStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPersonStore {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicU64::new(1),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn check(&self) -> Result<()> {
        if self.available.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(BenchError::collaborator("persistence", "store offline"))
        }
    }
}

impl PersistenceStore for InMemoryPersonStore {
    fn insert(&self, mut record: PersonRecord) -> Result<PersonRecord> {
        self.check()?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        record.id = Some(id);
        self.rows.insert(id, record.clone());
        Ok(record)
    }

    fn find_by_id(&self, id: u64) -> Result<Option<PersonRecord>> {
        self.check()?;
        Ok(self.rows.get(&id).map(|r| r.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_assigns_sequential_ids() {
        let store = InMemoryPersonStore::new();
        let a = store.insert(PersonRecord::new("User 0", 30)).unwrap();
        let b = store.insert(PersonRecord::new("User 1", 31)).unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert_eq!(store.find_by_id(2).unwrap(), Some(b));
        assert_eq!(store.find_by_id(99).unwrap(), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn offline_store_fails_every_call() {
        let store = InMemoryPersonStore::new();
        store.set_available(false);
        assert!(matches!(
            store.insert(PersonRecord::new("x", 1)),
            Err(BenchError::CollaboratorUnavailable { collaborator: "persistence", .. })
        ));
        assert!(store.find_by_id(1).is_err());
        assert!(store.is_empty());
    }
}
