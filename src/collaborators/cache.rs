//! Key-value cache store.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};

use parking_lot::RwLock;

use crate::engine::{BenchError, Result};

/// Synchronous cache contract. A missing key is `Ok(None)`.
pub trait CacheStore: Send + Sync {
    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn get(&self, key: &str) -> Result<Option<String>>;
}

#[derive(Debug)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, String>>,
    available: AtomicBool,
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn check(&self) -> Result<()> {
        if self.available.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(BenchError::collaborator("cache", "connection refused"))
        }
    }
}

impl CacheStore for InMemoryCache {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.entries.read().get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_overwrites() {
        let cache = InMemoryCache::new();
        cache.set("user:1", "User 1,40").unwrap();
        cache.set("user:1", "User 1,41").unwrap();
        assert_eq!(cache.get("user:1").unwrap().as_deref(), Some("User 1,41"));
        assert_eq!(cache.get("user:2").unwrap(), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn offline_cache_errors() {
        let cache = InMemoryCache::new();
        cache.set_available(false);
        assert!(cache.set("k", "v").is_err());
        assert!(cache.get("k").is_err());
    }
}
