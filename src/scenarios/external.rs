//! Round trips through the external collaborators.
//!
//! Store latency is part of the measurement. A failed call aborts the
//! scenario; a read-back that comes back empty is recorded as an anomaly and
//! the loop carries on.

use std::sync::Arc;

use log::warn;
use rand::Rng;

use crate::collaborators::{CacheStore, PersistenceStore, PersonRecord};
use crate::engine::{timer::Timer, BenchError, Result};
use crate::scenarios::{Anomaly, AnomalyKind, Measurement, Scenario};

pub const ROUND_TRIPS: usize = 100;

pub struct PersistenceRoundTrip {
    store: Arc<dyn PersistenceStore>,
}

impl PersistenceRoundTrip {
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }
}

impl Scenario for PersistenceRoundTrip {
    fn name(&self) -> &str {
        "Persistence Round Trip"
    }

    fn run(&mut self) -> Result<Measurement> {
        let mut rng = rand::rng();
        let mut anomalies = Vec::new();

        let timer = Timer::start();
        for i in 0..ROUND_TRIPS {
            let record = PersonRecord::new(format!("User {}", i), rng.random_range(0..100));
            let inserted = self.store.insert(record)?;
            let id = inserted
                .id
                .ok_or_else(|| BenchError::collaborator("persistence", "insert returned no id"))?;

            if self.store.find_by_id(id)?.is_none() {
                warn!("[Persistence] record {} missing on read-back", id);
                anomalies.push(Anomaly::new(
                    self.name(),
                    AnomalyKind::MissingReadBack,
                    format!("person {} not found", id),
                ));
            }
        }

        Ok(Measurement::with_anomalies(timer.elapsed_ms(), anomalies))
    }
}

pub struct CacheRoundTrip {
    cache: Arc<dyn CacheStore>,
}

impl CacheRoundTrip {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }
}

impl Scenario for CacheRoundTrip {
    fn name(&self) -> &str {
        "Cache Round Trip"
    }

    fn run(&mut self) -> Result<Measurement> {
        let mut rng = rand::rng();
        let mut anomalies = Vec::new();

        let timer = Timer::start();
        for i in 0..ROUND_TRIPS {
            let key = format!("user:{}", i);
            let value = format!("User {},{}", i, rng.random_range(0..100u32));
            self.cache.set(&key, &value)?;

            if self.cache.get(&key)?.is_none() {
                warn!("[Cache] key {} missing on read-back", key);
                anomalies.push(Anomaly::new(
                    self.name(),
                    AnomalyKind::MissingReadBack,
                    format!("key {} not found", key),
                ));
            }
        }

        Ok(Measurement::with_anomalies(timer.elapsed_ms(), anomalies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{InMemoryCache, InMemoryPersonStore};

    struct ForgetfulCache;

    impl CacheStore for ForgetfulCache {
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Ok(())
        }
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
    }

    #[test]
    fn healthy_store_round_trips_cleanly() {
        let store = Arc::new(InMemoryPersonStore::new());
        let m = PersistenceRoundTrip::new(store.clone()).run().unwrap();
        assert!(m.duration_ms >= 0);
        assert!(m.anomalies.is_empty());
        assert_eq!(store.len(), ROUND_TRIPS);
    }

    #[test]
    fn healthy_cache_round_trips_cleanly() {
        let cache = Arc::new(InMemoryCache::new());
        let m = CacheRoundTrip::new(cache.clone()).run().unwrap();
        assert!(m.anomalies.is_empty());
        assert_eq!(cache.len(), ROUND_TRIPS);
    }

    #[test]
    fn missing_values_are_anomalies_not_errors() {
        let m = CacheRoundTrip::new(Arc::new(ForgetfulCache)).run().unwrap();
        assert_eq!(m.anomalies.len(), ROUND_TRIPS);
        assert!(m.anomalies.iter().all(|a| a.kind == AnomalyKind::MissingReadBack));
        assert_eq!(m.anomalies[0].detail, "key user:0 not found");
    }

    #[test]
    fn offline_store_aborts() {
        let store = Arc::new(InMemoryPersonStore::new());
        store.set_available(false);
        let err = PersistenceRoundTrip::new(store).run().unwrap_err();
        assert!(matches!(err, BenchError::CollaboratorUnavailable { .. }));
    }
}
