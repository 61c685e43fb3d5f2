//! Shared counters for the counter scenarios.
//!
//! - **AtomicCounter:** hardware `fetch_add`; never loses an increment.
//! - **RacyCounter:** load, add, store as three separate steps. Under contention
//!   two workers can read the same value and one increment is lost. The cell is
//!   still an `AtomicU64` so the race is logical only (no UB, no torn values).
//!
//! Both live in `CounterState`, which callers create per run and pass in
//! explicitly. There are no process-wide counters.

use std::{
    hint::black_box,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

#[derive(Debug, Default)]
pub struct AtomicCounter(AtomicU64);

impl AtomicCounter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    #[inline]
    pub fn increment(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Release);
    }
}

#[derive(Debug, Default)]
pub struct RacyCounter(AtomicU64);

impl RacyCounter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Unsynchronized read-modify-write: concurrent callers may overwrite each other.
    #[inline]
    pub fn increment(&self) -> u64 {
        let current = black_box(self.0.load(Ordering::Relaxed));
        let next = current.wrapping_add(1);
        self.0.store(next, Ordering::Relaxed);
        next
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Release);
    }
}

/// Counter pair handed to the counter scenarios. Cloning shares the cells.
#[derive(Debug, Clone, Default)]
pub struct CounterState {
    pub atomic: Arc<AtomicCounter>,
    pub racy: Arc<RacyCounter>,
}

impl CounterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&self) {
        self.atomic.reset();
        self.racy.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn single_threaded_counts_are_exact() {
        let state = CounterState::new();
        for _ in 0..10_000 {
            state.atomic.increment();
            state.racy.increment();
        }
        assert_eq!(state.atomic.get(), 10_000);
        assert_eq!(state.racy.get(), 10_000);

        state.reset();
        assert_eq!(state.atomic.get(), 0);
        assert_eq!(state.racy.get(), 0);
    }

    #[test]
    fn racy_counter_never_exceeds_attempts() {
        let racy = Arc::new(RacyCounter::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let c = Arc::clone(&racy);
                thread::spawn(move || {
                    for _ in 0..20_000 {
                        c.increment();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let v = racy.get();
        assert!(v >= 1 && v <= 80_000, "racy value out of range: {v}");
    }

    #[test]
    fn clones_share_cells() {
        let a = CounterState::new();
        let b = a.clone();
        b.atomic.increment();
        assert_eq!(a.atomic.get(), 1);
    }
}
