//! Counter scenarios: single-threaded and contended, atomic vs. racy.
//!
//! Each scenario holds a `CounterState` supplied by the caller and resets the
//! counter it uses at the start of every run.

use std::hint::black_box;

use crate::engine::{
    counters::CounterState,
    harness::{ConcurrencyHarness, DEFAULT_INCREMENTS_PER_WORKER, DEFAULT_WORKERS},
    timer::Timer,
    Result,
};
use crate::scenarios::{Measurement, Scenario};

pub const SINGLE_THREAD_INCREMENTS: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    Atomic,
    Racy,
}

/// `fetch_add` 1,000,000 times on the caller thread.
#[derive(Debug)]
pub struct AtomicIncrement {
    state: CounterState,
}

impl AtomicIncrement {
    pub fn new(state: CounterState) -> Self {
        Self { state }
    }
}

impl Scenario for AtomicIncrement {
    fn name(&self) -> &str {
        "Atomic Counter"
    }

    fn run(&mut self) -> Result<Measurement> {
        self.state.atomic.reset();
        let counter = &self.state.atomic;
        let timer = Timer::start();
        for _ in 0..SINGLE_THREAD_INCREMENTS {
            black_box(counter.increment());
        }
        Ok(Measurement::timed(timer.elapsed_ms()))
    }
}

/// Unsynchronized read-modify-write 1,000,000 times on the caller thread.
#[derive(Debug)]
pub struct PlainIncrement {
    state: CounterState,
}

impl PlainIncrement {
    pub fn new(state: CounterState) -> Self {
        Self { state }
    }
}

impl Scenario for PlainIncrement {
    fn name(&self) -> &str {
        "Plain Counter"
    }

    fn run(&mut self) -> Result<Measurement> {
        self.state.racy.reset();
        let counter = &self.state.racy;
        let timer = Timer::start();
        for _ in 0..SINGLE_THREAD_INCREMENTS {
            black_box(counter.increment());
        }
        Ok(Measurement::timed(timer.elapsed_ms()))
    }
}

/// Same counter hammered by the harness worker pool.
///
/// The racy variant's final value is reported through the log only; a lost
/// update is expected and never an error.
#[derive(Debug)]
pub struct ContendedIncrement {
    kind: CounterKind,
    state: CounterState,
    harness: ConcurrencyHarness,
    workers: usize,
    increments_per_worker: u64,
}

impl ContendedIncrement {
    pub fn new(kind: CounterKind, state: CounterState, harness: ConcurrencyHarness) -> Self {
        Self {
            kind,
            state,
            harness,
            workers: DEFAULT_WORKERS,
            increments_per_worker: DEFAULT_INCREMENTS_PER_WORKER,
        }
    }

    pub fn expected_total(&self) -> u64 {
        self.workers as u64 * self.increments_per_worker
    }
}

impl Scenario for ContendedIncrement {
    fn name(&self) -> &str {
        match self.kind {
            CounterKind::Atomic => "Atomic Counter (Contended)",
            CounterKind::Racy => "Plain Counter (Contended)",
        }
    }

    fn run(&mut self) -> Result<Measurement> {
        let elapsed = match self.kind {
            CounterKind::Atomic => {
                self.state.atomic.reset();
                let counter = self.state.atomic.clone();
                self.harness.run(self.workers, self.increments_per_worker, move || {
                    counter.increment();
                })?
            }
            CounterKind::Racy => {
                self.state.racy.reset();
                let counter = self.state.racy.clone();
                self.harness.run(self.workers, self.increments_per_worker, move || {
                    counter.increment();
                })?
            }
        };

        let final_value = match self.kind {
            CounterKind::Atomic => self.state.atomic.get(),
            CounterKind::Racy => self.state.racy.get(),
        };
        log::debug!(
            "[Counters] {}: final={} expected={} lost={}",
            self.name(),
            final_value,
            self.expected_total(),
            self.expected_total().saturating_sub(final_value)
        );

        Ok(Measurement::timed(elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_threaded_counters_reach_one_million() {
        let state = CounterState::new();
        let a = AtomicIncrement::new(state.clone()).run().unwrap();
        let p = PlainIncrement::new(state.clone()).run().unwrap();
        assert!(a.duration_ms >= 0 && p.duration_ms >= 0);
        assert_eq!(state.atomic.get(), 1_000_000);
        assert_eq!(state.racy.get(), 1_000_000);
    }

    #[test]
    fn runs_reset_their_counter_first() {
        let state = CounterState::new();
        let mut s = AtomicIncrement::new(state.clone());
        s.run().unwrap();
        s.run().unwrap();
        assert_eq!(state.atomic.get(), 1_000_000);
    }

    #[test]
    fn contended_atomic_is_exact() {
        let state = CounterState::new();
        let mut s = ContendedIncrement::new(CounterKind::Atomic, state.clone(), ConcurrencyHarness::default());
        for _ in 0..3 {
            s.run().unwrap();
            assert_eq!(state.atomic.get(), s.expected_total());
        }
        assert_eq!(s.expected_total(), 500_000);
    }

    #[test]
    fn contended_racy_never_overshoots() {
        let state = CounterState::new();
        let mut s = ContendedIncrement::new(CounterKind::Racy, state.clone(), ConcurrencyHarness::default());
        let m = s.run().unwrap();
        assert!(m.duration_ms >= 0);
        assert!(state.racy.get() <= s.expected_total());
    }
}
