//! Benchmark scenarios.
//!
//! Every scenario is a named unit of work with the `Scenario::run` contract.
//! Operation counts are fixed; only the timing varies between runs.

pub mod arithmetic;
pub mod allocation;
pub mod numeric_pass;
pub mod counters;
pub mod strings;
pub mod collections;
pub mod file_io;
pub mod external;

use serde::Serialize;

use crate::engine::Result;

pub use allocation::ObjectAllocation;
pub use arithmetic::ArithmeticLoop;
pub use collections::CollectionOps;
pub use counters::{AtomicIncrement, ContendedIncrement, CounterKind, PlainIncrement};
pub use external::{CacheRoundTrip, PersistenceRoundTrip};
pub use file_io::FileIo;
pub use numeric_pass::{NumericPass, PassMode};
pub use strings::StringConcat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Store accepted a write but the read-back came back empty.
    MissingReadBack,
    /// File read-back produced a different line count than was written.
    LineCountMismatch,
}

/// Non-fatal inconsistency observed while a scenario ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anomaly {
    pub scenario: String,
    pub kind: AnomalyKind,
    pub detail: String,
}

impl Anomaly {
    pub fn new(scenario: &str, kind: AnomalyKind, detail: impl Into<String>) -> Self {
        Self {
            scenario: scenario.to_string(),
            kind,
            detail: detail.into(),
        }
    }
}

/// Output of one `Scenario::run`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Measurement {
    pub duration_ms: i64,
    pub anomalies: Vec<Anomaly>,
}

impl Measurement {
    pub fn timed(duration_ms: i64) -> Self {
        Self { duration_ms, anomalies: Vec::new() }
    }

    pub fn with_anomalies(duration_ms: i64, anomalies: Vec<Anomaly>) -> Self {
        Self { duration_ms, anomalies }
    }
}

pub trait Scenario: Send {
    fn name(&self) -> &str;

    fn run(&mut self) -> Result<Measurement>;
}
