//! Benchmark suite: ordered execution of every scenario plus report building.
//!
//! The first fatal error stops the run. The report then carries the results of
//! the scenarios that completed, the failing scenario with its cause, and the
//! names of the scenarios that never ran.

use std::{collections::BTreeMap, fmt::Write as _, sync::Arc};

use log::{error, info, warn};
use serde::{Serialize, Serializer};

use crate::collaborators::{CacheStore, PersistenceStore};
use crate::engine::{counters::CounterState, harness::ConcurrencyHarness, BenchError};
use crate::scenarios::{
    Anomaly, ArithmeticLoop, AtomicIncrement, CacheRoundTrip, CollectionOps, ContendedIncrement,
    CounterKind, FileIo, NumericPass, ObjectAllocation, PassMode, PersistenceRoundTrip,
    PlainIncrement, Scenario, StringConcat,
};
use crate::utils::config::BenchConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioResult {
    pub name: String,
    pub duration_ms: i64,
    pub anomalies: Vec<Anomaly>,
}

fn display_error<S: Serializer>(err: &BenchError, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.collect_str(err)
}

#[derive(Debug, Serialize)]
pub struct SuiteFailure {
    pub scenario: String,
    #[serde(serialize_with = "display_error")]
    pub cause: BenchError,
    /// Scenarios after the failing one; they have no timing.
    pub not_run: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SuiteReport {
    pub results: Vec<ScenarioResult>,
    pub failure: Option<SuiteFailure>,
}

impl SuiteReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    pub fn get(&self, name: &str) -> Option<&ScenarioResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn anomalies(&self) -> impl Iterator<Item = &Anomaly> {
        self.results.iter().flat_map(|r| r.anomalies.iter())
    }

    /// Scenario name → duration (ms).
    pub fn to_duration_map(&self) -> BTreeMap<String, i64> {
        self.results
            .iter()
            .map(|r| (r.name.clone(), r.duration_ms))
            .collect()
    }

    /// One `name: N ms` line per scenario, anomalies indented beneath, then a
    /// `FAILED` block if the run stopped early.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for r in &self.results {
            let _ = writeln!(out, "{}: {} ms", r.name, r.duration_ms);
            for a in &r.anomalies {
                let _ = writeln!(out, "  anomaly: {}", a.detail);
            }
        }
        if let Some(f) = &self.failure {
            let _ = writeln!(out, "FAILED {}: {}", f.scenario, f.cause);
            if !f.not_run.is_empty() {
                let _ = writeln!(out, "Not run: {}", f.not_run.join(", "));
            }
        }
        out
    }
}

#[derive(Default)]
pub struct BenchmarkSuite {
    scenarios: Vec<Box<dyn Scenario>>,
}

impl BenchmarkSuite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<S: Scenario + 'static>(mut self, scenario: S) -> Self {
        self.push(Box::new(scenario));
        self
    }

    pub fn push(&mut self, scenario: Box<dyn Scenario>) {
        self.scenarios.push(scenario);
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.scenarios.iter().map(|s| s.name().to_string()).collect()
    }

    /// Full twelve-scenario suite.
    pub fn standard(
        persistence: Arc<dyn PersistenceStore>,
        cache: Arc<dyn CacheStore>,
        config: &BenchConfig,
    ) -> Self {
        let counters = CounterState::new();
        let harness = ConcurrencyHarness::new(config.harness_timeout);

        BenchmarkSuite::new()
            .with(ArithmeticLoop::new())
            .with(NumericPass::new(PassMode::Single))
            .with(ObjectAllocation::new())
            .with(PersistenceRoundTrip::new(persistence))
            .with(CacheRoundTrip::new(cache))
            .with(AtomicIncrement::new(counters.clone()))
            .with(PlainIncrement::new(counters.clone()))
            .with(ContendedIncrement::new(CounterKind::Atomic, counters.clone(), harness))
            .with(ContendedIncrement::new(CounterKind::Racy, counters, harness))
            .with(StringConcat::new())
            .with(FileIo::new(config.scratch_dir.clone()))
            .with(CollectionOps::new())
    }

    pub fn run(&mut self) -> SuiteReport {
        info!("[Suite] running {} scenarios", self.scenarios.len());
        let mut results = Vec::with_capacity(self.scenarios.len());

        for idx in 0..self.scenarios.len() {
            let scenario = &mut self.scenarios[idx];
            let name = scenario.name().to_string();
            info!("[Suite] -> {}", name);

            match scenario.run() {
                Ok(m) => {
                    if !m.anomalies.is_empty() {
                        warn!("[Suite] {} finished with {} anomalies", name, m.anomalies.len());
                    }
                    info!("[Suite] <- {}: {} ms", name, m.duration_ms);
                    results.push(ScenarioResult {
                        name,
                        duration_ms: m.duration_ms,
                        anomalies: m.anomalies,
                    });
                }
                Err(cause) => {
                    error!("[Suite] {} failed: {}; aborting remaining run", name, cause);
                    let not_run = self.scenarios[idx + 1..]
                        .iter()
                        .map(|s| s.name().to_string())
                        .collect();
                    return SuiteReport {
                        results,
                        failure: Some(SuiteFailure { scenario: name, cause, not_run }),
                    };
                }
            }
        }

        info!("[Suite] complete");
        SuiteReport { results, failure: None }
    }
}
