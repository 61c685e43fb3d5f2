//! # Runtime micro-benchmark harness
//!
//! Measures the relative cost of common runtime operations and reports
//! wall-clock timings per scenario.
//!
//! ## Layout
//! - **engine:** timer, counters, worker-pool harness, suite orchestration, errors.
//! - **scenarios:** the individual benchmark units (`Scenario` trait).
//! - **collaborators:** persistence + cache stores invoked as timed external calls.
//! - **advanced:** HTTP front end and environment info.
//! - **utils:** runtime config and CSV export.

pub mod engine;
pub mod scenarios;
pub mod collaborators;
pub mod advanced;
pub mod utils;
