// Engine: measurement and orchestration core.
// Timer gives monotonic ms, harness runs the contended worker pools,
// suite drives every scenario in order and builds the report.

pub mod error;
pub mod timer;
pub mod counters;
pub mod harness;
pub mod suite;

pub use error::{BenchError, Result};
