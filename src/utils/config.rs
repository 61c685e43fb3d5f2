//! Runtime settings read from the environment.
//!
//! Workload sizes are fixed constants next to each scenario; only the
//! deployment-facing knobs live here.
//!
//! | Variable | Default |
//! |---|---|
//! | `BENCH_HTTP_ADDR` | `127.0.0.1:8080` |
//! | `BENCH_EXPORT_PATH` | `data/bench_results.csv` |
//! | `BENCH_SCRATCH_DIR` | `.` |
//! | `BENCH_HARNESS_TIMEOUT_SECS` | `60` |

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use log::warn;

use crate::engine::harness::DEFAULT_TIMEOUT;

pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_EXPORT_PATH: &str = "data/bench_results.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub http_addr: String,
    pub export_path: PathBuf,
    /// Directory for the File IO scenario's temp file.
    pub scratch_dir: PathBuf,
    pub harness_timeout: Duration,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            scratch_dir: PathBuf::from("."),
            harness_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl BenchConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or unparsable keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(addr) = lookup("BENCH_HTTP_ADDR") {
            cfg.http_addr = addr;
        }
        if let Some(path) = lookup("BENCH_EXPORT_PATH") {
            cfg.export_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("BENCH_SCRATCH_DIR") {
            cfg.scratch_dir = PathBuf::from(dir);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "BENCH_HARNESS_TIMEOUT_SECS") {
            cfg.harness_timeout = Duration::from_secs(secs);
        }

        cfg
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}
