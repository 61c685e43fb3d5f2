//! Fatal benchmark failures.
//!
//! Anomalies (missing read-backs etc.) are *not* errors; they travel as data
//! inside `Measurement`. Everything here aborts the remaining suite run.

use std::{io, time::Duration};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum BenchError {
    /// Persistence or cache store call failed.
    #[error("collaborator `{collaborator}` unavailable: {reason}")]
    CollaboratorUnavailable {
        collaborator: &'static str,
        reason: String,
    },

    /// Worker pool did not join within the bound.
    #[error("worker pool did not finish within {timeout:?} ({completed}/{expected} workers done)")]
    HarnessTimeout {
        timeout: Duration,
        completed: usize,
        expected: usize,
    },

    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(#[source] io::Error),

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),
}

impl BenchError {
    pub fn collaborator(collaborator: &'static str, reason: impl Into<String>) -> Self {
        BenchError::CollaboratorUnavailable {
            collaborator,
            reason: reason.into(),
        }
    }

    /// Short machine-friendly tag used in exports.
    pub fn kind(&self) -> &'static str {
        match self {
            BenchError::CollaboratorUnavailable { .. } => "collaborator_unavailable",
            BenchError::HarnessTimeout { .. } => "harness_timeout",
            BenchError::WorkerSpawn(_) => "worker_spawn",
            BenchError::WorkerPanicked { .. } => "worker_panicked",
            BenchError::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_collaborator_and_reason() {
        let err = BenchError::collaborator("cache", "connection refused");
        assert_eq!(err.to_string(), "collaborator `cache` unavailable: connection refused");
        assert_eq!(err.kind(), "collaborator_unavailable");
    }

    #[test]
    fn io_errors_convert() {
        let err: BenchError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, BenchError::Io(_)));
        assert_eq!(err.kind(), "io");
    }
}
