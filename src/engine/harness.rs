//! Concurrency harness: fixed worker pool per call, joined under a timeout.
//!
//! Lifecycle of one `run`:
//! 1. **Create:** spawn `workers` named threads; each parks on a start gate.
//! 2. **Submit:** once every worker exists the gate is dropped, releasing all
//!    of them together (no intentional serialization).
//! 3. **Join:** wait for one exit signal per worker until the deadline.
//! 4. **Release:** `WorkerPool::drop` raises the stop flag, opens the gate and
//!    joins every worker that exits within a short grace period. Runs on the
//!    success, timeout and spawn-failure paths alike.
//!
//! A worker stuck inside a work unit that never returns cannot be joined; it is
//! detached with a warning once the grace period is over.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use crossbeam::channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, warn};

use crate::engine::{
    error::{BenchError, Result},
    timer::Timer,
};

/// Workers per contention run.
pub const DEFAULT_WORKERS: usize = 5;
/// Work-unit calls per worker.
pub const DEFAULT_INCREMENTS_PER_WORKER: u64 = 100_000;
/// Bound on the joint completion wait.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

// How long release waits for stopped workers before detaching them.
const RELEASE_GRACE: Duration = Duration::from_millis(250);

pub type WorkUnit = Arc<dyn Fn() + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy)]
pub struct ConcurrencyHarness {
    timeout: Duration,
}

impl Default for ConcurrencyHarness {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl ConcurrencyHarness {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `work_unit` `increments_per_worker` times on each of `workers`
    /// threads and returns the wall time (ms) from pool creation to join.
    pub fn run<F>(&self, workers: usize, increments_per_worker: u64, work_unit: F) -> Result<i64>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.run_shared(workers, increments_per_worker, Arc::new(work_unit))
    }

    pub fn run_shared(&self, workers: usize, increments_per_worker: u64, work_unit: WorkUnit) -> Result<i64> {
        let timer = Timer::start();
        let pool = WorkerPool::spawn(workers, increments_per_worker, work_unit)?;
        pool.join_within(self.timeout)?;
        let elapsed = timer.elapsed_ms();
        debug!("[Harness] {} workers x {} calls joined in {} ms", workers, increments_per_worker, elapsed);
        Ok(elapsed)
    }
}

#[derive(Debug)]
struct WorkerExit {
    worker: usize,
    panicked: bool,
}

/// Sends the exit signal when the worker closure ends, including by panic.
struct ExitSignal {
    worker: usize,
    tx: Sender<WorkerExit>,
}

impl Drop for ExitSignal {
    fn drop(&mut self) {
        let _ = self.tx.send(WorkerExit {
            worker: self.worker,
            panicked: thread::panicking(),
        });
    }
}

struct WorkerPool {
    handles: Vec<Option<JoinHandle<()>>>,
    exits: Receiver<WorkerExit>,
    stop: Arc<AtomicBool>,
    gate: Option<Sender<()>>,
}

impl WorkerPool {
    fn spawn(workers: usize, increments: u64, work_unit: WorkUnit) -> Result<Self> {
        // Zero-capacity gate: nobody ever sends, workers unblock when it is dropped.
        let (gate_tx, gate_rx) = bounded::<()>(0);
        let (exit_tx, exits) = unbounded();

        let mut pool = WorkerPool {
            handles: Vec::with_capacity(workers),
            exits,
            stop: Arc::new(AtomicBool::new(false)),
            gate: Some(gate_tx),
        };

        for id in 0..workers {
            let gate = gate_rx.clone();
            let stop = pool.stop.clone();
            let unit = work_unit.clone();
            let signal = ExitSignal { worker: id, tx: exit_tx.clone() };

            let spawned = thread::Builder::new()
                .name(format!("bench_worker_{}", id))
                .spawn(move || {
                    let _signal = signal;
                    let _ = gate.recv();
                    for _ in 0..increments {
                        if stop.load(Ordering::Relaxed) {
                            break;
                        }
                        unit();
                    }
                });

            match spawned {
                Ok(handle) => pool.handles.push(Some(handle)),
                // pool drops here: stop flag + gate release the workers already spawned
                Err(e) => return Err(BenchError::WorkerSpawn(e)),
            }
        }

        Ok(pool)
    }

    fn open_gate(&mut self) {
        self.gate.take();
    }

    fn join_worker(&mut self, worker: usize) {
        if let Some(handle) = self.handles.get_mut(worker).and_then(Option::take) {
            // Panics are already reported through WorkerExit.
            let _ = handle.join();
        }
    }

    fn join_within(mut self, timeout: Duration) -> Result<()> {
        self.open_gate();

        let expected = self.handles.len();
        let deadline = Instant::now() + timeout;
        let mut completed = 0;
        let mut panicked = None;

        while completed < expected {
            match self.exits.recv_deadline(deadline) {
                Ok(exit) => {
                    completed += 1;
                    if exit.panicked && panicked.is_none() {
                        panicked = Some(exit.worker);
                    }
                    self.join_worker(exit.worker);
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(BenchError::HarnessTimeout { timeout, completed, expected });
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        match panicked {
            Some(worker) => Err(BenchError::WorkerPanicked { worker }),
            None => Ok(()),
        }
    }

    fn outstanding(&self) -> usize {
        self.handles.iter().filter(|h| h.is_some()).count()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        self.open_gate();

        let grace_deadline = Instant::now() + RELEASE_GRACE;
        while self.outstanding() > 0 {
            match self.exits.recv_deadline(grace_deadline) {
                Ok(exit) => self.join_worker(exit.worker),
                Err(_) => break,
            }
        }

        let stuck = self.outstanding();
        if stuck > 0 {
            warn!("[Harness] detaching {} worker(s) still inside the work unit", stuck);
            self.handles.clear();
        }
    }
}
