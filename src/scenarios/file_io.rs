//! Blocking file I/O: write 100,000 lines, read them back, delete the file.
//!
//! The temp file is owned by a `TempFileGuard`; whatever path the run takes
//! out of `run` (success, `?` on a write/read error, panic) the guard removes it.

use std::{
    fs::{self, File},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use log::warn;

use crate::engine::{timer::Timer, Result};
use crate::scenarios::{Anomaly, AnomalyKind, Measurement, Scenario};

pub const LINES: usize = 100_000;

static RUN_SEQ: AtomicU64 = AtomicU64::new(0);

/// Deletes the file on drop unless it was already removed.
pub struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl TempFileGuard {
    pub fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Explicit delete; surfaces the error instead of swallowing it.
    pub fn remove(mut self) -> io::Result<()> {
        let res = fs::remove_file(&self.path);
        if res.is_ok() {
            self.armed = false;
        }
        res
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("[FileIo] could not remove {:?}: {}", self.path, e),
        }
    }
}

pub struct FileIo {
    dir: PathBuf,
    last_path: Option<PathBuf>,
}

impl FileIo {
    /// Temp file goes into `dir` (the working directory in the standard suite).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), last_path: None }
    }

    /// Path used by the most recent run; the file itself is gone by then.
    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_deref()
    }

    fn next_path(&self) -> PathBuf {
        let seq = RUN_SEQ.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!("bench_io_{}_{}.txt", std::process::id(), seq))
    }
}

fn write_lines(path: &Path, lines: usize) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for i in 0..lines {
        writeln!(writer, "Sample data line {}", i)?;
    }
    writer.flush()
}

fn count_lines(path: &Path) -> io::Result<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut count = 0;
    for line in reader.lines() {
        line?;
        count += 1;
    }
    Ok(count)
}

impl Scenario for FileIo {
    fn name(&self) -> &str {
        "File IO"
    }

    fn run(&mut self) -> Result<Measurement> {
        let path = self.next_path();
        self.last_path = Some(path.clone());

        let timer = Timer::start();
        let guard = TempFileGuard::new(path);
        write_lines(guard.path(), LINES)?;
        let read_back = count_lines(guard.path())?;
        guard.remove()?;
        let elapsed = timer.elapsed_ms();

        let mut anomalies = Vec::new();
        if read_back != LINES {
            let a = Anomaly::new(
                self.name(),
                AnomalyKind::LineCountMismatch,
                format!("wrote {} lines, read {}", LINES, read_back),
            );
            warn!("[FileIo] {}", a.detail);
            anomalies.push(a);
        }

        Ok(Measurement::with_anomalies(elapsed, anomalies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BenchError;

    #[test]
    fn temp_file_is_gone_after_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = FileIo::new(dir.path());
        let m = s.run().unwrap();
        assert!(m.duration_ms >= 0);
        assert!(m.anomalies.is_empty());
        let path = s.last_path().unwrap();
        assert!(path.starts_with(dir.path()));
        assert!(!path.exists());
    }

    #[test]
    fn failed_create_propagates_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does").join("not").join("exist");
        let mut s = FileIo::new(&missing);
        let err = s.run().unwrap_err();
        assert!(matches!(err, BenchError::Io(_)));
        assert!(!s.last_path().unwrap().exists());
    }

    #[test]
    fn guard_removes_partial_file_on_early_exit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.txt");
        {
            let guard = TempFileGuard::new(path.clone());
            fs::write(guard.path(), "half a line").unwrap();
            assert!(path.exists());
            // dropped without remove(): the error path
        }
        assert!(!path.exists());
    }

    #[test]
    fn line_counter_matches_writer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.txt");
        write_lines(&path, 42).unwrap();
        assert_eq!(count_lines(&path).unwrap(), 42);
    }
}
