//! Monotonic timing helpers.
//!
//! Backed by `Instant`, never wall-clock time, so clock adjustments cannot
//! skew a measurement.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Timer {
    started: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self { started: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whole milliseconds since `start()` (truncated).
    pub fn elapsed_ms(&self) -> i64 {
        to_ms(self.elapsed())
    }
}

/// Duration → whole milliseconds, saturating at `i64::MAX`.
#[inline]
pub fn to_ms(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

/// Runs `f` and returns its output together with the elapsed milliseconds.
pub fn measure<F, R>(f: F) -> (R, i64)
where
    F: FnOnce() -> R,
{
    let timer = Timer::start();
    let out = f();
    (out, timer.elapsed_ms())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn elapsed_is_monotonic_and_non_negative() {
        let t = Timer::start();
        let a = t.elapsed_ms();
        let b = t.elapsed_ms();
        assert!(a >= 0);
        assert!(b >= a);
    }

    #[test]
    fn measure_covers_the_closure() {
        let (v, ms) = measure(|| {
            thread::sleep(Duration::from_millis(20));
            7
        });
        assert_eq!(v, 7);
        assert!(ms >= 20);
    }

    #[test]
    fn to_ms_truncates() {
        assert_eq!(to_ms(Duration::from_micros(1_999)), 1);
        assert_eq!(to_ms(Duration::ZERO), 0);
    }
}
