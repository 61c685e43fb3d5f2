// Sequential integer sum over 0..10_000_000.

use std::hint::black_box;

use crate::engine::{timer::Timer, Result};
use crate::scenarios::{Measurement, Scenario};

pub const LOOP_UPPER_BOUND: u64 = 10_000_000;

#[derive(Debug, Default)]
pub struct ArithmeticLoop {
    last_sum: Option<u64>,
}

impl ArithmeticLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum computed by the most recent run.
    pub fn last_sum(&self) -> Option<u64> {
        self.last_sum
    }
}

impl Scenario for ArithmeticLoop {
    fn name(&self) -> &str {
        "Arithmetic Loop"
    }

    fn run(&mut self) -> Result<Measurement> {
        let timer = Timer::start();
        let mut sum: u64 = 0;
        for i in 0..black_box(LOOP_UPPER_BOUND) {
            sum = black_box(sum + i);
        }
        let elapsed = timer.elapsed_ms();

        self.last_sum = Some(sum);
        Ok(Measurement::timed(elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_the_full_range_on_every_run() {
        let mut scenario = ArithmeticLoop::new();
        for _ in 0..2 {
            let m = scenario.run().unwrap();
            assert!(m.duration_ms >= 0);
            assert!(m.anomalies.is_empty());
            assert_eq!(scenario.last_sum(), Some(49_999_995_000_000));
        }
    }
}
