//! Numeric pass over a materialised 1,000,000-element vector.
//!
//! `PassMode::Single` times vector construction plus an indexed loop sum.
//! `PassMode::Difference` additionally times an iterator fold over the same
//! data and reports `loop_ms - fold_ms`, which may be negative.

use std::hint::black_box;

use crate::engine::{timer::Timer, Result};
use crate::scenarios::{Measurement, Scenario};

pub const ELEMENTS: i64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassMode {
    #[default]
    Single,
    Difference,
}

#[derive(Debug, Default)]
pub struct NumericPass {
    mode: PassMode,
    loop_sum: i64,
    fold_sum: Option<i64>,
}

impl NumericPass {
    pub fn new(mode: PassMode) -> Self {
        Self { mode, ..Self::default() }
    }

    pub fn mode(&self) -> PassMode {
        self.mode
    }

    pub fn loop_sum(&self) -> i64 {
        self.loop_sum
    }

    pub fn fold_sum(&self) -> Option<i64> {
        self.fold_sum
    }
}

fn loop_sum(data: &[i64]) -> i64 {
    let mut sum = 0i64;
    for &v in data {
        sum = black_box(sum + v);
    }
    sum
}

fn fold_sum(data: &[i64]) -> i64 {
    data.iter().copied().fold(0i64, |acc, v| acc + v)
}

impl Scenario for NumericPass {
    fn name(&self) -> &str {
        match self.mode {
            PassMode::Single => "Numeric Pass",
            PassMode::Difference => "Numeric Pass (loop - fold)",
        }
    }

    fn run(&mut self) -> Result<Measurement> {
        let loop_timer = Timer::start();
        let data: Vec<i64> = (0..ELEMENTS).collect();
        self.loop_sum = loop_sum(black_box(&data));
        let loop_ms = loop_timer.elapsed_ms();

        match self.mode {
            PassMode::Single => {
                self.fold_sum = None;
                Ok(Measurement::timed(loop_ms))
            }
            PassMode::Difference => {
                let fold_timer = Timer::start();
                self.fold_sum = Some(black_box(fold_sum(black_box(&data))));
                let fold_ms = fold_timer.elapsed_ms();
                Ok(Measurement::timed(loop_ms - fold_ms))
            }
        }
    }
}
