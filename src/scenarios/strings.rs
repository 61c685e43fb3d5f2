// String building two ways: fresh string per append (quadratic copying),
// then a single growable buffer (amortised linear).

use std::hint::black_box;

use crate::engine::{timer::Timer, Result};
use crate::scenarios::{Measurement, Scenario};

pub const APPENDS: usize = 10_000;

#[derive(Debug, Default)]
pub struct StringConcat {
    lengths: (usize, usize),
}

impl StringConcat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Final lengths of (immutable, buffered) strings from the last run.
    pub fn lengths(&self) -> (usize, usize) {
        self.lengths
    }
}

fn immutable_concat(n: usize) -> String {
    let mut s = String::new();
    for _ in 0..n {
        s = [s.as_str(), "a"].concat();
    }
    s
}

fn buffered_append(n: usize) -> String {
    let mut buf = String::new();
    for _ in 0..n {
        buf.push('a');
    }
    buf
}

impl Scenario for StringConcat {
    fn name(&self) -> &str {
        "String Concatenation"
    }

    fn run(&mut self) -> Result<Measurement> {
        let timer = Timer::start();
        let copied = black_box(immutable_concat(black_box(APPENDS)));
        let buffered = black_box(buffered_append(black_box(APPENDS)));
        let elapsed = timer.elapsed_ms();

        self.lengths = (copied.len(), buffered.len());
        Ok(Measurement::timed(elapsed))
    }
}
