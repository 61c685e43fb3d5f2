use std::hint::black_box;

use crate::engine::{timer::Timer, Result};
use crate::scenarios::{Measurement, Scenario};

pub const ALLOCATIONS: u64 = 1_000_000;

/// Small heap object; `id` differs for every allocation.
#[derive(Debug)]
pub struct Payload {
    pub id: u64,
}

/// Allocates one boxed `Payload` per iteration and drops it.
#[derive(Debug, Default)]
pub struct ObjectAllocation {
    checksum: u64,
}

impl ObjectAllocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of every allocated id from the last run.
    pub fn checksum(&self) -> u64 {
        self.checksum
    }
}

impl Scenario for ObjectAllocation {
    fn name(&self) -> &str {
        "Object Allocation"
    }

    fn run(&mut self) -> Result<Measurement> {
        let timer = Timer::start();
        let mut checksum = 0u64;
        for i in 0..ALLOCATIONS {
            let obj = black_box(Box::new(Payload { id: i }));
            checksum = checksum.wrapping_add(obj.id);
        }
        let elapsed = timer.elapsed_ms();

        self.checksum = checksum;
        Ok(Measurement::timed(elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_object_carries_its_own_id() {
        let mut scenario = ObjectAllocation::new();
        let m = scenario.run().unwrap();
        assert!(m.duration_ms >= 0);
        // 0 + 1 + ... + 999_999
        assert_eq!(scenario.checksum(), 499_999_500_000);
    }
}
