/*
Measures how the atomic and the racy counter behave when several worker
threads hammer one shared cell through the concurrency harness, across a
range of worker counts.
*/

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use runtime_bench::engine::{
    counters::CounterState,
    harness::ConcurrencyHarness,
};
use runtime_bench::scenarios::CounterKind;

// Worker counts contending on the same counter
const WORKER_COUNTS: &[usize] = &[1, 2, 5, 8];

// Increments each worker performs per iteration
const OPS_PER_WORKER: u64 = 20_000;

fn bench_counter_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("counter_contention");
    let harness = ConcurrencyHarness::default();

    for kind in [CounterKind::Atomic, CounterKind::Racy] {
        for &workers in WORKER_COUNTS {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", kind), workers),
                &workers,
                |b, &workers| {
                    let state = CounterState::new();

                    b.iter(|| {
                        state.reset();
                        let result = match kind {
                            CounterKind::Atomic => {
                                let counter = state.atomic.clone();
                                harness.run(workers, OPS_PER_WORKER, move || {
                                    counter.increment();
                                })
                            }
                            CounterKind::Racy => {
                                let counter = state.racy.clone();
                                harness.run(workers, OPS_PER_WORKER, move || {
                                    counter.increment();
                                })
                            }
                        };
                        if let Err(e) = result {
                            panic!("harness failed during bench: {}", e);
                        }
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_counter_contention);
criterion_main!(benches);
