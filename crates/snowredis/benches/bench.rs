use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use snowredis::{
    GeneratorConfig, Identity, LocalSequencer, MemoryStore, SnowflakeGenerator, TimeSource,
    WallClock,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

/// Hot path: one millisecond's worth of sequence space, never blocking.
fn bench_sequencer_hot(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequencer/fixed-time");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let sequencer =
                    LocalSequencer::new(Identity::DEFAULT, FixedMockTime { millis: 1 });
                for _ in 0..TOTAL_IDS {
                    black_box(sequencer.generate().unwrap());
                }
            }
            start.elapsed()
        });
    });
    group.finish();
}

/// Real clock, including overflow waits.
fn bench_sequencer_wall_clock(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequencer/wall-clock");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    let sequencer = LocalSequencer::new(Identity::DEFAULT, WallClock);
    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(sequencer.generate().unwrap());
            }
        });
    });
    group.finish();
}

/// Contended lock: several threads sharing one sequencer.
fn bench_sequencer_threaded(c: &mut Criterion) {
    const THREADS: usize = 8;

    let mut group = c.benchmark_group("sequencer/threaded");
    group.throughput(Throughput::Elements((TOTAL_IDS * THREADS) as u64));

    let sequencer = LocalSequencer::new(Identity::DEFAULT, WallClock);
    group.bench_function(format!("threads/{THREADS}/elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let barrier = Barrier::new(THREADS + 1);
            let start = scope(|s| {
                for _ in 0..THREADS {
                    s.spawn(|| {
                        barrier.wait();
                        for _ in 0..iters {
                            for _ in 0..TOTAL_IDS {
                                black_box(sequencer.generate().unwrap());
                            }
                        }
                    });
                }
                barrier.wait();
                Instant::now()
            });
            start.elapsed()
        });
    });
    group.finish();
}

/// Strict mode against the in-process store.
fn bench_strict_memory_store(c: &mut Criterion) {
    const STRICT_IDS: usize = 64;

    let mut group = c.benchmark_group("strict/memory-store");
    group.throughput(Throughput::Elements(STRICT_IDS as u64));
    group.sample_size(10);

    group.bench_function(format!("elems/{STRICT_IDS}"), |b| {
        b.iter(|| {
            let generator = SnowflakeGenerator::new(GeneratorConfig {
                datacenter_id: 1,
                worker_id: 1,
                store: Some(Arc::new(MemoryStore::new())),
                strict_mode: true,
            })
            .unwrap();
            for _ in 0..STRICT_IDS {
                black_box(generator.generate().unwrap());
            }
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_sequencer_hot,
    bench_sequencer_wall_clock,
    bench_sequencer_threaded,
    bench_strict_memory_store
);
criterion_main!(benches);
