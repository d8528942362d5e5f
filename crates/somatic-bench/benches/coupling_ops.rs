//! Criterion micro-benchmarks for reflex coupling.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use somatic_bench::reflex_wave;
use somatic_reflex::{ReflexBuffer, ReflexCouplingEngine};

/// Benchmark: couple bursts of 8, 64 and 1024 fired reflexes.
fn bench_couple(c: &mut Criterion) {
    let engine = ReflexCouplingEngine::default();
    for n in [8usize, 64, 1024] {
        let results = reflex_wave(n, 32);
        c.bench_function(&format!("couple_{n}"), |b| {
            b.iter(|| black_box(engine.couple(black_box(&results))));
        });
    }
}

/// Benchmark: fill and drain a buffer with 64 reflexes per tick.
fn bench_buffer_tick_64(c: &mut Criterion) {
    let results = reflex_wave(64, 32);
    let mut buffer = ReflexBuffer::new();

    c.bench_function("buffer_tick_64", |b| {
        b.iter(|| {
            buffer.extend(results.iter().copied());
            black_box(buffer.resolve())
        });
    });
}

criterion_group!(benches, bench_couple, bench_buffer_tick_64);
criterion_main!(benches);
