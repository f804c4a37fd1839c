// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for TONELINE
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Point-in-time membership queries over busy timelines
//! - Full reconciliation passes (the per-frame hot path)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use toneline::{BlockStore, BlockUpdate, Reconciler, Waveform};

/// Build a store with `count` blocks staggered across a 60s timeline
fn busy_store(count: usize) -> BlockStore {
    let mut store = BlockStore::new();
    let track = store.add_track("Bench", 440.0, Waveform::Sine);

    for i in 0..count {
        let start = (i as f64 * 0.1) % 58.0;
        let id = store.add_block(track, start).unwrap();
        store.update(
            id,
            BlockUpdate {
                duration: Some(2.0),
                ..Default::default()
            },
        );
    }
    store
}

/// Benchmark point-in-time membership queries
fn bench_query_active(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_active");

    for count in [16, 64, 256] {
        let store = busy_store(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &store, |b, store| {
            b.iter(|| store.query_active(black_box(30.0)).len())
        });
    }

    group.finish();
}

/// Benchmark a full reconcile pass with a moving playhead
fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    for count in [16, 64, 256] {
        let store = busy_store(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &store, |b, store| {
            let mut reconciler = Reconciler::new();
            let mut time = 0.0f64;
            b.iter(|| {
                // Advance a frame each iteration so diffs stay non-trivial
                time = (time + 1.0 / 60.0) % 60.0;
                black_box(reconciler.reconcile(store, time).len())
            })
        });
    }

    group.finish();
}

/// Benchmark the no-op diff (steady state inside one active set)
fn bench_reconcile_steady_state(c: &mut Criterion) {
    let store = busy_store(64);
    let mut reconciler = Reconciler::new();
    reconciler.reconcile(&store, 30.0);

    c.bench_function("reconcile_noop", |b| {
        b.iter(|| black_box(reconciler.reconcile(&store, 30.0).len()))
    });
}

criterion_group!(
    benches,
    bench_query_active,
    bench_reconcile,
    bench_reconcile_steady_state
);
criterion_main!(benches);
