//! Benchmarks for tracker derivations.

use bcp_tracker::prelude::*;
use bcp_tracker::testing::linear_registry;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn tracker_benchmark(c: &mut Criterion) {
    let mut tracker = PipelineTracker::bcp();

    c.bench_function("toggle", |b| {
        b.iter(|| tracker.toggle(black_box("stage4"), black_box("fastqManifest")));
    });

    let tracker = PipelineTracker::bcp();
    c.bench_function("is_stage_blocked", |b| {
        b.iter(|| {
            for n in 1..=7 {
                black_box(tracker.is_stage_blocked(black_box(n)));
            }
        });
    });

    c.bench_function("snapshot", |b| {
        b.iter(|| black_box(tracker.snapshot()));
    });

    if let Ok(registry) = linear_registry(200, 8) {
        let tracker = PipelineTracker::new(registry);
        c.bench_function("overall_status_200_stages", |b| {
            b.iter(|| black_box(tracker.overall_status()));
        });
    }
}

criterion_group!(benches, tracker_benchmark);
criterion_main!(benches);
