#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for bin derivation and decimation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use plotpaint::bins::{decimate, sample_function};
use plotpaint::data::DataPoint;
use plotpaint::objects::FunctionObject;

fn decimation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("decimate");

    for size in [10_000, 100_000, 1_000_000] {
        let points: Vec<DataPoint> = (0..size).map(|i| DataPoint::new(i, i as f64, (i as f64).sqrt())).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &points, |b, pts| {
            b.iter(|| decimate(black_box(pts), 5000, true, |p, _| p.x < 100.0));
        });
    }

    group.finish();
}

fn sampling_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_function");
    let func = FunctionObject::new("sin", 0.0, 100.0, f64::sin);

    for npx in [101, 1_000, 10_000] {
        let func = func.clone().npx(npx);
        group.bench_with_input(BenchmarkId::from_parameter(npx), &func, |b, f| {
            b.iter(|| sample_function(black_box(f), Some((10.0, 90.0)), false, true, 101));
        });
    }

    group.finish();
}

criterion_group!(benches, decimation_benchmark, sampling_benchmark);
criterion_main!(benches);
