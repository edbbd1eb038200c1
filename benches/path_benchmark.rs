#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for path synthesis.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use plotpaint::geometry::Point;
use plotpaint::render::{MarkerGenerator, PathBuilder, PathKind};

fn wave(size: usize) -> Vec<Point> {
    (0..size).map(|i| Point::new(i as f64 * 0.8, 300.0 + (i as f64 * 0.01).sin() * 200.0)).collect()
}

fn path_kind_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_build");

    for size in [100, 1_000, 5_000] {
        let points = wave(size);
        for kind in [PathKind::Line, PathKind::LineCalc, PathKind::Bezier] {
            group.bench_with_input(BenchmarkId::new(format!("{kind:?}"), size), &points, |b, pts| {
                b.iter(|| PathBuilder::new(kind).baseline(600.0).build(black_box(pts)));
            });
        }
    }

    group.finish();
}

fn marker_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("marker_series");
    let points = wave(50_000);

    for style in [1, 20, 29] {
        group.bench_with_input(BenchmarkId::from_parameter(style), &style, |b, &style| {
            let generator = MarkerGenerator::new(style, 1.0);
            b.iter(|| generator.path(black_box(&points).iter().copied()));
        });
    }

    group.finish();
}

criterion_group!(benches, path_kind_benchmark, marker_benchmark);
criterion_main!(benches);
