//! Benchmarks for dataset loading and worklist generation.
//!
//! These benchmarks measure:
//! - CSV parsing and column validation (Dataset::from_csv)
//! - Worklist generation with per-item randomization (generate)

mod common;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use common::{blind_dataset, seeded_rng, three_way_csv, three_way_dataset};
use descval::dataset::{Dataset, Variant};
use descval::worklist::generate;

fn bench_from_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("dataset/from_csv");

    for rows in [100, 1_000, 10_000] {
        let bytes = three_way_csv(rows);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &bytes, |b, bytes| {
            b.iter(|| black_box(Dataset::from_csv(Variant::ThreeWay, black_box(bytes))));
        });
    }

    group.finish();
}

/// Blind draws one coin per row; three-way draws per item and shuffles.
fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("worklist/generate");

    for rows in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(rows as u64));

        let blind = blind_dataset(rows);
        group.bench_with_input(BenchmarkId::new("blind", rows), &blind, |b, dataset| {
            let mut rng = seeded_rng();
            b.iter(|| black_box(generate(black_box(dataset), &mut rng)));
        });

        let three_way = three_way_dataset(rows);
        group.bench_with_input(
            BenchmarkId::new("three_way", rows),
            &three_way,
            |b, dataset| {
                let mut rng = seeded_rng();
                b.iter(|| black_box(generate(black_box(dataset), &mut rng)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_from_csv, bench_generate);
criterion_main!(benches);
