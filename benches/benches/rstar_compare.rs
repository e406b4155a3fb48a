// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use canopy_tree::{Euclidean, IndexedTable, PointTable, RandomDataset, TreeOptions};
use rstar::RTree;

fn dataset(n: usize) -> PointTable {
    let mut rng = StdRng::seed_from_u64(42);
    RandomDataset::new(3, n)
        .generate(&mut rng)
        .expect("benchmark dataset")
}

fn to_rstar_points(table: &PointTable) -> Vec<[f64; 3]> {
    table.iter().map(|(_, p, _)| [p[0], p[1], p[2]]).collect()
}

fn bench_bulk_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_build_3d");
    for &n in &[10_000_usize, 100_000] {
        let table = dataset(n);
        let points = to_rstar_points(&table);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("canopy_kd_n{n}"), |b| {
            b.iter_batched(
                || table.clone(),
                |t| {
                    let indexed = IndexedTable::build(t, Euclidean::default(), TreeOptions::kd(6))
                        .expect("build");
                    black_box(indexed.tree().len());
                },
                BatchSize::LargeInput,
            )
        });

        group.bench_function(format!("canopy_metric_n{n}"), |b| {
            b.iter_batched(
                || table.clone(),
                |t| {
                    let indexed =
                        IndexedTable::build(t, Euclidean::default(), TreeOptions::metric(6))
                            .expect("build");
                    black_box(indexed.tree().len());
                },
                BatchSize::LargeInput,
            )
        });

        group.bench_function(format!("rstar_bulk_load_n{n}"), |b| {
            b.iter_batched(
                || points.clone(),
                |pts| {
                    let tree = RTree::bulk_load(pts);
                    black_box(tree.size());
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_bulk_build);
criterion_main!(benches);
