// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use canopy_tree::{
    Euclidean, IndexedTable, KdSplit, Manhattan, PointTable, RandomDataset, TreeOptions,
};

fn table(dim: usize, n: usize) -> PointTable {
    let mut rng = StdRng::seed_from_u64(0x00C0_FFEE);
    RandomDataset::new(dim, n)
        .generate(&mut rng)
        .expect("benchmark dataset")
}

// Points bunched along a power curve so midpoint splits are badly unbalanced.
fn skewed_table(dim: usize, n: usize) -> PointTable {
    let base = table(dim, n);
    let points: Vec<Vec<f64>> = base
        .iter()
        .map(|(_, p, _)| p.iter().map(|x| x.powi(6)).collect())
        .collect();
    PointTable::from_points(dim, points).expect("benchmark dataset")
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_build");
    for &(dim, n) in &[(2_usize, 10_000_usize), (8, 10_000), (3, 100_000)] {
        let base = table(dim, n);
        group.throughput(Throughput::Elements(n as u64));
        let kinds = [
            ("kd_midpoint", TreeOptions::kd(20)),
            ("kd_median", TreeOptions::kd(20).with_kd_split(KdSplit::Median)),
            ("metric", TreeOptions::metric(20)),
        ];
        for (name, options) in kinds {
            group.bench_function(format!("{name}_d{dim}_n{n}"), |b| {
                b.iter_batched(
                    || base.clone(),
                    |t| {
                        let indexed = IndexedTable::build(t, Euclidean::default(), options)
                            .expect("build");
                        black_box(indexed.tree().len());
                    },
                    BatchSize::LargeInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_skewed(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_build_skewed");
    let base = skewed_table(4, 20_000);
    group.throughput(Throughput::Elements(20_000));
    for (name, split) in [("midpoint", KdSplit::Midpoint), ("median", KdSplit::Median)] {
        let options = TreeOptions::kd(16).with_kd_split(split);
        group.bench_function(name, |b| {
            b.iter_batched(
                || base.clone(),
                |t| {
                    let indexed =
                        IndexedTable::build(t, Manhattan::default(), options).expect("build");
                    black_box(indexed.tree().height());
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_leaf_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("leaf_walk");
    for kind in ["kd", "metric"] {
        let options = if kind == "kd" {
            TreeOptions::kd(32)
        } else {
            TreeOptions::metric(32)
        };
        let indexed =
            IndexedTable::build(table(4, 50_000), Euclidean::default(), options).expect("build");
        group.throughput(Throughput::Elements(50_000));
        group.bench_function(kind, |b| {
            b.iter(|| {
                let tree = indexed.tree();
                let mut total = 0.0;
                for leaf in tree.leaves() {
                    total += indexed.iter(leaf).map(|p| p.weight).sum::<f64>();
                }
                black_box(total);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_skewed, bench_leaf_walk);
criterion_main!(benches);
