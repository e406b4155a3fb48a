// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Randomized stress driver.
//!
//! Each round draws a random dimensionality, point count and leaf size,
//! generates a table, saves it, loads it back twice (checking both copies
//! against the original), builds a k-d tree and a metric tree, and validates
//! both. Exits non-zero on the first failure.
//!
//! Run:
//! - `cargo run -p canopy_demos --example stress -- [rounds] [seed]`

use std::process::ExitCode;

use canopy_tree::{
    Checks, Euclidean, IndexedTable, PointTable, RandomDataset, TreeKind, TreeOptions, validate,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

struct Round {
    dim: usize,
    count: usize,
    leaf_size: usize,
}

fn run_round(round: &Round, rng: &mut StdRng, dir: &std::path::Path) -> Result<(), String> {
    let table = RandomDataset::new(round.dim, round.count)
        .generate(rng)
        .map_err(|e| e.to_string())?;

    let points = dir.join("points.csv");
    let weights = dir.join("weights.csv");
    table
        .save(&points, Some(weights.as_path()))
        .map_err(|e| e.to_string())?;
    let first = PointTable::load(&points, Some(weights.as_path())).map_err(|e| e.to_string())?;
    let second = PointTable::load(&points, Some(weights.as_path())).map_err(|e| e.to_string())?;
    if first != table || second != table {
        return Err("reloaded table differs from the saved one".into());
    }

    for (kind, copy) in [(TreeKind::Kd, first), (TreeKind::Metric, second)] {
        let options = TreeOptions {
            kind,
            leaf_size: round.leaf_size,
            ..TreeOptions::default()
        };
        let indexed = IndexedTable::build(copy, Euclidean::default(), options)
            .map_err(|e| format!("{kind:?} build: {e}"))?;
        validate(&indexed, &table, Checks::all(), 3, rng)
            .map_err(|v| format!("{kind:?} tree: {v}"))?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let rounds: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(50);
    let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(0x5EED);
    let mut rng = StdRng::seed_from_u64(seed);

    let dir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("cannot create a scratch directory: {e}");
            return ExitCode::FAILURE;
        }
    };

    for i in 0..rounds {
        let round = Round {
            dim: rng.gen_range(1..=12),
            count: rng.gen_range(1..=2_000),
            leaf_size: rng.gen_range(1..=64),
        };
        if let Err(e) = run_round(&round, &mut rng, dir.path()) {
            eprintln!(
                "round {i} (seed {seed}, d={}, n={}, L={}) failed: {e}",
                round.dim, round.count, round.leaf_size
            );
            return ExitCode::FAILURE;
        }
        println!(
            "round {i}: d={:>2} n={:>4} L={:>2} ok",
            round.dim, round.count, round.leaf_size
        );
    }
    println!("{rounds} rounds passed (seed {seed})");
    ExitCode::SUCCESS
}
