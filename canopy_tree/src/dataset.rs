// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform random tables for tests, benchmarks and stress runs.

use core::ops::Range;

use rand::Rng;

use crate::error::{Error, Result};
use crate::table::PointTable;

/// Recipe for a table of uniformly distributed points.
///
/// Coordinates are drawn from `coords` and weights from `weights`, both
/// half-open. The random source is always supplied by the caller so that a
/// seeded generator reproduces the same table.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomDataset {
    /// Dimensionality of every point.
    pub dim: usize,
    /// Number of points.
    pub count: usize,
    /// Range of every coordinate.
    pub coords: Range<f64>,
    /// Range of every weight.
    pub weights: Range<f64>,
}

impl RandomDataset {
    /// `count` points of dimensionality `dim` with the default ranges
    /// (`[0.1, 1.0)` for coordinates, `[1.0, 5.0)` for weights).
    pub fn new(dim: usize, count: usize) -> Self {
        Self {
            dim,
            count,
            coords: 0.1..1.0,
            weights: 1.0..5.0,
        }
    }

    /// Replace the coordinate range.
    pub fn with_coords(mut self, coords: Range<f64>) -> Self {
        self.coords = coords;
        self
    }

    /// Replace the weight range.
    pub fn with_weights(mut self, weights: Range<f64>) -> Self {
        self.weights = weights;
        self
    }

    /// Draw a table.
    ///
    /// Fails with [`Error::DegenerateInput`] if `dim` is zero or either range
    /// is empty.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PointTable> {
        if self.coords.is_empty() || self.weights.is_empty() {
            return Err(Error::DegenerateInput(format!(
                "empty sampling range (coords {:?}, weights {:?})",
                self.coords, self.weights
            )));
        }
        let mut table = PointTable::new(self.dim, 0)?;
        let mut point = vec![0.0; self.dim];
        for _ in 0..self.count {
            for x in &mut point {
                *x = rng.gen_range(self.coords.clone());
            }
            let w = rng.gen_range(self.weights.clone());
            table.push(&point, w)?;
        }
        table.reset_order();
        Ok(table)
    }
}
