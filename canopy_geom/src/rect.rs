// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned hyper-rectangles.

use rand::Rng;

/// Axis-aligned box in `D` dimensions, stored as per-dimension `[min, max]`
/// intervals (both ends inclusive).
///
/// A box with `min > max` in some dimension is empty; [`HyperRect::empty`]
/// produces the canonical empty box (`+inf..-inf` everywhere) which acts as the
/// identity for [`HyperRect::union`] and [`HyperRect::expand`].
#[derive(Clone, Debug, PartialEq)]
pub struct HyperRect {
    min: Vec<f64>,
    max: Vec<f64>,
}

impl HyperRect {
    /// Create a box from its min and max corners.
    ///
    /// # Panics
    ///
    /// Panics if the corners have different lengths.
    pub fn new(min: Vec<f64>, max: Vec<f64>) -> Self {
        assert_eq!(min.len(), max.len(), "corners must share a dimensionality");
        Self { min, max }
    }

    /// The empty box in `dim` dimensions.
    pub fn empty(dim: usize) -> Self {
        Self {
            min: vec![f64::INFINITY; dim],
            max: vec![f64::NEG_INFINITY; dim],
        }
    }

    /// Tight box around `points`. Empty if `points` yields nothing.
    pub fn from_points<'a>(dim: usize, points: impl IntoIterator<Item = &'a [f64]>) -> Self {
        let mut rect = Self::empty(dim);
        for p in points {
            rect.expand(p);
        }
        rect
    }

    /// Dimensionality.
    pub fn dim(&self) -> usize {
        self.min.len()
    }

    /// Minimum corner.
    pub fn min(&self) -> &[f64] {
        &self.min
    }

    /// Maximum corner.
    pub fn max(&self) -> &[f64] {
        &self.max
    }

    /// Whether the box contains no point. Assumes no NaN.
    pub fn is_empty(&self) -> bool {
        self.min.iter().zip(&self.max).any(|(lo, hi)| hi < lo)
    }

    /// Whether `point` lies inside the box (boundary included).
    pub fn contains(&self, point: &[f64]) -> bool {
        debug_assert_eq!(point.len(), self.dim(), "point must match box dimensionality");
        self.min
            .iter()
            .zip(&self.max)
            .zip(point)
            .all(|((lo, hi), x)| lo <= x && x <= hi)
    }

    /// Grow the box to include `point`.
    pub fn expand(&mut self, point: &[f64]) {
        debug_assert_eq!(point.len(), self.dim(), "point must match box dimensionality");
        for ((lo, hi), &x) in self.min.iter_mut().zip(self.max.iter_mut()).zip(point) {
            *lo = lo.min(x);
            *hi = hi.max(x);
        }
    }

    /// The smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        debug_assert_eq!(self.dim(), other.dim(), "boxes must share a dimensionality");
        Self {
            min: self.min.iter().zip(&other.min).map(|(a, b)| a.min(*b)).collect(),
            max: self.max.iter().zip(&other.max).map(|(a, b)| a.max(*b)).collect(),
        }
    }

    /// Width of the box along `dim`.
    pub fn extent(&self, dim: usize) -> f64 {
        self.max[dim] - self.min[dim]
    }

    /// Midpoint of the box along `dim`.
    ///
    /// Stays finite for boxes wider than `f64::MAX`.
    pub fn midpoint(&self, dim: usize) -> f64 {
        lerp(self.min[dim], self.max[dim], 0.5)
    }

    /// The dimension of greatest extent and that extent.
    ///
    /// Ties resolve to the lowest dimension index. Returns `None` for a
    /// zero-dimensional box.
    pub fn widest_dimension(&self) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for d in 0..self.dim() {
            let w = self.extent(d);
            if best.is_none_or(|(_, bw)| w > bw) {
                best = Some((d, w));
            }
        }
        best
    }

    /// Center of the box.
    pub fn center(&self) -> Vec<f64> {
        (0..self.dim()).map(|d| self.midpoint(d)).collect()
    }

    /// Sample a point uniformly inside the box.
    ///
    /// Works for any finite corners, including extents that overflow `f64`.
    ///
    /// # Panics
    ///
    /// Panics if the box is empty.
    pub fn random_point_inside<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        assert!(!self.is_empty(), "cannot sample inside an empty box");
        self.min
            .iter()
            .zip(&self.max)
            .map(|(&lo, &hi)| lerp(lo, hi, rng.r#gen::<f64>()))
            .collect()
    }
}

/// `lo + t * (hi - lo)` clamped to `[lo, hi]`, without overflowing when the
/// span does.
fn lerp(lo: f64, hi: f64, t: f64) -> f64 {
    let span = hi - lo;
    let x = if span.is_finite() {
        lo + t * span
    } else {
        lo * (1.0 - t) + hi * t
    };
    x.clamp(lo, hi)
}
