// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dense point storage with stable logical ids and a separate physical order.

use core::ops::Range;

use crate::error::{Error, Result};

/// Two-way mapping between physical rows and logical ids.
///
/// Starts as the identity and changes only through [`Permutation::swap_rows`].
#[derive(Clone, Debug, PartialEq, Eq)]
struct Permutation {
    logical_of_row: Vec<usize>,
    row_of_logical: Vec<usize>,
}

impl Permutation {
    fn identity(n: usize) -> Self {
        Self {
            logical_of_row: (0..n).collect(),
            row_of_logical: (0..n).collect(),
        }
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        let (la, lb) = (self.logical_of_row[a], self.logical_of_row[b]);
        self.logical_of_row.swap(a, b);
        self.row_of_logical[la] = b;
        self.row_of_logical[lb] = a;
    }
}

/// `N` points of dimensionality `D`, each with a weight and a logical id.
///
/// Logical ids are `0..N` in creation (or load) order and never change. The
/// physical order of rows in memory is a separate permutation that tree
/// construction rearranges for locality; [`PointTable::get`] and friends
/// address points by logical id and are unaffected by it. The `row*`
/// accessors expose the physical order for traversal.
///
/// Equality is logical: two tables are equal when they hold the same points
/// and weights under the same logical ids, whatever their physical order.
#[derive(Clone)]
pub struct PointTable {
    dim: usize,
    // Row-major, physical order.
    coords: Vec<f64>,
    // Physical order.
    weights: Vec<f64>,
    order: Permutation,
}

impl core::fmt::Debug for PointTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let reordered = self
            .order
            .logical_of_row
            .iter()
            .enumerate()
            .any(|(row, &id)| row != id);
        f.debug_struct("PointTable")
            .field("dim", &self.dim)
            .field("entries", &self.entry_count())
            .field("reordered", &reordered)
            .finish_non_exhaustive()
    }
}

impl PartialEq for PointTable {
    fn eq(&self, other: &Self) -> bool {
        self.dim == other.dim
            && self.entry_count() == other.entry_count()
            && self
                .iter()
                .zip(other.iter())
                .all(|((_, p, w), (_, q, v))| p == q && w == v)
    }
}

impl PointTable {
    /// Weight given to points that were not assigned one.
    pub const DEFAULT_WEIGHT: f64 = 1.0;

    /// Allocate `count` points of dimensionality `dim`, all at the origin with
    /// weight [`PointTable::DEFAULT_WEIGHT`].
    ///
    /// Fails with [`Error::DegenerateInput`] if `dim` is zero.
    pub fn new(dim: usize, count: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::DegenerateInput(
                "a point table needs at least one dimension".into(),
            ));
        }
        Ok(Self {
            dim,
            coords: vec![0.0; dim * count],
            weights: vec![Self::DEFAULT_WEIGHT; count],
            order: Permutation::identity(count),
        })
    }

    /// Build a table from explicit points, each with the default weight.
    pub fn from_points<P: AsRef<[f64]>>(
        dim: usize,
        points: impl IntoIterator<Item = P>,
    ) -> Result<Self> {
        Self::from_weighted_points(
            dim,
            points.into_iter().map(|p| (p, Self::DEFAULT_WEIGHT)),
        )
    }

    /// Build a table from explicit `(point, weight)` pairs.
    ///
    /// Fails with [`Error::DimensionMismatch`] on the first point whose length
    /// is not `dim`, and with [`Error::NonFinite`] on the first NaN or
    /// infinite coordinate or weight.
    pub fn from_weighted_points<P: AsRef<[f64]>>(
        dim: usize,
        points: impl IntoIterator<Item = (P, f64)>,
    ) -> Result<Self> {
        let mut table = Self::new(dim, 0)?;
        for (p, w) in points {
            table.push(p.as_ref(), w)?;
        }
        table.reset_order();
        Ok(table)
    }

    // Appends in logical order; callers reset the permutation afterwards.
    pub(crate) fn push(&mut self, point: &[f64], weight: f64) -> Result<()> {
        self.check_entry(self.weights.len(), point, weight)?;
        self.coords.extend_from_slice(point);
        self.weights.push(weight);
        Ok(())
    }

    fn check_entry(&self, id: usize, point: &[f64], weight: f64) -> Result<()> {
        if point.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                found: point.len(),
            });
        }
        if !(weight.is_finite() && point.iter().all(|x| x.is_finite())) {
            return Err(Error::NonFinite { id });
        }
        Ok(())
    }

    pub(crate) fn reset_order(&mut self) {
        self.order = Permutation::identity(self.weights.len());
    }

    /// Number of points.
    pub fn entry_count(&self) -> usize {
        self.weights.len()
    }

    /// Dimensionality of every point.
    pub fn attribute_count(&self) -> usize {
        self.dim
    }

    /// Whether the table holds no points.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    fn check_id(&self, id: usize) -> Result<usize> {
        self.order
            .row_of_logical
            .get(id)
            .copied()
            .ok_or(Error::Index {
                id,
                len: self.entry_count(),
            })
    }

    /// The point and weight with logical id `id`.
    pub fn get(&self, id: usize) -> Result<(&[f64], f64)> {
        let row = self.check_id(id)?;
        Ok((self.row(row), self.weights[row]))
    }

    /// The point with logical id `id`.
    pub fn point(&self, id: usize) -> Result<&[f64]> {
        self.get(id).map(|(p, _)| p)
    }

    /// The weight of logical id `id`.
    pub fn weight(&self, id: usize) -> Result<f64> {
        self.get(id).map(|(_, w)| w)
    }

    /// Overwrite the point and weight of logical id `id`.
    ///
    /// Fails with [`Error::NonFinite`] if any coordinate or the weight is NaN
    /// or infinite; the table is left untouched.
    pub fn set(&mut self, id: usize, point: &[f64], weight: f64) -> Result<()> {
        let row = self.check_id(id)?;
        self.check_entry(id, point, weight)?;
        let start = row * self.dim;
        self.coords[start..start + self.dim].copy_from_slice(point);
        self.weights[row] = weight;
        Ok(())
    }

    /// `(id, point, weight)` for every point in logical-id order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, &[f64], f64)> + '_ {
        self.order
            .row_of_logical
            .iter()
            .enumerate()
            .map(|(id, &row)| (id, self.row(row), self.weights[row]))
    }

    /// The point stored in physical row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= entry_count()`.
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.dim;
        &self.coords[start..start + self.dim]
    }

    /// The weight stored in physical row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= entry_count()`.
    pub fn row_weight(&self, row: usize) -> f64 {
        self.weights[row]
    }

    /// The logical id of the point stored in physical row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= entry_count()`.
    pub fn logical_id(&self, row: usize) -> usize {
        self.order.logical_of_row[row]
    }

    /// The physical row currently holding logical id `id`.
    pub fn row_of(&self, id: usize) -> Result<usize> {
        self.check_id(id)
    }

    pub(crate) fn set_row_weight(&mut self, row: usize, weight: f64) {
        self.weights[row] = weight;
    }

    /// Points stored in the physical rows `rows`, in physical order.
    pub(crate) fn rows(&self, rows: Range<usize>) -> core::slice::ChunksExact<'_, f64> {
        self.coords[rows.start * self.dim..rows.end * self.dim].chunks_exact(self.dim)
    }

    /// Exchange the contents of physical rows `a` and `b`, keeping every
    /// logical id attached to its point.
    pub(crate) fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let d = self.dim;
        let (lo, hi) = (a.min(b), a.max(b));
        let (head, tail) = self.coords.split_at_mut(hi * d);
        head[lo * d..(lo + 1) * d].swap_with_slice(&mut tail[..d]);
        self.weights.swap(a, b);
        self.order.swap_rows(a, b);
    }
}
