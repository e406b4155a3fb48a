// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Restartable traversal of the points stored under one node.

use core::iter::FusedIterator;
use core::ops::Range;

use crate::error::{Error, Result};
use crate::table::PointTable;

/// A point yielded by [`NodeIter`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointRef<'a> {
    /// Coordinates.
    pub point: &'a [f64],
    /// Logical id in the owning table.
    pub id: usize,
    /// Weight.
    pub weight: f64,
}

/// Cursor over a node's physical rows, in physical order.
///
/// Besides the explicit [`has_next`](NodeIter::has_next) /
/// [`next_point`](NodeIter::next_point) protocol it is an ordinary
/// [`ExactSizeIterator`]. Obtained from
/// [`IndexedTable::iter`](crate::IndexedTable::iter).
#[derive(Clone, Debug)]
pub struct NodeIter<'a> {
    table: &'a PointTable,
    rows: Range<usize>,
    cursor: usize,
}

impl<'a> NodeIter<'a> {
    pub(crate) fn new(table: &'a PointTable, rows: Range<usize>) -> Self {
        let cursor = rows.start;
        Self {
            table,
            rows,
            cursor,
        }
    }

    /// Whether another point remains.
    pub fn has_next(&self) -> bool {
        self.cursor < self.rows.end
    }

    /// The next point.
    ///
    /// Fails with [`Error::Exhausted`] once every point has been yielded.
    pub fn next_point(&mut self) -> Result<PointRef<'a>> {
        if !self.has_next() {
            return Err(Error::Exhausted);
        }
        let row = self.cursor;
        self.cursor += 1;
        Ok(PointRef {
            point: self.table.row(row),
            id: self.table.logical_id(row),
            weight: self.table.row_weight(row),
        })
    }

    /// Restart from the node's first point.
    pub fn reset(&mut self) {
        self.cursor = self.rows.start;
    }

    /// Physical rows covered, regardless of progress.
    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = PointRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_point().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.rows.end - self.cursor;
        (n, Some(n))
    }
}

impl ExactSizeIterator for NodeIter<'_> {}

impl FusedIterator for NodeIter<'_> {}
