// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A table together with the tree built over it.

use canopy_geom::{Euclidean, Metric};

use crate::build::{TreeOptions, build};
use crate::error::Result;
use crate::iter::NodeIter;
use crate::table::PointTable;
use crate::tree::{NodeId, SpatialTree};

/// A [`PointTable`], the [`SpatialTree`] built over it and the metric used to
/// build it.
///
/// Owning all three keeps the tree tied to the exact row order it was built
/// for: once indexed, the table is only reachable through shared references.
/// Use [`IndexedTable::into_table`] to get it back for editing.
#[derive(Clone, Debug)]
pub struct IndexedTable<M: Metric = Euclidean> {
    table: PointTable,
    tree: SpatialTree,
    metric: M,
}

impl<M: Metric> IndexedTable<M> {
    /// Build a tree over `table`.
    ///
    /// Physically reorders the table's rows; logical-id lookups are
    /// unaffected. Fails with [`Error::DegenerateInput`](crate::Error::DegenerateInput)
    /// for an empty table or a leaf size of zero.
    pub fn build(mut table: PointTable, metric: M, options: TreeOptions) -> Result<Self> {
        let tree = build(&mut table, &metric, &options)?;
        Ok(Self {
            table,
            tree,
            metric,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_parts(table: PointTable, tree: SpatialTree, metric: M) -> Self {
        Self {
            table,
            tree,
            metric,
        }
    }

    /// The indexed table.
    pub fn table(&self) -> &PointTable {
        &self.table
    }

    /// The tree.
    pub fn tree(&self) -> &SpatialTree {
        &self.tree
    }

    /// The metric the tree was built with.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Point and weight with logical id `id`.
    pub fn get(&self, id: usize) -> Result<(&[f64], f64)> {
        self.table.get(id)
    }

    /// Fresh iterator over the points stored under `node`.
    pub fn iter(&self, node: NodeId) -> NodeIter<'_> {
        NodeIter::new(&self.table, self.tree.range(node))
    }

    /// Drop the tree and return the table, still in its reordered physical
    /// order.
    pub fn into_table(self) -> PointTable {
        self.table
    }
}
