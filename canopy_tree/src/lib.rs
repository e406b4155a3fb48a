// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Tree: binary space-partitioning indexes over weighted point tables.
//!
//! - [`PointTable`]: `N` points of dimensionality `D` with a weight each. Points
//!   keep a stable logical id while their physical row order is rearranged for
//!   locality. Tables can be built from explicit points, drawn at random with
//!   [`RandomDataset`], or saved and loaded as delimited text.
//! - [`IndexedTable`]: a table, the [`SpatialTree`] built over it and the
//!   [`Metric`] used to build it. Building reorders the table so that every
//!   node owns a contiguous run of rows.
//! - [`TreeKind::Kd`] splits on the widest dimension and bounds nodes with
//!   [`HyperRect`]s. [`TreeKind::Metric`] splits between two far-apart pivots
//!   and bounds nodes with [`Ball`]s.
//! - [`NodeIter`]: restartable traversal of the points under a node.
//! - [`validate`]: re-checks the structural guarantees of a built tree.
//!
//! # Example
//!
//! ```rust
//! use canopy_tree::{Euclidean, IndexedTable, PointTable, TreeOptions};
//!
//! let table = PointTable::from_points(
//!     2,
//!     [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0], [5.0, 5.0], [5.0, 6.0]],
//! )?;
//! let indexed = IndexedTable::build(table, Euclidean::default(), TreeOptions::kd(2))?;
//! let tree = indexed.tree();
//!
//! // The outlying pair ends up in a leaf of its own.
//! let far = tree.right(tree.root()).unwrap();
//! assert!(tree.is_leaf(far));
//! let mut ids: Vec<_> = indexed.iter(far).map(|p| p.id).collect();
//! ids.sort();
//! assert_eq!(ids, [4, 5]);
//!
//! // Logical ids are unaffected by the reorder.
//! assert_eq!(indexed.get(4)?.0, &[5.0, 5.0]);
//! # Ok::<(), canopy_tree::Error>(())
//! ```
//!
//! ## Logging
//!
//! Build summaries and save/load are reported at `debug` level through the
//! [`log`] facade, individual splits at `trace`. No logger is installed.
//!
//! ## Features
//!
//! - `kurbo`: enables `canopy_geom::shape` for drawing 2D bounds.

pub mod build;
pub mod dataset;
pub mod error;
#[cfg(test)]
mod fixtures;
pub mod indexed;
pub mod iter;
pub mod persist;
pub mod table;
pub mod tree;
pub mod validate;

pub use build::{KdSplit, TreeOptions};
pub use dataset::RandomDataset;
pub use error::{Error, Result};
pub use indexed::IndexedTable;
pub use iter::{NodeIter, PointRef};
pub use persist::TextFormat;
pub use table::PointTable;
pub use tree::{Node, NodeId, SpatialTree, TreeKind};
pub use validate::{Checks, Violation, validate};

pub use canopy_geom::{Ball, Bound, Chebyshev, Euclidean, HyperRect, LMetric, Manhattan, Metric};
