// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top-down tree construction over a [`PointTable`].
//!
//! Construction partitions the table's physical rows in place so that every
//! node owns a contiguous run of rows. Ranges are split from a work stack,
//! then bounds are filled in bottom-up in reverse arena order (children always
//! follow their parent in the arena).

use core::ops::Range;

use canopy_geom::{Ball, Bound, HyperRect, Metric};

use crate::error::{Error, Result};
use crate::table::PointTable;
use crate::tree::{Node, NodeId, SpatialTree, TreeKind};

/// Split value rule for [`TreeKind::Kd`] trees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum KdSplit {
    /// Midpoint of the widest dimension's extent.
    #[default]
    Midpoint,
    /// Coordinate of the middle point when the range is ordered by
    /// `(coordinate, logical id)`. Gives balanced trees on skewed data.
    Median,
}

/// Construction parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TreeOptions {
    /// Partitioning family.
    pub kind: TreeKind,
    /// Maximum number of points in a leaf. Must be at least 1.
    pub leaf_size: usize,
    /// Split rule for k-d trees. Ignored by metric trees.
    pub kd_split: KdSplit,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            kind: TreeKind::Kd,
            leaf_size: Self::DEFAULT_LEAF_SIZE,
            kd_split: KdSplit::Midpoint,
        }
    }
}

impl TreeOptions {
    /// Leaf size used by [`TreeOptions::default`].
    pub const DEFAULT_LEAF_SIZE: usize = 20;

    /// k-d tree with the given leaf size.
    pub fn kd(leaf_size: usize) -> Self {
        Self {
            kind: TreeKind::Kd,
            leaf_size,
            ..Self::default()
        }
    }

    /// Metric (ball) tree with the given leaf size.
    pub fn metric(leaf_size: usize) -> Self {
        Self {
            kind: TreeKind::Metric,
            leaf_size,
            ..Self::default()
        }
    }

    /// Replace the k-d split rule.
    pub fn with_kd_split(mut self, kd_split: KdSplit) -> Self {
        self.kd_split = kd_split;
        self
    }
}

/// How one range is divided.
enum Split {
    Axis { dim: usize, value: f64 },
    Pivots { left: Vec<f64>, right: Vec<f64> },
}

impl Split {
    fn goes_left<M: Metric + ?Sized>(&self, metric: &M, p: &[f64]) -> bool {
        match self {
            Self::Axis { dim, value } => p[*dim] < *value,
            Self::Pivots { left, right } => metric.distance(p, left) <= metric.distance(p, right),
        }
    }

    // Ordering key for the balanced fallback; smaller keys lean left.
    fn key<M: Metric + ?Sized>(&self, metric: &M, p: &[f64]) -> f64 {
        match self {
            Self::Axis { dim, .. } => p[*dim],
            Self::Pivots { left, right } => metric.distance(p, left) - metric.distance(p, right),
        }
    }
}

struct Draft {
    begin: usize,
    count: usize,
    children: Option<(usize, usize)>,
}

/// Build a tree over `table`, reordering its physical rows.
///
/// Inputs are checked before the table is touched, so on error the table is
/// unchanged.
pub(crate) fn build<M: Metric + ?Sized>(
    table: &mut PointTable,
    metric: &M,
    options: &TreeOptions,
) -> Result<SpatialTree> {
    if table.is_empty() {
        return Err(Error::DegenerateInput("cannot index an empty table".into()));
    }
    if options.leaf_size == 0 {
        return Err(Error::DegenerateInput("leaf size must be at least 1".into()));
    }

    let mut drafts = vec![Draft {
        begin: 0,
        count: table.entry_count(),
        children: None,
    }];
    let mut stack = vec![0_usize];
    let mut forced = 0_usize;
    while let Some(idx) = stack.pop() {
        let (begin, count) = (drafts[idx].begin, drafts[idx].count);
        if count <= options.leaf_size {
            continue;
        }
        let rows = begin..begin + count;
        let split = choose_split(table, metric, options, rows.clone());
        let mut left = partition(table, rows.clone(), |p, _| split.goes_left(metric, p));
        if left == 0 || left == count {
            left = balanced_partition(table, rows.clone(), |p| split.key(metric, p));
            forced += 1;
            log::trace!("rows {rows:?}: one-sided split, forced {left}/{}", count - left);
        } else {
            log::trace!("rows {rows:?}: split {left}/{}", count - left);
        }
        let l = drafts.len();
        drafts.push(Draft {
            begin,
            count: left,
            children: None,
        });
        drafts.push(Draft {
            begin: begin + left,
            count: count - left,
            children: None,
        });
        drafts[idx].children = Some((l, l + 1));
        stack.push(l + 1);
        stack.push(l);
    }

    let bounds = compute_bounds(table, metric, options.kind, &drafts);
    let nodes: Vec<Node> = drafts
        .into_iter()
        .zip(bounds)
        .map(|(d, bound)| Node {
            bound,
            begin: d.begin,
            count: d.count,
            children: d.children.map(|(l, r)| (NodeId::new(l), NodeId::new(r))),
        })
        .collect();
    let tree = SpatialTree {
        kind: options.kind,
        leaf_size: options.leaf_size,
        nodes,
    };
    log::debug!(
        "built {:?} tree over {} points of dimension {}: {} nodes, height {}, {} forced splits",
        options.kind,
        table.entry_count(),
        table.attribute_count(),
        tree.len(),
        tree.height(),
        forced
    );
    Ok(tree)
}

fn choose_split<M: Metric + ?Sized>(
    table: &PointTable,
    metric: &M,
    options: &TreeOptions,
    rows: Range<usize>,
) -> Split {
    match options.kind {
        TreeKind::Kd => {
            let rect = HyperRect::from_points(table.attribute_count(), table.rows(rows.clone()));
            let (dim, _) = rect.widest_dimension().unwrap_or((0, 0.0));
            let value = match options.kd_split {
                KdSplit::Midpoint => rect.midpoint(dim),
                KdSplit::Median => {
                    let mut keys: Vec<(f64, usize)> = rows
                        .map(|r| (table.row(r)[dim], table.logical_id(r)))
                        .collect();
                    keys.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
                    keys[keys.len() / 2].0
                }
            };
            Split::Axis { dim, value }
        }
        TreeKind::Metric => {
            let dim = table.attribute_count();
            let mut centroid = vec![0.0; dim];
            // Running mean, finite for any finite coordinates.
            for (k, p) in table.rows(rows.clone()).enumerate() {
                let inv = 1.0 / (k + 1) as f64;
                for (c, x) in centroid.iter_mut().zip(p) {
                    *c = *c * (1.0 - inv) + x * inv;
                }
            }
            let left = farthest(table, metric, rows.clone(), &centroid).to_vec();
            let right = farthest(table, metric, rows, &left).to_vec();
            Split::Pivots { left, right }
        }
    }
}

/// The stored point in `rows` farthest from `from`, ties to the lowest
/// logical id.
fn farthest<'t, M: Metric + ?Sized>(
    table: &'t PointTable,
    metric: &M,
    rows: Range<usize>,
    from: &[f64],
) -> &'t [f64] {
    let mut best = (f64::NEG_INFINITY, usize::MAX, rows.start);
    for r in rows {
        let d = metric.distance(from, table.row(r));
        let id = table.logical_id(r);
        if d > best.0 || (d == best.0 && id < best.1) {
            best = (d, id, r);
        }
    }
    table.row(best.2)
}

/// Move rows accepted by `goes_left` to the front of `rows`; returns how many
/// there are.
fn partition(
    table: &mut PointTable,
    rows: Range<usize>,
    mut goes_left: impl FnMut(&[f64], usize) -> bool,
) -> usize {
    let (mut lo, mut hi) = (rows.start, rows.end);
    while lo < hi {
        if goes_left(table.row(lo), table.logical_id(lo)) {
            lo += 1;
        } else {
            hi -= 1;
            table.swap_rows(lo, hi);
        }
    }
    lo - rows.start
}

/// Send the first half of `rows`, ordered by `(key, logical id)`, to the front.
fn balanced_partition(
    table: &mut PointTable,
    rows: Range<usize>,
    key: impl Fn(&[f64]) -> f64,
) -> usize {
    let mut order: Vec<(f64, usize)> = rows
        .clone()
        .map(|r| (key(table.row(r)), table.logical_id(r)))
        .collect();
    order.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    let half = order.len() / 2;
    let mut left: Vec<usize> = order[..half].iter().map(|&(_, id)| id).collect();
    left.sort_unstable();
    partition(table, rows, |_, id| left.binary_search(&id).is_ok())
}

fn compute_bounds<M: Metric + ?Sized>(
    table: &PointTable,
    metric: &M,
    kind: TreeKind,
    drafts: &[Draft],
) -> Vec<Bound> {
    let dim = table.attribute_count();
    let n = drafts.len();
    let leaf_bound = |rows: Range<usize>| -> Bound {
        match kind {
            TreeKind::Kd => HyperRect::from_points(dim, table.rows(rows)).into(),
            TreeKind::Metric => Ball::from_points(metric, dim, table.rows(rows)).into(),
        }
    };
    // Filled back to front, so node `i` lands at `n - 1 - i`.
    let mut reversed: Vec<Bound> = Vec::with_capacity(n);
    for (i, d) in drafts.iter().enumerate().rev() {
        let rows = d.begin..d.begin + d.count;
        let bound = match d.children {
            None => leaf_bound(rows),
            Some((l, r)) => {
                let children = [&reversed[n - 1 - l], &reversed[n - 1 - r]];
                match Bound::enclosing(metric, children) {
                    Some(Bound::Ball(mut ball)) => {
                        for p in table.rows(rows) {
                            ball.expand_to(metric, p);
                        }
                        Bound::Ball(ball)
                    }
                    Some(rect) => rect,
                    None => leaf_bound(rows),
                }
            }
        };
        debug_assert_eq!(reversed.len(), n - 1 - i, "bounds are filled back to front");
        reversed.push(bound);
    }
    reversed.reverse();
    reversed
}
