// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural checks for a built [`IndexedTable`].
//!
//! [`validate`] re-derives the guarantees construction is supposed to give and
//! reports the first one that does not hold. It is meant for tests and stress
//! runs; every check is linear or `n log n` in the table size per tree level.

use canopy_geom::Metric;
use rand::Rng;

use crate::error::Result;
use crate::indexed::IndexedTable;
use crate::table::PointTable;
use crate::tree::NodeId;

bitflags::bitflags! {
    /// Which properties [`validate`] checks.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Checks: u8 {
        /// Every logical id still maps to the reference point and weight.
        const LOGICAL_IDS = 0b0000_0001;
        /// Every stored point lies in the bound of every node above it.
        const CONTAINMENT = 0b0000_0010;
        /// Points sampled inside each bound are contained by it.
        const SAMPLING    = 0b0000_0100;
        /// Each internal node's children together hold exactly its points.
        const COVERAGE    = 0b0000_1000;
        /// Leaves are non-empty and within the leaf size.
        const LEAF_SIZE   = 0b0001_0000;
    }
}

impl Default for Checks {
    fn default() -> Self {
        Self::all()
    }
}

/// A broken tree or table invariant.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Violation {
    /// The indexed table and the reference hold different numbers of points.
    #[error("indexed table has {found} points, reference has {expected}")]
    EntryCount {
        /// Reference size.
        expected: usize,
        /// Indexed size.
        found: usize,
    },
    /// A logical id maps to a different point or weight than in the reference.
    #[error("logical id {id} no longer matches the reference")]
    LogicalId {
        /// Offending id.
        id: usize,
    },
    /// A stored point is outside the bound of a node that holds it.
    #[error("point {id} lies outside the bound of node {}", .node.get())]
    PointOutside {
        /// Node whose bound is too small.
        node: NodeId,
        /// Logical id of the point.
        id: usize,
    },
    /// A point sampled from a bound is not contained by it.
    #[error("sample {point:?} drawn from node {} is outside its bound", .node.get())]
    SampleOutside {
        /// Node whose bound was sampled.
        node: NodeId,
        /// The sample.
        point: Vec<f64>,
    },
    /// A node's children do not hold exactly its points, or the root does
    /// not hold every point exactly once.
    #[error("children of node {} do not partition its points", .node.get())]
    Coverage {
        /// Parent node.
        node: NodeId,
    },
    /// A leaf is empty or over the leaf size, or an internal node has an
    /// empty child.
    #[error("node {} holds {count} points (leaf size {limit})", .node.get())]
    LeafSize {
        /// Offending node.
        node: NodeId,
        /// Points stored under it.
        count: usize,
        /// Configured leaf size.
        limit: usize,
    },
}

/// Check `indexed` against `reference`, the table as it was before indexing.
///
/// Runs the checks selected by `checks`, drawing `samples` points per node
/// from `rng` for [`Checks::SAMPLING`]. Returns the first violation found.
pub fn validate<M: Metric, R: Rng + ?Sized>(
    indexed: &IndexedTable<M>,
    reference: &PointTable,
    checks: Checks,
    samples: usize,
    rng: &mut R,
) -> Result<(), Violation> {
    let table = indexed.table();
    let tree = indexed.tree();
    let metric = indexed.metric();

    if checks.contains(Checks::LOGICAL_IDS) {
        if table.entry_count() != reference.entry_count() {
            return Err(Violation::EntryCount {
                expected: reference.entry_count(),
                found: table.entry_count(),
            });
        }
        for ((id, p, w), (_, q, v)) in table.iter().zip(reference.iter()) {
            if p != q || w.to_bits() != v.to_bits() {
                return Err(Violation::LogicalId { id });
            }
        }
    }

    if checks.contains(Checks::COVERAGE) {
        let mut all: Vec<usize> = indexed.iter(tree.root()).map(|p| p.id).collect();
        all.sort_unstable();
        if !all.iter().copied().eq(0..table.entry_count()) {
            return Err(Violation::Coverage { node: tree.root() });
        }
    }

    for (id, node) in tree.nodes() {
        if checks.contains(Checks::LEAF_SIZE) {
            let limit = tree.leaf_size();
            if node.is_leaf() && !(1..=limit).contains(&node.count()) {
                return Err(Violation::LeafSize {
                    node: id,
                    count: node.count(),
                    limit,
                });
            }
            for child in [node.left(), node.right()].into_iter().flatten() {
                if tree.node(child).count() == 0 {
                    return Err(Violation::LeafSize {
                        node: child,
                        count: 0,
                        limit,
                    });
                }
            }
        }

        if checks.contains(Checks::CONTAINMENT) {
            for p in indexed.iter(id) {
                if !node.bound().contains(metric, p.point) {
                    return Err(Violation::PointOutside { node: id, id: p.id });
                }
            }
        }

        if checks.contains(Checks::SAMPLING) && !node.bound().is_empty() {
            for _ in 0..samples {
                let point = node.bound().random_point_inside(metric, rng);
                if !node.bound().contains(metric, &point) {
                    return Err(Violation::SampleOutside { node: id, point });
                }
            }
        }

        if checks.contains(Checks::COVERAGE)
            && let (Some(l), Some(r)) = (node.left(), node.right())
        {
            let mut parent: Vec<usize> = indexed.iter(id).map(|p| p.id).collect();
            let mut children: Vec<usize> = indexed
                .iter(l)
                .chain(indexed.iter(r))
                .map(|p| p.id)
                .collect();
            parent.sort_unstable();
            children.sort_unstable();
            if parent != children {
                return Err(Violation::Coverage { node: id });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RandomDataset, TreeKind, TreeOptions};
    use canopy_geom::{Chebyshev, Euclidean, Manhattan};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn built_trees_pass_every_check() {
        let mut rng = StdRng::seed_from_u64(2025);
        for round in 0..20 {
            let dim = rng.gen_range(1..=8);
            let count = rng.gen_range(1..=400);
            let leaf = rng.gen_range(1..=32);
            let reference = RandomDataset::new(dim, count).generate(&mut rng).unwrap();
            for kind in [TreeKind::Kd, TreeKind::Metric] {
                let options = TreeOptions {
                    kind,
                    leaf_size: leaf,
                    ..TreeOptions::default()
                };
                let indexed =
                    IndexedTable::build(reference.clone(), Euclidean::default(), options).unwrap();
                let result = validate(&indexed, &reference, Checks::all(), 4, &mut rng);
                assert_eq!(result, Ok(()), "round {round}, {kind:?}, d={dim} n={count} L={leaf}");
            }
        }
    }

    #[test]
    fn non_euclidean_metric_trees_pass() {
        let mut rng = StdRng::seed_from_u64(9);
        let reference = RandomDataset::new(5, 250).generate(&mut rng).unwrap();
        let a = IndexedTable::build(reference.clone(), Manhattan::default(), TreeOptions::metric(7))
            .unwrap();
        assert_eq!(validate(&a, &reference, Checks::all(), 8, &mut rng), Ok(()));
        let b = IndexedTable::build(reference.clone(), Chebyshev, TreeOptions::metric(7)).unwrap();
        assert_eq!(validate(&b, &reference, Checks::all(), 8, &mut rng), Ok(()));
    }

    #[test]
    fn edited_reference_is_reported() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut reference = RandomDataset::new(2, 50).generate(&mut rng).unwrap();
        let indexed =
            IndexedTable::build(reference.clone(), Euclidean::default(), TreeOptions::kd(4))
                .unwrap();
        reference.set(17, &[0.5, 0.5], 1.0).unwrap();
        assert_eq!(
            validate(&indexed, &reference, Checks::LOGICAL_IDS, 0, &mut rng),
            Err(Violation::LogicalId { id: 17 })
        );
        // Other checks do not look at the reference.
        assert_eq!(
            validate(&indexed, &reference, Checks::all() - Checks::LOGICAL_IDS, 2, &mut rng),
            Ok(())
        );
    }

    #[test]
    fn tree_paired_with_a_foreign_table_is_reported() {
        let mut rng = StdRng::seed_from_u64(5);
        let reference = RandomDataset::new(3, 100).generate(&mut rng).unwrap();
        let built =
            IndexedTable::build(reference.clone(), Euclidean::default(), TreeOptions::kd(5))
                .unwrap();
        let foreign = RandomDataset::new(3, 100)
            .with_coords(2.0..3.0)
            .generate(&mut rng)
            .unwrap();
        let tampered =
            IndexedTable::from_parts(foreign.clone(), built.tree().clone(), Euclidean::default());
        let result = validate(&tampered, &foreign, Checks::CONTAINMENT, 0, &mut rng);
        assert!(
            matches!(result, Err(Violation::PointOutside { node, .. }) if node == NodeId::ROOT),
            "{result:?}"
        );
    }

    #[test]
    fn leaf_size_is_checked_against_the_tree() {
        let mut rng = StdRng::seed_from_u64(6);
        let reference = RandomDataset::new(2, 40).generate(&mut rng).unwrap();
        let small = IndexedTable::build(reference.clone(), Euclidean::default(), TreeOptions::kd(3))
            .unwrap();
        let mut tree = small.tree().clone();
        tree.leaf_size = 1;
        let tampered = IndexedTable::from_parts(small.into_table(), tree, Euclidean::default());
        assert!(matches!(
            validate(&tampered, &reference, Checks::LEAF_SIZE, 0, &mut rng),
            Err(Violation::LeafSize { limit: 1, .. })
        ));
    }

    #[test]
    fn kd_trees_over_the_whole_f64_range_pass() {
        let mut rng = StdRng::seed_from_u64(9);
        let reference = PointTable::from_points(1, [[-f64::MAX], [f64::MAX], [0.0], [1.0]]).unwrap();
        let indexed =
            IndexedTable::build(reference.clone(), Euclidean::default(), TreeOptions::kd(1))
                .unwrap();
        assert_eq!(indexed.tree().leaves().count(), 4);
        assert_eq!(
            validate(&indexed, &reference, Checks::all(), 16, &mut rng),
            Ok(())
        );
    }

    #[test]
    fn violations_read_well() {
        let v = Violation::LeafSize {
            node: NodeId::new(4),
            count: 9,
            limit: 8,
        };
        assert_eq!(v.to_string(), "node 4 holds 9 points (leaf size 8)");
    }
}
