// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree basics.
//!
//! Index six points with a k-d tree and a metric tree, then walk both.
//!
//! Run:
//! - `cargo run -p canopy_demos --example tree_basics`

use canopy_tree::{Bound, Euclidean, IndexedTable, Metric, NodeId, PointTable, TreeOptions};

fn describe(bound: &Bound) -> String {
    match bound {
        Bound::Rect(r) => format!("box {:?}..{:?}", r.min(), r.max()),
        Bound::Ball(b) => format!("ball center {:?} radius {:.3}", b.center(), b.radius()),
    }
}

fn dump<M: Metric>(indexed: &IndexedTable<M>, id: NodeId, depth: usize) {
    let tree = indexed.tree();
    let node = tree.node(id);
    let pad = "  ".repeat(depth);
    if node.is_leaf() {
        let ids: Vec<_> = indexed.iter(id).map(|p| p.id).collect();
        println!(
            "{pad}leaf {} rows {:?} ids {ids:?}: {}",
            id.get(),
            node.range(),
            describe(node.bound())
        );
    } else {
        println!(
            "{pad}node {} rows {:?}: {}",
            id.get(),
            node.range(),
            describe(node.bound())
        );
    }
    for child in [node.left(), node.right()].into_iter().flatten() {
        dump(indexed, child, depth + 1);
    }
}

fn main() -> canopy_tree::Result<()> {
    let points = [
        [0.0, 0.0],
        [0.0, 1.0],
        [1.0, 0.0],
        [1.0, 1.0],
        [5.0, 5.0],
        [5.0, 6.0],
    ];

    for options in [TreeOptions::kd(2), TreeOptions::metric(2)] {
        let table = PointTable::from_points(2, points)?;
        let indexed = IndexedTable::build(table, Euclidean::default(), options)?;
        println!(
            "{:?} tree: {} nodes, height {}",
            options.kind,
            indexed.tree().len(),
            indexed.tree().height()
        );
        dump(&indexed, indexed.tree().root(), 1);

        // Logical ids survive the physical reorder.
        for (id, expected) in points.iter().enumerate() {
            assert_eq!(indexed.get(id)?.0, expected);
        }

        // The explicit cursor protocol, restarted once.
        let mut it = indexed.iter(indexed.tree().root());
        let mut seen = 0;
        while it.has_next() {
            it.next_point()?;
            seen += 1;
        }
        it.reset();
        println!("  root yields {seen} points, {} again after reset\n", it.count());
    }
    Ok(())
}
