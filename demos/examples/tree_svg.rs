// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw the bounds of a 2D tree as SVG.
//!
//! Builds a k-d tree and a metric tree over the same random points and writes
//! one SVG per tree with every node's bound and every point.
//!
//! Run:
//! - `cargo run -p canopy_demos --example tree_svg -- [out_dir]`

use std::fmt::Write as _;
use std::path::PathBuf;

use canopy_geom::shape::Shape2D;
use canopy_tree::{Euclidean, IndexedTable, RandomDataset, TreeOptions};
use kurbo::Shape;
use rand::SeedableRng;
use rand::rngs::StdRng;

const SCALE: f64 = 500.0;

fn render(indexed: &IndexedTable) -> String {
    let tree = indexed.tree();
    let view = Shape2D::from_bound(tree.bound(tree.root()))
        .map(|s| match s {
            Shape2D::Rect(r) => r,
            Shape2D::Circle(c) => c.bounding_box(),
        })
        .unwrap_or_default()
        .inflate(0.02, 0.02);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}" height="{}">"#,
        view.x0,
        view.y0,
        view.width(),
        view.height(),
        SCALE,
        SCALE * view.height() / view.width().max(f64::EPSILON),
    );
    // Parents precede children in the arena.
    let mut depth = vec![0_usize; tree.len()];
    let height = tree.height().max(1);
    for (id, node) in tree.nodes() {
        for child in [node.left(), node.right()].into_iter().flatten() {
            depth[child.get()] = depth[id.get()] + 1;
        }
        let Some(shape) = Shape2D::from_bound(node.bound()) else {
            continue;
        };
        // Deeper nodes are drawn lighter.
        let opacity = 1.0 - 0.8 * depth[id.get()] as f64 / height as f64;
        let _ = writeln!(
            svg,
            r#"  <path d="{}" fill="none" stroke="steelblue" stroke-width="0.003" stroke-opacity="{opacity:.2}"/>"#,
            shape.to_svg(1e-4)
        );
    }
    for (_, p, _) in indexed.table().iter() {
        let _ = writeln!(
            svg,
            r#"  <circle cx="{}" cy="{}" r="0.004" fill="crimson"/>"#,
            p[0], p[1]
        );
    }
    svg.push_str("</svg>\n");
    svg
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = std::env::args()
        .nth(1)
        .map_or_else(std::env::temp_dir, PathBuf::from);
    let mut rng = StdRng::seed_from_u64(7);
    let table = RandomDataset::new(2, 400).generate(&mut rng)?;

    for (name, options) in [("kd", TreeOptions::kd(12)), ("metric", TreeOptions::metric(12))] {
        let indexed = IndexedTable::build(table.clone(), Euclidean::default(), options)?;
        let path = out_dir.join(format!("canopy_{name}.svg"));
        std::fs::write(&path, render(&indexed))?;
        println!(
            "{name}: {} nodes, height {} -> {}",
            indexed.tree().len(),
            indexed.tree().height(),
            path.display()
        );
    }
    Ok(())
}
