// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Geom: N-dimensional bounding volumes and distance metrics.
//!
//! Canopy Geom is the geometric layer under `canopy_tree`. It knows nothing about
//! tables or trees.
//!
//! - [`Metric`]: a pluggable distance function. [`LMetric`] covers the Minkowski
//!   family ([`Manhattan`], [`Euclidean`]), and [`Chebyshev`] covers `L_inf`.
//! - [`HyperRect`]: axis-aligned box with per-dimension `[min, max]`.
//! - [`Ball`]: center and radius under a caller-supplied metric.
//! - [`Bound`]: the closed set of the two, with containment, sampling and
//!   enclosure dispatched on the variant.
//!
//! Points are plain `&[f64]` slices. Coordinates are assumed finite (no NaNs).
//!
//! # Example
//!
//! ```rust
//! use canopy_geom::{Ball, Bound, Euclidean, HyperRect};
//! use rand::SeedableRng;
//!
//! let metric = Euclidean::default();
//! let points: [&[f64]; 3] = [&[0.0, 0.0], &[4.0, 0.0], &[2.0, 1.0]];
//!
//! let rect = Bound::from(HyperRect::from_points(2, points));
//! let ball = Bound::from(Ball::from_points(&metric, 2, points));
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! for bound in [&rect, &ball] {
//!     for p in points {
//!         assert!(bound.contains(&metric, p));
//!     }
//!     let sample = bound.random_point_inside(&metric, &mut rng);
//!     assert!(bound.contains(&metric, &sample));
//! }
//! ```
//!
//! ## Features
//!
//! - `kurbo`: [`shape`] converts two-dimensional bounds into Kurbo shapes and
//!   SVG path data.

pub mod ball;
pub mod bound;
pub mod metric;
pub mod rect;
#[cfg(feature = "kurbo")]
pub mod shape;

pub use ball::Ball;
pub use bound::Bound;
pub use metric::{Chebyshev, Euclidean, LMetric, Manhattan, Metric};
pub use rect::HyperRect;
