// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Metric balls: a center point and a radius under some [`Metric`].

use core::f64::consts::TAU;

use rand::Rng;

use crate::metric::Metric;

/// Closed ball `{ p : distance(center, p) <= radius }`.
///
/// A ball does not remember its metric. Every operation that measures distance
/// takes the metric explicitly, and callers must use the same metric that built
/// the ball for containment answers to be meaningful.
///
/// A negative radius marks an empty ball, see [`Ball::empty`].
#[derive(Clone, Debug, PartialEq)]
pub struct Ball {
    center: Vec<f64>,
    radius: f64,
}

impl Ball {
    /// Create a ball from its center and radius.
    pub fn new(center: Vec<f64>, radius: f64) -> Self {
        Self { center, radius }
    }

    /// The empty ball in `dim` dimensions. Contains nothing.
    pub fn empty(dim: usize) -> Self {
        Self {
            center: vec![0.0; dim],
            radius: f64::NEG_INFINITY,
        }
    }

    /// Ball centered on the centroid of `points` with the smallest radius that
    /// covers all of them under `metric`. Empty if `points` yields nothing.
    ///
    /// The centroid is finite for any finite points. The radius is only as
    /// finite as the metric's distances; a norm that overflows yields an
    /// infinite radius, which still covers every point.
    pub fn from_points<'a, M, I>(metric: &M, dim: usize, points: I) -> Self
    where
        M: Metric + ?Sized,
        I: IntoIterator<Item = &'a [f64]>,
        I::IntoIter: Clone,
    {
        let points = points.into_iter();
        let mut center = vec![0.0; dim];
        let mut count = 0_usize;
        for p in points.clone() {
            count += 1;
            // Running mean, finite for any finite coordinates.
            let inv = 1.0 / count as f64;
            for (c, x) in center.iter_mut().zip(p) {
                *c = *c * (1.0 - inv) + x * inv;
            }
        }
        if count == 0 {
            return Self::empty(dim);
        }
        let radius = points
            .map(|p| metric.distance(&center, p))
            .fold(0.0, f64::max);
        Self { center, radius }
    }

    /// Dimensionality.
    pub fn dim(&self) -> usize {
        self.center.len()
    }

    /// Center point.
    pub fn center(&self) -> &[f64] {
        &self.center
    }

    /// Radius. Negative for an empty ball.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Whether the ball contains no point.
    pub fn is_empty(&self) -> bool {
        self.radius < 0.0
    }

    /// Whether `point` lies inside the ball under `metric` (boundary included).
    pub fn contains<M: Metric + ?Sized>(&self, metric: &M, point: &[f64]) -> bool {
        metric.distance(&self.center, point) <= self.radius
    }

    /// Grow the radius until `point` is contained. An empty ball becomes the
    /// zero-radius ball at `point`.
    pub fn expand_to<M: Metric + ?Sized>(&mut self, metric: &M, point: &[f64]) {
        if self.is_empty() {
            self.center.clear();
            self.center.extend_from_slice(point);
            self.radius = 0.0;
            return;
        }
        self.radius = self.radius.max(metric.distance(&self.center, point));
    }

    /// A ball containing both `self` and `other` under `metric`.
    ///
    /// If one ball already contains the other, that ball is returned unchanged.
    /// Otherwise the center is placed on the segment between the two centers
    /// where the minimal Euclidean enclosing ball would put it, and the radius
    /// is `max(d(c, c_i) + r_i)`. Under `L2` this is the minimal enclosing
    /// ball; under any other metric the triangle inequality still guarantees
    /// containment of both inputs.
    pub fn enclosing<M: Metric + ?Sized>(&self, metric: &M, other: &Self) -> Self {
        debug_assert_eq!(self.dim(), other.dim(), "balls must share a dimensionality");
        let d = metric.distance(&self.center, &other.center);
        if other.is_empty() || d + other.radius <= self.radius {
            return self.clone();
        }
        if self.is_empty() || d + self.radius <= other.radius {
            return other.clone();
        }
        // Neither contains the other, so d > |r_a - r_b| >= 0 and 0 < t < 1.
        let r = 0.5 * (d + self.radius + other.radius);
        let t = (r - self.radius) / d;
        let center: Vec<f64> = self
            .center
            .iter()
            .zip(&other.center)
            .map(|(a, b)| a + t * (b - a))
            .collect();
        let radius = (metric.distance(&center, &self.center) + self.radius)
            .max(metric.distance(&center, &other.center) + other.radius);
        Self { center, radius }
    }

    /// Sample a point inside the ball.
    ///
    /// The sample is drawn uniformly from the Euclidean ball with the same
    /// center and radius (Gaussian direction, radial scale `u^(1/D)`). If
    /// `metric` does not contain it (a non-Euclidean metric, or rounding at the
    /// rim) the offset from the center is scaled by `radius / distance` once and
    /// then halved until it is. The returned point always satisfies
    /// [`Ball::contains`] for the same `metric`.
    ///
    /// # Panics
    ///
    /// Panics if the ball is empty.
    pub fn random_point_inside<M, R>(&self, metric: &M, rng: &mut R) -> Vec<f64>
    where
        M: Metric + ?Sized,
        R: Rng + ?Sized,
    {
        assert!(!self.is_empty(), "cannot sample inside an empty ball");
        let dim = self.dim();
        if dim == 0 {
            return Vec::new();
        }

        let mut offset: Vec<f64> = (0..dim).map(|_| standard_normal(rng)).collect();
        let mut norm = offset.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm == 0.0 {
            offset[0] = 1.0;
            norm = 1.0;
        }
        let scale = self.radius * rng.r#gen::<f64>().powf(1.0 / dim as f64) / norm;
        for o in &mut offset {
            *o *= scale;
        }

        let mut factor = 1.0;
        let mut first = true;
        loop {
            let point: Vec<f64> = self
                .center
                .iter()
                .zip(&offset)
                .map(|(c, o)| c + o * factor)
                .collect();
            let d = metric.distance(&self.center, &point);
            if d <= self.radius {
                return point;
            }
            // `factor` reaches zero after finitely many halvings, and the
            // center itself is always contained.
            factor *= if first { self.radius / d } else { 0.5 };
            first = false;
        }
    }
}

/// One standard normal deviate via the Box-Muller transform.
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // `1 - u` maps [0, 1) to (0, 1], keeping the logarithm finite.
    let u1 = 1.0 - rng.r#gen::<f64>();
    let u2 = rng.r#gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}
