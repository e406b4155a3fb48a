// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed set of bounding volumes a tree node can carry.

use rand::Rng;

use crate::ball::Ball;
use crate::metric::Metric;
use crate::rect::HyperRect;

/// A bounding volume: either an axis-aligned box or a metric ball.
///
/// Boxes ignore the metric passed to [`Bound::contains`] and
/// [`Bound::random_point_inside`]; balls measure with it.
#[derive(Clone, Debug, PartialEq)]
pub enum Bound {
    /// Axis-aligned box, produced by k-d trees.
    Rect(HyperRect),
    /// Metric ball, produced by metric trees.
    Ball(Ball),
}

impl Bound {
    /// Dimensionality.
    pub fn dim(&self) -> usize {
        match self {
            Self::Rect(r) => r.dim(),
            Self::Ball(b) => b.dim(),
        }
    }

    /// Whether the volume contains no point.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Rect(r) => r.is_empty(),
            Self::Ball(b) => b.is_empty(),
        }
    }

    /// Whether `point` lies inside the volume.
    pub fn contains<M: Metric + ?Sized>(&self, metric: &M, point: &[f64]) -> bool {
        match self {
            Self::Rect(r) => r.contains(point),
            Self::Ball(b) => b.contains(metric, point),
        }
    }

    /// Sample a point that [`Bound::contains`] accepts under the same `metric`.
    ///
    /// Boxes sample uniformly; see [`Ball::random_point_inside`] for balls.
    ///
    /// # Panics
    ///
    /// Panics if the volume is empty.
    pub fn random_point_inside<M, R>(&self, metric: &M, rng: &mut R) -> Vec<f64>
    where
        M: Metric + ?Sized,
        R: Rng + ?Sized,
    {
        match self {
            Self::Rect(r) => r.random_point_inside(rng),
            Self::Ball(b) => b.random_point_inside(metric, rng),
        }
    }

    /// A volume enclosing every volume in `bounds`.
    ///
    /// Returns `None` when `bounds` is empty or mixes boxes and balls.
    pub fn enclosing<'a, M, I>(metric: &M, bounds: I) -> Option<Self>
    where
        M: Metric + ?Sized,
        I: IntoIterator<Item = &'a Self>,
    {
        let mut it = bounds.into_iter();
        let mut acc = it.next()?.clone();
        for b in it {
            acc = match (acc, b) {
                (Self::Rect(a), Self::Rect(b)) => Self::Rect(a.union(b)),
                (Self::Ball(a), Self::Ball(b)) => Self::Ball(a.enclosing(metric, b)),
                _ => return None,
            };
        }
        Some(acc)
    }

    /// The box, if this is one.
    pub fn as_rect(&self) -> Option<&HyperRect> {
        match self {
            Self::Rect(r) => Some(r),
            Self::Ball(_) => None,
        }
    }

    /// The ball, if this is one.
    pub fn as_ball(&self) -> Option<&Ball> {
        match self {
            Self::Ball(b) => Some(b),
            Self::Rect(_) => None,
        }
    }
}

impl From<HyperRect> for Bound {
    fn from(r: HyperRect) -> Self {
        Self::Rect(r)
    }
}

impl From<Ball> for Bound {
    fn from(b: Ball) -> Self {
        Self::Ball(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Euclidean;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn enclosing_rects_is_union() {
        let m = Euclidean::default();
        let a = Bound::from(HyperRect::new(vec![0.0, 0.0], vec![1.0, 1.0]));
        let b = Bound::from(HyperRect::new(vec![5.0, 5.0], vec![5.0, 6.0]));
        let e = Bound::enclosing(&m, [&a, &b]).unwrap();
        assert_eq!(e, Bound::Rect(HyperRect::new(vec![0.0, 0.0], vec![5.0, 6.0])));
    }

    #[test]
    fn enclosing_rejects_mixed_and_empty_input() {
        let m = Euclidean::default();
        let a = Bound::from(HyperRect::new(vec![0.0], vec![1.0]));
        let b = Bound::from(Ball::new(vec![0.0], 1.0));
        assert!(Bound::enclosing(&m, [&a, &b]).is_none());
        assert!(Bound::enclosing(&m, core::iter::empty::<&Bound>()).is_none());
    }

    #[test]
    fn sampling_and_containment_agree() {
        let m = Euclidean::default();
        let mut rng = StdRng::seed_from_u64(42);
        let bounds = [
            Bound::from(HyperRect::new(vec![0.0, -1.0, 2.0], vec![1.0, 1.0, 2.5])),
            Bound::from(Ball::new(vec![0.0, -1.0, 2.0], 0.3)),
        ];
        for b in &bounds {
            for _ in 0..1000 {
                let p = b.random_point_inside(&m, &mut rng);
                assert!(b.contains(&m, &p));
            }
        }
    }

    #[test]
    fn accessors_match_variant() {
        let r = Bound::from(HyperRect::empty(2));
        assert!(r.as_rect().is_some() && r.as_ball().is_none());
        assert!(r.is_empty());
        assert_eq!(r.dim(), 2);
    }
}
