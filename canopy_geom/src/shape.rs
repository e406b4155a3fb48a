// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kurbo adapter for two-dimensional bounds.
//!
//! Useful for drawing a 2D tree's partition for inspection. Balls are drawn as
//! Euclidean circles regardless of the metric that built them.

use kurbo::{BezPath, Circle, Rect, Shape};

use crate::ball::Ball;
use crate::bound::Bound;
use crate::rect::HyperRect;

/// A 2D bound as a Kurbo shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape2D {
    /// From a [`HyperRect`].
    Rect(Rect),
    /// From a [`Ball`].
    Circle(Circle),
}

impl Shape2D {
    /// Convert a bound. Returns `None` unless it is non-empty and two-dimensional.
    pub fn from_bound(bound: &Bound) -> Option<Self> {
        match bound {
            Bound::Rect(r) => rect_to_kurbo(r).map(Self::Rect),
            Bound::Ball(b) => ball_to_kurbo(b).map(Self::Circle),
        }
    }

    /// Flatten to a path with the given tolerance.
    pub fn to_path(&self, tolerance: f64) -> BezPath {
        match self {
            Self::Rect(r) => r.to_path(tolerance),
            Self::Circle(c) => c.to_path(tolerance),
        }
    }

    /// SVG path data (the `d` attribute).
    pub fn to_svg(&self, tolerance: f64) -> String {
        self.to_path(tolerance).to_svg()
    }
}

/// A 2D box as a [`kurbo::Rect`].
pub fn rect_to_kurbo(rect: &HyperRect) -> Option<Rect> {
    if rect.dim() != 2 || rect.is_empty() {
        return None;
    }
    let (min, max) = (rect.min(), rect.max());
    Some(Rect::new(min[0], min[1], max[0], max[1]))
}

/// A 2D ball as a [`kurbo::Circle`].
pub fn ball_to_kurbo(ball: &Ball) -> Option<Circle> {
    if ball.dim() != 2 || ball.is_empty() {
        return None;
    }
    let c = ball.center();
    Some(Circle::new((c[0], c[1]), ball.radius()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_two_dimensional_bounds_convert() {
        let flat = Bound::Rect(HyperRect::new(vec![0.0, 1.0], vec![2.0, 3.0]));
        assert_eq!(
            Shape2D::from_bound(&flat),
            Some(Shape2D::Rect(Rect::new(0.0, 1.0, 2.0, 3.0)))
        );
        let cube = Bound::Rect(HyperRect::new(vec![0.0; 3], vec![1.0; 3]));
        assert!(Shape2D::from_bound(&cube).is_none());
        assert!(Shape2D::from_bound(&Bound::Ball(Ball::empty(2))).is_none());
    }

    #[test]
    fn circles_render_to_svg() {
        let disc = Shape2D::from_bound(&Bound::Ball(Ball::new(vec![1.0, 1.0], 0.5))).unwrap();
        assert!(disc.to_svg(0.1).starts_with('M'));
    }
}
