// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Distance metrics over dense `f64` points.

use core::fmt::Debug;

/// A distance function over points of equal dimensionality.
///
/// Implementations must be non-negative and symmetric, and must satisfy the
/// triangle inequality: metric trees and [`Ball`](crate::Ball) enclosure rely on
/// it to keep child volumes inside their parents.
///
/// Both slices are expected to have the same length. Implementations may
/// debug-assert this.
pub trait Metric: Debug {
    /// Distance between `a` and `b`.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;
}

impl<M: Metric + ?Sized> Metric for &M {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        (**self).distance(a, b)
    }
}

/// The Minkowski `L_P` metric, `(sum |a_i - b_i|^P)^(1/P)`.
///
/// `P` must be at least `1`; smaller values do not produce a metric and are
/// rejected at compile time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LMetric<const P: u32>;

/// `L1`, the taxicab metric.
pub type Manhattan = LMetric<1>;

/// `L2`, the Euclidean metric.
pub type Euclidean = LMetric<2>;

impl<const P: u32> Metric for LMetric<P> {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        const { assert!(P >= 1, "LMetric requires P >= 1") };
        debug_assert_eq!(a.len(), b.len(), "points must share a dimensionality");
        let diffs = a.iter().zip(b).map(|(x, y)| (x - y).abs());
        match P {
            1 => diffs.sum(),
            2 => diffs.map(|d| d * d).sum::<f64>().sqrt(),
            _ => {
                let p = i32::try_from(P).unwrap_or(i32::MAX);
                diffs
                    .map(|d| d.powi(p))
                    .sum::<f64>()
                    .powf(1.0 / f64::from(P))
            }
        }
    }
}

/// `L_inf`, the maximum per-dimension difference.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Chebyshev;

impl Metric for Chebyshev {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len(), "points must share a dimensionality");
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn euclidean_three_four_five() {
        assert_relative_eq!(Euclidean::default().distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
    }

    #[test]
    fn manhattan_and_chebyshev() {
        let a = [1.0, -2.0, 3.0];
        let b = [4.0, 2.0, 3.0];
        assert_relative_eq!(Manhattan::default().distance(&a, &b), 7.0);
        assert_relative_eq!(Chebyshev.distance(&a, &b), 4.0);
    }

    #[test]
    fn higher_p_sits_between_l2_and_linf() {
        let a = [0.0, 0.0, 0.0];
        let b = [1.0, 2.0, 2.0];
        let l3 = LMetric::<3>.distance(&a, &b);
        assert!(l3 < Euclidean::default().distance(&a, &b));
        assert!(l3 > Chebyshev.distance(&a, &b));
        assert_relative_eq!(l3, 17.0_f64.powf(1.0 / 3.0), epsilon = 1e-12);
    }

    #[test]
    fn symmetric_and_zero_on_identity() {
        let a = [0.25, 7.5];
        let b = [-3.0, 1.0];
        let m = Euclidean::default();
        assert_eq!(m.distance(&a, &b), m.distance(&b, &a));
        assert_eq!(m.distance(&a, &a), 0.0);
    }

    #[test]
    fn references_are_metrics() {
        fn far<M: Metric>(m: M) -> f64 {
            m.distance(&[0.0], &[2.0])
        }
        let m = Euclidean::default();
        assert_relative_eq!(far(&m), 2.0);
    }
}
