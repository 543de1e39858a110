//! Geometric primitives shared by the joint angle functions.
use nalgebra as na;

use crate::skeleton::Joint3D;

/// Offset added to a denominator that may be exactly zero.
pub const DENOMINATOR_EPSILON: f64 = 0.0001;

/// Euclidean distance between two joints.
#[must_use]
pub fn distance(a: &Joint3D, b: &Joint3D) -> f64 {
    na::distance(&a.point(), &b.point())
}

/// Two-argument arctangent of `dy / dx`, in degrees.
#[inline]
#[must_use]
pub fn angle2(dy: f64, dx: f64) -> f64 {
    dy.atan2(dx).to_degrees()
}

/// Replaces NaN and infinite results with `0.0`.
///
/// A degenerate configuration only zeroes the affected joint, the rest of the frame is kept.
#[inline]
pub(crate) fn finite_or_zero(degrees: f64) -> f64 {
    if degrees.is_finite() {
        degrees
    } else {
        tracing::trace!(degrees, "degenerate joint angle replaced by zero");
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_3_4_12() {
        let a = Joint3D::new(1.0, 1.0, 1.0);
        let b = Joint3D::new(4.0, 5.0, 13.0);

        assert_eq!(distance(&a, &b), 13.0);
        assert_eq!(distance(&b, &a), 13.0);
        assert_eq!(distance(&a, &a), 0.0);
    }

    #[test]
    fn angle2_quadrants() {
        assert_eq!(angle2(0.0, 1.0), 0.0);
        assert_eq!(angle2(1.0, 0.0), 90.0);
        assert_eq!(angle2(-1.0, 0.0), -90.0);
        assert_eq!(angle2(0.0, -1.0), 180.0);
        assert!((angle2(1.0, 1.0) - 45.0).abs() < 1e-12);
        assert!((angle2(-1.0, -1.0) + 135.0).abs() < 1e-12);
    }

    #[test]
    fn non_finite_becomes_zero() {
        assert_eq!(finite_or_zero(12.5), 12.5);
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::NEG_INFINITY), 0.0);
    }
}
