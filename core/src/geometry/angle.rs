//! Oriented angles.

use super::utils_2d::{cross_2d, sin_between};
use super::{GeometryError, GeometryResult, Point2, Vector2};
use crate::tolerance::Tolerance;
use std::f64::consts::TAU;

/// Fold an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let folded = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if folded >= TAU {
        0.0
    } else {
        folded
    }
}

/// Signed angle from `v1` to `v2` in `(-π, π]`, positive counter-clockwise.
pub fn signed_angle(v1: &Vector2, v2: &Vector2) -> f64 {
    cross_2d(v1, v2).atan2(v1.dot(v2))
}

/// Counter-clockwise angle swept from the arm `center -> start` to the arm
/// `center -> end`, in `[0, 2π)`.
///
/// Fails when either arm has zero length. Arms along the same ray, of any
/// lengths, give an angle of zero.
pub fn angle_3p_countclockwise(start: &Point2, center: &Point2, end: &Point2, tol: &Tolerance) -> GeometryResult<f64> {
    if tol.close_points(start, center) || tol.close_points(end, center) {
        return Err(GeometryError::Degenerate("zero-length angle arm"));
    }
    let (u, v) = (start - center, end - center);
    if tol.is_zero(sin_between(&u, &v)) && u.dot(&v) > 0.0 {
        return Ok(0.0);
    }
    Ok(normalize_angle(signed_angle(&u, &v)))
}
