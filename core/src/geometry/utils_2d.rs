//! Point and vector formulas shared by every construction.
//!
//! Functions that can hit a degenerate configuration (zero-length direction,
//! coincident points) return [`GeometryResult`]; the rest are total.

use super::{GeometryError, GeometryResult, Point2, Vector2};
use crate::tolerance::Tolerance;
use nalgebra::Rotation2;

// =============================================================================
// Point Operations
// =============================================================================

/// Linear interpolation `a + t * (b - a)`.
#[inline]
pub fn lerp(a: &Point2, b: &Point2, t: f64) -> Point2 {
    a + (b - a) * t
}

#[inline]
pub fn midpoint(a: &Point2, b: &Point2) -> Point2 {
    nalgebra::center(a, b)
}

/// Central symmetry: the image of `p` under a half-turn about `center`.
#[inline]
pub fn reflect_across_point(p: &Point2, center: &Point2) -> Point2 {
    center + (center - p)
}

/// Rotate `p` counter-clockwise about `center` by `angle` radians.
pub fn rotate_about(p: &Point2, center: &Point2, angle: f64) -> Point2 {
    center + Rotation2::new(angle) * (p - center)
}

// =============================================================================
// Vector Operations
// =============================================================================

/// 2D cross product (z-component of the 3D cross product).
/// Positive if `v2` is counter-clockwise from `v1`.
#[inline]
pub fn cross_2d(v1: &Vector2, v2: &Vector2) -> f64 {
    v1.x * v2.y - v1.y * v2.x
}

/// Perpendicular vector (90° counter-clockwise rotation).
#[inline]
pub fn perpendicular_ccw(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// Unit vector along `v`; fails on a zero-length vector.
pub fn unit_vector(v: &Vector2, tol: &Tolerance) -> GeometryResult<Vector2> {
    let norm = v.norm();
    if tol.is_zero(norm) || !norm.is_finite() {
        return Err(GeometryError::Degenerate("zero-length vector"));
    }
    Ok(v / norm)
}

/// Unit direction from `from` towards `to`.
pub fn direction(from: &Point2, to: &Point2, tol: &Tolerance) -> GeometryResult<Vector2> {
    unit_vector(&(to - from), tol)
}

/// Sine of the angle between two non-zero vectors. Used to classify
/// parallelism independently of the vectors' lengths.
pub fn sin_between(v1: &Vector2, v2: &Vector2) -> f64 {
    cross_2d(v1, v2) / (v1.norm() * v2.norm())
}

pub fn are_parallel(v1: &Vector2, v2: &Vector2, tol: &Tolerance) -> bool {
    tol.is_zero(sin_between(v1, v2))
}

// =============================================================================
// Point / Line Operations
// =============================================================================

/// Parameter `t` of the orthogonal projection of `p` onto the line through
/// `a` and `b`, such that the projection is `a + t * (b - a)`.
pub fn project_parameter(a: &Point2, b: &Point2, p: &Point2, tol: &Tolerance) -> GeometryResult<f64> {
    let d = b - a;
    let len_sq = d.norm_squared();
    if tol.is_zero(len_sq.sqrt()) {
        return Err(GeometryError::Degenerate("zero-length line"));
    }
    Ok((p - a).dot(&d) / len_sq)
}

/// Foot of the perpendicular dropped from `p` onto the infinite line `a`-`b`.
pub fn foot_of_perpendicular(p: &Point2, a: &Point2, b: &Point2, tol: &Tolerance) -> GeometryResult<Point2> {
    let t = project_parameter(a, b, p, tol)?;
    Ok(lerp(a, b, t))
}

/// Mirror image of `p` across the infinite line `a`-`b`.
pub fn reflect_across_line(p: &Point2, a: &Point2, b: &Point2, tol: &Tolerance) -> GeometryResult<Point2> {
    let foot = foot_of_perpendicular(p, a, b, tol)?;
    Ok(reflect_across_point(p, &foot))
}

/// Perpendicular distance from `p` to the infinite line `a`-`b`.
pub fn distance_point_to_line(p: &Point2, a: &Point2, b: &Point2, tol: &Tolerance) -> GeometryResult<f64> {
    let dir = direction(a, b, tol)?;
    Ok(cross_2d(&dir, &(p - a)).abs())
}
