//! Circle algorithms: tangency and inversion.

use super::utils_2d::perpendicular_ccw;
use super::{GeometryError, GeometryResult, Point2};
use crate::tolerance::Tolerance;

fn check_radius(radius: f64, tol: &Tolerance) -> GeometryResult<()> {
    if radius <= 0.0 || tol.is_zero(radius) || !radius.is_finite() {
        return Err(GeometryError::Degenerate("non-positive radius"));
    }
    Ok(())
}

/// Points where the tangents from `point` touch the circle.
///
/// Two points for an external point (the first one counter-clockwise from the
/// `center -> point` axis), the point itself when it lies on the circle, and
/// `NoIntersection` when it lies inside.
pub fn tangent_points(point: &Point2, center: &Point2, radius: f64, tol: &Tolerance) -> GeometryResult<Vec<Point2>> {
    check_radius(radius, tol)?;
    let v = point - center;
    let d = v.norm();

    if tol.close(d, radius) {
        return Ok(vec![*point]);
    }
    if d < radius {
        return Err(GeometryError::NoIntersection);
    }

    // Touch points sit at angle acos(r / d) either side of the centre axis
    let u = v / d;
    let along = radius * radius / d;
    let across = radius * (d * d - radius * radius).sqrt() / d;
    let foot = center + u * along;
    let offset = perpendicular_ccw(&u) * across;
    Ok(vec![foot + offset, foot - offset])
}

/// Image of `p` under inversion in the circle (`center`, `radius`):
/// `center + (p - center) * radius² / |p - center|²`.
pub fn inversion_point(p: &Point2, center: &Point2, radius: f64, tol: &Tolerance) -> GeometryResult<Point2> {
    check_radius(radius, tol)?;
    let v = p - center;
    let dist_sq = v.norm_squared();
    if tol.is_zero(dist_sq.sqrt()) {
        return Err(GeometryError::Degenerate("point coincides with the inversion centre"));
    }
    Ok(center + v * (radius * radius / dist_sq))
}

/// Image of the circle (`origin_center`, `origin_radius`) under inversion in
/// the base circle. Returns the image centre and radius.
///
/// A circle through the base centre inverts to a line, which this function
/// reports as degenerate.
pub fn inverse_circle(
    origin_center: &Point2,
    origin_radius: f64,
    base_center: &Point2,
    base_radius: f64,
    tol: &Tolerance,
) -> GeometryResult<(Point2, f64)> {
    check_radius(origin_radius, tol)?;
    check_radius(base_radius, tol)?;
    let v = origin_center - base_center;
    let d = v.norm();
    if tol.close(d, origin_radius) {
        return Err(GeometryError::Degenerate("circle passes through the inversion centre"));
    }

    let k_sq = base_radius * base_radius;
    let power = d * d - origin_radius * origin_radius;
    let center = base_center + v * (k_sq / power);
    let radius = k_sq * origin_radius / power.abs();
    Ok((center, radius))
}
