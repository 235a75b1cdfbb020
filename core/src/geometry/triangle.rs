//! Triangle centres.

use super::utils_2d::{cross_2d, sin_between};
use super::{GeometryError, GeometryResult, Point2, Vector2};
use crate::tolerance::Tolerance;
use nalgebra::Matrix2;

/// Reject triangles whose vertices are collinear (including coincident ones).
fn check_non_degenerate(a: &Point2, b: &Point2, c: &Point2, tol: &Tolerance) -> GeometryResult<()> {
    let ab = b - a;
    let ac = c - a;
    let bc = c - b;
    if tol.is_zero(ab.norm()) || tol.is_zero(ac.norm()) || tol.is_zero(bc.norm()) {
        return Err(GeometryError::Singular("coincident triangle vertices"));
    }
    if tol.is_zero(sin_between(&ab, &ac)) {
        return Err(GeometryError::Singular("collinear triangle vertices"));
    }
    Ok(())
}

pub fn centroid(a: &Point2, b: &Point2, c: &Point2) -> Point2 {
    Point2::from((a.coords + b.coords + c.coords) / 3.0)
}

/// Circumcenter via the perpendicular-bisector system
/// `2 (b - a) · x = |b|² - |a|²`, `2 (c - a) · x = |c|² - |a|²`.
pub fn circumcenter(a: &Point2, b: &Point2, c: &Point2, tol: &Tolerance) -> GeometryResult<Point2> {
    check_non_degenerate(a, b, c, tol)?;
    let ab = b - a;
    let ac = c - a;
    let m = Matrix2::new(2.0 * ab.x, 2.0 * ab.y, 2.0 * ac.x, 2.0 * ac.y);
    let rhs = Vector2::new(
        b.coords.norm_squared() - a.coords.norm_squared(),
        c.coords.norm_squared() - a.coords.norm_squared(),
    );
    m.lu()
        .solve(&rhs)
        .map(Point2::from)
        .ok_or(GeometryError::Singular("collinear triangle vertices"))
}

/// Incenter: vertices weighted by the length of the opposite side.
pub fn incenter(a: &Point2, b: &Point2, c: &Point2, tol: &Tolerance) -> GeometryResult<Point2> {
    check_non_degenerate(a, b, c, tol)?;
    let la = (c - b).norm();
    let lb = (a - c).norm();
    let lc = (b - a).norm();
    let perimeter = la + lb + lc;
    Ok(Point2::from((a.coords * la + b.coords * lb + c.coords * lc) / perimeter))
}

/// Radius of the incircle, `2 * area / perimeter`.
pub fn inradius(a: &Point2, b: &Point2, c: &Point2, tol: &Tolerance) -> GeometryResult<f64> {
    check_non_degenerate(a, b, c, tol)?;
    let area = cross_2d(&(b - a), &(c - a)).abs() / 2.0;
    let perimeter = (c - b).norm() + (a - c).norm() + (b - a).norm();
    Ok(2.0 * area / perimeter)
}

/// Orthocenter as the intersection of the altitudes from `a` and `b`,
/// solved with Cramer's rule:
/// `(x - a) · (c - b) = 0`, `(x - b) · (c - a) = 0`.
pub fn orthocenter(a: &Point2, b: &Point2, c: &Point2, tol: &Tolerance) -> GeometryResult<Point2> {
    check_non_degenerate(a, b, c, tol)?;
    let n1 = c - b;
    let n2 = c - a;
    let r1 = n1.dot(&a.coords);
    let r2 = n2.dot(&b.coords);

    let det = n1.x * n2.y - n1.y * n2.x;
    if det == 0.0 {
        return Err(GeometryError::Singular("altitudes are parallel"));
    }
    let x = (r1 * n2.y - n1.y * r2) / det;
    let y = (n1.x * r2 - r1 * n2.x) / det;
    Ok(Point2::new(x, y))
}
