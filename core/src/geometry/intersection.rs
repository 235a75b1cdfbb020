//! Line/line, line/circle and circle/circle intersection.
//!
//! Lines use the parametric representation `P = start + t * (end - start)`;
//! the [`LineKind`] of each operand decides which parameters are on the line.

use super::utils_2d::{are_parallel, cross_2d, perpendicular_ccw};
use super::{GeometryError, GeometryResult, LineKind, Point2};
use crate::tolerance::Tolerance;

/// Intersection of two lines of arbitrary kinds.
///
/// With `as_infinite` both operands are treated as infinite lines; a unique
/// point is still returned when the directions are not parallel, and
/// collinear operands always yield [`GeometryError::InfiniteIntersections`].
///
/// Without it, collinear operands are compared by the overlap of their
/// parameter ranges: ranges that touch within `epsilon` yield the touching
/// point, a longer overlap yields `InfiniteIntersections`, disjoint ranges
/// yield `NoIntersection`. Range-end slack is `epsilon` in distance along each
/// line, whatever its length.
#[allow(clippy::too_many_arguments)]
pub fn intersection_line_line(
    l1_start: &Point2,
    l1_end: &Point2,
    l2_start: &Point2,
    l2_end: &Point2,
    l1_kind: LineKind,
    l2_kind: LineKind,
    as_infinite: bool,
    tol: &Tolerance,
) -> GeometryResult<Point2> {
    let d1 = l1_end - l1_start;
    let d2 = l2_end - l2_start;
    if tol.is_zero(d1.norm()) || tol.is_zero(d2.norm()) {
        return Err(GeometryError::Degenerate("zero-length line"));
    }

    let (k1, k2) = if as_infinite {
        (LineKind::InfiniteLine, LineKind::InfiniteLine)
    } else {
        (l1_kind, l2_kind)
    };

    // Vector from L1 start to L2 start
    let w = l2_start - l1_start;

    if !are_parallel(&d1, &d2, tol) {
        let denom = cross_2d(&d1, &d2);
        let t = cross_2d(&w, &d2) / denom;
        let s = cross_2d(&w, &d1) / denom;
        if k1.contains(t, d1.norm(), tol) && k2.contains(s, d2.norm(), tol) {
            return Ok(l1_start + d1 * t);
        }
        return Err(GeometryError::NoIntersection);
    }

    // Parallel: distinct lines never meet
    let offset = cross_2d(&d1, &w) / d1.norm();
    if !tol.is_zero(offset) {
        return Err(GeometryError::NoIntersection);
    }
    if as_infinite {
        return Err(GeometryError::InfiniteIntersections);
    }

    // Collinear: express L2's parameter range in L1's parametrisation
    let len_sq = d1.norm_squared();
    let t0 = w.dot(&d1) / len_sq;
    let step = d2.dot(&d1) / len_sq;
    let (s_lo, s_hi) = k2.range();
    let ends = [t0 + scale_param(step, s_lo), t0 + scale_param(step, s_hi)];
    let (lo2, hi2) = (ends[0].min(ends[1]), ends[0].max(ends[1]));
    let (lo1, hi1) = k1.range();

    let lo = lo1.max(lo2);
    let hi = hi1.min(hi2);
    // Ranges that meet within epsilon, from either side, touch in one point
    if (hi - lo).abs() <= tol.param_slack(d1.norm()) {
        return Ok(l1_start + d1 * ((lo + hi) / 2.0));
    }
    if hi < lo {
        return Err(GeometryError::NoIntersection);
    }
    Err(GeometryError::InfiniteIntersections)
}

/// `step * s` with `0 * ∞` taken as zero.
fn scale_param(step: f64, s: f64) -> f64 {
    if s == 0.0 {
        0.0
    } else {
        step * s
    }
}

/// Intersection points of a line with a circle, ordered by the line
/// parameter. A tangent line yields a single point; points outside the
/// line's parameter range are dropped, so the result may be empty.
pub fn intersection_line_circle(
    start: &Point2,
    end: &Point2,
    kind: LineKind,
    center: &Point2,
    radius: f64,
    tol: &Tolerance,
) -> GeometryResult<Vec<Point2>> {
    if radius <= 0.0 || tol.is_zero(radius) {
        return Err(GeometryError::Degenerate("non-positive radius"));
    }
    let d = end - start;
    let a = d.norm_squared();
    if tol.is_zero(a.sqrt()) {
        return Err(GeometryError::Degenerate("zero-length line"));
    }

    let f = start - center;
    let b = 2.0 * f.dot(&d);
    let c = f.norm_squared() - radius * radius;
    let distance = cross_2d(&d, &(center - start)).abs() / a.sqrt();

    let params: Vec<f64> = if tol.close(distance, radius) {
        vec![-b / (2.0 * a)]
    } else {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return Ok(Vec::new());
        }
        let sqrt_disc = discriminant.sqrt();
        vec![(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)]
    };

    Ok(params
        .into_iter()
        .filter(|t| kind.contains(*t, a.sqrt(), tol))
        .map(|t| start + d * t)
        .collect())
}

/// Intersection points of two circles.
///
/// Concentric circles fail: `InfiniteIntersections` for equal radii,
/// `NoIntersection` otherwise. Tangent circles yield one point; crossing
/// circles yield two, the first lying to the left of the `c1 -> c2` axis.
pub fn intersection_circle_circle(
    c1: &Point2,
    r1: f64,
    c2: &Point2,
    r2: f64,
    tol: &Tolerance,
) -> GeometryResult<Vec<Point2>> {
    if r1 <= 0.0 || r2 <= 0.0 {
        return Err(GeometryError::Degenerate("non-positive radius"));
    }
    let delta = c2 - c1;
    let d = delta.norm();

    if tol.is_zero(d) {
        return if tol.close(r1, r2) {
            Err(GeometryError::InfiniteIntersections)
        } else {
            Err(GeometryError::NoIntersection)
        };
    }

    let u = delta / d;
    // Signed distance from c1 to the chord along the centre line
    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);

    if tol.close(d, r1 + r2) || tol.close(d, (r1 - r2).abs()) {
        return Ok(vec![c1 + u * a]);
    }
    if d > r1 + r2 || d < (r1 - r2).abs() {
        return Ok(Vec::new());
    }

    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let mid = c1 + u * a;
    let offset = perpendicular_ccw(&u) * h;
    Ok(vec![mid + offset, mid - offset])
}

/// Pick solution `index` from a 0/1/2-element solution list. A single
/// (tangent) solution answers both indices.
pub fn select_solution(solutions: &[Point2], index: usize) -> GeometryResult<Point2> {
    match solutions {
        [] => Err(GeometryError::NoIntersection),
        [only] => Ok(*only),
        many => many.get(index).copied().ok_or(GeometryError::NoIntersection),
    }
}
