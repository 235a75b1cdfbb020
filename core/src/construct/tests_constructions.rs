// Per-kind construction rules evaluated through a graph

use super::*;
use crate::geometry::{GeometryError, LineKind, Point2, Vector2};
use crate::graph::{EntityKind, Failure, Graph};
use crate::tolerance::Tolerance;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

const TOL: Tolerance = Tolerance::DEFAULT;

fn graph() -> Graph {
    Graph::with_tolerance(Tolerance::DEFAULT)
}

fn assert_point(graph: &Graph, id: crate::graph::PointId, x: f64, y: f64) {
    let p = graph.coord(id).unwrap();
    assert!(TOL.close_points(&p, &Point2::new(x, y)), "expected ({}, {}), got {}", x, y, p);
}

// ===== Points =====

#[test]
fn test_point_constraints() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let b = g.free_point(4.0, 0.0).unwrap();
    let seg = g.segment(a, b).unwrap();
    let ray = g.ray(a, b).unwrap();

    let on_seg = g.point_on_line(seg, 0.25).unwrap();
    assert_point(&g, on_seg, 1.0, 0.0);

    let beyond = g.point_on_line(seg, 2.0).unwrap();
    assert!(g.is_error(beyond).unwrap());
    let on_ray = g.point_on_line(ray, 2.0).unwrap();
    assert_point(&g, on_ray, 8.0, 0.0);

    let c = g.free_point(1.0, 1.0).unwrap();
    let circle = g.circle(c, 2.0).unwrap();
    let top = g.point_on_circle(circle, FRAC_PI_2).unwrap();
    assert_point(&g, top, 1.0, 3.0);
}

#[test]
fn test_point_transforms() {
    let mut g = graph();
    let o = g.free_point(0.0, 0.0).unwrap();
    let x = g.free_point(1.0, 0.0).unwrap();
    let axis = g.infinite_line(o, x).unwrap();
    let p = g.free_point(1.0, 2.0).unwrap();

    let mirrored = g.reflect_point_across_line(p, axis).unwrap();
    assert_point(&g, mirrored, 1.0, -2.0);

    let opposite = g.reflect_point_across_point(p, o).unwrap();
    assert_point(&g, opposite, -1.0, -2.0);

    let q = g.free_point(2.0, 1.0).unwrap();
    let extended = g.extend(o, q, 3.0).unwrap();
    assert_point(&g, extended, 6.0, 3.0);

    let r = g.free_point(3.0, 4.0).unwrap();
    let foot = g.foot_of_perpendicular(r, axis).unwrap();
    assert_point(&g, foot, 3.0, 0.0);

    let diagonal = g.segment(o, r).unwrap();
    let one = g.free_point(1.0, 1.0).unwrap();
    let offset = g.offset_point_along(one, diagonal, 5.0).unwrap();
    assert_point(&g, offset, 4.0, 5.0);

    let v = g.free_vector(2.0, -1.0).unwrap();
    let moved = g.translate_point(one, v).unwrap();
    assert_point(&g, moved, 3.0, 0.0);

    let turned = g.rotate_point(x, o, FRAC_PI_2).unwrap();
    assert_point(&g, turned, 0.0, 1.0);
}

#[test]
fn test_midpoints() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let b = g.free_point(4.0, 2.0).unwrap();
    let m = g.midpoint(a, b).unwrap();
    assert_point(&g, m, 2.0, 1.0);

    let seg = g.segment(a, b).unwrap();
    let ms = g.midpoint_of_segment(seg).unwrap();
    assert_point(&g, ms, 2.0, 1.0);

    let ray = g.ray(a, b).unwrap();
    let mr = g.midpoint_of_segment(ray).unwrap();
    assert_eq!(
        g.last_failure(mr).unwrap(),
        Some(Failure::Geometric(GeometryError::Degenerate("unbounded line has no midpoint")))
    );
}

#[test]
fn test_inversion_round_trip() {
    let mut g = graph();
    let o = g.free_point(0.0, 0.0).unwrap();
    let base = g.circle(o, 2.0).unwrap();
    let p = g.free_point(3.0, 0.0).unwrap();

    let inv = g.invert_point(p, base).unwrap();
    assert_point(&g, inv, 4.0 / 3.0, 0.0);
    let back = g.invert_point(inv, base).unwrap();
    assert_point(&g, back, 3.0, 0.0);

    let at_center = g.invert_point(o, base).unwrap();
    assert!(g.is_error(at_center).unwrap());
}

#[test]
fn test_intersections() {
    let mut g = graph();
    let p11 = g.free_point(1.0, 1.0).unwrap();
    let p22 = g.free_point(2.0, 2.0).unwrap();
    let p12 = g.free_point(1.0, 2.0).unwrap();
    let p21 = g.free_point(2.0, 1.0).unwrap();
    let s1 = g.segment(p11, p22).unwrap();
    let s2 = g.segment(p12, p21).unwrap();
    let x = g.intersect_lines(s1, s2, false).unwrap();
    assert_point(&g, x, 1.5, 1.5);

    let left = g.free_point(-5.0, 0.0).unwrap();
    let right = g.free_point(5.0, 0.0).unwrap();
    let o = g.free_point(0.0, 0.0).unwrap();
    let through = g.infinite_line(left, right).unwrap();
    let circle = g.circle(o, 2.0).unwrap();
    let first = g.intersect_line_circle(through, circle, 0).unwrap();
    let second = g.intersect_line_circle(through, circle, 1).unwrap();
    assert_point(&g, first, -2.0, 0.0);
    assert_point(&g, second, 2.0, 0.0);

    // Only one crossing lies on the segment; it answers both indices
    let half = g.segment(o, right).unwrap();
    let only0 = g.intersect_line_circle(half, circle, 0).unwrap();
    let only1 = g.intersect_line_circle(half, circle, 1).unwrap();
    assert_point(&g, only0, 2.0, 0.0);
    assert_point(&g, only1, 2.0, 0.0);

    let c2 = g.free_point(2.0, 0.0).unwrap();
    let other = g.circle(c2, 2.0).unwrap();
    let upper = g.intersect_circles(circle, other, 0).unwrap();
    let lower = g.intersect_circles(circle, other, 1).unwrap();
    assert_point(&g, upper, 1.0, 3f64.sqrt());
    assert_point(&g, lower, 1.0, -(3f64.sqrt()));

    let same = g.circle(o, 2.0).unwrap();
    let none = g.intersect_circles(circle, same, 0).unwrap();
    assert_eq!(
        g.last_failure(none).unwrap(),
        Some(Failure::Geometric(GeometryError::InfiniteIntersections))
    );
}

#[test]
fn test_triangle_centres() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let b = g.free_point(5.0, 0.0).unwrap();
    let c = g.free_point(2.0, 3.0).unwrap();

    let centroid = g.centroid(a, b, c).unwrap();
    assert_point(&g, centroid, 7.0 / 3.0, 1.0);
    let circum = g.circumcenter(a, b, c).unwrap();
    assert_point(&g, circum, 2.5, 0.5);
    let ortho = g.orthocenter(a, b, c).unwrap();
    assert_point(&g, ortho, 2.0, 2.0);
    let inc = g.incenter(a, b, c).unwrap();
    assert!(!g.is_error(inc).unwrap());

    let circle = g.circumcircle(a, b, c).unwrap();
    let center = g.circle_center(circle).unwrap();
    assert_point(&g, center, 2.5, 0.5);
}

// ===== Lines =====

#[test]
fn test_line_outputs() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let b = g.free_point(3.0, 4.0).unwrap();

    let seg = g.segment(a, b).unwrap();
    let out = g.line_outputs(seg).unwrap();
    assert_eq!(out.kind, LineKind::Segment);
    assert!(TOL.close(out.length, 5.0));
    assert!(TOL.close_vectors(&out.direction, &Vector2::new(0.6, 0.8)));

    let ray = g.ray(a, b).unwrap();
    assert_eq!(g.length(ray).unwrap(), f64::INFINITY);

    let degenerate = g.segment(a, a).unwrap();
    assert!(g.is_error(degenerate).unwrap());
}

#[test]
fn test_derived_lines() {
    let mut g = graph();
    let o = g.free_point(0.0, 0.0).unwrap();
    let x2 = g.free_point(2.0, 0.0).unwrap();
    let x_axis = g.segment(o, x2).unwrap();

    let bisector = g.perpendicular_bisector(o, x2).unwrap();
    let out = g.line_outputs(bisector).unwrap();
    assert_eq!(out.kind, LineKind::InfiniteLine);
    assert!(TOL.close_points(&out.start, &Point2::new(1.0, 0.0)));
    assert!(TOL.close_vectors(&out.direction, &Vector2::new(0.0, 1.0)));

    let p = g.free_point(0.0, 3.0).unwrap();
    let parallel = g.parallel_through(x_axis, p).unwrap();
    assert!(TOL.close_vectors(&g.line_outputs(parallel).unwrap().direction, &Vector2::new(1.0, 0.0)));

    let q = g.free_point(2.0, 5.0).unwrap();
    let perpendicular = g.perpendicular_through(x_axis, q).unwrap();
    let out = g.line_outputs(perpendicular).unwrap();
    assert!(TOL.close_points(&out.start, &Point2::new(2.0, 5.0)));
    assert!(TOL.close_vectors(&out.direction, &Vector2::new(0.0, 1.0)));

    let shifted = g.offset_line(x_axis, 1.0).unwrap();
    let out = g.line_outputs(shifted).unwrap();
    assert!(TOL.close_points(&out.start, &Point2::new(0.0, 1.0)));
    assert!(TOL.close_points(&out.end, &Point2::new(2.0, 1.0)));
    assert_eq!(out.kind, LineKind::Segment);

    let s = g.free_point(0.0, 1.0).unwrap();
    let e = g.free_point(1.0, 2.0).unwrap();
    let slanted = g.segment(s, e).unwrap();
    let mirrored = g.reflect_line(slanted, x_axis).unwrap();
    let out = g.line_outputs(mirrored).unwrap();
    assert!(TOL.close_points(&out.start, &Point2::new(0.0, -1.0)));
    assert!(TOL.close_points(&out.end, &Point2::new(1.0, -2.0)));

    let v = g.free_vector(1.0, 1.0).unwrap();
    let moved = g.translate_line(x_axis, v).unwrap();
    assert!(TOL.close_points(&g.line_outputs(moved).unwrap().end, &Point2::new(3.0, 1.0)));

    let along = g.line_along(q, v, LineKind::Ray).unwrap();
    assert!(TOL.close_points(&g.line_outputs(along).unwrap().end, &Point2::new(3.0, 6.0)));
}

#[test]
fn test_angle_bisector_and_tangents() {
    let mut g = graph();
    let o = g.free_point(0.0, 0.0).unwrap();
    let x = g.free_point(1.0, 0.0).unwrap();
    let y = g.free_point(0.0, 1.0).unwrap();
    let right = g.angle(x, o, y).unwrap();
    let bisector = g.angle_bisector(right).unwrap();
    let out = g.line_outputs(bisector).unwrap();
    assert_eq!(out.kind, LineKind::Ray);
    let half = std::f64::consts::FRAC_1_SQRT_2;
    assert!(TOL.close_vectors(&out.direction, &Vector2::new(half, half)));

    let unit = g.circle(o, 1.0).unwrap();
    let outside = g.free_point(2.0, 0.0).unwrap();
    let tangent = g.tangent_from_point(unit, outside, 0).unwrap();
    let out = g.line_outputs(tangent).unwrap();
    assert!(TOL.close_points(&out.end, &Point2::new(0.5, 3f64.sqrt() / 2.0)));

    // Point on the circle: the tangent is normal to the radius
    let on = g.tangent_from_point(unit, x, 0).unwrap();
    assert!(TOL.close_vectors(&g.line_outputs(on).unwrap().direction, &Vector2::new(0.0, 1.0)));

    let inside = g.free_point(0.2, 0.0).unwrap();
    let none = g.tangent_from_point(unit, inside, 0).unwrap();
    assert_eq!(
        g.last_failure(none).unwrap(),
        Some(Failure::Geometric(GeometryError::NoIntersection))
    );
}

// ===== Circles =====

#[test]
fn test_circle_outputs() {
    let mut g = graph();
    let c = g.free_point(1.0, 1.0).unwrap();
    let p = g.free_point(4.0, 5.0).unwrap();
    let circle = g.circle_through(c, p).unwrap();
    let out = g.circle_outputs(circle).unwrap();
    assert!(TOL.close(out.radius, 5.0));
    assert!(TOL.close(out.area, 25.0 * PI));
    assert!(TOL.close(out.circumference, 10.0 * PI));

    let flat = g.circle(c, 0.0).unwrap();
    assert!(g.is_error(flat).unwrap());
    assert!(g.outputs(flat).unwrap().is_none());
}

#[test]
fn test_derived_circles() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let b = g.free_point(4.0, 0.0).unwrap();
    let c = g.free_point(0.0, 3.0).unwrap();

    let inc = g.incircle(a, b, c).unwrap();
    let out = g.circle_outputs(inc).unwrap();
    assert!(TOL.close_points(&out.center, &Point2::new(1.0, 1.0)));
    assert!(TOL.close(out.radius, 1.0));

    let dia = g.circle_on_diameter(a, b).unwrap();
    let out = g.circle_outputs(dia).unwrap();
    assert!(TOL.close_points(&out.center, &Point2::new(2.0, 0.0)));
    assert!(TOL.close(out.radius, 2.0));

    let three = g.free_point(3.0, 0.0).unwrap();
    let small = g.circle(three, 1.0).unwrap();
    let base = g.circle(a, 2.0).unwrap();
    let image = g.invert_circle(small, base).unwrap();
    let out = g.circle_outputs(image).unwrap();
    assert!(TOL.close_points(&out.center, &Point2::new(1.5, 0.0)));
    assert!(TOL.close(out.radius, 0.5));

    let x_axis = g.infinite_line(a, b).unwrap();
    let up = g.free_point(0.0, 2.0).unwrap();
    let lifted = g.circle(up, 1.0).unwrap();
    let mirrored = g.reflect_circle(lifted, x_axis).unwrap();
    assert!(TOL.close_points(&g.circle_outputs(mirrored).unwrap().center, &Point2::new(0.0, -2.0)));

    let v = g.free_vector(1.0, 0.0).unwrap();
    let moved = g.translate_circle(lifted, v).unwrap();
    assert!(TOL.close_points(&g.circle_outputs(moved).unwrap().center, &Point2::new(1.0, 2.0)));
}

// ===== Angles =====

#[test]
fn test_angle_orientation() {
    let mut g = graph();
    let o = g.free_point(0.0, 0.0).unwrap();
    let x = g.free_point(1.0, 0.0).unwrap();
    let y = g.free_point(0.0, 1.0).unwrap();

    let ccw = g.angle(x, o, y).unwrap();
    let out = g.angle_outputs(ccw).unwrap();
    assert!(TOL.close(out.angle, FRAC_PI_2));
    assert!(TOL.close(out.signed, FRAC_PI_2));
    assert_eq!(out.turn, 1);

    let cw = g.angle(y, o, x).unwrap();
    let out = g.angle_outputs(cw).unwrap();
    assert!(TOL.close(out.angle, 3.0 * FRAC_PI_2));
    assert!(TOL.close(out.signed, -FRAC_PI_2));
    assert_eq!(out.turn, -1);

    let zero = g.angle(x, o, x).unwrap();
    assert_eq!(g.angle_value(zero).unwrap(), 0.0);
    assert_eq!(g.angle_outputs(zero).unwrap().turn, 0);

    let degenerate = g.angle(o, o, x).unwrap();
    assert!(g.is_error(degenerate).unwrap());
}

#[test]
fn test_angle_between_lines() {
    let mut g = graph();
    let o = g.free_point(0.0, 0.0).unwrap();
    let x = g.free_point(1.0, 0.0).unwrap();
    let d = g.free_point(1.0, 1.0).unwrap();
    let horizontal = g.segment(o, x).unwrap();
    let diagonal = g.segment(o, d).unwrap();

    let between = g.angle_between(horizontal, diagonal).unwrap();
    assert!(TOL.close(g.angle_value(between).unwrap(), FRAC_PI_4));

    let up = g.free_point(0.0, 1.0).unwrap();
    let up_x = g.free_point(1.0, 1.0).unwrap();
    let parallel = g.segment(up, up_x).unwrap();
    let none = g.angle_between(horizontal, parallel).unwrap();
    assert!(g.is_error(none).unwrap());
}

// ===== Vectors =====

#[test]
fn test_vector_arithmetic() {
    let mut g = graph();
    let a = g.free_point(1.0, 1.0).unwrap();
    let b = g.free_point(4.0, 5.0).unwrap();

    let ab = g.vector_between(a, b).unwrap();
    let out = g.vector_outputs(ab).unwrap();
    assert!(TOL.close(out.norm, 5.0));
    assert!(TOL.close_vectors(&out.direction.unwrap(), &Vector2::new(0.6, 0.8)));

    let normal = g.normal_vector(ab).unwrap();
    assert!(TOL.close_vectors(&g.vector_outputs(normal).unwrap().components, &Vector2::new(-4.0, 3.0)));

    let doubled = g.scale_vector(ab, 2.0).unwrap();
    let sum = g.add_vectors(ab, normal).unwrap();
    let diff = g.subtract_vectors(doubled, ab).unwrap();
    assert!(TOL.close_vectors(&g.vector_outputs(sum).unwrap().components, &Vector2::new(-1.0, 7.0)));
    assert!(TOL.close_vectors(&g.vector_outputs(diff).unwrap().components, &Vector2::new(3.0, 4.0)));

    let seg = g.segment(a, b).unwrap();
    let along = g.line_vector(seg).unwrap();
    assert!(TOL.close_vectors(&g.vector_outputs(along).unwrap().components, &Vector2::new(3.0, 4.0)));

    let zero = g.free_vector(0.0, 0.0).unwrap();
    let out = g.vector_outputs(zero).unwrap();
    assert_eq!(out.norm, 0.0);
    assert!(out.direction.is_none());
    assert!(!g.is_error(zero).unwrap());
}

#[test]
fn test_set_vector_moves_translated_point() {
    let mut g = graph();
    let p = g.free_point(1.0, 1.0).unwrap();
    let v = g.free_vector(1.0, 0.0).unwrap();
    let moved = g.translate_point(p, v).unwrap();
    assert_point(&g, moved, 2.0, 1.0);

    let report = g.set_vector(v, 0.0, -3.0).unwrap();
    assert_eq!(report.recomputed, vec![v.id(), moved.id()]);
    assert_point(&g, moved, 1.0, -2.0);
}

// ===== Components =====

fn right_half() -> Predicate {
    Predicate::new("x > 0", |outputs| outputs.as_point().map_or(false, |p| p.coord.x > 0.0))
}

#[test]
fn test_list_and_filters() {
    let mut g = graph();
    let a = g.free_point(1.0, 0.0).unwrap();
    let b = g.free_point(2.0, 0.0).unwrap();
    let c = g.free_point(-5.0, 0.0).unwrap();
    let seg = g.segment(a, b).unwrap();

    let all = g.components(&[a.id(), b.id(), seg.id(), a.id()]).unwrap();
    assert_eq!(g.members(all).unwrap(), &[a.id(), b.id(), seg.id()]);

    let points = g.filter_components(all, Predicate::of_kind(EntityKind::Point)).unwrap();
    assert_eq!(g.members(points).unwrap(), &[a.id(), b.id()]);

    let pts = g.components(&[a.id(), b.id(), c.id()]).unwrap();
    let near = PairPredicate::new("closer than 1.5", |p, q| match (p.as_point(), q.as_point()) {
        (Some(p), Some(q)) => (p.coord - q.coord).norm() < 1.5,
        _ => false,
    });
    let pairs = g.pair_filter_components(pts, near).unwrap();
    assert_eq!(g.pairs(pairs).unwrap(), &[(a.id(), b.id())]);
    assert_eq!(g.members(pairs).unwrap(), &[a.id(), b.id()]);

    let right = g.filter_components(pts, right_half()).unwrap();
    assert_eq!(g.members(right).unwrap(), &[a.id(), b.id()]);

    // Moving a point re-runs the filter
    g.set_point(a, -1.0, 0.0).unwrap();
    assert_eq!(g.members(right).unwrap(), &[b.id()]);
}

#[test]
fn test_set_combinators() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let b = g.free_point(1.0, 0.0).unwrap();
    let c = g.free_point(2.0, 0.0).unwrap();

    let ab = g.components(&[a.id(), b.id()]).unwrap();
    let bc = g.components(&[b.id(), c.id()]).unwrap();

    let union = g.union_components(ab, bc).unwrap();
    assert_eq!(g.members(union).unwrap(), &[a.id(), b.id(), c.id()]);
    let both = g.intersect_components(ab, bc).unwrap();
    assert_eq!(g.members(both).unwrap(), &[b.id()]);
    let only_ab = g.difference_components(ab, bc).unwrap();
    assert_eq!(g.members(only_ab).unwrap(), &[a.id()]);

    // Aggregates feed further aggregates
    let nested = g.union_components(union, only_ab).unwrap();
    assert_eq!(g.members(nested).unwrap().len(), 3);
    assert_eq!(g.kind(nested).unwrap(), EntityKind::Components);

    let err = g.components(&[]).unwrap_err();
    assert!(matches!(err, SignatureError::Arity { got: 0, .. }));
}

#[test]
fn test_list_errors_with_member() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let b = g.free_point(1.0, 1.0).unwrap();
    let c = g.free_point(2.0, 2.0).unwrap();
    let o = g.circumcenter(a, b, c).unwrap();
    let list = g.components(&[a.id(), o.id()]).unwrap();
    assert!(g.is_error(list).unwrap());
    assert_eq!(g.last_failure(list).unwrap(), Some(Failure::Propagated { from: o.id() }));
}
