// Ordered propagation, failure isolation and recovery

use super::*;

fn graph() -> Graph {
    Graph::with_tolerance(Tolerance::DEFAULT)
}

#[test]
fn test_chain_propagation() {
    // A -> B -> C -> D, each a reflection of the previous point about a fixed centre
    let mut g = graph();
    let center = g.free_point(0.0, 0.0).unwrap();
    let a = g.free_point(1.0, 0.0).unwrap();
    let b = g.reflect_point_across_point(a, center).unwrap();
    let c = g.reflect_point_across_point(b, center).unwrap();
    let d = g.reflect_point_across_point(c, center).unwrap();
    assert_eq!(g.coord(d).unwrap(), Point2::new(-1.0, 0.0));

    let report = g.set_point(a, 0.0, 2.0).unwrap();
    assert_eq!(report.recomputed, vec![a.id(), b.id(), c.id(), d.id()]);
    assert!(report.is_clean());
    assert_eq!(g.coord(b).unwrap(), Point2::new(0.0, -2.0));
    assert_eq!(g.coord(c).unwrap(), Point2::new(0.0, 2.0));
    assert_eq!(g.coord(d).unwrap(), Point2::new(0.0, -2.0));
}

#[test]
fn test_diamond_recomputes_each_node_once() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let p = g.free_point(4.0, 0.0).unwrap();
    let q = g.free_point(0.0, 4.0).unwrap();
    let b = g.midpoint(a, p).unwrap();
    let c = g.midpoint(a, q).unwrap();
    let d = g.midpoint(b, c).unwrap();
    let before = g.revision(d).unwrap();

    let report = g.set_point(a, 2.0, 2.0).unwrap();
    assert_eq!(report.recomputed.len(), 4);
    for id in [a.id(), b.id(), c.id(), d.id()] {
        assert_eq!(report.recompute_count(id), 1);
    }
    // d runs after both of its inputs
    let pos = |id: EntityId| report.recomputed.iter().position(|r| *r == id).unwrap();
    assert!(pos(d.id()) > pos(b.id()));
    assert!(pos(d.id()) > pos(c.id()));

    assert_eq!(g.revision(d).unwrap(), before + 1);
    assert_eq!(g.coord(d).unwrap(), Point2::new(2.0, 2.0));
}

#[test]
fn test_late_dependent_waits_for_all_inputs() {
    // d depends on a directly and through b; d is registered on a before b exists
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let p = g.free_point(2.0, 0.0).unwrap();
    let b = g.midpoint(a, p).unwrap();
    let c = g.midpoint(b, p).unwrap();
    let d = g.midpoint(a, c).unwrap();

    let report = g.set_point(a, 4.0, 0.0).unwrap();
    assert_eq!(report.recomputed, vec![a.id(), b.id(), c.id(), d.id()]);
    // b = (3, 0), c = (2.5, 0), d = (3.25, 0)
    assert_eq!(g.coord(d).unwrap(), Point2::new(3.25, 0.0));
}

#[test]
fn test_error_isolation_and_recovery() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let b = g.free_point(1.0, 1.0).unwrap();
    let c = g.free_point(2.0, 0.0).unwrap();
    let o = g.circumcenter(a, b, c).unwrap();
    let circle = g.circle_through(o, a).unwrap();
    let unrelated = g.midpoint(a, c).unwrap();
    let last_good = g.coord(o).unwrap();

    // Collinear: circumcenter fails, the circle inherits the failure
    let report = g.set_point(b, 1.0, 0.0).unwrap();
    assert_eq!(report.failed, vec![o.id()]);
    assert_eq!(report.propagated, vec![circle.id()]);
    assert!(g.is_error(o).unwrap());
    assert!(g.is_error(circle).unwrap());
    assert!(!g.is_error(unrelated).unwrap());
    assert_eq!(g.last_failure(circle).unwrap(), Some(Failure::Propagated { from: o.id() }));
    assert!(matches!(
        g.last_failure(o).unwrap(),
        Some(Failure::Geometric(GeometryError::Singular(_)))
    ));
    // Last valid outputs are kept for diagnostics
    assert_eq!(g.coord(o).unwrap(), last_good);

    // The unrelated branch keeps updating while the other branch is broken
    g.set_point(c, 4.0, 0.0).unwrap();
    assert_eq!(g.coord(unrelated).unwrap(), Point2::new(2.0, 0.0));

    // Removing the degeneracy clears every error
    let report = g.set_point(b, 2.0, 2.0).unwrap();
    assert!(report.is_clean());
    assert_eq!(g.state(o).unwrap(), EntityState::Valid);
    assert_eq!(g.state(circle).unwrap(), EntityState::Valid);
    assert_eq!(g.last_failure(circle).unwrap(), None);
    assert_eq!(g.coord(o).unwrap(), Point2::new(2.0, 0.0));
    assert_eq!(g.radius(circle).unwrap(), 2.0);
}

#[test]
fn test_construct_on_failed_input_is_marked() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let b = g.free_point(1.0, 1.0).unwrap();
    let c = g.free_point(2.0, 2.0).unwrap();
    let o = g.circumcenter(a, b, c).unwrap();

    let m = g.midpoint(o, a).unwrap();
    assert_eq!(g.state(m).unwrap(), EntityState::Error);
    assert_eq!(g.outputs(m).unwrap(), None);
    assert_eq!(g.coord(m), Err(GraphError::NotComputed(m.id())));
}

#[test]
fn test_recompute_is_idempotent() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let b = g.free_point(5.0, 0.0).unwrap();
    let c = g.free_point(2.0, 3.0).unwrap();
    let h = g.orthocenter(a, b, c).unwrap();
    let circle = g.circumcircle(a, b, c).unwrap();

    let first = (g.coord(h).unwrap(), *g.circle_outputs(circle).unwrap());
    g.recompute(h.id()).unwrap();
    g.recompute(circle.id()).unwrap();
    let second = (g.coord(h).unwrap(), *g.circle_outputs(circle).unwrap());
    assert_eq!(first, second);
}

#[test]
fn test_recompute_propagates_downstream() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let b = g.free_point(2.0, 0.0).unwrap();
    let m = g.midpoint(a, b).unwrap();
    let n = g.midpoint(m, b).unwrap();

    let report = g.recompute(m.id()).unwrap();
    assert_eq!(report.recomputed, vec![m.id(), n.id()]);
}

#[test]
fn test_transitive_dependents_breadth_first() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let b = g.free_point(2.0, 0.0).unwrap();
    let s = g.segment(a, b).unwrap();
    let m = g.midpoint_of_segment(s).unwrap();
    let c = g.circle_through(a, b).unwrap();
    let v = g.free_vector(1.0, 0.0).unwrap();
    let t = g.translate_point(m, v).unwrap();

    assert_eq!(g.transitive_dependents(a).unwrap(), vec![s.id(), c.id(), m.id(), t.id()]);
    assert!(g.transitive_dependents(t).unwrap().is_empty());
}
