// Arena bookkeeping: naming, free values, removal, diagnostics

use super::*;
use crate::construct::{PointVariant, VariantTag};

fn graph() -> Graph {
    Graph::with_tolerance(Tolerance::DEFAULT)
}

#[test]
fn test_default_names_and_rename() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let b = g.free_point_named("B", 1.0, 0.0).unwrap();
    let s = g.segment(a, b).unwrap();

    assert_eq!(g.name(a).unwrap(), "point0");
    assert_eq!(g.name(b).unwrap(), "B");
    assert_eq!(g.name(s).unwrap(), "line2");

    g.rename(s, "AB").unwrap();
    assert_eq!(g.name(s).unwrap(), "AB");
    assert_eq!(g.len(), 3);
    assert_eq!(g.ids().collect::<Vec<_>>(), vec![a.id(), b.id(), s.id()]);
}

#[test]
fn test_handle_display() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    assert_eq!(a.to_string(), "point#0");
    g.remove(a).unwrap();
    let b = g.free_point(0.0, 0.0).unwrap();
    assert_eq!(b.id().to_string(), "#0v1");
}

#[test]
fn test_set_free_value_rules() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let b = g.free_point(2.0, 0.0).unwrap();
    let m = g.midpoint(a, b).unwrap();
    let v = g.free_vector(1.0, 0.0).unwrap();

    let err = g.set_free_value(m.id(), FreeValue::Point(Point2::new(1.0, 1.0))).unwrap_err();
    assert_eq!(
        err,
        SignatureError::NotFree {
            id: m.id(),
            variant: "MidpointOfTwoPoints"
        }
    );

    let err = g.set_free_value(v.id(), FreeValue::Point(Point2::new(1.0, 1.0))).unwrap_err();
    assert_eq!(
        err,
        SignatureError::FreeValueKind {
            id: v.id(),
            expected: EntityKind::Vector
        }
    );

    let err = g.set_point(a, f64::NAN, 0.0).unwrap_err();
    assert_eq!(err, SignatureError::NonFiniteValue { id: a.id() });
    assert_eq!(g.coord(a).unwrap(), Point2::new(0.0, 0.0));

    g.remove(v).unwrap();
    let err = g.set_vector(v, 1.0, 1.0).unwrap_err();
    assert_eq!(err, SignatureError::Unknown(v.id()));
}

#[test]
fn test_remove_refuses_when_depended_on() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let b = g.free_point(2.0, 0.0).unwrap();
    let m = g.midpoint(a, b).unwrap();

    assert_eq!(g.remove(a), Err(GraphError::HasDependents { id: a.id(), count: 1 }));

    g.remove(m).unwrap();
    assert!(!g.contains(m));
    assert!(g.dependents(a).unwrap().is_empty());
    assert!(g.dependents(b).unwrap().is_empty());
    g.remove(a).unwrap();
    assert_eq!(g.len(), 1);
}

#[test]
fn test_stale_handle_never_aliases() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    g.remove(a).unwrap();
    let b = g.free_point(5.0, 5.0).unwrap();

    assert_eq!(a.id().index(), b.id().index());
    assert_ne!(a.id(), b.id());
    assert_eq!(g.coord(a), Err(GraphError::UnknownEntity(a.id())));
    assert_eq!(g.coord(b).unwrap(), Point2::new(5.0, 5.0));
}

#[test]
fn test_remove_cascade_removes_dependents_first() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let b = g.free_point(2.0, 0.0).unwrap();
    let c = g.free_point(0.0, 2.0).unwrap();
    let ab = g.segment(a, b).unwrap();
    let m = g.midpoint_of_segment(ab).unwrap();
    let keep = g.midpoint(b, c).unwrap();

    let removed = g.remove_cascade(a).unwrap();
    assert_eq!(removed, vec![m.id(), ab.id(), a.id()]);
    assert!(g.contains(keep));
    assert_eq!(g.dependents(b).unwrap(), &[keep.id()]);
    assert_eq!(g.len(), 3);
}

#[test]
fn test_recompute_unknown_entity() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    g.remove(a).unwrap();
    assert!(matches!(g.recompute(a.id()), Err(GraphError::UnknownEntity(_))));
}

#[test]
fn test_inputs_and_variant_read_back() {
    let mut g = graph();
    let a = g.free_point(0.0, 0.0).unwrap();
    let b = g.free_point(2.0, 0.0).unwrap();
    let e = g.extend(a, b, 1.5).unwrap();

    let inputs = g.inputs(e).unwrap();
    assert_eq!(inputs.len(), 3);
    assert!(matches!(inputs[2], Arg::Scalar(f) if f == 1.5));
    assert_eq!(g.variant(e).unwrap(), Variant::Point(PointVariant::ExtensionByFactor));
    assert_eq!(PointVariant::ExtensionByFactor.signature().fixed.len(), 3);
    assert_eq!(g.kind(e).unwrap(), EntityKind::Point);
}

#[test]
fn test_dependency_dump() {
    let mut g = graph();
    let a = g.free_point_named("A", 0.0, 0.0).unwrap();
    let b = g.free_point_named("B", 1.0, 1.0).unwrap();
    let c = g.free_point_named("C", 2.0, 2.0).unwrap();
    let o = g.circumcenter(a, b, c).unwrap();
    let m = g.midpoint(a, o).unwrap();
    g.rename(o, "O").unwrap();
    g.rename(m, "M").unwrap();

    let dump = g.dependency_dump(a).unwrap();
    assert_eq!(dump.ids(), vec![a.id(), o.id(), m.id()]);
    assert_eq!(dump.dependents[0].depth, 1);
    // M reaches A directly, so its shortest distance is one hop
    assert_eq!(dump.dependents[1].depth, 1);
    assert_eq!(dump.dependents[0].state, EntityState::Error);
    assert_eq!(dump.dependents[1].failure.as_deref(), Some("Input #3 is in error"));

    let json = dump.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["root"]["name"], "A");
    assert_eq!(value["dependents"][0]["variant"], "Circumcenter");
    assert_eq!(value["dependents"][0]["state"], "Error");

    let text = dump.to_string();
    assert!(text.starts_with("A #0 [point::Free] Valid"));
    assert!(text.contains("  O #3 [point::Circumcenter] Error: Singular system"));
}

#[test]
fn test_tolerance_injection() {
    let loose = Tolerance::new(1e-3, 0.0, 1e-3).unwrap();
    let mut g = Graph::with_tolerance(loose);
    assert_eq!(g.tolerance(), &loose);

    let bad = Tolerance {
        atol: -1.0,
        ..Tolerance::DEFAULT
    };
    assert!(g.set_tolerance(bad).is_err());
    assert_eq!(g.tolerance(), &loose);

    g.set_tolerance(Tolerance::DEFAULT).unwrap();
    assert_eq!(g.tolerance(), &Tolerance::DEFAULT);
}
