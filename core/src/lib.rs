//! Parametric constructive-geometry kernel.
//!
//! Points, lines, circles, angles, vectors and entity collections are built
//! from one another through named construction rules and kept in a
//! [`graph::Graph`]. Moving a free entity recomputes everything that depends
//! on it, in dependency order, and records failures on the entities they
//! affect instead of returning them.

pub mod construct;
pub mod geometry;
pub mod graph;
pub mod tolerance;

pub mod prelude {
    pub use crate::construct::{
        Arg, ConstructResult, Construction, Outputs, PairPredicate, Predicate, SignatureError, Variant,
    };
    pub use crate::geometry::{GeometryError, LineKind, Point2, Vector2};
    pub use crate::graph::{
        AngleId, CircleId, ComponentsId, EntityId, EntityKind, EntityState, Failure, FreeValue, Graph, GraphError,
        LineId, PointId, UpdateReport, VectorId,
    };
    pub use crate::tolerance::Tolerance;
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
