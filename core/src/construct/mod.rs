//! Construction adapters.
//!
//! Every entity kind has a closed enum of construction variants. A variant
//! carries its typed inputs, exposes them as an ordered [`Arg`] list checked
//! against the variant's [`Signature`], and computes the kind's outputs from
//! the current outputs of its inputs. Adapters are pure: the engine in
//! [`crate::graph`] decides when they run and where the result goes.

pub mod angle;
pub mod circle;
pub mod components;
pub mod line;
pub mod point;
pub mod signature;
pub mod vector;

#[cfg(test)]
mod tests_constructions;

pub use angle::{AngleConstruction, AngleOutputs, AngleVariant};
pub use circle::{CircleConstruction, CircleOutputs, CircleVariant};
pub use components::{ComponentsConstruction, ComponentsOutputs, ComponentsVariant, PairPredicate, Predicate};
pub use line::{LineConstruction, LineOutputs, LineVariant};
pub use point::{PointConstruction, PointOutputs, PointVariant};
pub use signature::{check_signature, Arg, ArgKind, Signature, SignatureError};
pub use vector::{VectorConstruction, VectorOutputs, VectorVariant};

use crate::geometry::{GeometryError, GeometryResult, Point2};
use crate::graph::{AngleId, CircleId, ComponentsId, EntityId, EntityKind, LineId, PointId, VectorId};
use crate::tolerance::Tolerance;
use serde::Serialize;
use std::fmt;

pub type ConstructResult<T> = Result<T, SignatureError>;

/// Tag naming one construction variant of one kind.
pub trait VariantTag: Copy + fmt::Debug {
    const KIND: EntityKind;

    fn name(self) -> &'static str;

    fn signature(self) -> Signature;
}

/// Per-kind construction strategy.
pub trait Adapter: Sized {
    type Variant: VariantTag;

    fn variant(&self) -> Self::Variant;

    /// Inputs in signature order.
    fn args(&self) -> Vec<Arg>;

    /// Rebuild from a variant tag and an argument list already accepted by
    /// [`check_signature`].
    fn from_args(variant: Self::Variant, args: &[Arg]) -> Result<Self, SignatureError>;

    fn compute(&self, ctx: &ComputeContext<'_>) -> GeometryResult<Outputs>;

    fn is_free(&self) -> bool {
        false
    }
}

/// Read access to the current outputs of other entities.
pub trait OutputSource {
    fn outputs_of(&self, id: EntityId) -> Option<&Outputs>;
}

/// What an adapter sees while computing: its inputs' outputs and the
/// tolerance in force.
pub struct ComputeContext<'a> {
    source: &'a dyn OutputSource,
    tolerance: &'a Tolerance,
}

impl<'a> ComputeContext<'a> {
    pub fn new(source: &'a dyn OutputSource, tolerance: &'a Tolerance) -> Self {
        Self { source, tolerance }
    }

    pub fn tolerance(&self) -> &'a Tolerance {
        self.tolerance
    }

    pub fn outputs(&self, id: EntityId) -> GeometryResult<&'a Outputs> {
        self.source.outputs_of(id).ok_or(GeometryError::MissingInput)
    }

    pub fn point(&self, id: PointId) -> GeometryResult<Point2> {
        match self.outputs(id.0)? {
            Outputs::Point(p) => Ok(p.coord),
            _ => Err(GeometryError::MissingInput),
        }
    }

    pub fn line(&self, id: LineId) -> GeometryResult<&'a LineOutputs> {
        match self.outputs(id.0)? {
            Outputs::Line(l) => Ok(l),
            _ => Err(GeometryError::MissingInput),
        }
    }

    pub fn circle(&self, id: CircleId) -> GeometryResult<&'a CircleOutputs> {
        match self.outputs(id.0)? {
            Outputs::Circle(c) => Ok(c),
            _ => Err(GeometryError::MissingInput),
        }
    }

    pub fn angle(&self, id: AngleId) -> GeometryResult<&'a AngleOutputs> {
        match self.outputs(id.0)? {
            Outputs::Angle(a) => Ok(a),
            _ => Err(GeometryError::MissingInput),
        }
    }

    pub fn vector(&self, id: VectorId) -> GeometryResult<&'a VectorOutputs> {
        match self.outputs(id.0)? {
            Outputs::Vector(v) => Ok(v),
            _ => Err(GeometryError::MissingInput),
        }
    }

    pub fn components(&self, id: ComponentsId) -> GeometryResult<&'a ComponentsOutputs> {
        match self.outputs(id.0)? {
            Outputs::Components(c) => Ok(c),
            _ => Err(GeometryError::MissingInput),
        }
    }
}

/// Computed attributes of an entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Outputs {
    Point(PointOutputs),
    Line(LineOutputs),
    Circle(CircleOutputs),
    Angle(AngleOutputs),
    Vector(VectorOutputs),
    Components(ComponentsOutputs),
}

impl Outputs {
    pub fn kind(&self) -> EntityKind {
        match self {
            Outputs::Point(_) => EntityKind::Point,
            Outputs::Line(_) => EntityKind::Line,
            Outputs::Circle(_) => EntityKind::Circle,
            Outputs::Angle(_) => EntityKind::Angle,
            Outputs::Vector(_) => EntityKind::Vector,
            Outputs::Components(_) => EntityKind::Components,
        }
    }

    pub fn as_point(&self) -> Option<&PointOutputs> {
        match self {
            Outputs::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&LineOutputs> {
        match self {
            Outputs::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_circle(&self) -> Option<&CircleOutputs> {
        match self {
            Outputs::Circle(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_angle(&self) -> Option<&AngleOutputs> {
        match self {
            Outputs::Angle(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&VectorOutputs> {
        match self {
            Outputs::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_components(&self) -> Option<&ComponentsOutputs> {
        match self {
            Outputs::Components(c) => Some(c),
            _ => None,
        }
    }
}

/// A construction of any kind; what a graph node stores.
#[derive(Debug, Clone)]
pub enum Construction {
    Point(PointConstruction),
    Line(LineConstruction),
    Circle(CircleConstruction),
    Angle(AngleConstruction),
    Vector(VectorConstruction),
    Components(ComponentsConstruction),
}

macro_rules! each_kind {
    ($value:expr, $c:ident => $body:expr) => {
        match $value {
            Construction::Point($c) => $body,
            Construction::Line($c) => $body,
            Construction::Circle($c) => $body,
            Construction::Angle($c) => $body,
            Construction::Vector($c) => $body,
            Construction::Components($c) => $body,
        }
    };
}

impl Construction {
    pub fn kind(&self) -> EntityKind {
        match self {
            Construction::Point(_) => EntityKind::Point,
            Construction::Line(_) => EntityKind::Line,
            Construction::Circle(_) => EntityKind::Circle,
            Construction::Angle(_) => EntityKind::Angle,
            Construction::Vector(_) => EntityKind::Vector,
            Construction::Components(_) => EntityKind::Components,
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            Construction::Point(c) => Variant::Point(c.variant()),
            Construction::Line(c) => Variant::Line(c.variant()),
            Construction::Circle(c) => Variant::Circle(c.variant()),
            Construction::Angle(c) => Variant::Angle(c.variant()),
            Construction::Vector(c) => Variant::Vector(c.variant()),
            Construction::Components(c) => Variant::Components(c.variant()),
        }
    }

    pub fn variant_name(&self) -> &'static str {
        self.variant().name()
    }

    pub fn signature(&self) -> Signature {
        self.variant().signature()
    }

    pub fn args(&self) -> Vec<Arg> {
        each_kind!(self, c => c.args())
    }

    /// Distinct entity inputs, in argument order.
    pub fn upstream(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = Vec::new();
        for arg in self.args() {
            if let Arg::Entity(id) = arg {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    pub fn compute(&self, ctx: &ComputeContext<'_>) -> GeometryResult<Outputs> {
        each_kind!(self, c => c.compute(ctx))
    }

    pub fn is_free(&self) -> bool {
        each_kind!(self, c => c.is_free())
    }
}

/// A construction variant tag of any kind, for the dynamic construction path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Point(PointVariant),
    Line(LineVariant),
    Circle(CircleVariant),
    Angle(AngleVariant),
    Vector(VectorVariant),
    Components(ComponentsVariant),
}

impl Variant {
    pub fn kind(self) -> EntityKind {
        match self {
            Variant::Point(_) => PointVariant::KIND,
            Variant::Line(_) => LineVariant::KIND,
            Variant::Circle(_) => CircleVariant::KIND,
            Variant::Angle(_) => AngleVariant::KIND,
            Variant::Vector(_) => VectorVariant::KIND,
            Variant::Components(_) => ComponentsVariant::KIND,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Point(v) => v.name(),
            Variant::Line(v) => v.name(),
            Variant::Circle(v) => v.name(),
            Variant::Angle(v) => v.name(),
            Variant::Vector(v) => v.name(),
            Variant::Components(v) => v.name(),
        }
    }

    pub fn signature(self) -> Signature {
        match self {
            Variant::Point(v) => v.signature(),
            Variant::Line(v) => v.signature(),
            Variant::Circle(v) => v.signature(),
            Variant::Angle(v) => v.signature(),
            Variant::Vector(v) => v.signature(),
            Variant::Components(v) => v.signature(),
        }
    }

    /// Build the typed construction from an argument list.
    pub fn build(self, args: &[Arg]) -> Result<Construction, SignatureError> {
        Ok(match self {
            Variant::Point(v) => Construction::Point(PointConstruction::from_args(v, args)?),
            Variant::Line(v) => Construction::Line(LineConstruction::from_args(v, args)?),
            Variant::Circle(v) => Construction::Circle(CircleConstruction::from_args(v, args)?),
            Variant::Angle(v) => Construction::Angle(AngleConstruction::from_args(v, args)?),
            Variant::Vector(v) => Construction::Vector(VectorConstruction::from_args(v, args)?),
            Variant::Components(v) => Construction::Components(ComponentsConstruction::from_args(v, args)?),
        })
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.kind(), self.name())
    }
}

impl From<PointVariant> for Variant {
    fn from(v: PointVariant) -> Self {
        Variant::Point(v)
    }
}

impl From<LineVariant> for Variant {
    fn from(v: LineVariant) -> Self {
        Variant::Line(v)
    }
}

impl From<CircleVariant> for Variant {
    fn from(v: CircleVariant) -> Self {
        Variant::Circle(v)
    }
}

impl From<AngleVariant> for Variant {
    fn from(v: AngleVariant) -> Self {
        Variant::Angle(v)
    }
}

impl From<VectorVariant> for Variant {
    fn from(v: VectorVariant) -> Self {
        Variant::Vector(v)
    }
}

impl From<ComponentsVariant> for Variant {
    fn from(v: ComponentsVariant) -> Self {
        Variant::Components(v)
    }
}
