//! Free and derived vectors.

use super::signature::{ArgReader, COORD, LINE, POINT, SCALAR, VECTOR};
use super::{Adapter, Arg, ComputeContext, ConstructResult, Construction, Outputs, Signature, SignatureError, VariantTag};
use crate::geometry::{perpendicular_ccw, GeometryResult, Point2, Vector2};
use crate::graph::{EntityKind, FreeValue, Graph, GraphResult, LineId, PointId, UpdateReport, VectorId};
use crate::tolerance::Tolerance;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VectorOutputs {
    pub components: Vector2,
    pub norm: f64,
    /// `None` for a zero vector.
    pub direction: Option<Vector2>,
}

impl VectorOutputs {
    pub fn new(components: Vector2, tol: &Tolerance) -> Self {
        let norm = components.norm();
        let direction = if tol.is_zero(norm) { None } else { Some(components / norm) };
        Self {
            components,
            norm,
            direction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorVariant {
    Free,
    TwoPoints,
    LineDirection,
    Scaled,
    Sum,
    Difference,
    Normal,
}

impl VariantTag for VectorVariant {
    const KIND: EntityKind = EntityKind::Vector;

    fn name(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::TwoPoints => "TwoPoints",
            Self::LineDirection => "LineDirection",
            Self::Scaled => "Scaled",
            Self::Sum => "Sum",
            Self::Difference => "Difference",
            Self::Normal => "Normal",
        }
    }

    fn signature(self) -> Signature {
        match self {
            // components travel as a coordinate pair
            Self::Free => Signature::fixed(&[COORD]),
            Self::TwoPoints => Signature::fixed(&[POINT, POINT]),
            Self::LineDirection => Signature::fixed(&[LINE]),
            Self::Scaled => Signature::fixed(&[VECTOR, SCALAR]),
            Self::Sum | Self::Difference => Signature::fixed(&[VECTOR, VECTOR]),
            Self::Normal => Signature::fixed(&[VECTOR]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VectorConstruction {
    Free { components: Vector2 },
    TwoPoints { from: PointId, to: PointId },
    /// `end - start` of the line.
    LineDirection { line: LineId },
    Scaled { vector: VectorId, factor: f64 },
    Sum { first: VectorId, second: VectorId },
    /// `first - second`.
    Difference { first: VectorId, second: VectorId },
    /// Rotated 90° counter-clockwise.
    Normal { vector: VectorId },
}

impl Adapter for VectorConstruction {
    type Variant = VectorVariant;

    fn variant(&self) -> VectorVariant {
        match self {
            Self::Free { .. } => VectorVariant::Free,
            Self::TwoPoints { .. } => VectorVariant::TwoPoints,
            Self::LineDirection { .. } => VectorVariant::LineDirection,
            Self::Scaled { .. } => VectorVariant::Scaled,
            Self::Sum { .. } => VectorVariant::Sum,
            Self::Difference { .. } => VectorVariant::Difference,
            Self::Normal { .. } => VectorVariant::Normal,
        }
    }

    fn args(&self) -> Vec<Arg> {
        match *self {
            Self::Free { components } => vec![Point2::from(components).into()],
            Self::TwoPoints { from, to } => vec![from.id().into(), to.id().into()],
            Self::LineDirection { line } => vec![line.id().into()],
            Self::Scaled { vector, factor } => vec![vector.id().into(), factor.into()],
            Self::Sum { first, second } | Self::Difference { first, second } => {
                vec![first.id().into(), second.id().into()]
            }
            Self::Normal { vector } => vec![vector.id().into()],
        }
    }

    fn from_args(variant: VectorVariant, args: &[Arg]) -> Result<Self, SignatureError> {
        let mut r = ArgReader::new(variant.name(), args);
        let built = match variant {
            VectorVariant::Free => Self::Free {
                components: r.coord()?.coords,
            },
            VectorVariant::TwoPoints => Self::TwoPoints {
                from: r.point()?,
                to: r.point()?,
            },
            VectorVariant::LineDirection => Self::LineDirection { line: r.line()? },
            VectorVariant::Scaled => Self::Scaled {
                vector: r.vector()?,
                factor: r.scalar()?,
            },
            VectorVariant::Sum => Self::Sum {
                first: r.vector()?,
                second: r.vector()?,
            },
            VectorVariant::Difference => Self::Difference {
                first: r.vector()?,
                second: r.vector()?,
            },
            VectorVariant::Normal => Self::Normal { vector: r.vector()? },
        };
        r.finish()?;
        Ok(built)
    }

    fn compute(&self, ctx: &ComputeContext<'_>) -> GeometryResult<Outputs> {
        let components = match *self {
            Self::Free { components } => components,
            Self::TwoPoints { from, to } => ctx.point(to)? - ctx.point(from)?,
            Self::LineDirection { line } => {
                let l = ctx.line(line)?;
                l.end - l.start
            }
            Self::Scaled { vector, factor } => ctx.vector(vector)?.components * factor,
            Self::Sum { first, second } => ctx.vector(first)?.components + ctx.vector(second)?.components,
            Self::Difference { first, second } => ctx.vector(first)?.components - ctx.vector(second)?.components,
            Self::Normal { vector } => perpendicular_ccw(&ctx.vector(vector)?.components),
        };
        Ok(Outputs::Vector(VectorOutputs::new(components, ctx.tolerance())))
    }

    fn is_free(&self) -> bool {
        matches!(self, Self::Free { .. })
    }
}

impl Graph {
    fn insert_vector(&mut self, construction: VectorConstruction) -> ConstructResult<VectorId> {
        self.insert(Construction::Vector(construction), None).map(VectorId)
    }

    pub fn free_vector(&mut self, x: f64, y: f64) -> ConstructResult<VectorId> {
        self.insert_vector(VectorConstruction::Free {
            components: Vector2::new(x, y),
        })
    }

    pub fn vector_between(&mut self, from: PointId, to: PointId) -> ConstructResult<VectorId> {
        self.insert_vector(VectorConstruction::TwoPoints { from, to })
    }

    pub fn line_vector(&mut self, line: LineId) -> ConstructResult<VectorId> {
        self.insert_vector(VectorConstruction::LineDirection { line })
    }

    pub fn scale_vector(&mut self, vector: VectorId, factor: f64) -> ConstructResult<VectorId> {
        self.insert_vector(VectorConstruction::Scaled { vector, factor })
    }

    pub fn add_vectors(&mut self, first: VectorId, second: VectorId) -> ConstructResult<VectorId> {
        self.insert_vector(VectorConstruction::Sum { first, second })
    }

    pub fn subtract_vectors(&mut self, first: VectorId, second: VectorId) -> ConstructResult<VectorId> {
        self.insert_vector(VectorConstruction::Difference { first, second })
    }

    pub fn normal_vector(&mut self, vector: VectorId) -> ConstructResult<VectorId> {
        self.insert_vector(VectorConstruction::Normal { vector })
    }

    pub fn vector_outputs(&self, id: VectorId) -> GraphResult<&VectorOutputs> {
        self.typed_outputs(id.0, Outputs::as_vector)
    }

    /// Replace a free vector's components and propagate.
    pub fn set_vector(&mut self, id: VectorId, x: f64, y: f64) -> ConstructResult<UpdateReport> {
        self.set_free_value(id.0, FreeValue::Vector(Vector2::new(x, y)))
    }
}
