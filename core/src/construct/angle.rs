//! Angle constructions.

use super::signature::{ArgReader, LINE, POINT};
use super::{Adapter, Arg, ComputeContext, ConstructResult, Construction, Outputs, Signature, SignatureError, VariantTag};
use crate::geometry::{angle_3p_countclockwise, intersection_line_line, signed_angle, GeometryResult, Point2};
use crate::graph::{AngleId, EntityKind, Graph, GraphResult, LineId, PointId};
use crate::tolerance::Tolerance;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AngleOutputs {
    pub start: Point2,
    pub vertex: Point2,
    pub end: Point2,
    /// Counter-clockwise sweep from the start arm to the end arm, `[0, 2π)`.
    pub angle: f64,
    /// Shortest signed rotation, `(-π, π]`.
    pub signed: f64,
    /// `1` counter-clockwise, `-1` clockwise, `0` for coincident arms.
    pub turn: i8,
}

impl AngleOutputs {
    pub fn new(start: Point2, vertex: Point2, end: Point2, tol: &Tolerance) -> GeometryResult<Self> {
        let angle = angle_3p_countclockwise(&start, &vertex, &end, tol)?;
        let signed = if angle == 0.0 {
            0.0
        } else {
            signed_angle(&(start - vertex), &(end - vertex))
        };
        let turn = if tol.is_zero(signed) {
            0
        } else if signed > 0.0 {
            1
        } else {
            -1
        };
        Ok(Self {
            start,
            vertex,
            end,
            angle,
            signed,
            turn,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AngleVariant {
    ThreePoints,
    BetweenLines,
}

impl VariantTag for AngleVariant {
    const KIND: EntityKind = EntityKind::Angle;

    fn name(self) -> &'static str {
        match self {
            Self::ThreePoints => "ThreePoints",
            Self::BetweenLines => "BetweenLines",
        }
    }

    fn signature(self) -> Signature {
        match self {
            Self::ThreePoints => Signature::fixed(&[POINT, POINT, POINT]),
            Self::BetweenLines => Signature::fixed(&[LINE, LINE]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AngleConstruction {
    ThreePoints { start: PointId, vertex: PointId, end: PointId },
    /// Vertex at the crossing of the two lines taken as infinite; arms follow
    /// each line's direction.
    BetweenLines { first: LineId, second: LineId },
}

impl Adapter for AngleConstruction {
    type Variant = AngleVariant;

    fn variant(&self) -> AngleVariant {
        match self {
            Self::ThreePoints { .. } => AngleVariant::ThreePoints,
            Self::BetweenLines { .. } => AngleVariant::BetweenLines,
        }
    }

    fn args(&self) -> Vec<Arg> {
        match *self {
            Self::ThreePoints { start, vertex, end } => vec![start.id().into(), vertex.id().into(), end.id().into()],
            Self::BetweenLines { first, second } => vec![first.id().into(), second.id().into()],
        }
    }

    fn from_args(variant: AngleVariant, args: &[Arg]) -> Result<Self, SignatureError> {
        let mut r = ArgReader::new(variant.name(), args);
        let built = match variant {
            AngleVariant::ThreePoints => Self::ThreePoints {
                start: r.point()?,
                vertex: r.point()?,
                end: r.point()?,
            },
            AngleVariant::BetweenLines => Self::BetweenLines {
                first: r.line()?,
                second: r.line()?,
            },
        };
        r.finish()?;
        Ok(built)
    }

    fn compute(&self, ctx: &ComputeContext<'_>) -> GeometryResult<Outputs> {
        let tol = ctx.tolerance();
        let outputs = match *self {
            Self::ThreePoints { start, vertex, end } => {
                AngleOutputs::new(ctx.point(start)?, ctx.point(vertex)?, ctx.point(end)?, tol)?
            }
            Self::BetweenLines { first, second } => {
                let l1 = ctx.line(first)?;
                let l2 = ctx.line(second)?;
                let vertex = intersection_line_line(&l1.start, &l1.end, &l2.start, &l2.end, l1.kind, l2.kind, true, tol)?;
                AngleOutputs::new(vertex + l1.direction, vertex, vertex + l2.direction, tol)?
            }
        };
        Ok(Outputs::Angle(outputs))
    }
}

impl Graph {
    fn insert_angle(&mut self, construction: AngleConstruction) -> ConstructResult<AngleId> {
        self.insert(Construction::Angle(construction), None).map(AngleId)
    }

    pub fn angle(&mut self, start: PointId, vertex: PointId, end: PointId) -> ConstructResult<AngleId> {
        self.insert_angle(AngleConstruction::ThreePoints { start, vertex, end })
    }

    pub fn angle_between(&mut self, first: LineId, second: LineId) -> ConstructResult<AngleId> {
        self.insert_angle(AngleConstruction::BetweenLines { first, second })
    }

    pub fn angle_outputs(&self, id: AngleId) -> GraphResult<&AngleOutputs> {
        self.typed_outputs(id.0, Outputs::as_angle)
    }

    /// Counter-clockwise angle in radians.
    pub fn angle_value(&self, id: AngleId) -> GraphResult<f64> {
        Ok(self.angle_outputs(id)?.angle)
    }
}
