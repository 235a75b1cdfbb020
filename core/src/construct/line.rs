//! Segment, ray and infinite-line constructions.

use super::signature::{ArgReader, ANGLE, CIRCLE, INDEX, LINE, LINE_KIND, POINT, SCALAR, VECTOR};
use super::{Adapter, Arg, ComputeContext, ConstructResult, Construction, Outputs, Signature, SignatureError, VariantTag};
use crate::geometry::{
    midpoint, perpendicular_ccw, reflect_across_line, rotate_about, select_solution, tangent_points, unit_vector,
    GeometryResult, LineKind, Point2, Vector2,
};
use crate::graph::{AngleId, CircleId, EntityKind, Graph, GraphResult, LineId, PointId, VectorId};
use crate::tolerance::Tolerance;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineOutputs {
    pub start: Point2,
    pub end: Point2,
    pub kind: LineKind,
    /// `|end - start|` for a segment, infinite otherwise.
    pub length: f64,
    pub direction: Vector2,
}

impl LineOutputs {
    /// Fails when `start` and `end` coincide.
    pub fn new(start: Point2, end: Point2, kind: LineKind, tol: &Tolerance) -> GeometryResult<Self> {
        let span = end - start;
        let direction = unit_vector(&span, tol)?;
        let length = if kind.is_bounded() { span.norm() } else { f64::INFINITY };
        Ok(Self {
            start,
            end,
            kind,
            length,
            direction,
        })
    }

    fn through(start: Point2, direction: Vector2, kind: LineKind, tol: &Tolerance) -> GeometryResult<Self> {
        Self::new(start, start + direction, kind, tol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineVariant {
    TwoPoints,
    PointDirection,
    ParallelThroughPoint,
    PerpendicularThroughPoint,
    PerpendicularBisector,
    AngleBisector,
    TangentFromPoint,
    ParallelOffset,
    Translation,
    AxisReflection,
}

impl VariantTag for LineVariant {
    const KIND: EntityKind = EntityKind::Line;

    fn name(self) -> &'static str {
        match self {
            Self::TwoPoints => "TwoPoints",
            Self::PointDirection => "PointDirection",
            Self::ParallelThroughPoint => "ParallelThroughPoint",
            Self::PerpendicularThroughPoint => "PerpendicularThroughPoint",
            Self::PerpendicularBisector => "PerpendicularBisector",
            Self::AngleBisector => "AngleBisector",
            Self::TangentFromPoint => "TangentFromPoint",
            Self::ParallelOffset => "ParallelOffset",
            Self::Translation => "Translation",
            Self::AxisReflection => "AxisReflection",
        }
    }

    fn signature(self) -> Signature {
        match self {
            Self::TwoPoints => Signature::fixed(&[POINT, POINT, LINE_KIND]),
            Self::PointDirection => Signature::fixed(&[POINT, VECTOR, LINE_KIND]),
            Self::ParallelThroughPoint | Self::PerpendicularThroughPoint => Signature::fixed(&[LINE, POINT]),
            Self::PerpendicularBisector => Signature::fixed(&[POINT, POINT]),
            Self::AngleBisector => Signature::fixed(&[ANGLE]),
            Self::TangentFromPoint => Signature::fixed(&[CIRCLE, POINT, INDEX]),
            Self::ParallelOffset => Signature::fixed(&[LINE, SCALAR]),
            Self::Translation => Signature::fixed(&[LINE, VECTOR]),
            Self::AxisReflection => Signature::fixed(&[LINE, LINE]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineConstruction {
    TwoPoints { start: PointId, end: PointId, kind: LineKind },
    /// From `point` along the vector's components.
    PointDirection { point: PointId, direction: VectorId, kind: LineKind },
    /// Infinite line through `point` parallel to `line`.
    ParallelThroughPoint { line: LineId, point: PointId },
    /// Infinite line through `point` perpendicular to `line`.
    PerpendicularThroughPoint { line: LineId, point: PointId },
    PerpendicularBisector { a: PointId, b: PointId },
    /// Ray from the angle's vertex halfway through its counter-clockwise sweep.
    AngleBisector { angle: AngleId },
    /// Infinite tangent line from `point` to `circle`, starting at `point`
    /// and passing through touch point `index`.
    TangentFromPoint { circle: CircleId, point: PointId, index: usize },
    /// `line` shifted `distance` to its left (counter-clockwise normal side).
    ParallelOffset { line: LineId, distance: f64 },
    Translation { line: LineId, vector: VectorId },
    AxisReflection { line: LineId, axis: LineId },
}

impl Adapter for LineConstruction {
    type Variant = LineVariant;

    fn variant(&self) -> LineVariant {
        match self {
            Self::TwoPoints { .. } => LineVariant::TwoPoints,
            Self::PointDirection { .. } => LineVariant::PointDirection,
            Self::ParallelThroughPoint { .. } => LineVariant::ParallelThroughPoint,
            Self::PerpendicularThroughPoint { .. } => LineVariant::PerpendicularThroughPoint,
            Self::PerpendicularBisector { .. } => LineVariant::PerpendicularBisector,
            Self::AngleBisector { .. } => LineVariant::AngleBisector,
            Self::TangentFromPoint { .. } => LineVariant::TangentFromPoint,
            Self::ParallelOffset { .. } => LineVariant::ParallelOffset,
            Self::Translation { .. } => LineVariant::Translation,
            Self::AxisReflection { .. } => LineVariant::AxisReflection,
        }
    }

    fn args(&self) -> Vec<Arg> {
        match *self {
            Self::TwoPoints { start, end, kind } => vec![start.id().into(), end.id().into(), kind.into()],
            Self::PointDirection { point, direction, kind } => {
                vec![point.id().into(), direction.id().into(), kind.into()]
            }
            Self::ParallelThroughPoint { line, point } | Self::PerpendicularThroughPoint { line, point } => {
                vec![line.id().into(), point.id().into()]
            }
            Self::PerpendicularBisector { a, b } => vec![a.id().into(), b.id().into()],
            Self::AngleBisector { angle } => vec![angle.id().into()],
            Self::TangentFromPoint { circle, point, index } => {
                vec![circle.id().into(), point.id().into(), Arg::Index(index)]
            }
            Self::ParallelOffset { line, distance } => vec![line.id().into(), distance.into()],
            Self::Translation { line, vector } => vec![line.id().into(), vector.id().into()],
            Self::AxisReflection { line, axis } => vec![line.id().into(), axis.id().into()],
        }
    }

    fn from_args(variant: LineVariant, args: &[Arg]) -> Result<Self, SignatureError> {
        let mut r = ArgReader::new(variant.name(), args);
        let built = match variant {
            LineVariant::TwoPoints => Self::TwoPoints {
                start: r.point()?,
                end: r.point()?,
                kind: r.line_kind()?,
            },
            LineVariant::PointDirection => Self::PointDirection {
                point: r.point()?,
                direction: r.vector()?,
                kind: r.line_kind()?,
            },
            LineVariant::ParallelThroughPoint => Self::ParallelThroughPoint {
                line: r.line()?,
                point: r.point()?,
            },
            LineVariant::PerpendicularThroughPoint => Self::PerpendicularThroughPoint {
                line: r.line()?,
                point: r.point()?,
            },
            LineVariant::PerpendicularBisector => Self::PerpendicularBisector {
                a: r.point()?,
                b: r.point()?,
            },
            LineVariant::AngleBisector => Self::AngleBisector { angle: r.angle()? },
            LineVariant::TangentFromPoint => Self::TangentFromPoint {
                circle: r.circle()?,
                point: r.point()?,
                index: r.index()?,
            },
            LineVariant::ParallelOffset => Self::ParallelOffset {
                line: r.line()?,
                distance: r.scalar()?,
            },
            LineVariant::Translation => Self::Translation {
                line: r.line()?,
                vector: r.vector()?,
            },
            LineVariant::AxisReflection => Self::AxisReflection {
                line: r.line()?,
                axis: r.line()?,
            },
        };
        r.finish()?;
        Ok(built)
    }

    fn compute(&self, ctx: &ComputeContext<'_>) -> GeometryResult<Outputs> {
        let tol = ctx.tolerance();
        let outputs = match *self {
            Self::TwoPoints { start, end, kind } => LineOutputs::new(ctx.point(start)?, ctx.point(end)?, kind, tol)?,
            Self::PointDirection { point, direction, kind } => {
                LineOutputs::through(ctx.point(point)?, ctx.vector(direction)?.components, kind, tol)?
            }
            Self::ParallelThroughPoint { line, point } => {
                let l = ctx.line(line)?;
                LineOutputs::through(ctx.point(point)?, l.direction, LineKind::InfiniteLine, tol)?
            }
            Self::PerpendicularThroughPoint { line, point } => {
                let l = ctx.line(line)?;
                LineOutputs::through(ctx.point(point)?, perpendicular_ccw(&l.direction), LineKind::InfiniteLine, tol)?
            }
            Self::PerpendicularBisector { a, b } => {
                let pa = ctx.point(a)?;
                let pb = ctx.point(b)?;
                let normal = perpendicular_ccw(&unit_vector(&(pb - pa), tol)?);
                LineOutputs::through(midpoint(&pa, &pb), normal, LineKind::InfiniteLine, tol)?
            }
            Self::AngleBisector { angle } => {
                let a = ctx.angle(angle)?;
                let through = rotate_about(&a.start, &a.vertex, a.angle / 2.0);
                LineOutputs::new(a.vertex, through, LineKind::Ray, tol)?
            }
            Self::TangentFromPoint { circle, point, index } => {
                let c = ctx.circle(circle)?;
                let p = ctx.point(point)?;
                let touch = select_solution(&tangent_points(&p, &c.center, c.radius, tol)?, index)?;
                if tol.close_points(&touch, &p) {
                    // Point on the circle: tangent is normal to the radius
                    let normal = perpendicular_ccw(&unit_vector(&(p - c.center), tol)?);
                    LineOutputs::through(p, normal, LineKind::InfiniteLine, tol)?
                } else {
                    LineOutputs::new(p, touch, LineKind::InfiniteLine, tol)?
                }
            }
            Self::ParallelOffset { line, distance } => {
                let l = ctx.line(line)?;
                let shift = perpendicular_ccw(&l.direction) * distance;
                LineOutputs::new(l.start + shift, l.end + shift, l.kind, tol)?
            }
            Self::Translation { line, vector } => {
                let l = ctx.line(line)?;
                let shift = ctx.vector(vector)?.components;
                LineOutputs::new(l.start + shift, l.end + shift, l.kind, tol)?
            }
            Self::AxisReflection { line, axis } => {
                let l = ctx.line(line)?;
                let m = ctx.line(axis)?;
                let start = reflect_across_line(&l.start, &m.start, &m.end, tol)?;
                let end = reflect_across_line(&l.end, &m.start, &m.end, tol)?;
                LineOutputs::new(start, end, l.kind, tol)?
            }
        };
        Ok(Outputs::Line(outputs))
    }
}

// =============================================================================
// Graph factories
// =============================================================================

impl Graph {
    fn insert_line(&mut self, construction: LineConstruction) -> ConstructResult<LineId> {
        self.insert(Construction::Line(construction), None).map(LineId)
    }

    pub fn line_through(&mut self, start: PointId, end: PointId, kind: LineKind) -> ConstructResult<LineId> {
        self.insert_line(LineConstruction::TwoPoints { start, end, kind })
    }

    pub fn segment(&mut self, start: PointId, end: PointId) -> ConstructResult<LineId> {
        self.line_through(start, end, LineKind::Segment)
    }

    pub fn ray(&mut self, start: PointId, through: PointId) -> ConstructResult<LineId> {
        self.line_through(start, through, LineKind::Ray)
    }

    pub fn infinite_line(&mut self, a: PointId, b: PointId) -> ConstructResult<LineId> {
        self.line_through(a, b, LineKind::InfiniteLine)
    }

    pub fn line_along(&mut self, point: PointId, direction: VectorId, kind: LineKind) -> ConstructResult<LineId> {
        self.insert_line(LineConstruction::PointDirection { point, direction, kind })
    }

    pub fn parallel_through(&mut self, line: LineId, point: PointId) -> ConstructResult<LineId> {
        self.insert_line(LineConstruction::ParallelThroughPoint { line, point })
    }

    pub fn perpendicular_through(&mut self, line: LineId, point: PointId) -> ConstructResult<LineId> {
        self.insert_line(LineConstruction::PerpendicularThroughPoint { line, point })
    }

    pub fn perpendicular_bisector(&mut self, a: PointId, b: PointId) -> ConstructResult<LineId> {
        self.insert_line(LineConstruction::PerpendicularBisector { a, b })
    }

    pub fn angle_bisector(&mut self, angle: AngleId) -> ConstructResult<LineId> {
        self.insert_line(LineConstruction::AngleBisector { angle })
    }

    pub fn tangent_from_point(&mut self, circle: CircleId, point: PointId, index: usize) -> ConstructResult<LineId> {
        self.insert_line(LineConstruction::TangentFromPoint { circle, point, index })
    }

    pub fn offset_line(&mut self, line: LineId, distance: f64) -> ConstructResult<LineId> {
        self.insert_line(LineConstruction::ParallelOffset { line, distance })
    }

    pub fn translate_line(&mut self, line: LineId, vector: VectorId) -> ConstructResult<LineId> {
        self.insert_line(LineConstruction::Translation { line, vector })
    }

    pub fn reflect_line(&mut self, line: LineId, axis: LineId) -> ConstructResult<LineId> {
        self.insert_line(LineConstruction::AxisReflection { line, axis })
    }

    pub fn line_outputs(&self, id: LineId) -> GraphResult<&LineOutputs> {
        self.typed_outputs(id.0, Outputs::as_line)
    }

    pub fn length(&self, id: LineId) -> GraphResult<f64> {
        Ok(self.line_outputs(id)?.length)
    }
}
