//! Point constructions.

use super::signature::{ArgReader, CIRCLE, COORD, FLAG, INDEX, LINE, POINT, SCALAR, VECTOR};
use super::{Adapter, Arg, ComputeContext, ConstructResult, Construction, Outputs, Signature, SignatureError, VariantTag};
use crate::geometry::{
    centroid, circumcenter, foot_of_perpendicular, incenter, intersection_circle_circle, intersection_line_circle,
    intersection_line_line, inversion_point, lerp, midpoint, orthocenter, reflect_across_line, reflect_across_point,
    rotate_about, select_solution, GeometryError, GeometryResult, Point2, Vector2,
};
use crate::graph::{CircleId, EntityKind, FreeValue, Graph, GraphResult, LineId, PointId, UpdateReport, VectorId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointOutputs {
    pub coord: Point2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointVariant {
    Free,
    ConstraintOnLine,
    ConstraintOnCircle,
    MidpointOfTwoPoints,
    MidpointOfSegment,
    ExtensionByFactor,
    AxisReflection,
    PointReflection,
    FootOfPerpendicular,
    ParallelOffset,
    CircleInversion,
    LineLineIntersection,
    LineCircleIntersection,
    CircleCircleIntersection,
    Translation,
    Centroid,
    Circumcenter,
    Incenter,
    Orthocenter,
    CircleCenter,
    RotationAboutPoint,
}

impl VariantTag for PointVariant {
    const KIND: EntityKind = EntityKind::Point;

    fn name(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::ConstraintOnLine => "ConstraintOnLine",
            Self::ConstraintOnCircle => "ConstraintOnCircle",
            Self::MidpointOfTwoPoints => "MidpointOfTwoPoints",
            Self::MidpointOfSegment => "MidpointOfSegment",
            Self::ExtensionByFactor => "ExtensionByFactor",
            Self::AxisReflection => "AxisReflection",
            Self::PointReflection => "PointReflection",
            Self::FootOfPerpendicular => "FootOfPerpendicular",
            Self::ParallelOffset => "ParallelOffset",
            Self::CircleInversion => "CircleInversion",
            Self::LineLineIntersection => "LineLineIntersection",
            Self::LineCircleIntersection => "LineCircleIntersection",
            Self::CircleCircleIntersection => "CircleCircleIntersection",
            Self::Translation => "Translation",
            Self::Centroid => "Centroid",
            Self::Circumcenter => "Circumcenter",
            Self::Incenter => "Incenter",
            Self::Orthocenter => "Orthocenter",
            Self::CircleCenter => "CircleCenter",
            Self::RotationAboutPoint => "RotationAboutPoint",
        }
    }

    fn signature(self) -> Signature {
        match self {
            Self::Free => Signature::fixed(&[COORD]),
            Self::ConstraintOnLine => Signature::fixed(&[LINE, SCALAR]),
            Self::ConstraintOnCircle => Signature::fixed(&[CIRCLE, SCALAR]),
            Self::MidpointOfTwoPoints | Self::PointReflection => Signature::fixed(&[POINT, POINT]),
            Self::MidpointOfSegment => Signature::fixed(&[LINE]),
            Self::ExtensionByFactor => Signature::fixed(&[POINT, POINT, SCALAR]),
            Self::AxisReflection | Self::FootOfPerpendicular => Signature::fixed(&[POINT, LINE]),
            Self::ParallelOffset => Signature::fixed(&[POINT, LINE, SCALAR]),
            Self::CircleInversion => Signature::fixed(&[POINT, CIRCLE]),
            Self::LineLineIntersection => Signature::fixed(&[LINE, LINE, FLAG]),
            Self::LineCircleIntersection => Signature::fixed(&[LINE, CIRCLE, INDEX]),
            Self::CircleCircleIntersection => Signature::fixed(&[CIRCLE, CIRCLE, INDEX]),
            Self::Translation => Signature::fixed(&[POINT, VECTOR]),
            Self::Centroid | Self::Circumcenter | Self::Incenter | Self::Orthocenter => {
                Signature::fixed(&[POINT, POINT, POINT])
            }
            Self::CircleCenter => Signature::fixed(&[CIRCLE]),
            Self::RotationAboutPoint => Signature::fixed(&[POINT, POINT, SCALAR]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointConstruction {
    Free { coord: Point2 },
    /// `start + t * (end - start)`; `t` must lie in the line's range.
    ConstraintOnLine { line: LineId, t: f64 },
    /// Polar angle `angle` (radians) on the circle.
    ConstraintOnCircle { circle: CircleId, angle: f64 },
    MidpointOfTwoPoints { a: PointId, b: PointId },
    MidpointOfSegment { segment: LineId },
    /// `from + factor * (to - from)`.
    ExtensionByFactor { from: PointId, to: PointId, factor: f64 },
    AxisReflection { point: PointId, axis: LineId },
    PointReflection { point: PointId, center: PointId },
    FootOfPerpendicular { point: PointId, line: LineId },
    /// `point` moved `distance` along the unit direction of `line`.
    ParallelOffset { point: PointId, line: LineId, distance: f64 },
    CircleInversion { point: PointId, circle: CircleId },
    LineLineIntersection { first: LineId, second: LineId, as_infinite: bool },
    LineCircleIntersection { line: LineId, circle: CircleId, index: usize },
    CircleCircleIntersection { first: CircleId, second: CircleId, index: usize },
    Translation { point: PointId, vector: VectorId },
    Centroid { a: PointId, b: PointId, c: PointId },
    Circumcenter { a: PointId, b: PointId, c: PointId },
    Incenter { a: PointId, b: PointId, c: PointId },
    Orthocenter { a: PointId, b: PointId, c: PointId },
    CircleCenter { circle: CircleId },
    /// Counter-clockwise rotation by `angle` radians.
    RotationAboutPoint { point: PointId, center: PointId, angle: f64 },
}

impl Adapter for PointConstruction {
    type Variant = PointVariant;

    fn variant(&self) -> PointVariant {
        match self {
            Self::Free { .. } => PointVariant::Free,
            Self::ConstraintOnLine { .. } => PointVariant::ConstraintOnLine,
            Self::ConstraintOnCircle { .. } => PointVariant::ConstraintOnCircle,
            Self::MidpointOfTwoPoints { .. } => PointVariant::MidpointOfTwoPoints,
            Self::MidpointOfSegment { .. } => PointVariant::MidpointOfSegment,
            Self::ExtensionByFactor { .. } => PointVariant::ExtensionByFactor,
            Self::AxisReflection { .. } => PointVariant::AxisReflection,
            Self::PointReflection { .. } => PointVariant::PointReflection,
            Self::FootOfPerpendicular { .. } => PointVariant::FootOfPerpendicular,
            Self::ParallelOffset { .. } => PointVariant::ParallelOffset,
            Self::CircleInversion { .. } => PointVariant::CircleInversion,
            Self::LineLineIntersection { .. } => PointVariant::LineLineIntersection,
            Self::LineCircleIntersection { .. } => PointVariant::LineCircleIntersection,
            Self::CircleCircleIntersection { .. } => PointVariant::CircleCircleIntersection,
            Self::Translation { .. } => PointVariant::Translation,
            Self::Centroid { .. } => PointVariant::Centroid,
            Self::Circumcenter { .. } => PointVariant::Circumcenter,
            Self::Incenter { .. } => PointVariant::Incenter,
            Self::Orthocenter { .. } => PointVariant::Orthocenter,
            Self::CircleCenter { .. } => PointVariant::CircleCenter,
            Self::RotationAboutPoint { .. } => PointVariant::RotationAboutPoint,
        }
    }

    fn args(&self) -> Vec<Arg> {
        match *self {
            Self::Free { coord } => vec![coord.into()],
            Self::ConstraintOnLine { line, t } => vec![line.id().into(), t.into()],
            Self::ConstraintOnCircle { circle, angle } => vec![circle.id().into(), angle.into()],
            Self::MidpointOfTwoPoints { a, b } => vec![a.id().into(), b.id().into()],
            Self::MidpointOfSegment { segment } => vec![segment.id().into()],
            Self::ExtensionByFactor { from, to, factor } => vec![from.id().into(), to.id().into(), factor.into()],
            Self::AxisReflection { point, axis } => vec![point.id().into(), axis.id().into()],
            Self::PointReflection { point, center } => vec![point.id().into(), center.id().into()],
            Self::FootOfPerpendicular { point, line } => vec![point.id().into(), line.id().into()],
            Self::ParallelOffset { point, line, distance } => vec![point.id().into(), line.id().into(), distance.into()],
            Self::CircleInversion { point, circle } => vec![point.id().into(), circle.id().into()],
            Self::LineLineIntersection {
                first,
                second,
                as_infinite,
            } => vec![first.id().into(), second.id().into(), as_infinite.into()],
            Self::LineCircleIntersection { line, circle, index } => {
                vec![line.id().into(), circle.id().into(), Arg::Index(index)]
            }
            Self::CircleCircleIntersection { first, second, index } => {
                vec![first.id().into(), second.id().into(), Arg::Index(index)]
            }
            Self::Translation { point, vector } => vec![point.id().into(), vector.id().into()],
            Self::Centroid { a, b, c }
            | Self::Circumcenter { a, b, c }
            | Self::Incenter { a, b, c }
            | Self::Orthocenter { a, b, c } => vec![a.id().into(), b.id().into(), c.id().into()],
            Self::CircleCenter { circle } => vec![circle.id().into()],
            Self::RotationAboutPoint { point, center, angle } => {
                vec![point.id().into(), center.id().into(), angle.into()]
            }
        }
    }

    fn from_args(variant: PointVariant, args: &[Arg]) -> Result<Self, SignatureError> {
        let mut r = ArgReader::new(variant.name(), args);
        let built = match variant {
            PointVariant::Free => Self::Free { coord: r.coord()? },
            PointVariant::ConstraintOnLine => Self::ConstraintOnLine {
                line: r.line()?,
                t: r.scalar()?,
            },
            PointVariant::ConstraintOnCircle => Self::ConstraintOnCircle {
                circle: r.circle()?,
                angle: r.scalar()?,
            },
            PointVariant::MidpointOfTwoPoints => Self::MidpointOfTwoPoints {
                a: r.point()?,
                b: r.point()?,
            },
            PointVariant::MidpointOfSegment => Self::MidpointOfSegment { segment: r.line()? },
            PointVariant::ExtensionByFactor => Self::ExtensionByFactor {
                from: r.point()?,
                to: r.point()?,
                factor: r.scalar()?,
            },
            PointVariant::AxisReflection => Self::AxisReflection {
                point: r.point()?,
                axis: r.line()?,
            },
            PointVariant::PointReflection => Self::PointReflection {
                point: r.point()?,
                center: r.point()?,
            },
            PointVariant::FootOfPerpendicular => Self::FootOfPerpendicular {
                point: r.point()?,
                line: r.line()?,
            },
            PointVariant::ParallelOffset => Self::ParallelOffset {
                point: r.point()?,
                line: r.line()?,
                distance: r.scalar()?,
            },
            PointVariant::CircleInversion => Self::CircleInversion {
                point: r.point()?,
                circle: r.circle()?,
            },
            PointVariant::LineLineIntersection => Self::LineLineIntersection {
                first: r.line()?,
                second: r.line()?,
                as_infinite: r.flag()?,
            },
            PointVariant::LineCircleIntersection => Self::LineCircleIntersection {
                line: r.line()?,
                circle: r.circle()?,
                index: r.index()?,
            },
            PointVariant::CircleCircleIntersection => Self::CircleCircleIntersection {
                first: r.circle()?,
                second: r.circle()?,
                index: r.index()?,
            },
            PointVariant::Translation => Self::Translation {
                point: r.point()?,
                vector: r.vector()?,
            },
            PointVariant::Centroid => Self::Centroid {
                a: r.point()?,
                b: r.point()?,
                c: r.point()?,
            },
            PointVariant::Circumcenter => Self::Circumcenter {
                a: r.point()?,
                b: r.point()?,
                c: r.point()?,
            },
            PointVariant::Incenter => Self::Incenter {
                a: r.point()?,
                b: r.point()?,
                c: r.point()?,
            },
            PointVariant::Orthocenter => Self::Orthocenter {
                a: r.point()?,
                b: r.point()?,
                c: r.point()?,
            },
            PointVariant::CircleCenter => Self::CircleCenter { circle: r.circle()? },
            PointVariant::RotationAboutPoint => Self::RotationAboutPoint {
                point: r.point()?,
                center: r.point()?,
                angle: r.scalar()?,
            },
        };
        r.finish()?;
        Ok(built)
    }

    fn compute(&self, ctx: &ComputeContext<'_>) -> GeometryResult<Outputs> {
        let tol = ctx.tolerance();
        let coord = match *self {
            Self::Free { coord } => coord,
            Self::ConstraintOnLine { line, t } => {
                let l = ctx.line(line)?;
                if !l.kind.contains(t, (l.end - l.start).norm(), tol) {
                    return Err(GeometryError::Degenerate("parameter outside the line"));
                }
                lerp(&l.start, &l.end, t)
            }
            Self::ConstraintOnCircle { circle, angle } => {
                let c = ctx.circle(circle)?;
                c.center + Vector2::new(angle.cos(), angle.sin()) * c.radius
            }
            Self::MidpointOfTwoPoints { a, b } => midpoint(&ctx.point(a)?, &ctx.point(b)?),
            Self::MidpointOfSegment { segment } => {
                let l = ctx.line(segment)?;
                if !l.kind.is_bounded() {
                    return Err(GeometryError::Degenerate("unbounded line has no midpoint"));
                }
                midpoint(&l.start, &l.end)
            }
            Self::ExtensionByFactor { from, to, factor } => lerp(&ctx.point(from)?, &ctx.point(to)?, factor),
            Self::AxisReflection { point, axis } => {
                let l = ctx.line(axis)?;
                reflect_across_line(&ctx.point(point)?, &l.start, &l.end, tol)?
            }
            Self::PointReflection { point, center } => reflect_across_point(&ctx.point(point)?, &ctx.point(center)?),
            Self::FootOfPerpendicular { point, line } => {
                let l = ctx.line(line)?;
                foot_of_perpendicular(&ctx.point(point)?, &l.start, &l.end, tol)?
            }
            Self::ParallelOffset { point, line, distance } => ctx.point(point)? + ctx.line(line)?.direction * distance,
            Self::CircleInversion { point, circle } => {
                let c = ctx.circle(circle)?;
                inversion_point(&ctx.point(point)?, &c.center, c.radius, tol)?
            }
            Self::LineLineIntersection {
                first,
                second,
                as_infinite,
            } => {
                let l1 = ctx.line(first)?;
                let l2 = ctx.line(second)?;
                intersection_line_line(&l1.start, &l1.end, &l2.start, &l2.end, l1.kind, l2.kind, as_infinite, tol)?
            }
            Self::LineCircleIntersection { line, circle, index } => {
                let l = ctx.line(line)?;
                let c = ctx.circle(circle)?;
                let solutions = intersection_line_circle(&l.start, &l.end, l.kind, &c.center, c.radius, tol)?;
                select_solution(&solutions, index)?
            }
            Self::CircleCircleIntersection { first, second, index } => {
                let c1 = ctx.circle(first)?;
                let c2 = ctx.circle(second)?;
                let solutions = intersection_circle_circle(&c1.center, c1.radius, &c2.center, c2.radius, tol)?;
                select_solution(&solutions, index)?
            }
            Self::Translation { point, vector } => ctx.point(point)? + ctx.vector(vector)?.components,
            Self::Centroid { a, b, c } => centroid(&ctx.point(a)?, &ctx.point(b)?, &ctx.point(c)?),
            Self::Circumcenter { a, b, c } => circumcenter(&ctx.point(a)?, &ctx.point(b)?, &ctx.point(c)?, tol)?,
            Self::Incenter { a, b, c } => incenter(&ctx.point(a)?, &ctx.point(b)?, &ctx.point(c)?, tol)?,
            Self::Orthocenter { a, b, c } => orthocenter(&ctx.point(a)?, &ctx.point(b)?, &ctx.point(c)?, tol)?,
            Self::CircleCenter { circle } => ctx.circle(circle)?.center,
            Self::RotationAboutPoint { point, center, angle } => {
                rotate_about(&ctx.point(point)?, &ctx.point(center)?, angle)
            }
        };
        Ok(Outputs::Point(PointOutputs { coord }))
    }

    fn is_free(&self) -> bool {
        matches!(self, Self::Free { .. })
    }
}

// =============================================================================
// Graph factories
// =============================================================================

impl Graph {
    fn insert_point(&mut self, construction: PointConstruction, name: Option<&str>) -> ConstructResult<PointId> {
        self.insert(Construction::Point(construction), name).map(PointId)
    }

    pub fn free_point(&mut self, x: f64, y: f64) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::Free { coord: Point2::new(x, y) }, None)
    }

    pub fn free_point_named(&mut self, name: &str, x: f64, y: f64) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::Free { coord: Point2::new(x, y) }, Some(name))
    }

    pub fn point_on_line(&mut self, line: LineId, t: f64) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::ConstraintOnLine { line, t }, None)
    }

    pub fn point_on_circle(&mut self, circle: CircleId, angle: f64) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::ConstraintOnCircle { circle, angle }, None)
    }

    pub fn midpoint(&mut self, a: PointId, b: PointId) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::MidpointOfTwoPoints { a, b }, None)
    }

    pub fn midpoint_of_segment(&mut self, segment: LineId) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::MidpointOfSegment { segment }, None)
    }

    pub fn extend(&mut self, from: PointId, to: PointId, factor: f64) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::ExtensionByFactor { from, to, factor }, None)
    }

    pub fn reflect_point_across_line(&mut self, point: PointId, axis: LineId) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::AxisReflection { point, axis }, None)
    }

    pub fn reflect_point_across_point(&mut self, point: PointId, center: PointId) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::PointReflection { point, center }, None)
    }

    pub fn foot_of_perpendicular(&mut self, point: PointId, line: LineId) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::FootOfPerpendicular { point, line }, None)
    }

    pub fn offset_point_along(&mut self, point: PointId, line: LineId, distance: f64) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::ParallelOffset { point, line, distance }, None)
    }

    pub fn invert_point(&mut self, point: PointId, circle: CircleId) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::CircleInversion { point, circle }, None)
    }

    pub fn intersect_lines(&mut self, first: LineId, second: LineId, as_infinite: bool) -> ConstructResult<PointId> {
        self.insert_point(
            PointConstruction::LineLineIntersection {
                first,
                second,
                as_infinite,
            },
            None,
        )
    }

    pub fn intersect_line_circle(&mut self, line: LineId, circle: CircleId, index: usize) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::LineCircleIntersection { line, circle, index }, None)
    }

    pub fn intersect_circles(&mut self, first: CircleId, second: CircleId, index: usize) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::CircleCircleIntersection { first, second, index }, None)
    }

    pub fn translate_point(&mut self, point: PointId, vector: VectorId) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::Translation { point, vector }, None)
    }

    pub fn centroid(&mut self, a: PointId, b: PointId, c: PointId) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::Centroid { a, b, c }, None)
    }

    pub fn circumcenter(&mut self, a: PointId, b: PointId, c: PointId) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::Circumcenter { a, b, c }, None)
    }

    pub fn incenter(&mut self, a: PointId, b: PointId, c: PointId) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::Incenter { a, b, c }, None)
    }

    pub fn orthocenter(&mut self, a: PointId, b: PointId, c: PointId) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::Orthocenter { a, b, c }, None)
    }

    pub fn circle_center(&mut self, circle: CircleId) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::CircleCenter { circle }, None)
    }

    pub fn rotate_point(&mut self, point: PointId, center: PointId, angle: f64) -> ConstructResult<PointId> {
        self.insert_point(PointConstruction::RotationAboutPoint { point, center, angle }, None)
    }

    /// Current coordinate of a point. Check [`Graph::is_error`] to know
    /// whether it reflects the latest inputs.
    pub fn coord(&self, id: PointId) -> GraphResult<Point2> {
        Ok(self.typed_outputs(id.0, Outputs::as_point)?.coord)
    }

    /// Move a free point and propagate.
    pub fn set_point(&mut self, id: PointId, x: f64, y: f64) -> ConstructResult<UpdateReport> {
        self.set_free_value(id.0, FreeValue::Point(Point2::new(x, y)))
    }
}
