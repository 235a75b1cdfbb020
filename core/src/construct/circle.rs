//! Circle constructions.

use super::signature::{ArgReader, CIRCLE, LINE, POINT, SCALAR, VECTOR};
use super::{Adapter, Arg, ComputeContext, ConstructResult, Construction, Outputs, Signature, SignatureError, VariantTag};
use crate::geometry::{
    circumcenter, incenter, inradius, inverse_circle, midpoint, reflect_across_line, GeometryError, GeometryResult,
    Point2,
};
use crate::graph::{CircleId, EntityKind, Graph, GraphResult, LineId, PointId, VectorId};
use crate::tolerance::Tolerance;
use serde::Serialize;
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CircleOutputs {
    pub center: Point2,
    pub radius: f64,
    pub area: f64,
    pub circumference: f64,
}

impl CircleOutputs {
    /// Fails on a zero, negative or non-finite radius.
    pub fn new(center: Point2, radius: f64, tol: &Tolerance) -> GeometryResult<Self> {
        if !radius.is_finite() || radius <= 0.0 || tol.is_zero(radius) {
            return Err(GeometryError::Degenerate("non-positive radius"));
        }
        Ok(Self {
            center,
            radius,
            area: PI * radius * radius,
            circumference: 2.0 * PI * radius,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CircleVariant {
    CenterRadius,
    CenterThroughPoint,
    ThroughThreePoints,
    Incircle,
    Diameter,
    Inversion,
    Translation,
    AxisReflection,
}

impl VariantTag for CircleVariant {
    const KIND: EntityKind = EntityKind::Circle;

    fn name(self) -> &'static str {
        match self {
            Self::CenterRadius => "CenterRadius",
            Self::CenterThroughPoint => "CenterThroughPoint",
            Self::ThroughThreePoints => "ThroughThreePoints",
            Self::Incircle => "Incircle",
            Self::Diameter => "Diameter",
            Self::Inversion => "Inversion",
            Self::Translation => "Translation",
            Self::AxisReflection => "AxisReflection",
        }
    }

    fn signature(self) -> Signature {
        match self {
            Self::CenterRadius => Signature::fixed(&[POINT, SCALAR]),
            Self::CenterThroughPoint | Self::Diameter => Signature::fixed(&[POINT, POINT]),
            Self::ThroughThreePoints | Self::Incircle => Signature::fixed(&[POINT, POINT, POINT]),
            Self::Inversion => Signature::fixed(&[CIRCLE, CIRCLE]),
            Self::Translation => Signature::fixed(&[CIRCLE, VECTOR]),
            Self::AxisReflection => Signature::fixed(&[CIRCLE, LINE]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CircleConstruction {
    CenterRadius { center: PointId, radius: f64 },
    CenterThroughPoint { center: PointId, through: PointId },
    /// Circumcircle.
    ThroughThreePoints { a: PointId, b: PointId, c: PointId },
    Incircle { a: PointId, b: PointId, c: PointId },
    Diameter { a: PointId, b: PointId },
    /// Image of `circle` under inversion in `base`.
    Inversion { circle: CircleId, base: CircleId },
    Translation { circle: CircleId, vector: VectorId },
    AxisReflection { circle: CircleId, axis: LineId },
}

impl Adapter for CircleConstruction {
    type Variant = CircleVariant;

    fn variant(&self) -> CircleVariant {
        match self {
            Self::CenterRadius { .. } => CircleVariant::CenterRadius,
            Self::CenterThroughPoint { .. } => CircleVariant::CenterThroughPoint,
            Self::ThroughThreePoints { .. } => CircleVariant::ThroughThreePoints,
            Self::Incircle { .. } => CircleVariant::Incircle,
            Self::Diameter { .. } => CircleVariant::Diameter,
            Self::Inversion { .. } => CircleVariant::Inversion,
            Self::Translation { .. } => CircleVariant::Translation,
            Self::AxisReflection { .. } => CircleVariant::AxisReflection,
        }
    }

    fn args(&self) -> Vec<Arg> {
        match *self {
            Self::CenterRadius { center, radius } => vec![center.id().into(), radius.into()],
            Self::CenterThroughPoint { center, through } => vec![center.id().into(), through.id().into()],
            Self::ThroughThreePoints { a, b, c } | Self::Incircle { a, b, c } => {
                vec![a.id().into(), b.id().into(), c.id().into()]
            }
            Self::Diameter { a, b } => vec![a.id().into(), b.id().into()],
            Self::Inversion { circle, base } => vec![circle.id().into(), base.id().into()],
            Self::Translation { circle, vector } => vec![circle.id().into(), vector.id().into()],
            Self::AxisReflection { circle, axis } => vec![circle.id().into(), axis.id().into()],
        }
    }

    fn from_args(variant: CircleVariant, args: &[Arg]) -> Result<Self, SignatureError> {
        let mut r = ArgReader::new(variant.name(), args);
        let built = match variant {
            CircleVariant::CenterRadius => Self::CenterRadius {
                center: r.point()?,
                radius: r.scalar()?,
            },
            CircleVariant::CenterThroughPoint => Self::CenterThroughPoint {
                center: r.point()?,
                through: r.point()?,
            },
            CircleVariant::ThroughThreePoints => Self::ThroughThreePoints {
                a: r.point()?,
                b: r.point()?,
                c: r.point()?,
            },
            CircleVariant::Incircle => Self::Incircle {
                a: r.point()?,
                b: r.point()?,
                c: r.point()?,
            },
            CircleVariant::Diameter => Self::Diameter {
                a: r.point()?,
                b: r.point()?,
            },
            CircleVariant::Inversion => Self::Inversion {
                circle: r.circle()?,
                base: r.circle()?,
            },
            CircleVariant::Translation => Self::Translation {
                circle: r.circle()?,
                vector: r.vector()?,
            },
            CircleVariant::AxisReflection => Self::AxisReflection {
                circle: r.circle()?,
                axis: r.line()?,
            },
        };
        r.finish()?;
        Ok(built)
    }

    fn compute(&self, ctx: &ComputeContext<'_>) -> GeometryResult<Outputs> {
        let tol = ctx.tolerance();
        let (center, radius) = match *self {
            Self::CenterRadius { center, radius } => (ctx.point(center)?, radius),
            Self::CenterThroughPoint { center, through } => {
                let c = ctx.point(center)?;
                (c, (ctx.point(through)? - c).norm())
            }
            Self::ThroughThreePoints { a, b, c } => {
                let (pa, pb, pc) = (ctx.point(a)?, ctx.point(b)?, ctx.point(c)?);
                let o = circumcenter(&pa, &pb, &pc, tol)?;
                (o, (pa - o).norm())
            }
            Self::Incircle { a, b, c } => {
                let (pa, pb, pc) = (ctx.point(a)?, ctx.point(b)?, ctx.point(c)?);
                (incenter(&pa, &pb, &pc, tol)?, inradius(&pa, &pb, &pc, tol)?)
            }
            Self::Diameter { a, b } => {
                let (pa, pb) = (ctx.point(a)?, ctx.point(b)?);
                (midpoint(&pa, &pb), (pb - pa).norm() / 2.0)
            }
            Self::Inversion { circle, base } => {
                let c = ctx.circle(circle)?;
                let k = ctx.circle(base)?;
                inverse_circle(&c.center, c.radius, &k.center, k.radius, tol)?
            }
            Self::Translation { circle, vector } => {
                let c = ctx.circle(circle)?;
                (c.center + ctx.vector(vector)?.components, c.radius)
            }
            Self::AxisReflection { circle, axis } => {
                let c = ctx.circle(circle)?;
                let m = ctx.line(axis)?;
                (reflect_across_line(&c.center, &m.start, &m.end, tol)?, c.radius)
            }
        };
        Ok(Outputs::Circle(CircleOutputs::new(center, radius, tol)?))
    }
}

// =============================================================================
// Graph factories
// =============================================================================

impl Graph {
    fn insert_circle(&mut self, construction: CircleConstruction) -> ConstructResult<CircleId> {
        self.insert(Construction::Circle(construction), None).map(CircleId)
    }

    pub fn circle(&mut self, center: PointId, radius: f64) -> ConstructResult<CircleId> {
        self.insert_circle(CircleConstruction::CenterRadius { center, radius })
    }

    pub fn circle_through(&mut self, center: PointId, through: PointId) -> ConstructResult<CircleId> {
        self.insert_circle(CircleConstruction::CenterThroughPoint { center, through })
    }

    pub fn circumcircle(&mut self, a: PointId, b: PointId, c: PointId) -> ConstructResult<CircleId> {
        self.insert_circle(CircleConstruction::ThroughThreePoints { a, b, c })
    }

    pub fn incircle(&mut self, a: PointId, b: PointId, c: PointId) -> ConstructResult<CircleId> {
        self.insert_circle(CircleConstruction::Incircle { a, b, c })
    }

    pub fn circle_on_diameter(&mut self, a: PointId, b: PointId) -> ConstructResult<CircleId> {
        self.insert_circle(CircleConstruction::Diameter { a, b })
    }

    pub fn invert_circle(&mut self, circle: CircleId, base: CircleId) -> ConstructResult<CircleId> {
        self.insert_circle(CircleConstruction::Inversion { circle, base })
    }

    pub fn translate_circle(&mut self, circle: CircleId, vector: VectorId) -> ConstructResult<CircleId> {
        self.insert_circle(CircleConstruction::Translation { circle, vector })
    }

    pub fn reflect_circle(&mut self, circle: CircleId, axis: LineId) -> ConstructResult<CircleId> {
        self.insert_circle(CircleConstruction::AxisReflection { circle, axis })
    }

    pub fn circle_outputs(&self, id: CircleId) -> GraphResult<&CircleOutputs> {
        self.typed_outputs(id.0, Outputs::as_circle)
    }

    pub fn radius(&self, id: CircleId) -> GraphResult<f64> {
        Ok(self.circle_outputs(id)?.radius)
    }
}
