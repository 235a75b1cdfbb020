//! Construction arguments and per-variant signature checking.

use super::components::{PairPredicate, Predicate};
use crate::geometry::{LineKind, Point2};
use crate::graph::{AngleId, CircleId, ComponentsId, EntityId, EntityKind, LineId, PointId, VectorId};
use std::fmt;
use thiserror::Error;

/// One positional argument of a construction.
#[derive(Debug, Clone)]
pub enum Arg {
    Entity(EntityId),
    Scalar(f64),
    Coord(Point2),
    /// Which of two solutions to pick (0 or 1).
    Index(usize),
    Flag(bool),
    LineKind(LineKind),
    Predicate(Predicate),
    PairPredicate(PairPredicate),
}

impl Arg {
    fn shape_name(&self) -> &'static str {
        match self {
            Arg::Entity(_) => "entity",
            Arg::Scalar(_) => "scalar",
            Arg::Coord(_) => "coordinate",
            Arg::Index(_) => "solution index",
            Arg::Flag(_) => "flag",
            Arg::LineKind(_) => "line kind",
            Arg::Predicate(_) => "predicate",
            Arg::PairPredicate(_) => "pair predicate",
        }
    }
}

impl From<EntityId> for Arg {
    fn from(id: EntityId) -> Self {
        Arg::Entity(id)
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Scalar(value)
    }
}

impl From<Point2> for Arg {
    fn from(p: Point2) -> Self {
        Arg::Coord(p)
    }
}

impl From<bool> for Arg {
    fn from(flag: bool) -> Self {
        Arg::Flag(flag)
    }
}

impl From<LineKind> for Arg {
    fn from(kind: LineKind) -> Self {
        Arg::LineKind(kind)
    }
}

/// What a signature position accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Entity(EntityKind),
    AnyEntity,
    Scalar,
    Coord,
    SolutionIndex,
    Flag,
    LineKind,
    Predicate,
    PairPredicate,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKind::Entity(kind) => write!(f, "{}", kind),
            ArgKind::AnyEntity => f.write_str("entity"),
            ArgKind::Scalar => f.write_str("scalar"),
            ArgKind::Coord => f.write_str("coordinate"),
            ArgKind::SolutionIndex => f.write_str("solution index"),
            ArgKind::Flag => f.write_str("flag"),
            ArgKind::LineKind => f.write_str("line kind"),
            ArgKind::Predicate => f.write_str("predicate"),
            ArgKind::PairPredicate => f.write_str("pair predicate"),
        }
    }
}

pub(crate) const POINT: ArgKind = ArgKind::Entity(EntityKind::Point);
pub(crate) const LINE: ArgKind = ArgKind::Entity(EntityKind::Line);
pub(crate) const CIRCLE: ArgKind = ArgKind::Entity(EntityKind::Circle);
pub(crate) const ANGLE: ArgKind = ArgKind::Entity(EntityKind::Angle);
pub(crate) const VECTOR: ArgKind = ArgKind::Entity(EntityKind::Vector);
pub(crate) const COMPONENTS: ArgKind = ArgKind::Entity(EntityKind::Components);
pub(crate) const ANY: ArgKind = ArgKind::AnyEntity;
pub(crate) const SCALAR: ArgKind = ArgKind::Scalar;
pub(crate) const COORD: ArgKind = ArgKind::Coord;
pub(crate) const INDEX: ArgKind = ArgKind::SolutionIndex;
pub(crate) const FLAG: ArgKind = ArgKind::Flag;
pub(crate) const LINE_KIND: ArgKind = ArgKind::LineKind;
pub(crate) const PREDICATE: ArgKind = ArgKind::Predicate;
pub(crate) const PAIR_PREDICATE: ArgKind = ArgKind::PairPredicate;

/// Positional argument table of a construction variant. `variadic`, when
/// set, accepts any number of further arguments of that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub fixed: &'static [ArgKind],
    pub variadic: Option<ArgKind>,
}

impl Signature {
    pub const fn fixed(fixed: &'static [ArgKind]) -> Self {
        Self { fixed, variadic: None }
    }

    pub const fn variadic(fixed: &'static [ArgKind], rest: ArgKind) -> Self {
        Self {
            fixed,
            variadic: Some(rest),
        }
    }

    pub fn kind_at(&self, position: usize) -> Option<ArgKind> {
        self.fixed.get(position).copied().or(self.variadic)
    }

    pub fn accepts_len(&self, len: usize) -> bool {
        match self.variadic {
            Some(_) => len >= self.fixed.len(),
            None => len == self.fixed.len(),
        }
    }

    fn describe_arity(&self) -> String {
        match self.variadic {
            Some(_) => format!("at least {}", self.fixed.len()),
            None => self.fixed.len().to_string(),
        }
    }
}

/// Rejection of a construction or mutation request. The entity is never
/// created (or never mutated) when one of these is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SignatureError {
    #[error("{variant}: expected {expected} argument(s), got {got}")]
    Arity {
        variant: &'static str,
        expected: String,
        got: usize,
    },

    #[error("{variant}: argument {position} should be a {expected}, got a {got}")]
    ArgType {
        variant: &'static str,
        position: usize,
        expected: ArgKind,
        got: String,
    },

    #[error("{variant}: argument {position} refers to unknown entity {id}")]
    UnknownEntity {
        variant: &'static str,
        position: usize,
        id: EntityId,
    },

    #[error("{variant}: argument {position} is not finite")]
    NonFinite { variant: &'static str, position: usize },

    #[error("{variant}: argument {position}: solution index {index} must be 0 or 1")]
    IndexOutOfRange {
        variant: &'static str,
        position: usize,
        index: usize,
    },

    #[error("Unknown entity {0}")]
    Unknown(EntityId),

    #[error("Entity {id} is built by {variant}, not a free value")]
    NotFree { id: EntityId, variant: &'static str },

    #[error("Entity {id} holds a free {expected}, got a value of another kind")]
    FreeValueKind { id: EntityId, expected: EntityKind },

    #[error("Free value for {id} is not finite")]
    NonFiniteValue { id: EntityId },
}

/// Check `args` against `signature`: arity, per-position kind, liveness and
/// kind of referenced entities, finiteness of raw numbers.
pub fn check_signature(
    variant: &'static str,
    signature: &Signature,
    args: &[Arg],
    kind_of: impl Fn(EntityId) -> Option<EntityKind>,
) -> Result<(), SignatureError> {
    if !signature.accepts_len(args.len()) {
        return Err(SignatureError::Arity {
            variant,
            expected: signature.describe_arity(),
            got: args.len(),
        });
    }

    for (position, arg) in args.iter().enumerate() {
        let expected = signature.kind_at(position).ok_or_else(|| SignatureError::Arity {
            variant,
            expected: signature.describe_arity(),
            got: args.len(),
        })?;
        let mismatch = |got: String| SignatureError::ArgType {
            variant,
            position,
            expected,
            got,
        };

        match (expected, arg) {
            (ArgKind::Entity(_) | ArgKind::AnyEntity, Arg::Entity(id)) => {
                let actual = kind_of(*id).ok_or(SignatureError::UnknownEntity { variant, position, id: *id })?;
                if let ArgKind::Entity(kind) = expected {
                    if kind != actual {
                        return Err(mismatch(actual.to_string()));
                    }
                }
            }
            (ArgKind::Scalar, Arg::Scalar(value)) => {
                if !value.is_finite() {
                    return Err(SignatureError::NonFinite { variant, position });
                }
            }
            (ArgKind::Coord, Arg::Coord(p)) => {
                if !(p.x.is_finite() && p.y.is_finite()) {
                    return Err(SignatureError::NonFinite { variant, position });
                }
            }
            (ArgKind::SolutionIndex, Arg::Index(index)) => {
                if *index > 1 {
                    return Err(SignatureError::IndexOutOfRange { variant, position, index: *index });
                }
            }
            (ArgKind::Flag, Arg::Flag(_))
            | (ArgKind::LineKind, Arg::LineKind(_))
            | (ArgKind::Predicate, Arg::Predicate(_))
            | (ArgKind::PairPredicate, Arg::PairPredicate(_)) => {}
            (_, other) => return Err(mismatch(other.shape_name().to_string())),
        }
    }
    Ok(())
}

/// Sequential typed reader over an argument list, used to rebuild a typed
/// construction from the dynamic form. Entity kinds are trusted here; they
/// are verified by [`check_signature`] against the live graph.
pub(crate) struct ArgReader<'a> {
    variant: &'static str,
    args: &'a [Arg],
    position: usize,
}

impl<'a> ArgReader<'a> {
    pub(crate) fn new(variant: &'static str, args: &'a [Arg]) -> Self {
        Self {
            variant,
            args,
            position: 0,
        }
    }

    fn next(&mut self) -> Result<&'a Arg, SignatureError> {
        let arg = self.args.get(self.position).ok_or_else(|| SignatureError::Arity {
            variant: self.variant,
            expected: format!("at least {}", self.position + 1),
            got: self.args.len(),
        })?;
        self.position += 1;
        Ok(arg)
    }

    fn mismatch(&self, expected: ArgKind, arg: &Arg) -> SignatureError {
        SignatureError::ArgType {
            variant: self.variant,
            position: self.position - 1,
            expected,
            got: arg.shape_name().to_string(),
        }
    }

    fn entity(&mut self, expected: ArgKind) -> Result<EntityId, SignatureError> {
        match self.next()? {
            Arg::Entity(id) => Ok(*id),
            other => Err(self.mismatch(expected, other)),
        }
    }

    pub(crate) fn point(&mut self) -> Result<PointId, SignatureError> {
        self.entity(POINT).map(PointId)
    }

    pub(crate) fn line(&mut self) -> Result<LineId, SignatureError> {
        self.entity(LINE).map(LineId)
    }

    pub(crate) fn circle(&mut self) -> Result<CircleId, SignatureError> {
        self.entity(CIRCLE).map(CircleId)
    }

    pub(crate) fn angle(&mut self) -> Result<AngleId, SignatureError> {
        self.entity(ANGLE).map(AngleId)
    }

    pub(crate) fn vector(&mut self) -> Result<VectorId, SignatureError> {
        self.entity(VECTOR).map(VectorId)
    }

    pub(crate) fn components(&mut self) -> Result<ComponentsId, SignatureError> {
        self.entity(COMPONENTS).map(ComponentsId)
    }

    /// Every remaining argument, each of which must be an entity.
    pub(crate) fn rest_entities(&mut self) -> Result<Vec<EntityId>, SignatureError> {
        let mut ids = Vec::new();
        while self.position < self.args.len() {
            ids.push(self.entity(ArgKind::AnyEntity)?);
        }
        Ok(ids)
    }

    pub(crate) fn scalar(&mut self) -> Result<f64, SignatureError> {
        match self.next()? {
            Arg::Scalar(v) => Ok(*v),
            other => Err(self.mismatch(ArgKind::Scalar, other)),
        }
    }

    pub(crate) fn coord(&mut self) -> Result<Point2, SignatureError> {
        match self.next()? {
            Arg::Coord(p) => Ok(*p),
            other => Err(self.mismatch(ArgKind::Coord, other)),
        }
    }

    pub(crate) fn index(&mut self) -> Result<usize, SignatureError> {
        match self.next()? {
            Arg::Index(i) => Ok(*i),
            other => Err(self.mismatch(ArgKind::SolutionIndex, other)),
        }
    }

    pub(crate) fn flag(&mut self) -> Result<bool, SignatureError> {
        match self.next()? {
            Arg::Flag(b) => Ok(*b),
            other => Err(self.mismatch(ArgKind::Flag, other)),
        }
    }

    pub(crate) fn line_kind(&mut self) -> Result<LineKind, SignatureError> {
        match self.next()? {
            Arg::LineKind(k) => Ok(*k),
            other => Err(self.mismatch(ArgKind::LineKind, other)),
        }
    }

    pub(crate) fn predicate(&mut self) -> Result<Predicate, SignatureError> {
        match self.next()? {
            Arg::Predicate(p) => Ok(p.clone()),
            other => Err(self.mismatch(ArgKind::Predicate, other)),
        }
    }

    pub(crate) fn pair_predicate(&mut self) -> Result<PairPredicate, SignatureError> {
        match self.next()? {
            Arg::PairPredicate(p) => Ok(p.clone()),
            other => Err(self.mismatch(ArgKind::PairPredicate, other)),
        }
    }

    /// Fail if arguments are left over.
    pub(crate) fn finish(self) -> Result<(), SignatureError> {
        if self.position != self.args.len() {
            return Err(SignatureError::Arity {
                variant: self.variant,
                expected: self.position.to_string(),
                got: self.args.len(),
            });
        }
        Ok(())
    }
}
