//! Pure 2D geometry algorithms.
//!
//! Nothing in here touches the entity graph. Every function takes the
//! [`Tolerance`] it should classify degenerate cases with and reports failures
//! as [`GeometryError`] values.

use crate::tolerance::Tolerance;
use nalgebra as na;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Point2 = na::Point2<f64>;
pub type Vector2 = na::Vector2<f64>;

/// Failure of a geometric computation. These are recorded on entities, never
/// raised to the caller of a mutation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GeometryError {
    #[error("No intersection")]
    NoIntersection,

    #[error("Infinitely many intersections")]
    InfiniteIntersections,

    #[error("Degenerate input: {0}")]
    Degenerate(&'static str),

    #[error("Singular system: {0}")]
    Singular(&'static str),

    #[error("Input has no computed value")]
    MissingInput,
}

pub type GeometryResult<T> = Result<T, GeometryError>;

/// How far a line extends beyond its two defining points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LineKind {
    /// Parameter range `[0, 1]`.
    #[default]
    Segment,
    /// Parameter range `[0, ∞)`.
    Ray,
    /// Parameter range `(-∞, ∞)`.
    InfiniteLine,
}

impl LineKind {
    /// Parameter range of `start + t * (end - start)`.
    pub fn range(self) -> (f64, f64) {
        match self {
            LineKind::Segment => (0.0, 1.0),
            LineKind::Ray => (0.0, f64::INFINITY),
            LineKind::InfiniteLine => (f64::NEG_INFINITY, f64::INFINITY),
        }
    }

    /// Whether parameter `t` is on the line, with `epsilon` slack at finite
    /// ends. `length` is the distance covered by one unit of `t`.
    pub fn contains(self, t: f64, length: f64, tol: &Tolerance) -> bool {
        let (lo, hi) = self.range();
        tol.within(t, lo, hi, length)
    }

    pub fn is_bounded(self) -> bool {
        matches!(self, LineKind::Segment)
    }
}

pub mod angle;
pub mod circle;
pub mod intersection;
pub mod triangle;
pub mod utils_2d;

pub use angle::*;
pub use circle::*;
pub use intersection::*;
pub use triangle::*;
pub use utils_2d::*;
