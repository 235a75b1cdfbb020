//! Numeric tolerance model.
//!
//! Every geometric algorithm and every degeneracy check goes through a
//! [`Tolerance`] value. Graphs carry their own copy (see
//! [`crate::graph::Graph::with_tolerance`]); the process-wide default only
//! seeds new graphs and backs the free [`close`] helpers.

use crate::geometry::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use thiserror::Error;

/// Errors raised by tolerance comparisons and configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ToleranceError {
    #[error("Cannot compare a {left} with a {right}")]
    KindMismatch {
        left: &'static str,
        right: &'static str,
    },

    #[error("Shape mismatch: {left} vs {right} components")]
    ShapeMismatch { left: usize, right: usize },

    #[error("Invalid tolerance parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Invalid tolerance config: {0}")]
    Config(String),
}

/// Absolute/relative comparison tolerances plus the operational epsilon used
/// for parameter-range and degeneracy classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Absolute tolerance.
    pub atol: f64,
    /// Relative tolerance, scaled by the magnitude of the reference operand.
    pub rtol: f64,
    /// Slack applied to parametric range checks (segment/ray membership).
    pub epsilon: f64,
}

impl Tolerance {
    pub const DEFAULT_ATOL: f64 = 1e-9;
    pub const DEFAULT_RTOL: f64 = 1e-9;
    pub const DEFAULT_EPSILON: f64 = 1e-3;

    pub const DEFAULT: Tolerance = Tolerance {
        atol: Self::DEFAULT_ATOL,
        rtol: Self::DEFAULT_RTOL,
        epsilon: Self::DEFAULT_EPSILON,
    };

    /// Build a tolerance, rejecting negative or non-finite parameters.
    pub fn new(atol: f64, rtol: f64, epsilon: f64) -> Result<Self, ToleranceError> {
        let tol = Self { atol, rtol, epsilon };
        tol.validate()?;
        Ok(tol)
    }

    /// Parse a (possibly partial) JSON config, e.g. `{"atol": 1e-6}`.
    pub fn from_json(json: &str) -> Result<Self, ToleranceError> {
        let tol: Tolerance =
            serde_json::from_str(json).map_err(|e| ToleranceError::Config(e.to_string()))?;
        tol.validate()?;
        Ok(tol)
    }

    pub fn validate(&self) -> Result<(), ToleranceError> {
        for (name, value) in [("atol", self.atol), ("rtol", self.rtol), ("epsilon", self.epsilon)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ToleranceError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    /// `|a - b| <= atol + rtol * |b|`.
    ///
    /// NaN is never close to anything; infinities are only close to the
    /// same-signed infinity.
    pub fn close(&self, a: f64, b: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        if a.is_infinite() || b.is_infinite() {
            return a == b;
        }
        (a - b).abs() <= self.atol + self.rtol * b.abs()
    }

    /// Elementwise [`Tolerance::close`]; every component must pass.
    pub fn close_slices(&self, a: &[f64], b: &[f64]) -> Result<bool, ToleranceError> {
        if a.len() != b.len() {
            return Err(ToleranceError::ShapeMismatch {
                left: a.len(),
                right: b.len(),
            });
        }
        Ok(a.iter().zip(b).all(|(x, y)| self.close(*x, *y)))
    }

    /// Compare two dynamically-typed operands.
    pub fn close_values(&self, a: Numeric<'_>, b: Numeric<'_>) -> Result<bool, ToleranceError> {
        match (a, b) {
            (Numeric::Scalar(x), Numeric::Scalar(y)) => Ok(self.close(x, y)),
            (Numeric::Vector(x), Numeric::Vector(y)) => self.close_slices(x, y),
            (left, right) => Err(ToleranceError::KindMismatch {
                left: left.kind_name(),
                right: right.kind_name(),
            }),
        }
    }

    pub fn close_points(&self, a: &Point2, b: &Point2) -> bool {
        self.close(a.x, b.x) && self.close(a.y, b.y)
    }

    pub fn close_vectors(&self, a: &Vector2, b: &Vector2) -> bool {
        self.close(a.x, b.x) && self.close(a.y, b.y)
    }

    #[inline]
    pub fn is_zero(&self, value: f64) -> bool {
        self.close(value, 0.0)
    }

    /// Whether the parameter `t` of a line whose unit step covers `length`
    /// lies in `[lo, hi]`, widened by `epsilon` measured along the line.
    #[inline]
    pub fn within(&self, t: f64, lo: f64, hi: f64, length: f64) -> bool {
        let slack = self.param_slack(length);
        t >= lo - slack && t <= hi + slack
    }

    /// `epsilon` expressed in the parameter space of a line whose unit step
    /// covers `length`.
    #[inline]
    pub fn param_slack(&self, length: f64) -> f64 {
        self.epsilon / length
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A scalar or a vector operand for [`Tolerance::close_values`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric<'a> {
    Scalar(f64),
    Vector(&'a [f64]),
}

impl Numeric<'_> {
    fn kind_name(&self) -> &'static str {
        match self {
            Numeric::Scalar(_) => "scalar",
            Numeric::Vector(_) => "vector",
        }
    }
}

static GLOBAL: RwLock<Tolerance> = RwLock::new(Tolerance::DEFAULT);

/// The process-wide default tolerance.
pub fn global() -> Tolerance {
    *GLOBAL.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Replace the process-wide default. Graphs created afterwards pick it up;
/// existing graphs keep their own copy.
pub fn set_global(tolerance: Tolerance) -> Result<(), ToleranceError> {
    tolerance.validate()?;
    *GLOBAL.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = tolerance;
    tracing::debug!(?tolerance, "global tolerance updated");
    Ok(())
}

/// [`Tolerance::close`] against the process-wide default.
pub fn close(a: f64, b: f64) -> bool {
    global().close(a, b)
}

/// [`Tolerance::close_values`] against the process-wide default.
pub fn close_values(a: Numeric<'_>, b: Numeric<'_>) -> Result<bool, ToleranceError> {
    global().close_values(a, b)
}
