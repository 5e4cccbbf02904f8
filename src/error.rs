//! Per-instrument calculation errors

use serde::Serialize;
use thiserror::Error;

/// Failure of a single carry calculation.
///
/// Every variant is scoped to one instrument; the engine records it and
/// moves on to the next instrument. The only batch-wide use is an unusable
/// spot rate, reported as `InvalidInput { field: "spot_rate", .. }`.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum CarryError {
    /// Days to maturity is zero or negative at the evaluation date.
    #[error("invalid term: {days} days to maturity")]
    InvalidTerm { days: i64 },

    /// A scenario or ceiling exit rate is zero, negative or not finite.
    #[error("invalid scenario rate: {rate}")]
    InvalidScenario { rate: f64 },

    /// Price, payoff or spot rate is zero, negative or missing.
    #[error("invalid input: {field} = {value}")]
    InvalidInput { field: &'static str, value: f64 },
}

impl CarryError {
    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            CarryError::InvalidTerm { .. } => "InvalidTerm",
            CarryError::InvalidScenario { .. } => "InvalidScenario",
            CarryError::InvalidInput { .. } => "InvalidInput",
        }
    }
}

/// Require a strictly positive, finite value.
///
/// `NaN` fails the `> 0.0` comparison so it is rejected as well.
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, CarryError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(CarryError::InvalidInput { field, value })
    }
}
