//! Colour-scale normalisation bounds for a batch of scenario returns

use serde::{Deserialize, Serialize};

/// Share of the largest absolute return mapped to full colour saturation
pub const DEFAULT_COLOR_SCALE: f64 = 0.3;

/// Largest absolute value among `returns`; `0.0` for an empty batch.
///
/// Non-finite values are skipped.
pub fn limits(returns: &[f64]) -> f64 {
    returns
        .iter()
        .filter(|r| r.is_finite())
        .fold(0.0_f64, |acc, r| acc.max(r.abs()))
}

/// Symmetric colour bounds for a batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorLimits {
    /// Largest absolute scenario return in the batch
    pub bound: f64,
    pub vmin: f64,
    pub vmax: f64,
    /// Saturation magnitude; `0.0` means no normalisation is possible
    pub limit: f64,
}

impl ColorLimits {
    pub fn from_bound(bound: f64, scale: f64) -> Self {
        let limit = bound * scale;
        Self {
            bound,
            vmin: -limit,
            vmax: limit,
            limit,
        }
    }

    pub fn from_returns(returns: &[f64], scale: f64) -> Self {
        Self::from_bound(limits(returns), scale)
    }

    /// Map `value` onto [-1, 1]; `0.0` when the limit is zero
    pub fn normalize(&self, value: f64) -> f64 {
        if self.limit > 0.0 {
            (value / self.limit).clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Default for ColorLimits {
    fn default() -> Self {
        Self::from_bound(0.0, DEFAULT_COLOR_SCALE)
    }
}
