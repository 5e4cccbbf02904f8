//! Rate equivalents implied by a discount note's price-to-payoff appreciation
//!
//! - TEM: monthly effective rate over 30-day months
//! - TNA: simple annualization of TEM (x12)
//! - TEA: compounded annualization of TEM

use serde::{Deserialize, Serialize};

use crate::error::{require_positive, CarryError};

/// Days per month used by the monthly rate convention
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Monthly effective rate (TEM) implied by `payoff / price` over `days_to_maturity`.
///
/// `TEM = (payoff / price)^(30 / days) - 1`
pub fn monthly_rate(price: f64, payoff: f64, days_to_maturity: i64) -> Result<f64, CarryError> {
    if days_to_maturity <= 0 {
        return Err(CarryError::InvalidTerm { days: days_to_maturity });
    }
    let price = require_positive("price", price)?;
    let payoff = require_positive("payoff", payoff)?;

    Ok((payoff / price).powf(DAYS_PER_MONTH / days_to_maturity as f64) - 1.0)
}

/// Nominal annual rate (TNA): TEM scaled by 12, not compounded
pub fn nominal_annual(tem: f64) -> f64 {
    tem * 12.0
}

/// Effective annual rate (TEA): TEM compounded over 12 months
pub fn effective_annual(tem: f64) -> f64 {
    (1.0 + tem).powi(12) - 1.0
}

/// Rate equivalents for one instrument
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateMetrics {
    /// Monthly effective rate
    pub tem: f64,
    /// Nominal annual rate
    pub tna: f64,
    /// Effective annual rate
    pub tea: f64,
}

impl RateMetrics {
    pub fn compute(price: f64, payoff: f64, days_to_maturity: i64) -> Result<Self, CarryError> {
        let tem = monthly_rate(price, payoff, days_to_maturity)?;
        Ok(Self::from_monthly(tem))
    }

    pub fn from_monthly(tem: f64) -> Self {
        Self {
            tem,
            tna: nominal_annual(tem),
            tea: effective_annual(tem),
        }
    }
}
