//! Break-even exit exchange rate

use crate::error::{require_positive, CarryError};

/// Exit rate at which the USD carry return is exactly zero.
///
/// `return_at` is `(payoff / price) * (spot / x) - 1`, so the root is
/// `x = spot * payoff / price`.
pub fn breakeven(price: f64, payoff: f64, spot_rate: f64) -> Result<f64, CarryError> {
    let price = require_positive("price", price)?;
    let payoff = require_positive("payoff", payoff)?;
    let spot_rate = require_positive("spot_rate", spot_rate)?;

    Ok(spot_rate * (payoff / price))
}

/// Margin of the breakeven over a reference rate (e.g. the band ceiling),
/// as a fraction of the reference. Positive means the trade survives an exit
/// at the reference rate.
pub fn breakeven_margin(breakeven: f64, reference: f64) -> Option<f64> {
    (reference > 0.0).then(|| breakeven / reference - 1.0)
}
