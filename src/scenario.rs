//! USD carry-trade returns at hypothetical exit exchange rates
//!
//! The trade: convert USD to local currency at the spot rate, buy the note,
//! collect the payoff at maturity, convert back to USD at the exit rate.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{require_positive, CarryError};
use crate::instrument::Instrument;

/// Ordered set of fixed hypothetical exit rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub rates: Vec<f64>,
}

impl ScenarioSet {
    pub fn new(rates: Vec<f64>) -> Self {
        Self { rates }
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for ScenarioSet {
    fn default() -> Self {
        Self::new(vec![1000.0, 1100.0, 1200.0, 1300.0, 1400.0])
    }
}

/// Which exit rate a return was computed at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "rate")]
pub enum ScenarioLabel {
    /// One of the fixed scenario rates
    Fixed(f64),
    /// The projected band ceiling at the instrument's maturity
    Ceiling,
}

impl fmt::Display for ScenarioLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioLabel::Fixed(rate) => write!(f, "carry_{}", rate),
            ScenarioLabel::Ceiling => write!(f, "carry_ceiling"),
        }
    }
}

/// Return of the trade at one exit rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReturn {
    pub label: ScenarioLabel,
    /// Exit exchange rate used
    pub exit_rate: f64,
    /// USD return over the holding period
    pub value: f64,
}

/// USD return of the trade exiting at `scenario_rate`
///
/// `(payoff / price) * (spot_rate / scenario_rate) - 1`
pub fn return_at(
    price: f64,
    payoff: f64,
    spot_rate: f64,
    scenario_rate: f64,
) -> Result<f64, CarryError> {
    if !(scenario_rate > 0.0 && scenario_rate.is_finite()) {
        return Err(CarryError::InvalidScenario { rate: scenario_rate });
    }
    let price = require_positive("price", price)?;
    let payoff = require_positive("payoff", payoff)?;
    let spot_rate = require_positive("spot_rate", spot_rate)?;

    Ok((payoff / price) * (spot_rate / scenario_rate) - 1.0)
}

/// Returns at every fixed scenario rate, in order, followed by the ceiling
pub fn scenarios_for(
    instrument: &Instrument,
    spot_rate: f64,
    scenarios: &ScenarioSet,
    ceiling: f64,
) -> Result<Vec<ScenarioReturn>, CarryError> {
    let fixed = scenarios.rates.iter().map(|&rate| (ScenarioLabel::Fixed(rate), rate));
    let all = fixed.chain(std::iter::once((ScenarioLabel::Ceiling, ceiling)));

    all.map(|(label, exit_rate)| -> Result<ScenarioReturn, CarryError> {
        let value = return_at(instrument.price, instrument.payoff, spot_rate, exit_rate)?;
        Ok(ScenarioReturn { label, exit_rate, value })
    })
    .collect()
}
