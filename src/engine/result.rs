//! Batch output: per-instrument rows, failures, colour limits and chart series

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::breakeven::breakeven_margin;
use crate::color::ColorLimits;
use crate::error::CarryError;
use crate::rates::RateMetrics;
use crate::scenario::ScenarioReturn;

/// Computed metrics for one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub ticker: String,
    pub price: f64,
    pub payoff: f64,
    pub maturity: NaiveDate,
    pub days_to_maturity: i64,

    /// TEM / TNA / TEA
    #[serde(flatten)]
    pub rates: RateMetrics,

    /// Band ceiling projected to maturity, as used for the ceiling scenario
    pub ceiling: f64,

    /// Exit rate at which the USD return is zero
    pub breakeven: f64,

    /// Fixed scenarios in configured order, ceiling last
    pub scenarios: Vec<ScenarioReturn>,
}

impl ResultRow {
    /// Return at the projected band ceiling
    pub fn ceiling_return(&self) -> Option<f64> {
        self.scenarios.last().map(|s| s.value)
    }

    /// Breakeven headroom over the projected ceiling; positive means the
    /// trade still pays in USD if the band tops out at maturity
    pub fn ceiling_margin(&self) -> Option<f64> {
        breakeven_margin(self.breakeven, self.ceiling)
    }

    pub fn scenario_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.scenarios.iter().map(|s| s.value)
    }
}

/// An instrument excluded from the batch, and why
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentFailure {
    pub ticker: String,
    pub error: CarryError,
}

/// Breakeven vs ceiling, one point per instrument, ordered by maturity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub tickers: Vec<String>,
    pub band_ceiling: Vec<f64>,
    pub breakeven: Vec<f64>,
    pub days_to_maturity: Vec<i64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    /// Write `ticker,days_to_maturity,band_ceiling,breakeven` rows
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> csv::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["ticker", "days_to_maturity", "band_ceiling", "breakeven"])?;
        for i in 0..self.len() {
            wtr.write_record([
                self.tickers[i].clone(),
                self.days_to_maturity[i].to_string(),
                format!("{:.2}", self.band_ceiling[i]),
                format!("{:.2}", self.breakeven[i]),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Complete output of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub evaluation_date: NaiveDate,
    pub spot_rate: f64,
    /// Successful rows, in input order
    pub rows: Vec<ResultRow>,
    /// Excluded instruments, in input order
    pub failures: Vec<InstrumentFailure>,
    pub color_limits: ColorLimits,
}

impl BatchResult {
    /// Every scenario return of every row
    pub fn all_returns(&self) -> Vec<f64> {
        self.rows.iter().flat_map(|r| r.scenario_values()).collect()
    }

    pub fn row(&self, ticker: &str) -> Option<&ResultRow> {
        self.rows.iter().find(|r| r.ticker == ticker)
    }

    /// Chart series sorted by maturity (stable for equal maturities)
    pub fn chart(&self) -> ChartSeries {
        let mut ordered: Vec<&ResultRow> = self.rows.iter().collect();
        ordered.sort_by_key(|r| r.maturity);

        ChartSeries {
            tickers: ordered.iter().map(|r| r.ticker.clone()).collect(),
            band_ceiling: ordered.iter().map(|r| r.ceiling).collect(),
            breakeven: ordered.iter().map(|r| r.breakeven).collect(),
            days_to_maturity: ordered.iter().map(|r| r.days_to_maturity).collect(),
        }
    }
}
