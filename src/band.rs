//! Crawling-peg band ceiling projection
//!
//! The ceiling grows geometrically from a fixed anchor: `growth_factor` per
//! 30-day month, with fractional months allowed in both directions.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::rates::DAYS_PER_MONTH;

/// Regulatory band parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandParameters {
    /// Date at which the ceiling equals `anchor_ceiling`
    pub anchor_date: NaiveDate,
    /// Ceiling value at the anchor date
    pub anchor_ceiling: f64,
    /// Monthly growth factor (1.01 = +1% per month)
    pub growth_factor: f64,
}

impl BandParameters {
    /// Band announced on 2025-04-14: 1400 ceiling, +1% per month
    pub fn crawling_peg_2025() -> Self {
        Self {
            anchor_date: NaiveDate::from_ymd_opt(2025, 4, 14).expect("valid anchor date"),
            anchor_ceiling: 1400.0,
            growth_factor: 1.01,
        }
    }

    /// Projected ceiling at `date`
    pub fn ceiling_at(&self, date: NaiveDate) -> f64 {
        ceiling(date, self)
    }

    /// Ceiling at `from` and at each of the following `months` calendar month boundaries
    ///
    /// Stops early if a month boundary falls outside chrono's date range.
    pub fn schedule(&self, from: NaiveDate, months: u32) -> Vec<(NaiveDate, f64)> {
        (0..=months)
            .map_while(|m| from.checked_add_months(Months::new(m)))
            .map(|date| (date, self.ceiling_at(date)))
            .collect()
    }
}

impl Default for BandParameters {
    fn default() -> Self {
        Self::crawling_peg_2025()
    }
}

/// Elapsed 30-day months between the anchor and `date` (negative before the anchor)
pub fn elapsed_months(date: NaiveDate, anchor: NaiveDate) -> f64 {
    (date - anchor).num_days() as f64 / DAYS_PER_MONTH
}

/// Projected band ceiling at `evaluation_date`
///
/// `anchor_ceiling * growth_factor ^ ((evaluation_date - anchor_date).days / 30)`
pub fn ceiling(evaluation_date: NaiveDate, params: &BandParameters) -> f64 {
    let months = elapsed_months(evaluation_date, params.anchor_date);
    params.anchor_ceiling * params.growth_factor.powf(months)
}
