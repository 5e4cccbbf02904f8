//! Carry engine: runs the per-instrument pipeline over a batch

use chrono::NaiveDate;
use log::{debug, info, warn};
use rayon::prelude::*;

use super::result::{BatchResult, InstrumentFailure, ResultRow};
use crate::band::ceiling;
use crate::breakeven::breakeven;
use crate::color::ColorLimits;
use crate::config::EngineConfig;
use crate::error::{require_positive, CarryError};
use crate::instrument::Instrument;
use crate::rates::RateMetrics;
use crate::scenario::scenarios_for;

/// Stateless carry calculator for a fixed band regime and scenario set
#[derive(Debug, Clone, Default)]
pub struct CarryEngine {
    config: EngineConfig,
}

impl CarryEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate a batch at `evaluation_date` with the given spot rate.
    ///
    /// Instruments that fail are left out of `rows` and listed in `failures`.
    /// The whole call fails only when the spot rate itself is unusable.
    pub fn evaluate(
        &self,
        instruments: &[Instrument],
        spot_rate: f64,
        evaluation_date: NaiveDate,
    ) -> Result<BatchResult, CarryError> {
        let spot_rate = require_positive("spot_rate", spot_rate)?;

        let outcomes: Vec<_> = instruments
            .iter()
            .map(|inst| self.evaluate_instrument(inst, spot_rate, evaluation_date))
            .collect();

        Ok(self.assemble(instruments, outcomes, spot_rate, evaluation_date))
    }

    /// Same as [`evaluate`](Self::evaluate), spreading instruments across the rayon pool.
    /// Output order and values are identical.
    pub fn evaluate_par(
        &self,
        instruments: &[Instrument],
        spot_rate: f64,
        evaluation_date: NaiveDate,
    ) -> Result<BatchResult, CarryError> {
        let spot_rate = require_positive("spot_rate", spot_rate)?;

        let outcomes: Vec<_> = instruments
            .par_iter()
            .map(|inst| self.evaluate_instrument(inst, spot_rate, evaluation_date))
            .collect();

        Ok(self.assemble(instruments, outcomes, spot_rate, evaluation_date))
    }

    /// Run the full pipeline for one instrument
    pub fn evaluate_instrument(
        &self,
        instrument: &Instrument,
        spot_rate: f64,
        evaluation_date: NaiveDate,
    ) -> Result<ResultRow, CarryError> {
        let days = instrument.days_to_maturity(evaluation_date);
        let rates = RateMetrics::compute(instrument.price, instrument.payoff, days)?;

        let mut band_ceiling = ceiling(instrument.maturity, &self.config.band);
        if self.config.round_ceiling {
            band_ceiling = band_ceiling.round();
        }

        let scenarios = scenarios_for(instrument, spot_rate, &self.config.scenarios, band_ceiling)?;
        let breakeven = breakeven(instrument.price, instrument.payoff, spot_rate)?;

        debug!(
            "{}: {} days, TEM {:.4}, ceiling {:.2}, breakeven {:.2}",
            instrument.ticker, days, rates.tem, band_ceiling, breakeven
        );

        Ok(ResultRow {
            ticker: instrument.ticker.clone(),
            price: instrument.price,
            payoff: instrument.payoff,
            maturity: instrument.maturity,
            days_to_maturity: days,
            rates,
            ceiling: band_ceiling,
            breakeven,
            scenarios,
        })
    }

    fn assemble(
        &self,
        instruments: &[Instrument],
        outcomes: Vec<Result<ResultRow, CarryError>>,
        spot_rate: f64,
        evaluation_date: NaiveDate,
    ) -> BatchResult {
        let mut rows = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();

        for (inst, outcome) in instruments.iter().zip(outcomes) {
            match outcome {
                Ok(row) => rows.push(row),
                Err(error) => {
                    warn!("Excluding {}: {}", inst.ticker, error);
                    failures.push(InstrumentFailure {
                        ticker: inst.ticker.clone(),
                        error,
                    });
                }
            }
        }

        let returns: Vec<f64> = rows.iter().flat_map(|r| r.scenario_values()).collect();
        let color_limits = ColorLimits::from_returns(&returns, self.config.color_scale);

        info!(
            "Evaluated {} instruments at spot {:.2} on {}: {} ok, {} excluded",
            instruments.len(),
            spot_rate,
            evaluation_date,
            rows.len(),
            failures.len()
        );

        BatchResult {
            evaluation_date,
            spot_rate,
            rows,
            failures,
            color_limits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::band::BandParameters;
    use crate::instrument::Catalog;
    use crate::scenario::{ScenarioLabel, ScenarioSet};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn unrounded_engine() -> CarryEngine {
        CarryEngine::new(EngineConfig {
            round_ceiling: false,
            ..EngineConfig::default()
        })
    }

    #[test]
    fn test_end_to_end_example() {
        let eval = date(2025, 5, 14);
        let inst = Instrument::new("X", 900.0, 1000.0, eval + chrono::Duration::days(180));
        let config = EngineConfig {
            scenarios: ScenarioSet::new(vec![1300.0]),
            ..EngineConfig::default()
        };
        let engine = CarryEngine::new(config);

        let result = engine.evaluate(&[inst], 1200.0, eval).unwrap();
        assert!(result.failures.is_empty());
        let row = &result.rows[0];

        assert_eq!(row.days_to_maturity, 180);
        assert!((row.rates.tem - 0.0178).abs() < 1e-3);
        assert_relative_eq!(row.breakeven, 1200.0 * 1000.0 / 900.0, epsilon = 1e-9);
        assert_eq!(row.scenarios[0].label, ScenarioLabel::Fixed(1300.0));
        assert!((row.scenarios[0].value - 0.0256).abs() < 1e-4);
    }

    #[test]
    fn test_ceiling_projected_at_maturity() {
        let engine = unrounded_engine();
        let inst = Instrument::new("X", 900.0, 1000.0, date(2025, 5, 14));
        let row = engine.evaluate_instrument(&inst, 1200.0, date(2025, 4, 1)).unwrap();

        assert_relative_eq!(row.ceiling, 1414.0, epsilon = 1e-9);
        assert_eq!(row.scenarios.last().unwrap().label, ScenarioLabel::Ceiling);
        assert_relative_eq!(
            row.ceiling_return().unwrap(),
            (1000.0 / 900.0) * (1200.0 / 1414.0) - 1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_ceiling_rounding() {
        let engine = CarryEngine::default();
        // 45 days after anchor: 1400 * 1.01^1.5 = 1421.03...
        let inst = Instrument::new("X", 900.0, 1000.0, date(2025, 5, 29));
        let row = engine.evaluate_instrument(&inst, 1200.0, date(2025, 4, 1)).unwrap();
        assert_eq!(row.ceiling, 1421.0);
        assert_eq!(row.scenarios.last().unwrap().exit_rate, 1421.0);
    }

    #[test]
    fn test_partial_batch_failure() {
        let engine = CarryEngine::default();
        let eval = date(2025, 6, 1);
        let instruments = vec![
            Instrument::new("GOOD1", 120.0, 132.821, date(2025, 10, 31)),
            Instrument::new("MATURED", 100.0, 131.211, date(2025, 6, 1)),
            Instrument::new("NOPRICE", 0.0, 170.838, date(2025, 12, 15)),
            Instrument::new("GOOD2", 110.0, 119.06, date(2026, 1, 16)),
        ];

        let result = engine.evaluate(&instruments, 1200.0, eval).unwrap();

        let tickers: Vec<&str> = result.rows.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["GOOD1", "GOOD2"]);

        assert_eq!(result.failures.len(), 2);
        assert_eq!(result.failures[0].ticker, "MATURED");
        assert_eq!(result.failures[0].error, CarryError::InvalidTerm { days: 0 });
        assert_eq!(result.failures[1].ticker, "NOPRICE");
        assert_eq!(result.failures[1].error.kind(), "InvalidInput");
    }

    #[test]
    fn test_invalid_spot_fails_whole_batch() {
        let engine = CarryEngine::default();
        let instruments = vec![Instrument::new("X", 900.0, 1000.0, date(2025, 12, 1))];
        for spot in [0.0, -1.0, f64::NAN] {
            let err = engine.evaluate(&instruments, spot, date(2025, 6, 1)).unwrap_err();
            assert_eq!(err.kind(), "InvalidInput");
        }
    }

    #[test]
    fn test_invalid_scenario_excludes_instrument() {
        let config = EngineConfig {
            band: BandParameters {
                anchor_date: date(2025, 4, 14),
                anchor_ceiling: 0.4,
                growth_factor: 1.01,
            },
            ..EngineConfig::default()
        };
        let engine = CarryEngine::new(config);
        let instruments = vec![Instrument::new("X", 900.0, 1000.0, date(2025, 4, 14))];

        // Ceiling rounds to zero
        let result = engine.evaluate(&instruments, 1200.0, date(2025, 1, 1)).unwrap();
        assert!(result.rows.is_empty());
        assert_eq!(result.failures[0].error, CarryError::InvalidScenario { rate: 0.0 });
        assert_eq!(result.color_limits.limit, 0.0);
    }

    #[test]
    fn test_color_limits_over_all_returns() {
        let engine = CarryEngine::default();
        let eval = date(2025, 6, 1);
        let instruments = vec![
            Instrument::new("A", 120.0, 132.821, date(2025, 10, 31)),
            Instrument::new("B", 140.0, 170.838, date(2025, 12, 15)),
        ];
        let result = engine.evaluate(&instruments, 1150.0, eval).unwrap();

        let bound = result
            .all_returns()
            .iter()
            .fold(0.0_f64, |acc, r| acc.max(r.abs()));
        assert!(bound > 0.0);
        assert_eq!(result.color_limits.bound, crate::color::limits(&result.all_returns()));
        assert_eq!(result.color_limits.bound, bound);
        assert_relative_eq!(result.color_limits.limit, bound * 0.3, epsilon = 1e-12);
        assert_eq!(result.all_returns().len(), 2 * 6);
    }

    #[test]
    fn test_color_bound_is_unscaled_max_return() {
        let engine = CarryEngine::default();
        let eval = date(2025, 6, 1);
        let instruments = vec![Instrument::new("A", 100.0, 150.0, date(2025, 12, 1))];
        let result = engine.evaluate(&instruments, 1200.0, eval).unwrap();

        // Best scenario exits at 1000: 1.5 * 1.2 - 1
        assert_relative_eq!(result.color_limits.bound, 0.8, epsilon = 1e-12);
        assert_relative_eq!(result.color_limits.limit, 0.8 * 0.3, epsilon = 1e-12);
        assert_eq!(result.color_limits.vmax, result.color_limits.limit);
    }

    #[test]
    fn test_ceiling_margin_tracks_ceiling_return() {
        let engine = CarryEngine::default();
        let eval = date(2025, 6, 1);
        let instruments = vec![
            Instrument::new("WIDE", 100.0, 150.0, date(2025, 12, 1)),
            Instrument::new("THIN", 100.0, 101.0, date(2025, 12, 1)),
        ];
        let result = engine.evaluate(&instruments, 1200.0, eval).unwrap();

        for row in &result.rows {
            let margin = row.ceiling_margin().unwrap();
            assert_relative_eq!(margin, row.breakeven / row.ceiling - 1.0, epsilon = 1e-12);
            // Breakeven above the ceiling iff the ceiling exit still earns
            assert_eq!(margin > 0.0, row.ceiling_return().unwrap() > 0.0);
        }
        assert!(result.row("WIDE").unwrap().ceiling_margin().unwrap() > 0.0);
        assert!(result.row("THIN").unwrap().ceiling_margin().unwrap() < 0.0);
    }

    #[test]
    fn test_chart_sorted_by_maturity() {
        let engine = CarryEngine::default();
        let eval = date(2025, 6, 1);
        let instruments = vec![
            Instrument::new("LATE", 110.0, 119.06, date(2026, 1, 16)),
            Instrument::new("EARLY", 120.0, 132.821, date(2025, 10, 31)),
            Instrument::new("MID", 140.0, 170.838, date(2025, 12, 15)),
        ];
        let result = engine.evaluate(&instruments, 1200.0, eval).unwrap();

        // Rows keep input order
        assert_eq!(result.rows[0].ticker, "LATE");

        let chart = result.chart();
        assert_eq!(chart.tickers, vec!["EARLY", "MID", "LATE"]);
        assert!(chart.days_to_maturity.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(chart.breakeven[0], result.row("EARLY").unwrap().breakeven);
        assert_eq!(chart.band_ceiling[2], result.row("LATE").unwrap().ceiling);
    }

    #[test]
    fn test_breakeven_zeroes_return_for_every_row() {
        let engine = CarryEngine::default();
        let eval = date(2025, 6, 1);
        let instruments: Vec<Instrument> = Catalog::default_catalog()
            .entries()
            .iter()
            .map(|e| e.with_price(e.payoff * 0.9))
            .collect();

        let result = engine.evaluate(&instruments, 1180.0, eval).unwrap();
        assert_eq!(result.rows.len() + result.failures.len(), instruments.len());
        assert!(result
            .failures
            .iter()
            .all(|f| matches!(f.error, CarryError::InvalidTerm { .. })));

        for row in &result.rows {
            let r = crate::scenario::return_at(row.price, row.payoff, 1180.0, row.breakeven)
                .unwrap();
            assert_abs_diff_eq!(r, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let engine = CarryEngine::default();
        let eval = date(2025, 5, 2);
        let instruments: Vec<Instrument> = Catalog::default_catalog()
            .entries()
            .iter()
            .enumerate()
            .map(|(i, e)| e.with_price(100.0 + i as f64))
            .collect();

        let sequential = engine.evaluate(&instruments, 1210.0, eval).unwrap();
        let parallel = engine.evaluate_par(&instruments, 1210.0, eval).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_empty_batch() {
        let engine = CarryEngine::default();
        let result = engine.evaluate(&[], 1200.0, date(2025, 6, 1)).unwrap();
        assert!(result.rows.is_empty());
        assert!(result.failures.is_empty());
        assert_eq!(result.color_limits.limit, 0.0);
        assert!(result.chart().is_empty());
    }

    #[test]
    fn test_chart_csv() {
        let engine = CarryEngine::default();
        let instruments = vec![Instrument::new("S31O5", 120.0, 132.821, date(2025, 10, 31))];
        let result = engine.evaluate(&instruments, 1200.0, date(2025, 6, 1)).unwrap();

        let mut buf = Vec::new();
        result.chart().write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("ticker,days_to_maturity,band_ceiling,breakeven"));
        assert!(lines.next().unwrap().starts_with("S31O5,152,"));
    }
}
