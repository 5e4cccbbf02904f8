//! Instrument and catalog data structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A priced instrument ready for one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Market ticker (e.g. "S31O5")
    pub ticker: String,

    /// Current market price, in the same unit as `payoff`
    pub price: f64,

    /// Amount paid at maturity per unit
    pub payoff: f64,

    /// Maturity date
    pub maturity: NaiveDate,
}

impl Instrument {
    pub fn new(ticker: impl Into<String>, price: f64, payoff: f64, maturity: NaiveDate) -> Self {
        Self {
            ticker: ticker.into(),
            price,
            payoff,
            maturity,
        }
    }

    /// Calendar days from `evaluation_date` to maturity (negative once matured)
    pub fn days_to_maturity(&self, evaluation_date: NaiveDate) -> i64 {
        (self.maturity - evaluation_date).num_days()
    }
}

/// Static terms of a listed instrument: what it pays and when
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub ticker: String,
    pub maturity: NaiveDate,
    pub payoff: f64,
}

impl CatalogEntry {
    /// Attach a market price to produce an evaluable instrument
    pub fn with_price(&self, price: f64) -> Instrument {
        Instrument::new(self.ticker.clone(), price, self.payoff, self.maturity)
    }
}

/// The set of instruments tracked by the engine, in listing order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

/// Fixed-rate LECAP/BONCAP and dual-bond terms: (ticker, maturity y/m/d, payoff)
const DEFAULT_TERMS: &[(&str, (i32, u32, u32), f64)] = &[
    ("S16A5", (2025, 4, 16), 131.211),
    ("S28A5", (2025, 4, 28), 130.813),
    ("S16Y5", (2025, 5, 16), 136.861),
    ("S30Y5", (2025, 5, 30), 136.331),
    ("S18J5", (2025, 6, 18), 147.695),
    ("S30J5", (2025, 6, 30), 146.607),
    ("S31L5", (2025, 7, 31), 147.74),
    ("S15G5", (2025, 8, 15), 146.794),
    ("S29G5", (2025, 8, 29), 157.7),
    ("S12S5", (2025, 9, 12), 158.977),
    ("S30S5", (2025, 9, 30), 159.734),
    ("T17O5", (2025, 10, 15), 158.872),
    ("S31O5", (2025, 10, 31), 132.821),
    ("S10N5", (2025, 11, 10), 122.254),
    ("S28N5", (2025, 11, 28), 123.561),
    ("T15D5", (2025, 12, 15), 170.838),
    ("S16E6", (2026, 1, 16), 119.06),
    ("T30E6", (2026, 1, 30), 142.22),
    ("T13F6", (2026, 2, 13), 144.97),
    ("S27F6", (2026, 2, 27), 125.84),
    ("S17A6", (2026, 4, 17), 109.94),
    ("S30A6", (2026, 4, 30), 127.49),
    ("S29Y6", (2026, 5, 29), 132.04),
    ("T30J6", (2026, 6, 30), 144.90),
    ("S31G6", (2026, 8, 31), 127.06),
    ("S30O6", (2026, 10, 30), 135.28),
    ("S30N6", (2026, 11, 30), 129.89),
    ("T15E7", (2027, 1, 15), 160.18),
    ("T30A7", (2027, 4, 30), 157.13),
    ("T31Y7", (2027, 5, 31), 152.18),
    ("TTM26", (2026, 3, 16), 135.238),
    ("TTJ26", (2026, 6, 30), 144.629),
    ("TTS26", (2026, 9, 15), 152.096),
    ("TTD26", (2026, 12, 15), 161.144),
];

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Built-in catalog of fixed-rate notes and dual bonds
    pub fn default_catalog() -> Self {
        let entries = DEFAULT_TERMS
            .iter()
            .filter_map(|&(ticker, (y, m, d), payoff)| {
                NaiveDate::from_ymd_opt(y, m, d).map(|maturity| CatalogEntry {
                    ticker: ticker.to_string(),
                    maturity,
                    payoff,
                })
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, ticker: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.ticker == ticker)
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.get(ticker).is_some()
    }
}
