//! Load the instrument catalog from CSV and join it with market quotes

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use csv::Reader;
use log::{info, warn};
use std::path::Path;

use super::{Catalog, CatalogEntry, Instrument};
use crate::market::Quote;

/// Default location of the catalog CSV
pub const DEFAULT_CATALOG_PATH: &str = "data/catalog.csv";

/// Raw CSV row: `Ticker,Maturity,Payoff` with ISO dates
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Ticker")]
    ticker: String,
    #[serde(rename = "Maturity")]
    maturity: String,
    #[serde(rename = "Payoff")]
    payoff: f64,
}

impl CsvRow {
    fn to_entry(self) -> Result<CatalogEntry> {
        let maturity = NaiveDate::parse_from_str(self.maturity.trim(), "%Y-%m-%d")
            .with_context(|| format!("Bad maturity '{}' for {}", self.maturity, self.ticker))?;

        if !(self.payoff > 0.0) {
            bail!("Non-positive payoff {} for {}", self.payoff, self.ticker);
        }

        Ok(CatalogEntry {
            ticker: self.ticker.trim().to_string(),
            maturity,
            payoff: self.payoff,
        })
    }
}

/// Load a catalog from a CSV file
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let reader = Reader::from_path(path)
        .with_context(|| format!("Failed to open catalog {}", path.display()))?;
    read_catalog(reader)
}

/// Load the catalog from the default data/catalog.csv location
pub fn load_default_catalog() -> Result<Catalog> {
    load_catalog(DEFAULT_CATALOG_PATH)
}

/// Load a catalog from any reader (e.g., string buffer)
pub fn load_catalog_from_reader<R: std::io::Read>(reader: R) -> Result<Catalog> {
    read_catalog(Reader::from_reader(reader))
}

fn read_catalog<R: std::io::Read>(mut reader: Reader<R>) -> Result<Catalog> {
    let mut entries = Vec::new();

    for (line, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result.with_context(|| format!("Catalog row {}", line + 1))?;
        entries.push(row.to_entry()?);
    }

    Ok(Catalog::new(entries))
}

/// Price catalog instruments from a quote list.
///
/// Quotes for tickers outside the catalog are ignored. Output follows quote
/// order. Quotes without a close price are skipped with a warning.
pub fn price_instruments(catalog: &Catalog, quotes: &[Quote]) -> Vec<Instrument> {
    let instruments: Vec<Instrument> = quotes
        .iter()
        .filter_map(|quote| {
            let entry = catalog.get(&quote.symbol)?;
            match quote.close {
                Some(price) => Some(entry.with_price(price)),
                None => {
                    warn!("Skipping {}: quote has no close price", quote.symbol);
                    None
                }
            }
        })
        .collect();

    info!(
        "Priced {} catalog instruments out of {} quotes",
        instruments.len(),
        quotes.len()
    );

    instruments
}
