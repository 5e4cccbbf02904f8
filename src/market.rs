//! Market snapshots: instrument quotes and the MEP spot rate
//!
//! Payloads follow the shape of the live quote feed (`symbol`, `c` close
//! price, plus fields we ignore). Fetching them is someone else's job; this
//! module only reads what was captured.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::CarryError;

/// Keys tried, in order, when reading a MEP rate out of a list of quotes
const MEP_LIST_KEYS: &[&str] = &["close", "value", "price"];

/// Keys tried, in order, when the MEP payload is a single object
const MEP_OBJECT_KEYS: &[&str] = &["close", "value", "price", "last", "rate"];

/// Last traded price for one listed symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    #[serde(rename = "c", default)]
    pub close: Option<f64>,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, close: Option<f64>) -> Self {
        Self {
            symbol: symbol.into(),
            close,
        }
    }
}

/// Spot exchange rate for one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpotRate {
    Observed(f64),
    Unavailable,
}

impl SpotRate {
    /// Treat missing, non-finite or non-positive observations as unavailable
    pub fn from_observation(value: Option<f64>) -> Self {
        match value {
            Some(v) if v > 0.0 && v.is_finite() => SpotRate::Observed(v),
            _ => SpotRate::Unavailable,
        }
    }

    /// Resolve to a usable rate, falling back to the caller's value when unavailable
    pub fn resolve(self, fallback: Option<f64>) -> Result<f64, CarryError> {
        let value = match self {
            SpotRate::Observed(v) if v > 0.0 && v.is_finite() => return Ok(v),
            SpotRate::Observed(v) => Some(v),
            SpotRate::Unavailable => None,
        };

        match fallback {
            Some(f) if f > 0.0 && f.is_finite() => {
                log::warn!("Spot rate unavailable ({:?}), using fallback {}", value, f);
                Ok(f)
            }
            other => Err(CarryError::InvalidInput {
                field: "spot_rate",
                value: other.or(value).unwrap_or(f64::NAN),
            }),
        }
    }
}

/// Load quotes from a JSON array of quote objects
pub fn load_quotes_json<P: AsRef<Path>>(path: P) -> Result<Vec<Quote>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open quotes {}", path.display()))?;
    load_quotes_json_from_reader(BufReader::new(file))
}

pub fn load_quotes_json_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Quote>> {
    let quotes: Vec<Quote> =
        serde_json::from_reader(reader).context("Quotes payload is not a list of quotes")?;
    Ok(quotes)
}

/// Load quotes from a CSV with `symbol,c` columns
pub fn load_quotes_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Quote>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open quotes {}", path.display()))?;
    load_quotes_csv_from_reader(file)
}

pub fn load_quotes_csv_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Quote>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut quotes = Vec::new();

    for result in csv_reader.deserialize() {
        let quote: Quote = result?;
        quotes.push(quote);
    }

    Ok(quotes)
}

/// Load one quote snapshot, choosing the format from the file extension
pub fn load_quotes<P: AsRef<Path>>(path: P) -> Result<Vec<Quote>> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => load_quotes_csv(path),
        Some("json") => load_quotes_json(path),
        _ => bail!("Unsupported quotes file {} (expected .json or .csv)", path.display()),
    }
}

/// Load several quote feeds (e.g. notes and bonds) and concatenate them in order
pub fn load_quote_feeds<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Quote>> {
    let mut quotes = Vec::new();
    for path in paths {
        let feed = load_quotes(path)?;
        log::debug!("Loaded {} quotes from {}", feed.len(), path.as_ref().display());
        quotes.extend(feed);
    }
    Ok(quotes)
}

/// Median of the finite values, or `None` if there are none
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Extract the MEP rate from a captured payload.
///
/// A list yields the median of the first known key present in any element,
/// falling back to the first numeric column of the first element. An object
/// yields the first known key, falling back to its first numeric value.
pub fn mep_from_payload(payload: &Value) -> SpotRate {
    let observed = match payload {
        Value::Array(items) => MEP_LIST_KEYS
            .iter()
            .find_map(|key| column_median(items, key))
            .or_else(|| {
                let first = items.first()?.as_object()?;
                first
                    .iter()
                    .filter(|(_, v)| v.is_number())
                    .find_map(|(key, _)| column_median(items, key))
            }),
        Value::Object(map) => MEP_OBJECT_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_f64))
            .or_else(|| map.values().find_map(Value::as_f64)),
        _ => None,
    };

    SpotRate::from_observation(observed)
}

/// Median of the numeric values stored under `key` across `items`
fn column_median(items: &[Value], key: &str) -> Option<f64> {
    let values: Vec<f64> = items
        .iter()
        .filter_map(|item| item.get(key).and_then(Value::as_f64))
        .collect();
    median(&values)
}

/// Read a MEP payload from disk
pub fn load_mep<P: AsRef<Path>>(path: P) -> Result<SpotRate> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open MEP payload {}", path.display()))?;
    let payload: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("MEP payload {} is not valid JSON", path.display()))?;
    Ok(mep_from_payload(&payload))
}
