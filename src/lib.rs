//! Carry Trade - carry metrics for fixed-rate sovereign notes under a crawling-peg band
//!
//! This library provides:
//! - Rate equivalents (TEM, TNA, TEA) from price, payoff and term
//! - Band ceiling projection from a fixed anchor and monthly growth factor
//! - USD carry returns at fixed exit-rate scenarios and at the projected ceiling
//! - Closed-form breakeven exit rates
//! - Colour normalisation bounds and breakeven-vs-ceiling chart series

pub mod band;
pub mod breakeven;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod instrument;
pub mod market;
pub mod rates;
pub mod scenario;

// Re-export commonly used types
pub use band::BandParameters;
pub use color::ColorLimits;
pub use config::EngineConfig;
pub use engine::{BatchResult, CarryEngine, ChartSeries, InstrumentFailure, ResultRow};
pub use error::CarryError;
pub use instrument::{Catalog, Instrument};
pub use market::SpotRate;
pub use scenario::{ScenarioLabel, ScenarioSet};
