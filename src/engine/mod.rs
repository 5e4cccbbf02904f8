//! Batch orchestration over the per-instrument carry pipeline

mod engine;
mod result;

pub use engine::CarryEngine;
pub use result::{BatchResult, ChartSeries, InstrumentFailure, ResultRow};
