//! Engine configuration
//!
//! The band regime and scenario set are fixed per process. Defaults match
//! the regime in force; a JSON file can override any subset of fields.

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::band::BandParameters;
use crate::color::DEFAULT_COLOR_SCALE;
use crate::scenario::ScenarioSet;

/// Immutable configuration for a [`crate::CarryEngine`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Crawling-peg band regime
    pub band: BandParameters,

    /// Fixed exit-rate scenarios, in display order
    pub scenarios: ScenarioSet,

    /// Presentation scale applied to the colour bound
    pub color_scale: f64,

    /// Round the projected ceiling to whole units before using it as an exit rate
    pub round_ceiling: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            band: BandParameters::default(),
            scenarios: ScenarioSet::default(),
            color_scale: DEFAULT_COLOR_SCALE,
            round_ceiling: true,
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file; missing fields take their defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config {}", path.display()))?;
        Self::from_json_reader(BufReader::new(file))
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_json_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let config: EngineConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject regimes that would make every calculation meaningless
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.band.anchor_ceiling > 0.0 && self.band.anchor_ceiling.is_finite(),
            "anchor_ceiling must be positive, got {}",
            self.band.anchor_ceiling
        );
        ensure!(
            self.band.growth_factor > 1.0 && self.band.growth_factor.is_finite(),
            "growth_factor must exceed 1.0, got {}",
            self.band.growth_factor
        );
        ensure!(
            self.color_scale > 0.0 && self.color_scale.is_finite(),
            "color_scale must be positive, got {}",
            self.color_scale
        );
        for &rate in &self.scenarios.rates {
            ensure!(rate > 0.0 && rate.is_finite(), "scenario rate must be positive, got {}", rate);
        }
        Ok(())
    }
}
