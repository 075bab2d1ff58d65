//! Simulation configuration.
//!
//! Every field has a default, so a JSON config file only needs the values it
//! changes:
//!
//! ```json
//! { "scenario_count": 5000, "seed": 42, "method": "uniform" }
//! ```

use crate::core::error::{ScenarioError, ScenarioResult};
use crate::simulation::variate::SamplingMethod;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Mean of the normally distributed pull toward the expected value.
pub const DEFAULT_PULL_MEAN: f64 = 0.5;
/// Standard deviation of the pull toward the expected value.
pub const DEFAULT_PULL_STD_DEV: f64 = 0.17;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Rows per scenario table.
    pub scenario_count: usize,
    /// Seed for the random source. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub method: SamplingMethod,
    pub pull_mean: f64,
    pub pull_std_dev: f64,
    /// Bins per histogram in the run report.
    pub histogram_bins: usize,
    /// Persisted bounds record (last-used parameters).
    pub bounds_path: PathBuf,
    pub assets_path: PathBuf,
    pub liabilities_path: PathBuf,
    /// Where the scenario export is written.
    pub output_path: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scenario_count: 1000,
            seed: None,
            method: SamplingMethod::default(),
            pull_mean: DEFAULT_PULL_MEAN,
            pull_std_dev: DEFAULT_PULL_STD_DEV,
            histogram_bins: 30,
            bounds_path: PathBuf::from("simulacao.csv"),
            assets_path: PathBuf::from("ativos.csv"),
            liabilities_path: PathBuf::from("passivos.csv"),
            output_path: PathBuf::from("cenarios.csv"),
        }
    }
}

impl SimulationConfig {
    /// Load a config from a JSON file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> ScenarioResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SimulationConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn validate(&self) -> ScenarioResult<()> {
        if self.scenario_count == 0 {
            return Err(ScenarioError::config("scenario_count must be at least 1"));
        }
        if !self.pull_mean.is_finite() {
            return Err(ScenarioError::config(format!(
                "pull_mean must be finite, got {}",
                self.pull_mean
            )));
        }
        if !self.pull_std_dev.is_finite() || self.pull_std_dev < 0.0 {
            return Err(ScenarioError::config(format!(
                "pull_std_dev must be finite and non-negative, got {}",
                self.pull_std_dev
            )));
        }
        if self.histogram_bins == 0 {
            return Err(ScenarioError::config("histogram_bins must be at least 1"));
        }
        Ok(())
    }
}
