use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::ScenarioError;

/// A macroeconomic risk factor driving the scenarios.
///
/// The three factors are modeled independently. Their canonical order
/// (`ipca`, `cdi`, `cambio`) is the column order of every scenario table.
///
/// # Examples
///
/// ```
/// use scenario_engine::core::risk_factor::RiskFactor;
///
/// let cdi: RiskFactor = "CDI".parse().unwrap();
/// assert_eq!(cdi, RiskFactor::Cdi);
/// assert_eq!(cdi.name(), "cdi");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskFactor {
    /// Broad consumer-price inflation index.
    Ipca,
    /// Interbank overnight interest rate.
    Cdi,
    /// Exchange-rate variation.
    Cambio,
}

impl RiskFactor {
    /// All risk factors in canonical order.
    pub const ALL: [RiskFactor; 3] = [RiskFactor::Ipca, RiskFactor::Cdi, RiskFactor::Cambio];

    /// Canonical lowercase name, used as the column name in tabular records.
    pub fn name(self) -> &'static str {
        match self {
            RiskFactor::Ipca => "ipca",
            RiskFactor::Cdi => "cdi",
            RiskFactor::Cambio => "cambio",
        }
    }

    /// Human-readable label for reports.
    pub fn label(self) -> &'static str {
        match self {
            RiskFactor::Ipca => "Inflation (IPCA)",
            RiskFactor::Cdi => "Interbank rate (CDI)",
            RiskFactor::Cambio => "FX variation",
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for RiskFactor {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ipca" => Ok(RiskFactor::Ipca),
            "cdi" => Ok(RiskFactor::Cdi),
            "cambio" => Ok(RiskFactor::Cambio),
            other => Err(ScenarioError::UnknownFactor(other.to_string())),
        }
    }
}
