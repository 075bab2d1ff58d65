use crate::core::risk_factor::RiskFactor;
use serde::{Deserialize, Serialize};

/// Per-unit sensitivity of one side of the balance sheet to each risk factor.
///
/// Coefficients are signed: zero and negative values represent flat and
/// short/hedged positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorExposures {
    pub ipca: f64,
    pub cdi: f64,
    pub cambio: f64,
}

impl FactorExposures {
    pub fn new(ipca: f64, cdi: f64, cambio: f64) -> Self {
        Self { ipca, cdi, cambio }
    }

    pub fn get(&self, factor: RiskFactor) -> f64 {
        match factor {
            RiskFactor::Ipca => self.ipca,
            RiskFactor::Cdi => self.cdi,
            RiskFactor::Cambio => self.cambio,
        }
    }

    pub fn set(&mut self, factor: RiskFactor, value: f64) {
        match factor {
            RiskFactor::Ipca => self.ipca = value,
            RiskFactor::Cdi => self.cdi = value,
            RiskFactor::Cambio => self.cambio = value,
        }
    }

    /// Replace the coefficient of a single factor.
    pub fn with(mut self, factor: RiskFactor, value: f64) -> Self {
        self.set(factor, value);
        self
    }
}

/// Asset and liability sensitivities of the portfolio.
///
/// Loaded once before any simulation runs and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use scenario_engine::core::exposure::{ExposureProfile, FactorExposures};
/// use scenario_engine::core::risk_factor::RiskFactor;
///
/// let profile = ExposureProfile::new(
///     FactorExposures::new(1.0, 2.0, 0.5),
///     FactorExposures::new(0.5, 1.5, 0.0),
/// );
/// assert_eq!(profile.net(RiskFactor::Cdi), 0.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExposureProfile {
    pub assets: FactorExposures,
    pub liabilities: FactorExposures,
}

impl ExposureProfile {
    pub fn new(assets: FactorExposures, liabilities: FactorExposures) -> Self {
        Self {
            assets,
            liabilities,
        }
    }

    /// Net sensitivity (assets minus liabilities) to `factor`.
    pub fn net(&self, factor: RiskFactor) -> f64 {
        self.assets.get(factor) - self.liabilities.get(factor)
    }
}
