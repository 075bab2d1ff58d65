use crate::core::error::{ScenarioError, ScenarioResult};
use crate::core::risk_factor::RiskFactor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The `[min, max]` envelope and target mean for a single risk factor.
///
/// Values are fractions: `0.045` means 4.5%.
///
/// # Examples
///
/// ```
/// use scenario_engine::core::bounds::FactorBounds;
///
/// assert!(FactorBounds::new(1.0, 5.0, 10.0).is_valid());
/// assert!(!FactorBounds::new(5.0, 3.0, 10.0).is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorBounds {
    pub min: f64,
    pub expected: f64,
    pub max: f64,
}

impl FactorBounds {
    pub fn new(min: f64, expected: f64, max: f64) -> Self {
        Self { min, expected, max }
    }

    /// Build bounds from percentages, e.g. `(3.0, 4.5, 6.0)` for 3%..6%.
    pub fn from_percent(min: f64, expected: f64, max: f64) -> Self {
        Self::new(min / 100.0, expected / 100.0, max / 100.0)
    }

    /// `min < expected < max` over finite values. NaN, infinite endpoints
    /// and envelopes whose width overflows are all invalid.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.width().is_finite()
            && self.min < self.expected
            && self.expected < self.max
    }

    /// Check the bounds on behalf of `factor`.
    pub fn check(&self, factor: RiskFactor) -> ScenarioResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ScenarioError::InvalidBounds {
                factor,
                min: self.min,
                expected: self.expected,
                max: self.max,
            })
        }
    }

    /// Width of the envelope.
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Whether `value` falls inside the closed envelope.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One set of bounds per risk factor: the input of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFactorBounds {
    pub ipca: FactorBounds,
    pub cdi: FactorBounds,
    pub cambio: FactorBounds,
}

impl RiskFactorBounds {
    pub fn new(ipca: FactorBounds, cdi: FactorBounds, cambio: FactorBounds) -> Self {
        Self { ipca, cdi, cambio }
    }

    pub fn get(&self, factor: RiskFactor) -> &FactorBounds {
        match factor {
            RiskFactor::Ipca => &self.ipca,
            RiskFactor::Cdi => &self.cdi,
            RiskFactor::Cambio => &self.cambio,
        }
    }

    pub fn get_mut(&mut self, factor: RiskFactor) -> &mut FactorBounds {
        match factor {
            RiskFactor::Ipca => &mut self.ipca,
            RiskFactor::Cdi => &mut self.cdi,
            RiskFactor::Cambio => &mut self.cambio,
        }
    }

    /// Replace the bounds of a single factor.
    pub fn with(mut self, factor: RiskFactor, bounds: FactorBounds) -> Self {
        *self.get_mut(factor) = bounds;
        self
    }

    /// Iterate `(factor, bounds)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (RiskFactor, &FactorBounds)> + '_ {
        RiskFactor::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// Validate every factor, reporting the first failure in canonical order.
    ///
    /// This must pass before any scenario is generated.
    pub fn check(&self) -> ScenarioResult<()> {
        for (factor, bounds) in self.iter() {
            bounds.check(factor)?;
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }
}

impl fmt::Display for RiskFactorBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (factor, b) in self.iter() {
            writeln!(
                f,
                "  {:<7} min {:>8.4}%  expected {:>8.4}%  max {:>8.4}%",
                factor.name(),
                b.min * 100.0,
                b.expected * 100.0,
                b.max * 100.0
            )?;
        }
        Ok(())
    }
}
