//! Scenario tables and the builder that fills them.

use crate::core::bounds::RiskFactorBounds;
use crate::core::error::{ScenarioError, ScenarioResult};
use crate::core::risk_factor::RiskFactor;
use crate::simulation::variate::BoundedVariateGenerator;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Raw risk-factor columns, in canonical order.
pub const FACTOR_COLUMNS: [&str; 3] = ["ipca", "cdi", "cambio"];

/// Per-factor impact columns, in export order.
pub const FACTOR_IMPACT_COLUMNS: [&str; 9] = [
    "impacto_cdi_ativos",
    "impacto_cdi_passivos",
    "impacto_cdi_total",
    "impacto_ipca_ativos",
    "impacto_ipca_passivos",
    "impacto_ipca_total",
    "impacto_cambio_ativos",
    "impacto_cambio_passivos",
    "impacto_cambio_total",
];

/// Grand-total impact column.
pub const TOTAL_IMPACT_COLUMN: &str = "impacto_total";

/// Factor order used by the impact block of an export.
const IMPACT_FACTOR_ORDER: [RiskFactor; 3] = [RiskFactor::Cdi, RiskFactor::Ipca, RiskFactor::Cambio];

/// Financial impact of one risk factor in one scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorImpact {
    pub assets: f64,
    pub liabilities: f64,
    /// `assets - liabilities`.
    pub net: f64,
}

/// Impact of every risk factor in one scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioImpact {
    pub ipca: FactorImpact,
    pub cdi: FactorImpact,
    pub cambio: FactorImpact,
    /// Sum of the three net impacts.
    pub total: f64,
}

impl ScenarioImpact {
    pub fn get(&self, factor: RiskFactor) -> &FactorImpact {
        match factor {
            RiskFactor::Ipca => &self.ipca,
            RiskFactor::Cdi => &self.cdi,
            RiskFactor::Cambio => &self.cambio,
        }
    }

    fn values(&self) -> [f64; 10] {
        let mut out = [0.0; 10];
        for (i, factor) in IMPACT_FACTOR_ORDER.iter().enumerate() {
            let impact = self.get(*factor);
            out[i * 3] = impact.assets;
            out[i * 3 + 1] = impact.liabilities;
            out[i * 3 + 2] = impact.net;
        }
        out[9] = self.total;
        out
    }
}

/// One synthetic draw of all three risk factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub ipca: f64,
    pub cdi: f64,
    pub cambio: f64,
    /// Filled in by the impact model.
    pub impact: Option<ScenarioImpact>,
}

impl Scenario {
    pub fn new(ipca: f64, cdi: f64, cambio: f64) -> Self {
        Self {
            ipca,
            cdi,
            cambio,
            impact: None,
        }
    }

    pub fn value(&self, factor: RiskFactor) -> f64 {
        match factor {
            RiskFactor::Ipca => self.ipca,
            RiskFactor::Cdi => self.cdi,
            RiskFactor::Cambio => self.cambio,
        }
    }

    /// Value of column `idx` in [`ScenarioTable::columns`] order, or `None`
    /// for an impact column of a row without impacts.
    fn column_value(&self, idx: usize) -> Option<f64> {
        match idx {
            0 => Some(self.ipca),
            1 => Some(self.cdi),
            2 => Some(self.cambio),
            _ => {
                let impact = self.impact.as_ref()?;
                let offset = idx - FACTOR_COLUMNS.len();
                match IMPACT_FACTOR_ORDER.get(offset / 3) {
                    Some(factor) => {
                        let f = impact.get(*factor);
                        Some([f.assets, f.liabilities, f.net][offset % 3])
                    }
                    None if offset == FACTOR_IMPACT_COLUMNS.len() => Some(impact.total),
                    None => None,
                }
            }
        }
    }

    /// All column values of this row, in [`ScenarioTable::columns`] order.
    pub fn values(&self) -> Vec<f64> {
        let mut out = vec![self.ipca, self.cdi, self.cambio];
        if let Some(impact) = &self.impact {
            out.extend_from_slice(&impact.values());
        }
        out
    }
}

/// A table of scenarios.
///
/// Row order carries no meaning: each factor column is shuffled
/// independently, so only column-wise distributions matter. Every row of a
/// table either has impacts or none does.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTable {
    rows: Vec<Scenario>,
}

impl ScenarioTable {
    /// Build a table from raw factor columns of equal length.
    pub fn from_columns(ipca: Vec<f64>, cdi: Vec<f64>, cambio: Vec<f64>) -> ScenarioResult<Self> {
        if ipca.len() != cdi.len() || ipca.len() != cambio.len() {
            return Err(ScenarioError::malformed(
                "scenario columns",
                format!(
                    "factor columns differ in length: ipca {}, cdi {}, cambio {}",
                ipca.len(),
                cdi.len(),
                    cambio.len()
                ),
            ));
        }
        let rows = ipca
            .into_iter()
            .zip(cdi)
            .zip(cambio)
            .map(|((i, c), x)| Scenario::new(i, c, x))
            .collect();
        Ok(Self { rows })
    }

    pub(crate) fn from_rows(rows: Vec<Scenario>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Scenario] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Scenario] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the impact model has been applied.
    pub fn has_impacts(&self) -> bool {
        self.rows.first().map_or(false, |r| r.impact.is_some())
    }

    /// Column names in export order.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut cols = FACTOR_COLUMNS.to_vec();
        if self.has_impacts() {
            cols.extend_from_slice(&FACTOR_IMPACT_COLUMNS);
            cols.push(TOTAL_IMPACT_COLUMN);
        }
        cols
    }

    pub fn column_count(&self) -> usize {
        self.columns().len()
    }

    /// Values of one risk factor across all scenarios.
    pub fn factor_column(&self, factor: RiskFactor) -> Vec<f64> {
        self.rows.iter().map(|r| r.value(factor)).collect()
    }

    /// Values of a column by name, or `None` if the table has no such column.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns().iter().position(|c| *c == name)?;
        self.rows.iter().map(|r| r.column_value(idx)).collect()
    }

    /// Total impact per scenario; empty before the impact model runs.
    pub fn total_impacts(&self) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|r| r.impact.map(|i| i.total))
            .collect()
    }
}

/// Assembles scenario tables from per-factor bounds.
#[derive(Debug, Clone, Default)]
pub struct ScenarioTableBuilder {
    generator: BoundedVariateGenerator,
}

impl ScenarioTableBuilder {
    pub fn new(generator: BoundedVariateGenerator) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &BoundedVariateGenerator {
        &self.generator
    }

    /// Build a table of `n` scenarios.
    ///
    /// All factors are validated before any sampling, so invalid bounds
    /// never yield a partial table. Each factor's samples are shuffled
    /// independently to break the row alignment the grid would otherwise
    /// impose across factors.
    pub fn build<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n: usize,
        bounds: &RiskFactorBounds,
    ) -> ScenarioResult<ScenarioTable> {
        bounds.check()?;
        if n == 0 {
            return Err(ScenarioError::DegenerateInput);
        }

        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(RiskFactor::ALL.len());
        for (factor, factor_bounds) in bounds.iter() {
            let mut samples = self.generator.sample_factor(rng, factor, factor_bounds, n)?;
            samples.shuffle(rng);
            columns.push(samples);
        }

        let cambio = columns.pop().unwrap_or_default();
        let cdi = columns.pop().unwrap_or_default();
        let ipca = columns.pop().unwrap_or_default();
        let table = ScenarioTable::from_columns(ipca, cdi, cambio)?;
        log::debug!("built scenario table with {} rows", table.len());
        Ok(table)
    }
}
