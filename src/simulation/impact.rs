use crate::core::exposure::ExposureProfile;
use crate::core::risk_factor::RiskFactor;
use crate::simulation::scenario::{FactorImpact, ScenarioImpact, ScenarioTable};

/// Linear sensitivity model mapping risk-factor moves to portfolio impact.
///
/// For each factor `f` of each scenario:
///
/// ```text
/// assets_f      = value_f * exposures.assets[f]
/// liabilities_f = value_f * exposures.liabilities[f]
/// net_f         = assets_f - liabilities_f
/// total         = net_ipca + net_cdi + net_cambio
/// ```
///
/// # Examples
///
/// ```
/// use scenario_engine::core::exposure::{ExposureProfile, FactorExposures};
/// use scenario_engine::simulation::impact::ImpactModel;
/// use scenario_engine::simulation::scenario::ScenarioTable;
///
/// let exposures = ExposureProfile::new(
///     FactorExposures::new(0.0, 2.0, 0.0),
///     FactorExposures::new(0.0, 1.5, 0.0),
/// );
/// let table = ScenarioTable::from_columns(vec![0.0], vec![0.10], vec![0.0]).unwrap();
/// let table = ImpactModel::new(exposures).apply(table);
///
/// let impact = table.rows()[0].impact.unwrap();
/// assert!((impact.cdi.net - 0.05).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ImpactModel {
    exposures: ExposureProfile,
}

impl ImpactModel {
    pub fn new(exposures: ExposureProfile) -> Self {
        Self { exposures }
    }

    pub fn exposures(&self) -> &ExposureProfile {
        &self.exposures
    }

    /// Impact of a single scenario's factor values.
    pub fn evaluate(&self, ipca: f64, cdi: f64, cambio: f64) -> ScenarioImpact {
        let ipca = self.factor_impact(RiskFactor::Ipca, ipca);
        let cdi = self.factor_impact(RiskFactor::Cdi, cdi);
        let cambio = self.factor_impact(RiskFactor::Cambio, cambio);
        ScenarioImpact {
            ipca,
            cdi,
            cambio,
            total: ipca.net + cdi.net + cambio.net,
        }
    }

    fn factor_impact(&self, factor: RiskFactor, value: f64) -> FactorImpact {
        let assets = value * self.exposures.assets.get(factor);
        let liabilities = value * self.exposures.liabilities.get(factor);
        FactorImpact {
            assets,
            liabilities,
            net: assets - liabilities,
        }
    }

    /// Return `table` augmented with impact columns.
    ///
    /// Takes the table by value; impacts already present are recomputed.
    pub fn apply(&self, mut table: ScenarioTable) -> ScenarioTable {
        for row in table.rows_mut() {
            row.impact = Some(self.evaluate(row.ipca, row.cdi, row.cambio));
        }
        table
    }
}
