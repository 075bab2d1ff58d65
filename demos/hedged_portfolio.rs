//! Compare an unhedged and a hedged book under the same scenarios.
//!
//! The hedge matches liabilities to assets on cdi, so the cdi net impact
//! drops to zero and only ipca and cambio remain.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use scenario_engine::analysis::summary::ColumnSummary;
use scenario_engine::core::bounds::{FactorBounds, RiskFactorBounds};
use scenario_engine::core::error::ScenarioResult;
use scenario_engine::core::exposure::{ExposureProfile, FactorExposures};
use scenario_engine::core::risk_factor::RiskFactor;
use scenario_engine::simulation::impact::ImpactModel;
use scenario_engine::simulation::scenario::ScenarioTableBuilder;

fn report(name: &str, values: &[f64]) {
    if let Some(s) = ColumnSummary::from_values(values) {
        println!(
            "  {:<10} mean {:>14.2}  sd {:>12.2}  p5 {:>14.2}  p95 {:>14.2}",
            name, s.mean, s.std_dev, s.p5, s.p95
        );
    }
}

fn main() -> ScenarioResult<()> {
    println!("╔══════════════════════════════════════════════╗");
    println!("║  scenario-engine: Hedged Portfolio Example   ║");
    println!("╚══════════════════════════════════════════════╝\n");

    let bounds = RiskFactorBounds::new(
        FactorBounds::from_percent(2.5, 4.0, 7.0),
        FactorBounds::from_percent(9.0, 10.5, 14.0),
        FactorBounds::from_percent(-12.0, 0.0, 15.0),
    );

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let table = ScenarioTableBuilder::default().build(&mut rng, 10_000, &bounds)?;

    let assets = FactorExposures::new(2_000_000.0, 5_000_000.0, 750_000.0);
    let unhedged = ExposureProfile::new(assets, FactorExposures::new(500_000.0, 1_000_000.0, 0.0));
    let hedged = ExposureProfile::new(
        assets,
        FactorExposures::new(500_000.0, 0.0, 0.0).with(RiskFactor::Cdi, assets.cdi),
    );

    for (name, profile) in [("Unhedged", unhedged), ("Hedged", hedged)] {
        let book = ImpactModel::new(profile).apply(table.clone());
        println!("━━━ {} ━━━\n", name);
        for factor in RiskFactor::ALL {
            let column = format!("impacto_{}_total", factor);
            if let Some(values) = book.column(&column) {
                report(factor.name(), &values);
            }
        }
        report("total", &book.total_impacts());
        println!();
    }
    Ok(())
}
