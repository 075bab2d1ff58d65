//! Basic scenario simulation example.
//!
//! Generates a seeded scenario table for a Brazilian treasury book and
//! prints the distribution of each factor and of the total impact.

use scenario_engine::analysis::histogram::Histogram;
use scenario_engine::analysis::summary::RunSummary;
use scenario_engine::config::SimulationConfig;
use scenario_engine::core::bounds::{FactorBounds, RiskFactorBounds};
use scenario_engine::core::error::ScenarioResult;
use scenario_engine::core::exposure::{ExposureProfile, FactorExposures};
use scenario_engine::core::risk_factor::RiskFactor;
use scenario_engine::simulation::session::SimulationSession;

fn main() -> ScenarioResult<()> {
    println!("╔══════════════════════════════════════════════╗");
    println!("║  scenario-engine: Basic Simulation Example   ║");
    println!("╚══════════════════════════════════════════════╝\n");

    // Envelopes in percent, as an analyst would type them.
    let bounds = RiskFactorBounds::new(
        FactorBounds::from_percent(3.0, 4.5, 6.0),
        FactorBounds::from_percent(10.0, 11.75, 13.0),
        FactorBounds::from_percent(-5.0, 2.0, 10.0),
    );
    println!("━━━ Bounds ━━━\n");
    print!("{}", bounds);
    println!();

    let exposures = ExposureProfile::new(
        FactorExposures::new(1_200_000.0, 3_500_000.0, -250_000.0),
        FactorExposures::new(800_000.0, 4_100_000.0, 150_000.0),
    );

    let config = SimulationConfig {
        scenario_count: 5_000,
        seed: Some(42),
        histogram_bins: 20,
        ..Default::default()
    };
    let mut session = SimulationSession::new(exposures, config)?;
    let run = session.simulate(&bounds)?;

    println!("━━━ Run {} ━━━\n", run.id());
    println!("{}", RunSummary::from_table(run.table()));

    for factor in RiskFactor::ALL {
        if let Some(h) = Histogram::from_values(&run.table().factor_column(factor), 20) {
            println!("━━━ {} ━━━\n", factor.label());
            print!("{}", h);
            println!();
        }
    }

    if let Some(h) = Histogram::from_values(&run.table().total_impacts(), 20) {
        println!("━━━ Total impact ━━━\n");
        print!("{}", h);
    }
    Ok(())
}
