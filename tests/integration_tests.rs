use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use scenario_engine::analysis::histogram::Histogram;
use scenario_engine::analysis::summary::RunSummary;
use scenario_engine::config::SimulationConfig;
use scenario_engine::core::bounds::{FactorBounds, RiskFactorBounds};
use scenario_engine::core::error::ScenarioError;
use scenario_engine::core::exposure::{ExposureProfile, FactorExposures};
use scenario_engine::core::risk_factor::RiskFactor;
use scenario_engine::io::bounds_record::{read_bounds, write_bounds};
use scenario_engine::io::exposure_record::read_exposures;
use scenario_engine::io::scenario_export::{from_csv, read_scenarios, to_csv, write_scenarios};
use scenario_engine::simulation::impact::ImpactModel;
use scenario_engine::simulation::scenario::{
    ScenarioTable, ScenarioTableBuilder, FACTOR_IMPACT_COLUMNS, TOTAL_IMPACT_COLUMN,
};
use scenario_engine::simulation::session::SimulationSession;
use scenario_engine::simulation::variate::{BoundedVariateGenerator, SamplingMethod};
use std::fs;

fn brazil_bounds() -> RiskFactorBounds {
    RiskFactorBounds::new(
        FactorBounds::new(0.03, 0.045, 0.06),
        FactorBounds::new(0.10, 0.1175, 0.13),
        FactorBounds::new(-0.05, 0.02, 0.10),
    )
}

fn treasury_exposures() -> ExposureProfile {
    ExposureProfile::new(
        FactorExposures::new(1_200_000.0, 3_500_000.0, -250_000.0),
        FactorExposures::new(800_000.0, 4_100_000.0, 150_000.0),
    )
}

/// Full pipeline: records on disk → session → export → records on disk.
#[test]
fn full_pipeline_from_records() {
    let dir = tempfile::tempdir().unwrap();
    let bounds_path = dir.path().join("simulacao.csv");
    let assets_path = dir.path().join("ativos.csv");
    let liabilities_path = dir.path().join("passivos.csv");
    let output_path = dir.path().join("cenarios.csv");

    write_bounds(&bounds_path, &brazil_bounds()).unwrap();
    fs::write(&assets_path, "ipca,cdi,cambio\n1200000,3500000,-250000\n").unwrap();
    fs::write(&liabilities_path, "cdi,ipca,cambio\n4100000,800000,150000\n").unwrap();

    let bounds = read_bounds(&bounds_path).unwrap();
    assert_eq!(bounds, brazil_bounds());
    let exposures = read_exposures(&assets_path, &liabilities_path).unwrap();
    assert_eq!(exposures, treasury_exposures());

    let config = SimulationConfig {
        scenario_count: 1_000,
        seed: Some(2024),
        ..Default::default()
    };
    let mut session = SimulationSession::new(exposures, config).unwrap();
    let run = session.simulate(&bounds).unwrap();

    let table = run.table();
    assert_eq!(table.len(), 1_000);
    assert_eq!(table.column_count(), 3 + FACTOR_IMPACT_COLUMNS.len() + 1);

    for row in table.rows() {
        let impact = row.impact.unwrap();
        assert_abs_diff_eq!(
            impact.total,
            impact.ipca.net + impact.cdi.net + impact.cambio.net,
            epsilon = 1e-9
        );
    }

    write_scenarios(&output_path, table).unwrap();
    let reloaded = read_scenarios(&output_path).unwrap();
    assert_eq!(reloaded.len(), table.len());
    assert_eq!(&reloaded, table);
}

#[test]
fn check_rejects_and_accepts() {
    assert!(FactorBounds::new(5.0, 3.0, 10.0).check(RiskFactor::Ipca).is_err());
    assert!(FactorBounds::new(1.0, 5.0, 10.0).check(RiskFactor::Ipca).is_ok());
}

#[test]
fn impact_model_cdi_example() {
    let exposures = ExposureProfile::new(
        FactorExposures::default().with(RiskFactor::Cdi, 2.0),
        FactorExposures::default().with(RiskFactor::Cdi, 1.5),
    );
    let table = ScenarioTable::from_columns(vec![0.0], vec![0.10], vec![0.0]).unwrap();
    let table = ImpactModel::new(exposures).apply(table);

    assert_abs_diff_eq!(table.column("impacto_cdi_ativos").unwrap()[0], 0.20, epsilon = 1e-12);
    assert_abs_diff_eq!(table.column("impacto_cdi_passivos").unwrap()[0], 0.15, epsilon = 1e-12);
    assert_abs_diff_eq!(table.column("impacto_cdi_total").unwrap()[0], 0.05, epsilon = 1e-12);
    assert_abs_diff_eq!(table.column(TOTAL_IMPACT_COLUMN).unwrap()[0], 0.05, epsilon = 1e-12);
}

#[test]
fn builder_column_counts_before_and_after_impact() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(11);
    let table = ScenarioTableBuilder::default()
        .build(&mut rng, 321, &brazil_bounds())
        .unwrap();
    assert_eq!(table.len(), 321);
    assert_eq!(table.column_count(), 3);

    let table = ImpactModel::new(treasury_exposures()).apply(table);
    assert_eq!(table.len(), 321);
    let derived = table.column_count() - 3;
    assert_eq!(derived - 1, 9, "nine per-factor impact columns plus the total");
}

#[test]
fn history_is_most_recent_first() {
    let config = SimulationConfig {
        scenario_count: 10,
        seed: Some(5),
        ..Default::default()
    };
    let mut session = SimulationSession::new(treasury_exposures(), config).unwrap();
    let b1 = brazil_bounds();
    let b2 = b1.with(RiskFactor::Cdi, FactorBounds::new(0.09, 0.105, 0.12));
    let b3 = b1.with(RiskFactor::Cambio, FactorBounds::new(-0.10, 0.0, 0.15));

    for b in [&b1, &b2, &b3] {
        session.simulate(b).unwrap();
    }
    assert_eq!(session.history().all(), vec![b3, b2, b1]);
}

#[test]
fn invalid_bounds_never_produce_a_table() {
    let config = SimulationConfig {
        scenario_count: 10,
        seed: Some(5),
        ..Default::default()
    };
    let mut session = SimulationSession::new(treasury_exposures(), config).unwrap();
    let bad = brazil_bounds().with(RiskFactor::Cambio, FactorBounds::new(0.1, 0.2, 0.05));

    let err = session.simulate(&bad).unwrap_err();
    assert!(matches!(err, ScenarioError::InvalidBounds { factor: RiskFactor::Cambio, .. }));
    assert!(session.latest_run().is_none());
    assert!(session.history().is_empty());
}

#[test]
fn missing_liabilities_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let assets_path = dir.path().join("ativos.csv");
    fs::write(&assets_path, "ipca,cdi,cambio\n1,2,3\n").unwrap();

    let err = read_exposures(&assets_path, dir.path().join("passivos.csv")).unwrap_err();
    assert!(err.to_string().starts_with("missing liabilities exposure data"));
}

#[test]
fn unseeded_generation_is_nondeterministic() {
    let generator = BoundedVariateGenerator::default();
    let a = generator
        .generate(&mut rand::thread_rng(), 5.0, 1.0, 10.0, 200)
        .unwrap();
    let b = generator
        .generate(&mut rand::thread_rng(), 5.0, 1.0, 10.0, 200)
        .unwrap();
    assert_eq!(a.len(), 200);
    assert_eq!(b.len(), 200);
    assert_ne!(a, b);
}

#[test]
fn uniform_sessions_use_uniform_sampling() {
    let config = SimulationConfig {
        scenario_count: 500,
        seed: Some(9),
        method: SamplingMethod::Uniform,
        ..Default::default()
    };
    let mut session = SimulationSession::new(treasury_exposures(), config).unwrap();
    let run = session.simulate(&brazil_bounds()).unwrap();
    assert_eq!(run.table().len(), 500);
}

#[test]
fn seeded_means_land_between_min_and_max() {
    let config = SimulationConfig {
        scenario_count: 10_000,
        seed: Some(77),
        ..Default::default()
    };
    let mut session = SimulationSession::new(treasury_exposures(), config).unwrap();
    let bounds = brazil_bounds();
    let run = session.simulate(&bounds).unwrap();
    let summary = RunSummary::from_table(run.table());

    for (factor, b) in bounds.iter() {
        let s = summary.get(factor.name()).unwrap();
        assert!(s.mean > b.min && s.mean < b.max, "{} mean {}", factor, s.mean);
        // Halfway between the grid midpoint and the expected value.
        let want = 0.5 * ((b.min + b.max) / 2.0) + 0.5 * b.expected;
        assert_abs_diff_eq!(s.mean, want, epsilon = b.width() * 0.02);
    }
}

#[test]
fn export_round_trip_and_histogram() {
    let config = SimulationConfig {
        scenario_count: 400,
        seed: Some(3),
        ..Default::default()
    };
    let mut session = SimulationSession::new(treasury_exposures(), config).unwrap();
    let table = session.simulate(&brazil_bounds()).unwrap().table().clone();

    let parsed = from_csv(&to_csv(&table).unwrap()).unwrap();
    assert_eq!(parsed.len(), table.len());
    for name in table.columns() {
        let original = table.column(name).unwrap();
        let reparsed = parsed.column(name).unwrap();
        for (a, b) in original.iter().zip(reparsed.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    let histogram = Histogram::from_values(&table.total_impacts(), 25).unwrap();
    assert_eq!(histogram.total(), 400);
}

