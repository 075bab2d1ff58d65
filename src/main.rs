//! scenario-engine CLI
//!
//! Generate macroeconomic scenarios and their portfolio impact from the
//! command line.
//!
//! # Usage
//!
//! ```bash
//! # Simulate with the persisted bounds and exposure records
//! scenario-engine simulate
//!
//! # Override the CDI envelope (percent) and use a fixed seed
//! scenario-engine simulate --cdi 10,11.75,13 --seed 42
//!
//! # Validate bounds without simulating
//! scenario-engine check --ipca 3,4.5,6
//! ```

use scenario_engine::analysis::histogram::Histogram;
use scenario_engine::analysis::summary::RunSummary;
use scenario_engine::config::SimulationConfig;
use scenario_engine::core::bounds::{FactorBounds, RiskFactorBounds};
use scenario_engine::core::error::{ScenarioError, ScenarioResult};
use scenario_engine::core::risk_factor::RiskFactor;
use scenario_engine::io::bounds_record::{read_bounds, write_bounds};
use scenario_engine::io::exposure_record::read_exposures;
use scenario_engine::io::scenario_export::write_scenarios;
use scenario_engine::simulation::scenario::TOTAL_IMPACT_COLUMN;
use scenario_engine::simulation::session::{SimulationRun, SimulationSession};
use std::path::PathBuf;
use std::process;

fn print_usage() {
    eprintln!(
        r#"scenario-engine — Monte Carlo macroeconomic scenarios and portfolio impact

USAGE:
    scenario-engine <COMMAND> [OPTIONS]

COMMANDS:
    simulate    Generate scenarios, apply exposures and export the table
    check       Validate the bounds (min < expected < max for every factor)
    help        Show this message

OPTIONS (simulate, check):
    --bounds <FILE>         Bounds record (default: simulacao.csv)
    --ipca <MIN,EXP,MAX>    Inflation envelope in percent, overrides the record
    --cdi <MIN,EXP,MAX>     Interbank rate envelope in percent
    --cambio <MIN,EXP,MAX>  FX variation envelope in percent
    --config <FILE>         JSON configuration file

OPTIONS (simulate):
    --assets <FILE>         Asset exposures (default: ativos.csv)
    --liabilities <FILE>    Liability exposures (default: passivos.csv)
    --scenarios <N>         Number of scenarios (default: 1000)
    --seed <N>              Seed for reproducible runs
    --method <METHOD>       Sampling method: grid (default) or uniform
    --output <FILE>         Scenario export (default: cenarios.csv)
    --format <FORMAT>       Report format: text (default) or json
    --bins <N>              Histogram bins in the text report (default: 30)
    --no-save               Do not persist the bounds used

EXAMPLES:
    scenario-engine simulate
    scenario-engine simulate --scenarios 5000 --seed 7 --format json
    scenario-engine simulate --cambio -5,2,10 --output stress.csv
    scenario-engine check --bounds simulacao.csv"#
    );
}

/// Options shared by every command, after merging the config file and flags.
struct Options {
    config: SimulationConfig,
    overrides: Vec<(RiskFactor, FactorBounds)>,
    format: String,
    save: bool,
}

fn parse_options(args: &[String]) -> ScenarioResult<Options> {
    let mut config_path: Option<PathBuf> = None;
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--config" {
            config_path = Some(PathBuf::from(value_of(args, i)?));
        }
        i += 1;
    }
    let mut config = match config_path {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig::default(),
    };

    let mut overrides = Vec::new();
    let mut format = "text".to_string();
    let mut save = true;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => i += 1,
            "--bounds" => {
                config.bounds_path = PathBuf::from(value_of(args, i)?);
                i += 1;
            }
            "--assets" => {
                config.assets_path = PathBuf::from(value_of(args, i)?);
                i += 1;
            }
            "--liabilities" => {
                config.liabilities_path = PathBuf::from(value_of(args, i)?);
                i += 1;
            }
            "--output" => {
                config.output_path = PathBuf::from(value_of(args, i)?);
                i += 1;
            }
            "--scenarios" => {
                config.scenario_count = parse_number(args, i)?;
                i += 1;
            }
            "--seed" => {
                config.seed = Some(parse_number(args, i)?);
                i += 1;
            }
            "--bins" => {
                config.histogram_bins = parse_number(args, i)?;
                i += 1;
            }
            "--method" => {
                config.method = value_of(args, i)?.parse()?;
                i += 1;
            }
            "--format" => {
                format = value_of(args, i)?.to_string();
                if format != "text" && format != "json" {
                    return Err(ScenarioError::config("--format requires 'text' or 'json'"));
                }
                i += 1;
            }
            "--no-save" => save = false,
            flag @ ("--ipca" | "--cdi" | "--cambio") => {
                let factor: RiskFactor = flag.trim_start_matches("--").parse()?;
                overrides.push((factor, parse_percent_triple(value_of(args, i)?)?));
                i += 1;
            }
            other => {
                return Err(ScenarioError::config(format!("unknown option: {}", other)));
            }
        }
        i += 1;
    }
    config.validate()?;

    Ok(Options {
        config,
        overrides,
        format,
        save,
    })
}

fn value_of(args: &[String], i: usize) -> ScenarioResult<&str> {
    args.get(i + 1)
        .map(|s| s.as_str())
        .ok_or_else(|| ScenarioError::config(format!("{} requires a value", args[i])))
}

fn parse_number<T: std::str::FromStr>(args: &[String], i: usize) -> ScenarioResult<T> {
    let raw = value_of(args, i)?;
    raw.parse()
        .map_err(|_| ScenarioError::config(format!("{} requires a number, got '{}'", args[i], raw)))
}

/// Parse `MIN,EXP,MAX` given in percent.
fn parse_percent_triple(raw: &str) -> ScenarioResult<FactorBounds> {
    let parts: Vec<f64> = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| ScenarioError::config(format!("expected MIN,EXP,MAX, got '{}'", raw)))?;
    match parts.as_slice() {
        [min, expected, max] => Ok(FactorBounds::from_percent(*min, *expected, *max)),
        _ => Err(ScenarioError::config(format!(
            "expected three values MIN,EXP,MAX, got '{}'",
            raw
        ))),
    }
}

/// Bounds from the record, with any command-line overrides applied.
///
/// When every factor is overridden the record is not needed.
fn resolve_bounds(options: &Options) -> ScenarioResult<RiskFactorBounds> {
    let overridden =
        |f: RiskFactor| options.overrides.iter().any(|(factor, _)| *factor == f);
    let mut bounds = if RiskFactor::ALL.iter().all(|f| overridden(*f)) {
        let placeholder = FactorBounds::new(0.0, 0.0, 0.0);
        RiskFactorBounds::new(placeholder, placeholder, placeholder)
    } else {
        read_bounds(&options.config.bounds_path)?
    };
    for (factor, b) in &options.overrides {
        *bounds.get_mut(*factor) = *b;
    }
    Ok(bounds)
}

fn cmd_check(args: &[String]) -> ScenarioResult<()> {
    let options = parse_options(args)?;
    let bounds = resolve_bounds(&options)?;
    print!("{}", bounds);
    bounds.check()?;
    println!("Bounds OK.");
    Ok(())
}

#[derive(serde::Serialize)]
struct SimulationOutput<'a> {
    run_id: String,
    created_at: String,
    bounds: &'a RiskFactorBounds,
    summary: RunSummary,
    export: String,
}

/// Resolve bounds, simulate, export the table and persist the bounds used
/// unless `--no-save` was given.
fn run_and_save(options: &Options) -> ScenarioResult<SimulationRun> {
    let bounds = resolve_bounds(options)?;
    bounds.check()?;

    let config = &options.config;
    let exposures = read_exposures(&config.assets_path, &config.liabilities_path)?;
    let mut session = SimulationSession::new(exposures, config.clone())?;
    let run = session.simulate(&bounds)?.clone();

    write_scenarios(&config.output_path, run.table())?;
    if options.save {
        write_bounds(&config.bounds_path, &bounds)?;
    }
    Ok(run)
}

fn cmd_simulate(args: &[String]) -> ScenarioResult<()> {
    let options = parse_options(args)?;
    let config = &options.config;
    let run = run_and_save(&options)?;

    let summary = RunSummary::from_table(run.table());
    if options.format == "json" {
        let output = SimulationOutput {
            run_id: run.id().to_string(),
            created_at: run.created_at().to_rfc3339(),
            bounds: run.bounds(),
            summary,
            export: config.output_path.display().to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Run {} ({})", run.id(), run.created_at().to_rfc3339());
    print!("{}", run.bounds());
    println!();
    println!("{}", summary);

    for factor in RiskFactor::ALL {
        let values = run.table().factor_column(factor);
        if let Some(h) = Histogram::from_values(&values, config.histogram_bins) {
            println!("{} ({})", factor.label(), factor);
            print!("{}", h);
            println!();
        }
    }
    if let Some(h) = Histogram::from_values(&run.table().total_impacts(), config.histogram_bins) {
        println!("Financial impact ({})", TOTAL_IMPACT_COLUMN);
        print!("{}", h);
    }

    eprintln!(
        "Exported {} scenarios → {}",
        run.table().len(),
        config.output_path.display()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    let result = match command {
        "simulate" => cmd_simulate(rest),
        "check" => cmd_check(rest),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
