//! # scenario-engine
//!
//! Monte Carlo scenario generator for three macroeconomic risk factors
//! (inflation `ipca`, interbank rate `cdi`, FX variation `cambio`), with a
//! linear sensitivity model that turns each scenario into a financial
//! impact on a portfolio of assets and liabilities.
//!
//! ## Architecture
//!
//! - **core** — Risk factors, bounds, exposure profiles, errors
//! - **simulation** — Variate generation, scenario tables, impact model, run history, sessions
//! - **analysis** — Column summaries and histograms of a run
//! - **io** — CSV records for bounds, exposures and scenario exports
//! - **config** — Simulation configuration

pub mod analysis;
pub mod config;
pub mod core;
pub mod io;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::analysis::histogram::Histogram;
    pub use crate::analysis::summary::{ColumnSummary, RunSummary};
    pub use crate::config::SimulationConfig;
    pub use crate::core::bounds::{FactorBounds, RiskFactorBounds};
    pub use crate::core::error::{ScenarioError, ScenarioResult};
    pub use crate::core::exposure::{ExposureProfile, FactorExposures};
    pub use crate::core::risk_factor::RiskFactor;
    pub use crate::simulation::history::RunHistory;
    pub use crate::simulation::impact::ImpactModel;
    pub use crate::simulation::scenario::{Scenario, ScenarioTable, ScenarioTableBuilder};
    pub use crate::simulation::session::{SimulationRun, SimulationSession};
    pub use crate::simulation::variate::{BoundedVariateGenerator, SamplingMethod};
}
