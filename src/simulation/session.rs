//! Explicit simulation session.
//!
//! A session owns everything that changes between runs: the random source,
//! the run history and the most recent run. Exposures are fixed when the
//! session is created.

use crate::config::SimulationConfig;
use crate::core::bounds::RiskFactorBounds;
use crate::core::error::ScenarioResult;
use crate::core::exposure::ExposureProfile;
use crate::simulation::history::RunHistory;
use crate::simulation::impact::ImpactModel;
use crate::simulation::scenario::{ScenarioTable, ScenarioTableBuilder};
use crate::simulation::variate::BoundedVariateGenerator;
use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The bounds of one simulation and the augmented table it produced.
///
/// Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRun {
    id: Uuid,
    created_at: DateTime<Utc>,
    bounds: RiskFactorBounds,
    table: ScenarioTable,
}

impl SimulationRun {
    pub fn new(bounds: RiskFactorBounds, table: ScenarioTable) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            bounds,
            table,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn bounds(&self) -> &RiskFactorBounds {
        &self.bounds
    }

    pub fn table(&self) -> &ScenarioTable {
        &self.table
    }

    pub fn into_table(self) -> ScenarioTable {
        self.table
    }
}

/// Runs simulations against a fixed exposure profile.
///
/// # Examples
///
/// ```
/// use scenario_engine::config::SimulationConfig;
/// use scenario_engine::core::bounds::{FactorBounds, RiskFactorBounds};
/// use scenario_engine::core::exposure::{ExposureProfile, FactorExposures};
/// use scenario_engine::simulation::session::SimulationSession;
///
/// let exposures = ExposureProfile::new(
///     FactorExposures::new(1.0, 2.0, 0.5),
///     FactorExposures::new(0.5, 1.5, 0.0),
/// );
/// let config = SimulationConfig { scenario_count: 200, seed: Some(1), ..Default::default() };
/// let mut session = SimulationSession::new(exposures, config).unwrap();
///
/// let bounds = RiskFactorBounds::new(
///     FactorBounds::new(0.03, 0.045, 0.06),
///     FactorBounds::new(0.10, 0.1175, 0.13),
///     FactorBounds::new(-0.05, 0.02, 0.10),
/// );
/// let run = session.simulate(&bounds).unwrap();
/// assert_eq!(run.table().len(), 200);
/// assert_eq!(session.history().len(), 1);
/// ```
#[derive(Debug)]
pub struct SimulationSession<R = ChaCha8Rng> {
    config: SimulationConfig,
    builder: ScenarioTableBuilder,
    model: ImpactModel,
    rng: R,
    history: RunHistory,
    latest: Option<SimulationRun>,
}

impl SimulationSession<ChaCha8Rng> {
    /// Session seeded from `config.seed`, or from OS entropy when unset.
    pub fn new(exposures: ExposureProfile, config: SimulationConfig) -> ScenarioResult<Self> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(exposures, config, rng)
    }
}

impl<R: Rng> SimulationSession<R> {
    /// Session drawing from a caller-supplied random source.
    pub fn with_rng(
        exposures: ExposureProfile,
        config: SimulationConfig,
        rng: R,
    ) -> ScenarioResult<Self> {
        config.validate()?;
        let generator =
            BoundedVariateGenerator::with_pull(config.method, config.pull_mean, config.pull_std_dev)?;
        Ok(Self {
            config,
            builder: ScenarioTableBuilder::new(generator),
            model: ImpactModel::new(exposures),
            rng,
            history: RunHistory::new(),
            latest: None,
        })
    }

    /// Run one simulation for `bounds`.
    ///
    /// Invalid bounds are rejected before anything is generated or recorded.
    /// On success the bounds are prepended to the history and the run
    /// replaces the session's latest run.
    pub fn simulate(&mut self, bounds: &RiskFactorBounds) -> ScenarioResult<&SimulationRun> {
        if let Err(e) = bounds.check() {
            log::warn!("simulation rejected: {}", e);
            return Err(e);
        }

        let table = self
            .builder
            .build(&mut self.rng, self.config.scenario_count, bounds)?;
        let table = self.model.apply(table);
        let run = SimulationRun::new(*bounds, table);

        log::info!(
            "simulation {} produced {} scenarios ({:?} sampling)",
            run.id(),
            run.table().len(),
            self.config.method
        );

        self.history.record(*bounds);
        Ok(&*self.latest.insert(run))
    }

    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    pub fn latest_run(&self) -> Option<&SimulationRun> {
        self.latest.as_ref()
    }

    /// Give up the most recent run, leaving the history intact.
    pub fn take_latest_run(&mut self) -> Option<SimulationRun> {
        self.latest.take()
    }

    pub fn exposures(&self) -> &ExposureProfile {
        self.model.exposures()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
