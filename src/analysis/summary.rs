use crate::simulation::scenario::ScenarioTable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Descriptive statistics of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p5: f64,
    pub p50: f64,
    pub p95: f64,
}

impl ColumnSummary {
    /// Summarize `values`; `None` when empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        Some(Self {
            count,
            mean,
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[count - 1],
            p5: percentile_sorted(&sorted, 5.0)?,
            p50: percentile_sorted(&sorted, 50.0)?,
            p95: percentile_sorted(&sorted, 95.0)?,
        })
    }
}

/// Percentile of already-sorted data, interpolating linearly between the
/// closest ranks. `None` for empty data.
pub fn percentile_sorted(sorted: &[f64], pct: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = (pct / 100.0).clamp(0.0, 1.0) * last as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// A [`ColumnSummary`] for every column of a scenario table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub scenarios: usize,
    pub columns: Vec<(String, ColumnSummary)>,
}

impl RunSummary {
    pub fn from_table(table: &ScenarioTable) -> Self {
        let columns = table
            .columns()
            .into_iter()
            .filter_map(|name| {
                let values = table.column(name)?;
                ColumnSummary::from_values(&values).map(|s| (name.to_string(), s))
            })
            .collect();
        Self {
            scenarios: table.len(),
            columns,
        }
    }

    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, s)| s)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Scenario Summary ({} scenarios) ===", self.scenarios)?;
        writeln!(
            f,
            "{:<24} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "column", "mean", "std", "p5", "p50", "p95"
        )?;
        for (name, s) in &self.columns {
            writeln!(
                f,
                "{:<24} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
                name, s.mean, s.std_dev, s.p5, s.p50, s.p95
            )?;
        }
        Ok(())
    }
}
