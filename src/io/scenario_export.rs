//! CSV export of scenario tables.
//!
//! The header is the table's column names; no min/expected/max index is
//! written. Values use Rust's shortest round-trip float formatting, so a
//! parsed export matches the exported table.

use crate::core::error::{ScenarioError, ScenarioResult};
use crate::simulation::scenario::{
    FactorImpact, Scenario, ScenarioImpact, ScenarioTable, FACTOR_COLUMNS, FACTOR_IMPACT_COLUMNS,
    TOTAL_IMPACT_COLUMN,
};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Write `table` as CSV into `writer`.
pub fn write_csv<W: Write>(writer: W, table: &ScenarioTable) -> ScenarioResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.values().iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Serialize `table` to CSV text.
pub fn to_csv(table: &ScenarioTable) -> ScenarioResult<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, table)?;
    String::from_utf8(buf).map_err(|e| ScenarioError::malformed("scenario export", e.to_string()))
}

/// Write the scenario export to `path`.
pub fn write_scenarios(path: impl AsRef<Path>, table: &ScenarioTable) -> ScenarioResult<()> {
    let path = path.as_ref();
    write_csv(File::create(path)?, table)?;
    log::debug!("exported {} scenarios to {}", table.len(), path.display());
    Ok(())
}

/// Read a scenario export back from `path`.
pub fn read_scenarios(path: impl AsRef<Path>) -> ScenarioResult<ScenarioTable> {
    let text = fs::read_to_string(path.as_ref())?;
    parse_csv(&text, &path.as_ref().display().to_string())
}

/// Parse CSV text produced by [`to_csv`].
///
/// Accepts the raw three-column form and the full form with impacts.
pub fn from_csv(text: &str) -> ScenarioResult<ScenarioTable> {
    parse_csv(text, "scenario csv")
}

fn parse_csv(text: &str, origin: &str) -> ScenarioResult<ScenarioTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    let find = |name: &str| headers.iter().position(|h| h == name);

    let factor_idx = FACTOR_COLUMNS
        .iter()
        .map(|&name| {
            find(name).ok_or_else(|| ScenarioError::malformed(origin, format!("no '{}' column", name)))
        })
        .collect::<ScenarioResult<Vec<usize>>>()?;

    let impact_names: Vec<&str> = FACTOR_IMPACT_COLUMNS
        .iter()
        .copied()
        .chain(std::iter::once(TOTAL_IMPACT_COLUMN))
        .collect();
    let impact_idx: Vec<Option<usize>> = impact_names.iter().map(|&n| find(n)).collect();
    let present = impact_idx.iter().filter(|i| i.is_some()).count();
    if present != 0 && present != impact_idx.len() {
        return Err(ScenarioError::malformed(
            origin,
            format!("{} of {} impact columns present", present, impact_idx.len()),
        ));
    }
    let impact_idx: Option<Vec<usize>> = impact_idx.into_iter().collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let value = |idx: usize| -> ScenarioResult<f64> {
            let raw = record.get(idx).unwrap_or("");
            raw.parse().map_err(|_| {
                ScenarioError::malformed(
                    origin,
                    format!("row {}: '{}' is not a number", line + 1, raw),
                )
            })
        };

        let mut scenario = Scenario::new(
            value(factor_idx[0])?,
            value(factor_idx[1])?,
            value(factor_idx[2])?,
        );
        if let Some(idx) = &impact_idx {
            let v = idx.iter().map(|&i| value(i)).collect::<ScenarioResult<Vec<f64>>>()?;
            let factor = |offset: usize| FactorImpact {
                assets: v[offset],
                liabilities: v[offset + 1],
                net: v[offset + 2],
            };
            // Impact block order is cdi, ipca, cambio, total.
            scenario.impact = Some(ScenarioImpact {
                cdi: factor(0),
                ipca: factor(3),
                cambio: factor(6),
                total: v[9],
            });
        }
        rows.push(scenario);
    }
    Ok(ScenarioTable::from_rows(rows))
}
