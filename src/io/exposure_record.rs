//! Asset and liability exposure records.
//!
//! Each side is a single-row CSV with one column per risk factor:
//!
//! ```text
//! ipca,cdi,cambio
//! 1200000,3500000,-250000
//! ```
//!
//! Extra columns, such as an unnamed index, are ignored. A missing file,
//! row or factor column is an error: exposures never default to zero.

use crate::core::error::{ExposureSide, ScenarioError, ScenarioResult};
use crate::core::exposure::{ExposureProfile, FactorExposures};
use crate::core::risk_factor::RiskFactor;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Load both sides of the exposure profile.
pub fn read_exposures(
    assets_path: impl AsRef<Path>,
    liabilities_path: impl AsRef<Path>,
) -> ScenarioResult<ExposureProfile> {
    let assets = read_side(assets_path.as_ref(), ExposureSide::Assets)?;
    let liabilities = read_side(liabilities_path.as_ref(), ExposureSide::Liabilities)?;
    Ok(ExposureProfile::new(assets, liabilities))
}

fn read_side(path: &Path, side: ExposureSide) -> ScenarioResult<FactorExposures> {
    let file = File::open(path).map_err(|e| ScenarioError::MissingExposureData {
        side,
        reason: format!("cannot open {}: {}", path.display(), e),
    })?;
    let exposures = parse_exposures(file, side)?;
    log::debug!("read {} exposures from {}", side, path.display());
    Ok(exposures)
}

/// Parse one side's exposure record from any reader.
pub fn parse_exposures<R: Read>(reader: R, side: ExposureSide) -> ScenarioResult<FactorExposures> {
    let missing = |reason: String| ScenarioError::MissingExposureData { side, reason };

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| missing(format!("unreadable header: {}", e)))?
        .clone();
    let record = match reader.records().next() {
        Some(record) => record.map_err(|e| missing(format!("unreadable row: {}", e)))?,
        None => return Err(missing("no data row".to_string())),
    };

    let mut exposures = FactorExposures::default();
    for factor in RiskFactor::ALL {
        let idx = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(factor.name()))
            .ok_or_else(|| missing(format!("no '{}' column", factor)))?;
        let raw = record.get(idx).unwrap_or("");
        let value: f64 = raw
            .parse()
            .map_err(|_| missing(format!("'{}' coefficient '{}' is not a number", factor, raw)))?;
        exposures.set(factor, value);
    }
    Ok(exposures)
}
