//! The persisted bounds record.
//!
//! One column per risk factor, one row per label, indexed by `situacao`:
//!
//! ```text
//! situacao,ipca,cdi,cambio
//! min,0.03,0.1,-0.05
//! medio,0.045,0.1175,0.02
//! max,0.06,0.13,0.1
//! ```
//!
//! Factor columns may appear in any order.

use crate::core::bounds::{FactorBounds, RiskFactorBounds};
use crate::core::error::{ScenarioError, ScenarioResult};
use crate::core::risk_factor::RiskFactor;
use csv::StringRecord;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const INDEX_COLUMN: &str = "situacao";
pub const MIN_LABEL: &str = "min";
pub const EXPECTED_LABEL: &str = "medio";
pub const MAX_LABEL: &str = "max";

/// Read the bounds record at `path`.
pub fn read_bounds(path: impl AsRef<Path>) -> ScenarioResult<RiskFactorBounds> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let bounds = parse_bounds(file, &path.display().to_string())?;
    log::debug!("read bounds from {}", path.display());
    Ok(bounds)
}

/// Parse a bounds record from any reader; `origin` names it in errors.
pub fn parse_bounds<R: Read>(reader: R, origin: &str) -> ScenarioResult<RiskFactorBounds> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();

    let label_idx = headers
        .iter()
        .position(|h| h == INDEX_COLUMN)
        .unwrap_or(0);
    let factor_idx = |factor: RiskFactor| -> ScenarioResult<usize> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(factor.name()))
            .ok_or_else(|| ScenarioError::malformed(origin, format!("no '{}' column", factor)))
    };
    let columns = [
        factor_idx(RiskFactor::Ipca)?,
        factor_idx(RiskFactor::Cdi)?,
        factor_idx(RiskFactor::Cambio)?,
    ];

    let mut mins: Option<[f64; 3]> = None;
    let mut expecteds: Option<[f64; 3]> = None;
    let mut maxes: Option<[f64; 3]> = None;

    for record in reader.records() {
        let record = record?;
        let slot = match record.get(label_idx) {
            Some(MIN_LABEL) => &mut mins,
            Some(EXPECTED_LABEL) => &mut expecteds,
            Some(MAX_LABEL) => &mut maxes,
            _ => continue,
        };
        *slot = Some(parse_row(&record, &columns, origin)?);
    }

    let missing = |label: &str| ScenarioError::malformed(origin, format!("no '{}' row", label));
    let mins = mins.ok_or_else(|| missing(MIN_LABEL))?;
    let expecteds = expecteds.ok_or_else(|| missing(EXPECTED_LABEL))?;
    let maxes = maxes.ok_or_else(|| missing(MAX_LABEL))?;

    let at = |i: usize| FactorBounds::new(mins[i], expecteds[i], maxes[i]);
    Ok(RiskFactorBounds::new(at(0), at(1), at(2)))
}

fn parse_row(record: &StringRecord, columns: &[usize; 3], origin: &str) -> ScenarioResult<[f64; 3]> {
    let mut out = [0.0; 3];
    for (slot, &idx) in out.iter_mut().zip(columns) {
        let raw = record.get(idx).unwrap_or("");
        *slot = raw.parse().map_err(|_| {
            ScenarioError::malformed(origin, format!("'{}' is not a number", raw))
        })?;
    }
    Ok(out)
}

/// Persist `bounds` so the next start defaults to them.
pub fn write_bounds(path: impl AsRef<Path>, bounds: &RiskFactorBounds) -> ScenarioResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    format_bounds(file, bounds)?;
    log::debug!("wrote bounds to {}", path.display());
    Ok(())
}

/// Serialize `bounds` as a bounds record into `writer`.
pub fn format_bounds<W: Write>(writer: W, bounds: &RiskFactorBounds) -> ScenarioResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    let mut header = vec![INDEX_COLUMN.to_string()];
    header.extend(RiskFactor::ALL.iter().map(|f| f.name().to_string()));
    writer.write_record(&header)?;

    let rows: [(&str, fn(&FactorBounds) -> f64); 3] = [
        (MIN_LABEL, |b| b.min),
        (EXPECTED_LABEL, |b| b.expected),
        (MAX_LABEL, |b| b.max),
    ];
    for (label, pick) in rows {
        let mut record = vec![label.to_string()];
        record.extend(bounds.iter().map(|(_, b)| pick(b).to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = "situacao,cambio,ipca,cdi\n\
                          min,-0.05,0.03,0.1\n\
                          medio,0.02,0.045,0.1175\n\
                          max,0.1,0.06,0.13\n";

    #[test]
    fn test_parse_reordered_columns() {
        let bounds = parse_bounds(RECORD.as_bytes(), "test").unwrap();
        assert_eq!(bounds.ipca, FactorBounds::new(0.03, 0.045, 0.06));
        assert_eq!(bounds.cdi, FactorBounds::new(0.1, 0.1175, 0.13));
        assert_eq!(bounds.cambio, FactorBounds::new(-0.05, 0.02, 0.1));
    }

    #[test]
    fn test_format_then_parse() {
        let bounds = parse_bounds(RECORD.as_bytes(), "test").unwrap();
        let mut buf = Vec::new();
        format_bounds(&mut buf, &bounds).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("situacao,ipca,cdi,cambio\n"));
        assert_eq!(parse_bounds(text.as_bytes(), "test").unwrap(), bounds);
    }

    #[test]
    fn test_missing_row() {
        let record = "situacao,ipca,cdi,cambio\nmin,1,2,3\nmax,4,5,6\n";
        let err = parse_bounds(record.as_bytes(), "test").unwrap_err();
        assert_eq!(err.to_string(), "malformed record test: no 'medio' row");
    }

    #[test]
    fn test_missing_column() {
        let record = "situacao,ipca,cdi\nmin,1,2\nmedio,2,3\nmax,4,5\n";
        let err = parse_bounds(record.as_bytes(), "test").unwrap_err();
        assert!(err.to_string().contains("no 'cambio' column"));
    }

    #[test]
    fn test_non_numeric_value() {
        let record = "situacao,ipca,cdi,cambio\nmin,a,2,3\nmedio,2,3,4\nmax,4,5,6\n";
        assert!(matches!(
            parse_bounds(record.as_bytes(), "test"),
            Err(ScenarioError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_infinite_value_parses_but_fails_check() {
        let record = "situacao,ipca,cdi,cambio\nmin,-inf,0.1,-0.05\nmedio,0.045,0.1175,0.02\nmax,0.06,0.13,0.1\n";
        let bounds = parse_bounds(record.as_bytes(), "test").unwrap();
        assert!(matches!(
            bounds.check(),
            Err(ScenarioError::InvalidBounds { factor: RiskFactor::Ipca, .. })
        ));
    }

    #[test]
    fn test_parse_does_not_validate_ordering() {
        // Ordering is checked before simulating, not when loading.
        let record = "situacao,ipca,cdi,cambio\nmin,5,1,1\nmedio,3,2,2\nmax,10,3,3\n";
        let bounds = parse_bounds(record.as_bytes(), "test").unwrap();
        assert!(!bounds.is_valid());
    }
}
