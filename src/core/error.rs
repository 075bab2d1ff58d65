use crate::core::risk_factor::RiskFactor;
use std::fmt;
use thiserror::Error;

/// Result alias for scenario-engine operations.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Which side of the balance sheet an exposure record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureSide {
    Assets,
    Liabilities,
}

impl fmt::Display for ExposureSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExposureSide::Assets => write!(f, "assets"),
            ExposureSide::Liabilities => write!(f, "liabilities"),
        }
    }
}

/// Errors arising from scenario generation, impact modeling and tabular I/O.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// `min < expected < max` does not hold for a risk factor.
    #[error(
        "invalid bounds for {factor}: values must be finite, the minimum ({min}) must be less \
         than the expected value ({expected}) and the expected value must be less than the \
         maximum ({max})"
    )]
    InvalidBounds {
        factor: RiskFactor,
        min: f64,
        expected: f64,
        max: f64,
    },

    /// Generator input outside `min < expected < max`, not tied to a factor.
    #[error("invalid envelope: expected finite min < expected < max, got {min} / {expected} / {max}")]
    InvalidEnvelope { min: f64, expected: f64, max: f64 },

    /// The sensitivity record for one side could not be loaded.
    #[error("missing {side} exposure data: {reason}")]
    MissingExposureData { side: ExposureSide, reason: String },

    /// A generator was asked for zero samples.
    #[error("scenario count must be at least 1")]
    DegenerateInput,

    #[error("unknown risk factor '{0}'")]
    UnknownFactor(String),

    /// A tabular record does not have the expected shape.
    #[error("malformed record {origin}: {reason}")]
    MalformedRecord { origin: String, reason: String },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ScenarioError {
    pub(crate) fn malformed(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        ScenarioError::MalformedRecord {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ScenarioError::Config {
            message: message.into(),
        }
    }
}
