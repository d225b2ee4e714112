//! Error types for the prediction engine.
//!
//! `PredictionError` never crosses the public `predict` boundary: the
//! manager logs it and returns an invalid result instead.

use thiserror::Error;

use skillshot_core::types::UnitId;

/// Internal failure while evaluating a prediction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("unit {0} is not present in the world")]
    MissingUnit(UnitId),
    #[error("unit {0} is dead")]
    DeadUnit(UnitId),
    #[error("invalid spell: {0}")]
    InvalidSpell(&'static str),
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}

/// Failure while loading or validating a `PredictionConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
