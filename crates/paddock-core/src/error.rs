use thiserror::Error;

use crate::data_source::FetchFailure;

/// Validation and contract errors exposed by `paddock-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("season must be a four-digit year: '{value}'")]
    InvalidSeason { value: String },
    #[error("round must be a positive integer: '{value}'")]
    InvalidRound { value: String },

    #[error("date must be formatted YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("time must be formatted HH:MM:SS with optional Z suffix: '{value}'")]
    InvalidTime { value: String },

    #[error("points must be numeric at position {index}: '{value}'")]
    InvalidPoints { index: usize, value: String },

    #[error("identifier cannot be empty")]
    EmptyIdentifier,

    #[error("no {kind} '{id}' in season {season}")]
    UnknownEntity {
        kind: &'static str,
        id: String,
        season: String,
    },

    #[error("fetch key '{key}' is missing its {part}")]
    IncompleteKey { key: String, part: &'static str },

    #[error("invalid sort field '{value}', expected one of first-name, last-name, number, age")]
    InvalidSortField { value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchFailure),
}
