//! Error types for data operations
//!
//! Provides unified error handling for loading, parsing and configuring the
//! emissions dataset.

use std::fmt;
use thiserror::Error;

/// Which of the two remote resources a fetch was for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchTarget {
    Dataset,
    Roster,
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchTarget::Dataset => f.write_str("dataset"),
            FetchTarget::Roster => f.write_str("country roster"),
        }
    }
}

/// Errors that can occur during data operations.
///
/// Cloneable so one failed load can be handed to every caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// A resource could not be fetched (network, status or read failure)
    #[error("Failed to fetch {target}: {reason}")]
    Fetch { target: FetchTarget, reason: String },

    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(String),

    /// CSV parsing error affecting the whole input
    #[error("CSV parse error: {0}")]
    Csv(String),

    /// JSON parsing error from serde_json
    #[error("JSON parse error: {0}")]
    Json(String),

    /// Input has no header row
    #[error("Empty file")]
    EmptyFile,

    /// A required column could not be resolved from the header row
    #[error("Missing column '{column}' (found: {})", .found.join(", "))]
    MissingColumn { column: String, found: Vec<String> },

    /// Invalid configuration value
    #[error("Invalid config: {0}")]
    Config(String),
}

impl DataError {
    pub fn fetch(target: FetchTarget, reason: impl fmt::Display) -> Self {
        DataError::Fetch {
            target,
            reason: reason.to_string(),
        }
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::Csv(err.to_string())
    }
}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        DataError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::Json(err.to_string())
    }
}

/// Result type alias for data operations
pub type DataResult<T> = Result<T, DataError>;
