//! Error types for comparisons.

use baseline_parser::BaselineError;
use baseline_types::UnknownTokenError;
use thiserror::Error;

/// Errors that abort a comparison run.
#[derive(Debug, Error)]
pub enum CompareError {
    /// Request rejected before any document was read
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A requested test, kernel or codename is not known
    #[error(transparent)]
    UnknownToken(#[from] UnknownTokenError),

    /// A baseline document failed to load
    #[error(transparent)]
    Baseline(#[from] BaselineError),

    /// Report serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CompareError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidRequest(reason.into())
    }
}
