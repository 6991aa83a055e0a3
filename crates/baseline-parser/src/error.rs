//! Loader error types.

use std::path::PathBuf;

use baseline_types::UnknownTokenError;
use thiserror::Error;

/// Errors that abort loading a baseline document.
///
/// No variant ever yields a partial tree: the whole load fails.
#[derive(Debug, Error)]
pub enum BaselineError {
    /// File or directory could not be read
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON
    #[error("Invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Document does not follow the baseline schema
    #[error("Malformed baseline at {location}: {reason}")]
    Malformed { location: String, reason: String },

    /// A token at `location` has no canonical value
    #[error("Unresolvable token at {location}: {source}")]
    UnknownToken {
        location: String,
        #[source]
        source: UnknownTokenError,
    },
}

impl BaselineError {
    pub fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_token(location: impl Into<String>, source: UnknownTokenError) -> Self {
        Self::UnknownToken {
            location: location.into(),
            source,
        }
    }

    /// Returns true for schema violations (as opposed to I/O or token errors).
    pub fn is_malformed(&self) -> bool {
        matches!(self, BaselineError::Malformed { .. })
    }
}

/// Errors reported by a [`crate::LeafExtractor`].
///
/// The loader attaches the document location before surfacing them as a
/// [`BaselineError`].
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Statistic object does not have the shape the family expects
    #[error("{0}")]
    Shape(String),

    /// Test case token has no canonical value
    #[error(transparent)]
    UnknownToken(#[from] UnknownTokenError),
}

impl ExtractError {
    pub fn shape(reason: impl Into<String>) -> Self {
        Self::Shape(reason.into())
    }

    pub(crate) fn at(self, location: &str) -> BaselineError {
        match self {
            ExtractError::Shape(reason) => BaselineError::malformed(location, reason),
            ExtractError::UnknownToken(source) => BaselineError::unknown_token(location, source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = BaselineError::malformed("hosts", "missing object `instances`");
        assert!(err.is_malformed());
        assert_eq!(
            err.to_string(),
            "Malformed baseline at hosts: missing object `instances`"
        );
    }

    #[test]
    fn test_extract_error_gets_location() {
        let err = ExtractError::shape("missing `target`").at("hosts/instances/m5d.metal");
        assert!(err.is_malformed());
        assert!(err.to_string().contains("hosts/instances/m5d.metal"));

        let err = ExtractError::from(UnknownTokenError::new("test case", "udp-g2h")).at("cfg");
        assert!(matches!(err, BaselineError::UnknownToken { .. }));
        assert!(err.to_string().contains("udp-g2h"));
    }
}
