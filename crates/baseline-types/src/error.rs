//! Error types for the coordinate model and settings.

use thiserror::Error;

/// An external token that has no canonical value in its dimension.
///
/// Always fatal: unknown tokens are never defaulted or kept as raw keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: {token}")]
pub struct UnknownTokenError {
    /// Dimension the token was resolved against (e.g. "kernel version")
    pub kind: &'static str,
    /// The rejected token, verbatim
    pub token: String,
}

impl UnknownTokenError {
    pub fn new(kind: &'static str, token: impl Into<String>) -> Self {
        Self {
            kind,
            token: token.into(),
        }
    }
}

/// Errors raised while loading or validating [`crate::Settings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Layered configuration could not be built or deserialized
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration loaded but holds unusable values
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

impl From<config::ConfigError> for SettingsError {
    fn from(err: config::ConfigError) -> Self {
        SettingsError::Config(err.to_string())
    }
}
