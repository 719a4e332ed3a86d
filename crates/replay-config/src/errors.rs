use thiserror::Error;

/// `ConfigInvalid` (§7): a field path plus a machine-readable expectation,
/// never a bare string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config field '{field}' is invalid: {expectation}")]
    Invalid { field: String, expectation: String },

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("failed to read config file '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(String),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, expectation: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            expectation: expectation.into(),
        }
    }
}
