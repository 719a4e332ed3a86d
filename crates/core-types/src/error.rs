use thiserror::Error;

/// Construction-time validation failures shared across the data model.
///
/// Mirrors the `ConfigInvalid` shape used throughout the workspace: a field
/// path plus a human-readable expectation, never a bare string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("field '{field}' is invalid: {expectation}")]
    InvalidField { field: String, expectation: String },
}

impl CoreError {
    pub fn invalid_field(field: impl Into<String>, expectation: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            expectation: expectation.into(),
        }
    }
}
