use std::collections::HashMap;

use thiserror::Error;

/// Strategies attempted plus the last-seen candidate count per strategy,
/// carried by `ElementNotFound` (§4.2, §7).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinderDiagnostics {
    pub strategies_attempted: Vec<String>,
    pub candidate_counts: HashMap<String, usize>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FinderError {
    #[error("element not found after trying {} strategies", .0.strategies_attempted.len())]
    ElementNotFound(FinderDiagnostics),

    #[error("iframe chain stopped at a cross-origin hop: {0}")]
    CrossOriginBoundary(String),

    #[error("iframe or shadow chain could not be resolved: {0}")]
    ChainResolutionFailed(String),

    #[error("aborted via cancellation signal")]
    Aborted,
}

impl FinderError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, FinderError::ElementNotFound(_))
    }
}
