use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Found but disabled, detached between find and action, or invisible
    /// with `showHiddenElements=false` (§7).
    #[error("element not actionable: {reason}")]
    ElementNotActionable { reason: String },

    /// The synthesised event was dispatched but the page rejected it, or
    /// the expected side-effect did not occur.
    #[error("action failed: {reason}")]
    ActionFailed { reason: String },

    #[error("timed out waiting for '{condition}' (budget {budget_ms}ms)")]
    Timeout { condition: String, budget_ms: u64 },

    #[error("aborted via cancellation signal")]
    Aborted,
}

impl ActionError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ActionError::Timeout { .. })
    }
}
