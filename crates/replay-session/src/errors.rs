use core_types::Lifecycle;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Lifecycle violation: only the transitions of §4.5 (mirrored by the
    /// session) are legal.
    #[error("illegal transition from {from:?} to {to:?}")]
    IllegalTransition { from: Lifecycle, to: Lifecycle },

    /// An uncaught exception inside the owned engine terminates the run.
    #[error("engine raised an uncaught error: {0}")]
    EngineFailure(String),
}
