use core_types::Lifecycle;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Lifecycle violation: only the transitions of §4.5 are legal.
    #[error("illegal transition from {from:?} to {to:?}")]
    IllegalTransition { from: Lifecycle, to: Lifecycle },

    /// An uncaught exception inside the Step Executor terminates the run.
    #[error("step executor raised an uncaught error: {0}")]
    StepExecutorFailure(String),
}
