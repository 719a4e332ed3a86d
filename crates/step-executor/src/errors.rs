use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StepExecutorError {
    #[error("invalid step: {reason}")]
    InvalidStep { reason: String },
}
