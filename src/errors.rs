//! Error handling module: aggregates every crate-local error type behind
//! one `AppError` the CLI surfaces, plus the I/O and parsing failures of
//! the harness around it (fixtures, CSV, config files).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] replay_config::ConfigError),

    #[error(transparent)]
    Session(#[from] replay_session::SessionError),

    #[error(transparent)]
    Engine(#[from] replay_engine::EngineError),

    #[error(transparent)]
    StepExecutor(#[from] step_executor::StepExecutorError),

    #[error(transparent)]
    Recorder(#[from] recorder_contract::RecorderError),

    #[error(transparent)]
    HostBridge(#[from] host_bridge::HostBridgeError),

    #[error("failed to read '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse {kind} from '{path}': {reason}")]
    Parse {
        kind: &'static str,
        path: String,
        reason: String,
    },

    #[error("fixture '{0}' is invalid: {1}")]
    InvalidFixture(String, String),
}

pub type AppResult<T> = Result<T, AppError>;
