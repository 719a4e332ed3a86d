use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum RecorderError {
    #[error("recording already in progress for project {0:?}")]
    AlreadyRecording(Option<String>),

    #[error("no recording in progress")]
    NotRecording,

    #[error("recorder capture is not available in this host")]
    Unsupported,

    #[error("internal error: {0}")]
    Internal(String),
}
