use thiserror::Error;

/// Degrades gracefully (§7): the core still replays when the host channel
/// is gone, it just cannot report back.
#[derive(Clone, Debug, Error)]
pub enum HostBridgeError {
    #[error("host messaging channel unavailable")]
    HostDisconnected,

    #[error("unrecognised request action '{0}'")]
    UnknownAction(String),

    #[error("no session is active for this request")]
    NoActiveSession,

    #[error("internal error: {0}")]
    Internal(String),
}
