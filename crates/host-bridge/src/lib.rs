//! Host messaging contract (§6): the request/response envelope on the
//! host <-> core channel and the fire-and-forget page-context channel.

mod bridge;
mod errors;
mod model;

pub use bridge::{DisconnectedHostBridge, HostBridge};
pub use errors::HostBridgeError;
pub use model::{
    ContentScriptMode, ContentScriptState, HostRequest, HostResponse, PageContextEnvelope,
    PageContextMessage,
};
