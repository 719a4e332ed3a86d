use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::errors::HostBridgeError;
use crate::model::{ContentScriptMode, ContentScriptState, HostRequest, HostResponse, PageContextEnvelope};

/// One dispatch call per recognised [`HostRequest`] (§6). Implemented by
/// whatever owns the live session/engine; this crate only fixes the wire
/// shape and the disconnect-degrades-gracefully behaviour.
#[async_trait]
pub trait HostBridge {
    async fn dispatch(&self, request: HostRequest) -> Result<HostResponse, HostBridgeError>;
    fn subscribe_page_context(&self) -> broadcast::Receiver<PageContextEnvelope>;
    fn is_connected(&self) -> bool;
}

/// A bridge with no live session attached: answers `ping`/`getState`
/// truthfully and reports [`HostBridgeError::HostDisconnected`] for
/// anything that would need a session, the same degrade-gracefully
/// behaviour the disconnected host channel gets in production (§7).
pub struct DisconnectedHostBridge {
    connected: AtomicBool,
    page_context: broadcast::Sender<PageContextEnvelope>,
}

impl DisconnectedHostBridge {
    pub fn new() -> Arc<Self> {
        let (page_context, _) = broadcast::channel(64);
        Arc::new(Self {
            connected: AtomicBool::new(true),
            page_context,
        })
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn publish_page_context(&self, envelope: PageContextEnvelope) {
        let _ = self.page_context.send(envelope);
    }
}

#[async_trait]
impl HostBridge for DisconnectedHostBridge {
    async fn dispatch(&self, request: HostRequest) -> Result<HostResponse, HostBridgeError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(HostBridgeError::HostDisconnected);
        }
        match request {
            HostRequest::Ping => Ok(HostResponse::Pong { ready: true }),
            HostRequest::GetState => Ok(HostResponse::State(ContentScriptState {
                mode: ContentScriptMode::Idle,
                initialised: true,
                page_url: None,
                attached_iframes: 0,
                interceptor_injected: false,
                recording_state: None,
                replay_state: None,
            })),
            _ => Err(HostBridgeError::NoActiveSession),
        }
    }

    fn subscribe_page_context(&self) -> broadcast::Receiver<PageContextEnvelope> {
        self.page_context.subscribe()
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ping_always_answers_even_without_a_session() {
        let bridge = DisconnectedHostBridge::new();
        let response = bridge.dispatch(HostRequest::Ping).await.unwrap();
        assert!(matches!(response, HostResponse::Pong { ready: true }));
    }

    #[tokio::test]
    async fn session_requests_fail_without_a_session_owner() {
        let bridge = DisconnectedHostBridge::new();
        let result = bridge.dispatch(HostRequest::StopRecording).await;
        assert!(matches!(result, Err(HostBridgeError::NoActiveSession)));
    }

    #[tokio::test]
    async fn disconnecting_fails_even_liveness_probes() {
        let bridge = DisconnectedHostBridge::new();
        bridge.disconnect();
        let result = bridge.dispatch(HostRequest::Ping).await;
        assert!(matches!(result, Err(HostBridgeError::HostDisconnected)));
    }

    #[tokio::test]
    async fn page_context_messages_reach_subscribers() {
        let bridge = DisconnectedHostBridge::new();
        let mut rx = bridge.subscribe_page_context();
        bridge.publish_page_context(PageContextEnvelope {
            source: "replay-page-script".into(),
            message: crate::model::PageContextMessage::PageScriptReady,
        });
        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.source, "replay-page-script");
    }
}
