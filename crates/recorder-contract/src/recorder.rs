use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::errors::RecorderError;
use crate::events::{IgnoreRule, RecordedEvent};

pub type RecorderEventBus = broadcast::Sender<RecordedEvent>;

/// The capture-side contract the replay core relies on. Listener
/// attachment, `composedPath` target resolution, and input debouncing are
/// the recorder's own concern (out of scope here, §1); this trait names
/// only the start/stop/subscribe surface and the `RecordedEvent` stream it
/// must produce.
#[async_trait]
pub trait Recorder {
    async fn start_recording(&self, project_id: Option<String>) -> Result<(), RecorderError>;
    async fn stop_recording(&self) -> Result<(), RecorderError>;
    fn is_recording(&self) -> bool;
    fn subscribe(&self) -> broadcast::Receiver<RecordedEvent>;
}

/// Scaffold recorder: tracks recording state and fans out whatever events
/// a host-owned capture layer feeds it through [`NullRecorder::ingest`].
/// It never attaches DOM listeners itself.
pub struct NullRecorder {
    events: RecorderEventBus,
    recording: AtomicBool,
    project_id: std::sync::Mutex<Option<String>>,
    ignore_rules: Vec<IgnoreRule>,
}

impl NullRecorder {
    pub fn new(ignore_rules: Vec<IgnoreRule>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            events,
            recording: AtomicBool::new(false),
            project_id: std::sync::Mutex::new(None),
            ignore_rules,
        })
    }

    pub fn ignore_rules(&self) -> &[IgnoreRule] {
        &self.ignore_rules
    }

    /// Feeds one already-built event into the bus, standing in for the
    /// host's DOM capture layer during replay-core integration tests.
    pub fn ingest(&self, event: RecordedEvent) -> Result<(), RecorderError> {
        if !self.recording.load(Ordering::SeqCst) {
            return Err(RecorderError::NotRecording);
        }
        let _ = self.events.send(event);
        Ok(())
    }
}

#[async_trait]
impl Recorder for NullRecorder {
    async fn start_recording(&self, project_id: Option<String>) -> Result<(), RecorderError> {
        if self.recording.swap(true, Ordering::SeqCst) {
            return Err(RecorderError::AlreadyRecording(
                self.project_id.lock().unwrap().clone(),
            ));
        }
        *self.project_id.lock().unwrap() = project_id;
        Ok(())
    }

    async fn stop_recording(&self) -> Result<(), RecorderError> {
        if !self.recording.swap(false, Ordering::SeqCst) {
            return Err(RecorderError::NotRecording);
        }
        *self.project_id.lock().unwrap() = None;
        Ok(())
    }

    fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    fn subscribe(&self) -> broadcast::Receiver<RecordedEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::LocatorBundle;

    fn sample_event() -> RecordedEvent {
        RecordedEvent {
            kind: crate::events::RecorderEventKind::MouseDown,
            bundle: LocatorBundle::builder("button")
                .xpath("//button[@id='submit']")
                .build()
                .unwrap(),
            value: None,
            recorded_at_ms: 0,
        }
    }

    #[tokio::test]
    async fn ingest_before_start_is_rejected() {
        let recorder = NullRecorder::new(Vec::new());
        assert!(matches!(
            recorder.ingest(sample_event()),
            Err(RecorderError::NotRecording)
        ));
    }

    #[tokio::test]
    async fn double_start_is_rejected() {
        let recorder = NullRecorder::new(Vec::new());
        recorder.start_recording(Some("proj".into())).await.unwrap();
        assert!(matches!(
            recorder.start_recording(None).await,
            Err(RecorderError::AlreadyRecording(_))
        ));
    }

    #[tokio::test]
    async fn subscriber_receives_ingested_events() {
        let recorder = NullRecorder::new(Vec::new());
        let mut rx = recorder.subscribe();
        recorder.start_recording(None).await.unwrap();
        recorder.ingest(sample_event()).unwrap();
        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, crate::events::RecorderEventKind::MouseDown);
    }

    #[tokio::test]
    async fn stop_without_start_is_rejected() {
        let recorder = NullRecorder::new(Vec::new());
        assert!(matches!(
            recorder.stop_recording().await,
            Err(RecorderError::NotRecording)
        ));
    }
}
