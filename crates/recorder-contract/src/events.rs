use core_types::LocatorBundle;
use serde::{Deserialize, Serialize};

/// Capture-phase event kinds the recorder attaches listeners for (§4.7).
/// `Input` is debounced per element before it is flushed as a
/// [`RecordedEvent`]; the rest are emitted immediately.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecorderEventKind {
    MouseDown,
    Input,
    KeyDownEnter,
    Change,
    Submit,
    Focus,
    Blur,
}

/// What the recorder hands the replay core for one captured interaction.
/// `bundle` must have every §3 field populated that the target element
/// exposes, including an accurate `iframeChain`/`shadowHosts` for elements
/// outside the top document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub kind: RecorderEventKind,
    pub bundle: LocatorBundle,
    /// The value captured for `input`/`change` events; absent otherwise.
    pub value: Option<String>,
    pub recorded_at_ms: u64,
}

/// A CSS selector whose matching elements are never captured.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct IgnoreRule(pub String);

/// Per-element debounce window for `input` events (§4.7): flushed on
/// expiry, on blur, on Enter, when recording stops, or when the element is
/// removed from the tree.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DebounceConfig {
    pub delay_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self { delay_ms: 300 }
    }
}
