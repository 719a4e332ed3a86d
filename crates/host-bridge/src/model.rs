use std::collections::HashMap;

use core_types::{SessionSummary, Step, StepExecutionResult};
use serde::{Deserialize, Serialize};

/// Request actions recognised on the host <-> core channel (§6).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum HostRequest {
    StartRecording {
        #[serde(default)]
        project_id: Option<String>,
    },
    StopRecording,
    ExecuteReplay {
        steps: Vec<Step>,
        #[serde(default)]
        csv_values: HashMap<String, String>,
        #[serde(default)]
        field_mappings: HashMap<String, String>,
    },
    ExecuteStep {
        step: Step,
        #[serde(default)]
        csv_values: HashMap<String, String>,
        #[serde(default)]
        field_mappings: HashMap<String, String>,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },
    GetState,
    Ping,
}

/// The content script's reported mode: idle until a recording or replay
/// run claims it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentScriptMode {
    Idle,
    Recording,
    Replaying,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentScriptState {
    pub mode: ContentScriptMode,
    pub initialised: bool,
    pub page_url: Option<String>,
    pub attached_iframes: usize,
    pub interceptor_injected: bool,
    pub recording_state: Option<String>,
    pub replay_state: Option<String>,
}

/// Responses matching each [`HostRequest`] variant one-to-one.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum HostResponse {
    Acknowledged,
    ReplaySummary(SessionSummary),
    StepResult(StepExecutionResult),
    State(ContentScriptState),
    Pong { ready: bool },
}

/// Page-context channel (§6): fire-and-forget, filtered by `source` so the
/// core only observes messages from its own injected page-script.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PageContextMessage {
    ShadowRootHandle { element_path: String },
    AutocompleteSelection { element_path: String, value: String },
    PageScriptReady,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageContextEnvelope {
    pub source: String,
    pub message: PageContextMessage,
}
