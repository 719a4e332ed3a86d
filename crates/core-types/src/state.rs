#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Running,
    Paused,
    Stopped,
    Completed,
    Error,
}

impl Lifecycle {
    /// The transitions enumerated in §4.5: `idle -> running -> {paused <-> running} -> {completed | stopped | error}`.
    pub fn can_transition_to(self, target: Lifecycle) -> bool {
        use Lifecycle::*;
        match (self, target) {
            (Idle, Running) => true,
            (Running, Paused) => true,
            (Paused, Running) => true,
            (Running, Completed) | (Running, Stopped) | (Running, Error) => true,
            (Paused, Stopped) | (Paused, Error) => true,
            (Completed, Idle) | (Stopped, Idle) | (Error, Idle) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Lifecycle::Completed | Lifecycle::Stopped | Lifecycle::Error)
    }
}

/// Lifecycle snapshot of one engine run over a step sequence.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct ReplayEngineState {
    pub lifecycle: Lifecycle,
    pub current_step_index: usize,
    pub consecutive_failures: u32,
    pub start_time_ms: Option<i64>,
    pub end_time_ms: Option<i64>,
}

impl ReplayEngineState {
    pub fn idle() -> Self {
        Self {
            lifecycle: Lifecycle::Idle,
            current_step_index: 0,
            consecutive_failures: 0,
            start_time_ms: None,
            end_time_ms: None,
        }
    }
}

/// Lifecycle snapshot of one session driving an engine across data rows.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct ReplaySessionState {
    pub lifecycle: Lifecycle,
    pub current_row: usize,
    pub start_time_ms: Option<i64>,
    pub end_time_ms: Option<i64>,
}

impl ReplaySessionState {
    pub fn idle() -> Self {
        Self {
            lifecycle: Lifecycle::Idle,
            current_row: 0,
            start_time_ms: None,
            end_time_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_documented_transitions_are_legal() {
        assert!(Lifecycle::Idle.can_transition_to(Lifecycle::Running));
        assert!(!Lifecycle::Idle.can_transition_to(Lifecycle::Paused));
        assert!(Lifecycle::Running.can_transition_to(Lifecycle::Paused));
        assert!(Lifecycle::Paused.can_transition_to(Lifecycle::Running));
        assert!(!Lifecycle::Completed.can_transition_to(Lifecycle::Running));
        assert!(Lifecycle::Completed.can_transition_to(Lifecycle::Idle));
    }

    #[test]
    fn terminal_states() {
        assert!(Lifecycle::Completed.is_terminal());
        assert!(Lifecycle::Stopped.is_terminal());
        assert!(Lifecycle::Error.is_terminal());
        assert!(!Lifecycle::Running.is_terminal());
        assert!(!Lifecycle::Paused.is_terminal());
    }
}
