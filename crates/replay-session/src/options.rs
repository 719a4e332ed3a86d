use replay_engine::ReplayEngineOptions;

/// Governs one session run (§4.6, §6 `session` config group).
#[derive(Clone, Debug)]
pub struct ReplaySessionOptions {
    /// Delay observed before every row except the first.
    pub row_delay_ms: u64,
    /// When true, a row whose columns match no step label (directly or
    /// via `fieldMappings`) is skipped instead of run.
    pub skip_unmatched_rows: bool,
    /// When false, the first failed row transitions the session to
    /// `error`.
    pub continue_on_row_failure: bool,
    /// 0 means unlimited. When non-zero and reached, the run transitions
    /// to `error` even with `continue_on_row_failure = true`.
    pub max_row_failures: u32,
    pub engine_options: ReplayEngineOptions,
}

impl Default for ReplaySessionOptions {
    fn default() -> Self {
        Self {
            row_delay_ms: 0,
            skip_unmatched_rows: true,
            continue_on_row_failure: true,
            max_row_failures: 0,
            engine_options: ReplayEngineOptions::default(),
        }
    }
}
