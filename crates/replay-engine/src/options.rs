use step_executor::StepExecutorOptions;

/// Governs one engine run (§4.5, §6 `timing`/`error` config groups).
#[derive(Clone, Debug)]
pub struct ReplayEngineOptions {
    /// Fixed delay between steps, in milliseconds. Ignored when
    /// `human_delay` is set.
    pub step_delay_ms: u64,
    /// When set, the inter-step delay is a uniform random draw from
    /// `[min, max]` milliseconds instead of `step_delay_ms`.
    pub human_delay_ms: Option<(u64, u64)>,
    /// When false, the first step failure transitions the run to `error`.
    pub continue_on_failure: bool,
    /// 0 means unlimited. When non-zero and reached, the run transitions
    /// to `error` even with `continue_on_failure = true`.
    pub max_consecutive_failures: u32,
    pub step_executor_options: StepExecutorOptions,
}

impl Default for ReplayEngineOptions {
    fn default() -> Self {
        Self {
            step_delay_ms: 0,
            human_delay_ms: None,
            continue_on_failure: false,
            max_consecutive_failures: 0,
            step_executor_options: StepExecutorOptions::default(),
        }
    }
}
