use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use core_types::{ExecutionSummary, Lifecycle, Progress, Step, StepExecutionResult};
use tracing::error;

type StepStartFn = Arc<dyn Fn(&Step, usize) + Send + Sync>;
type StepCompleteFn = Arc<dyn Fn(&StepExecutionResult) + Send + Sync>;
type ProgressFn = Arc<dyn Fn(&Progress) + Send + Sync>;
type CompleteFn = Arc<dyn Fn(&ExecutionSummary) + Send + Sync>;
type ErrorFn = Arc<dyn Fn(&StepExecutionResult) + Send + Sync>;
type StateChangeFn = Arc<dyn Fn(Lifecycle, Lifecycle) + Send + Sync>;

/// Handlers fire synchronously in registration order on the same task as
/// the state change (§5 ordering guarantees). A handler that panics is
/// logged and swallowed — it never aborts the loop.
///
/// Entries are `Arc`-boxed so the engine can clone a cheap snapshot out
/// from under its registration lock before invoking them: a handler that
/// calls back into the engine (e.g. `pause()` from `on_step_complete`)
/// must never run while the registration lock it would need is held.
#[derive(Clone, Default)]
pub struct EngineHandlers {
    on_step_start: Vec<StepStartFn>,
    on_step_complete: Vec<StepCompleteFn>,
    on_progress: Vec<ProgressFn>,
    on_complete: Vec<CompleteFn>,
    on_error: Vec<ErrorFn>,
    on_state_change: Vec<StateChangeFn>,
}

impl EngineHandlers {
    pub fn on_step_start(&mut self, f: impl Fn(&Step, usize) + Send + Sync + 'static) {
        self.on_step_start.push(Arc::new(f));
    }

    pub fn on_step_complete(&mut self, f: impl Fn(&StepExecutionResult) + Send + Sync + 'static) {
        self.on_step_complete.push(Arc::new(f));
    }

    pub fn on_progress(&mut self, f: impl Fn(&Progress) + Send + Sync + 'static) {
        self.on_progress.push(Arc::new(f));
    }

    pub fn on_complete(&mut self, f: impl Fn(&ExecutionSummary) + Send + Sync + 'static) {
        self.on_complete.push(Arc::new(f));
    }

    pub fn on_error(&mut self, f: impl Fn(&StepExecutionResult) + Send + Sync + 'static) {
        self.on_error.push(Arc::new(f));
    }

    pub fn on_state_change(&mut self, f: impl Fn(Lifecycle, Lifecycle) + Send + Sync + 'static) {
        self.on_state_change.push(Arc::new(f));
    }

    pub fn fire_step_start(&self, step: &Step, index: usize) {
        for handler in &self.on_step_start {
            guard(|| handler(step, index));
        }
    }

    pub fn fire_step_complete(&self, result: &StepExecutionResult) {
        for handler in &self.on_step_complete {
            guard(|| handler(result));
        }
    }

    pub fn fire_progress(&self, progress: &Progress) {
        for handler in &self.on_progress {
            guard(|| handler(progress));
        }
    }

    pub fn fire_complete(&self, summary: &ExecutionSummary) {
        for handler in &self.on_complete {
            guard(|| handler(summary));
        }
    }

    pub fn fire_error(&self, result: &StepExecutionResult) {
        for handler in &self.on_error {
            guard(|| handler(result));
        }
    }

    pub fn fire_state_change(&self, from: Lifecycle, to: Lifecycle) {
        for handler in &self.on_state_change {
            guard(|| handler(from, to));
        }
    }
}

fn guard(f: impl FnOnce()) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(f)) {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "handler panicked".to_string());
        error!(handler_error = %message, "replay engine handler panicked; continuing");
    }
}
