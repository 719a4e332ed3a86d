use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use core_types::{Lifecycle, Progress, RowExecutionResult, SessionSummary};
use tracing::error;

type RowStartFn = Arc<dyn Fn(usize) + Send + Sync>;
type RowCompleteFn = Arc<dyn Fn(&RowExecutionResult) + Send + Sync>;
type ProgressFn = Arc<dyn Fn(&Progress) + Send + Sync>;
type CompleteFn = Arc<dyn Fn(&SessionSummary) + Send + Sync>;
type ErrorFn = Arc<dyn Fn(&RowExecutionResult) + Send + Sync>;
type StateChangeFn = Arc<dyn Fn(Lifecycle, Lifecycle) + Send + Sync>;

/// Same `Arc`-snapshot-before-fire shape as `replay_engine::EngineHandlers`
/// (see that crate): a handler that calls back into the session (e.g.
/// `pause()` from `on_row_complete`) must never run while the registration
/// lock it would need is held.
#[derive(Clone, Default)]
pub struct SessionHandlers {
    on_row_start: Vec<RowStartFn>,
    on_row_complete: Vec<RowCompleteFn>,
    on_progress: Vec<ProgressFn>,
    on_complete: Vec<CompleteFn>,
    on_error: Vec<ErrorFn>,
    on_state_change: Vec<StateChangeFn>,
}

impl SessionHandlers {
    pub fn on_row_start(&mut self, f: impl Fn(usize) + Send + Sync + 'static) {
        self.on_row_start.push(Arc::new(f));
    }

    pub fn on_row_complete(&mut self, f: impl Fn(&RowExecutionResult) + Send + Sync + 'static) {
        self.on_row_complete.push(Arc::new(f));
    }

    pub fn on_progress(&mut self, f: impl Fn(&Progress) + Send + Sync + 'static) {
        self.on_progress.push(Arc::new(f));
    }

    pub fn on_complete(&mut self, f: impl Fn(&SessionSummary) + Send + Sync + 'static) {
        self.on_complete.push(Arc::new(f));
    }

    pub fn on_error(&mut self, f: impl Fn(&RowExecutionResult) + Send + Sync + 'static) {
        self.on_error.push(Arc::new(f));
    }

    pub fn on_state_change(&mut self, f: impl Fn(Lifecycle, Lifecycle) + Send + Sync + 'static) {
        self.on_state_change.push(Arc::new(f));
    }

    pub fn fire_row_start(&self, row_index: usize) {
        for handler in &self.on_row_start {
            guard(|| handler(row_index));
        }
    }

    pub fn fire_row_complete(&self, result: &RowExecutionResult) {
        for handler in &self.on_row_complete {
            guard(|| handler(result));
        }
    }

    pub fn fire_progress(&self, progress: &Progress) {
        for handler in &self.on_progress {
            guard(|| handler(progress));
        }
    }

    pub fn fire_complete(&self, summary: &SessionSummary) {
        for handler in &self.on_complete {
            guard(|| handler(summary));
        }
    }

    pub fn fire_error(&self, result: &RowExecutionResult) {
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
        error!(handler_error = %message, "replay session handler panicked; continuing");
    }
}
