use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Instant;

use core_types::{Lifecycle, Progress, ReplaySessionState, RowExecutionResult, SessionSummary, Step};
use replay_engine::ReplayEngine;
use step_executor::StepExecutionContext;
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::errors::SessionError;
use crate::handlers::SessionHandlers;
use crate::matching::row_matches;
use crate::options::ReplaySessionOptions;

struct SessionState {
    core: ReplaySessionState,
    row_results: Vec<RowExecutionResult>,
    consecutive_row_failures: u32,
}

impl SessionState {
    fn fresh() -> Self {
        Self {
            core: ReplaySessionState::idle(),
            row_results: Vec::new(),
            consecutive_row_failures: 0,
        }
    }
}

fn epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Data-driven row iteration over one owned [`ReplayEngine`] (§4.6).
///
/// The lifecycle mirrors the engine's: `idle -> running -> {paused <->
/// running} -> {completed | stopped | error}`, `reset()` from any terminal
/// state back to idle.
pub struct ReplaySession {
    engine: Arc<ReplayEngine>,
    state: StdMutex<SessionState>,
    resume_notify: Notify,
    handlers: StdMutex<SessionHandlers>,
}

impl ReplaySession {
    pub fn new(engine: Arc<ReplayEngine>) -> Self {
        Self {
            engine,
            state: StdMutex::new(SessionState::fresh()),
            resume_notify: Notify::new(),
            handlers: StdMutex::new(SessionHandlers::default()),
        }
    }

    pub fn handlers_mut(&self) -> std::sync::MutexGuard<'_, SessionHandlers> {
        self.handlers.lock().unwrap()
    }

    fn handlers_snapshot(&self) -> SessionHandlers {
        self.handlers.lock().unwrap().clone()
    }

    pub fn state(&self) -> ReplaySessionState {
        self.state.lock().unwrap().core.clone()
    }

    pub fn row_results(&self) -> Vec<RowExecutionResult> {
        self.state.lock().unwrap().row_results.clone()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.state.lock().unwrap().core.lifecycle
    }

    fn transition(&self, to: Lifecycle) -> Result<Lifecycle, SessionError> {
        let from = {
            let mut state = self.state.lock().unwrap();
            if !state.core.lifecycle.can_transition_to(to) {
                return Err(SessionError::IllegalTransition {
                    from: state.core.lifecycle,
                    to,
                });
            }
            let from = state.core.lifecycle;
            state.core.lifecycle = to;
            if to == Lifecycle::Running && from == Lifecycle::Idle {
                state.core.start_time_ms = Some(epoch_ms());
            }
            if to.is_terminal() {
                state.core.end_time_ms = Some(epoch_ms());
            }
            from
        };
        self.handlers_snapshot().fire_state_change(from, to);
        Ok(to)
    }

    /// Pausing at a row boundary also pauses the engine when it is
    /// mid-row (§4.6); resuming re-drives both.
    pub fn pause(&self) -> Result<(), SessionError> {
        self.transition(Lifecycle::Paused)?;
        if self.engine.state().lifecycle == Lifecycle::Running {
            let _ = self.engine.pause();
        }
        Ok(())
    }

    pub fn resume(&self) -> Result<(), SessionError> {
        self.transition(Lifecycle::Running)?;
        if self.engine.state().lifecycle == Lifecycle::Paused {
            let _ = self.engine.resume();
        }
        self.resume_notify.notify_waiters();
        Ok(())
    }

    pub fn stop(&self) -> Result<(), SessionError> {
        self.transition(Lifecycle::Stopped)?;
        let _ = self.engine.stop();
        self.resume_notify.notify_waiters();
        Ok(())
    }

    /// Returns the session (and its owned engine) to `idle`, indistinguishable
    /// from a fresh instance (§8).
    pub fn reset(&self) -> Result<(), SessionError> {
        self.transition(Lifecycle::Idle)?;
        let mut state = self.state.lock().unwrap();
        *state = SessionState::fresh();
        drop(state);
        if self.engine.state().lifecycle != Lifecycle::Idle {
            let _ = self.engine.reset();
        }
        *self.handlers.lock().unwrap() = SessionHandlers::default();
        Ok(())
    }

    async fn wait_while_paused(&self) {
        loop {
            if self.lifecycle() != Lifecycle::Paused {
                return;
            }
            self.resume_notify.notified().await;
        }
    }

    fn summary(&self, duration_ms: u64) -> SessionSummary {
        let state = self.state.lock().unwrap();
        SessionSummary {
            total_rows: state.row_results.len(),
            row_results: state.row_results.clone(),
            duration_ms,
        }
    }

    fn emit_progress(&self, total_rows: usize, elapsed_ms: u64) {
        let (current_row, passed, failed, durations) = {
            let state = self.state.lock().unwrap();
            let passed = state.row_results.iter().filter(|r| !r.skipped && r.success).count();
            let failed = state.row_results.iter().filter(|r| !r.skipped && !r.success).count();
            let durations: Vec<u64> = state.row_results.iter().map(|r| r.duration_ms).collect();
            (state.core.current_row, passed, failed, durations)
        };
        let skipped = {
            let state = self.state.lock().unwrap();
            state.row_results.iter().filter(|r| r.skipped).count()
        };
        let progress = Progress::compute(current_row, total_rows, passed, failed, skipped, elapsed_ms, &durations);
        self.handlers_snapshot().fire_progress(&progress);
    }

    /// Determines the row list (configured CSV rows, or a single empty row
    /// so the step sequence always runs at least once) and drives the
    /// owned engine once per row (§4.6).
    pub async fn start(
        &self,
        steps: &[Step],
        rows: &[HashMap<String, String>],
        field_mappings: &HashMap<String, String>,
        base_context: &StepExecutionContext,
        options: &ReplaySessionOptions,
    ) -> Result<SessionSummary, SessionError> {
        self.transition(Lifecycle::Running)?;
        let run_start = Instant::now();

        let effective_rows: Vec<HashMap<String, String>> = if rows.is_empty() {
            vec![HashMap::new()]
        } else {
            rows.to_vec()
        };

        for (row_index, row) in effective_rows.iter().enumerate() {
            if self.lifecycle() == Lifecycle::Stopped {
                break;
            }

            if row_index > 0 && options.row_delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(options.row_delay_ms)).await;
            }
            if self.lifecycle() == Lifecycle::Stopped {
                break;
            }
            self.wait_while_paused().await;
            if self.lifecycle() == Lifecycle::Stopped {
                break;
            }

            {
                let mut state = self.state.lock().unwrap();
                state.core.current_row = row_index;
            }
            self.handlers_snapshot().fire_row_start(row_index);

            if options.skip_unmatched_rows && !row_matches(steps, row, field_mappings) {
                let result = RowExecutionResult {
                    row_index,
                    row_data: row.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                    skipped: true,
                    success: true,
                    passed: 0,
                    failed: 0,
                    skipped_steps: steps.len(),
                    duration_ms: 0,
                    step_results: Vec::new(),
                    error: Some("No matching fields".to_string()),
                };
                self.record_row(result.clone());
                self.handlers_snapshot().fire_row_complete(&result);
                self.emit_progress(effective_rows.len(), run_start.elapsed().as_millis() as u64);
                continue;
            }

            let mut context = base_context.clone();
            context.csv_values = row.clone();
            context.field_mappings = field_mappings.clone();

            let row_start = Instant::now();
            let outcome = self.engine.start(steps, &context, &options.engine_options).await;
            let _ = self.engine.reset();

            let result = match outcome {
                Ok(summary) => RowExecutionResult {
                    row_index,
                    row_data: row.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                    skipped: false,
                    success: summary.success(),
                    passed: summary.passed_steps,
                    failed: summary.failed_steps,
                    skipped_steps: summary.skipped_steps,
                    duration_ms: row_start.elapsed().as_millis() as u64,
                    step_results: summary.results,
                    error: None,
                },
                Err(err) => {
                    warn!(row_index, error = %err, "engine raised an uncaught error for row");
                    self.transition(Lifecycle::Error)?;
                    let elapsed = run_start.elapsed().as_millis() as u64;
                    let summary = self.summary(elapsed);
                    self.handlers_snapshot().fire_complete(&summary);
                    return Err(SessionError::EngineFailure(err.to_string()));
                }
            };

            self.record_row(result.clone());
            self.handlers_snapshot().fire_row_complete(&result);
            self.emit_progress(effective_rows.len(), run_start.elapsed().as_millis() as u64);

            if !result.success {
                self.handlers_snapshot().fire_error(&result);
                let consecutive_row_failures = {
                    let mut state = self.state.lock().unwrap();
                    state.consecutive_row_failures += 1;
                    state.consecutive_row_failures
                };
                let budget_reached =
                    options.max_row_failures > 0 && consecutive_row_failures >= options.max_row_failures;
                if !options.continue_on_row_failure || budget_reached {
                    self.transition(Lifecycle::Error)?;
                    let elapsed = run_start.elapsed().as_millis() as u64;
                    let summary = self.summary(elapsed);
                    self.handlers_snapshot().fire_complete(&summary);
                    return Ok(summary);
                }
            } else {
                let mut state = self.state.lock().unwrap();
                state.consecutive_row_failures = 0;
            }
        }

        // `stop()` already transitioned to `Stopped`; re-entering
        // `transition()` with the same target has no matching arm in
        // `can_transition_to` and would fail the run instead of completing it.
        if self.lifecycle() != Lifecycle::Stopped {
            self.transition(Lifecycle::Completed)?;
        }
        let elapsed = run_start.elapsed().as_millis() as u64;
        let summary = self.summary(elapsed);
        self.handlers_snapshot().fire_complete(&summary);
        info!(rows = summary.total_rows, "session run complete");
        Ok(summary)
    }

    fn record_row(&self, result: RowExecutionResult) {
        let mut state = self.state.lock().unwrap();
        state.row_results.push(result);
    }
}
