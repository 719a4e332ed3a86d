use std::sync::Mutex as StdMutex;
use std::time::Instant;

use core_types::{
    ExecutionSummary, Lifecycle, Progress, ReplayEngineState, Step, StepExecutionResult, StepStatus,
};
use rand::Rng;
use step_executor::{StepExecutionContext, StepExecutor};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::errors::EngineError;
use crate::handlers::EngineHandlers;
use crate::options::ReplayEngineOptions;

struct EngineState {
    core: ReplayEngineState,
    results: Vec<StepExecutionResult>,
}

impl EngineState {
    fn fresh() -> Self {
        Self {
            core: ReplayEngineState::idle(),
            results: Vec::new(),
        }
    }
}

fn epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Lifecycle state machine over a step sequence (§4.5).
///
/// `idle -> running -> {paused <-> running} -> {completed | stopped |
/// error}`; `reset()` from any terminal state returns to idle.
pub struct ReplayEngine {
    step_executor: std::sync::Arc<dyn StepExecutor>,
    state: StdMutex<EngineState>,
    resume_notify: Notify,
    handlers: StdMutex<EngineHandlers>,
}

impl ReplayEngine {
    pub fn new(step_executor: std::sync::Arc<dyn StepExecutor>) -> Self {
        Self {
            step_executor,
            state: StdMutex::new(EngineState::fresh()),
            resume_notify: Notify::new(),
            handlers: StdMutex::new(EngineHandlers::default()),
        }
    }

    pub fn handlers_mut(&self) -> std::sync::MutexGuard<'_, EngineHandlers> {
        self.handlers.lock().unwrap()
    }

    /// Clones the handler lists out from under the registration lock so
    /// callbacks can run (and call back into the engine, e.g. `pause()`
    /// from `on_step_complete`) without holding it.
    fn handlers_snapshot(&self) -> EngineHandlers {
        self.handlers.lock().unwrap().clone()
    }

    pub fn state(&self) -> ReplayEngineState {
        self.state.lock().unwrap().core.clone()
    }

    pub fn results(&self) -> Vec<StepExecutionResult> {
        self.state.lock().unwrap().results.clone()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.state.lock().unwrap().core.lifecycle
    }

    /// Only the transitions enumerated in §4.5 are legal; every other
    /// attempted transition fails fast with a diagnostic naming source and
    /// attempted target (§8 universal invariant).
    fn transition(&self, to: Lifecycle) -> Result<Lifecycle, EngineError> {
        let from = {
            let mut state = self.state.lock().unwrap();
            if !state.core.lifecycle.can_transition_to(to) {
                return Err(EngineError::IllegalTransition {
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

    pub fn pause(&self) -> Result<(), EngineError> {
        self.transition(Lifecycle::Paused).map(|_| ())
    }

    pub fn resume(&self) -> Result<(), EngineError> {
        self.transition(Lifecycle::Running)?;
        self.resume_notify.notify_waiters();
        Ok(())
    }

    pub fn stop(&self) -> Result<(), EngineError> {
        self.transition(Lifecycle::Stopped)?;
        self.resume_notify.notify_waiters();
        Ok(())
    }

    /// Returns the engine to `idle`, indistinguishable from a fresh
    /// instance: no leaked handlers, no residual results (§8).
    pub fn reset(&self) -> Result<(), EngineError> {
        self.transition(Lifecycle::Idle)?;
        let mut state = self.state.lock().unwrap();
        *state = EngineState::fresh();
        drop(state);
        *self.handlers.lock().unwrap() = EngineHandlers::default();
        Ok(())
    }

    /// Suspends the caller until the engine leaves `paused`. Called at
    /// step boundaries and after the inter-step delay (§4.5, §5).
    async fn wait_while_paused(&self) {
        loop {
            if self.lifecycle() != Lifecycle::Paused {
                return;
            }
            self.resume_notify.notified().await;
        }
    }

    async fn inter_step_delay(&self, options: &ReplayEngineOptions) {
        let delay_ms = if let Some((min, max)) = options.human_delay_ms {
            if max > min {
                rand::thread_rng().gen_range(min..=max)
            } else {
                min
            }
        } else {
            options.step_delay_ms
        };
        if delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
        }
    }

    fn emit_progress(&self, total_steps: usize, elapsed_ms: u64) {
        let (current_step, passed, failed, skipped, durations) = {
            let state = self.state.lock().unwrap();
            let passed = state.results.iter().filter(|r| r.status == StepStatus::Passed).count();
            let failed = state.results.iter().filter(|r| r.status == StepStatus::Failed).count();
            let skipped = state.results.iter().filter(|r| r.status == StepStatus::Skipped).count();
            let durations: Vec<u64> = state.results.iter().map(|r| r.duration_ms).collect();
            (state.core.current_step_index, passed, failed, skipped, durations)
        };
        let progress = Progress::compute(
            current_step,
            total_steps,
            passed,
            failed,
            skipped,
            elapsed_ms,
            &durations,
        );
        self.handlers_snapshot().fire_progress(&progress);
    }

    fn summary(&self, duration_ms: u64) -> ExecutionSummary {
        let state = self.state.lock().unwrap();
        let passed = state.results.iter().filter(|r| r.status == StepStatus::Passed).count();
        let failed = state.results.iter().filter(|r| r.status == StepStatus::Failed).count();
        let skipped = state.results.iter().filter(|r| r.status == StepStatus::Skipped).count();
        ExecutionSummary {
            total_steps: state.results.len(),
            passed_steps: passed,
            failed_steps: failed,
            skipped_steps: skipped,
            duration_ms,
            results: state.results.clone(),
        }
    }

    /// `start(steps, context)`: initialises the machine and begins a
    /// cooperative loop (§4.5). Only idle may start.
    pub async fn start(
        &self,
        steps: &[Step],
        context: &StepExecutionContext,
        options: &ReplayEngineOptions,
    ) -> Result<ExecutionSummary, EngineError> {
        self.transition(Lifecycle::Running)?;
        let run_start = Instant::now();
        let cancel = CancellationToken::new();

        for (index, step) in steps.iter().enumerate() {
            if self.lifecycle() == Lifecycle::Stopped {
                break;
            }

            if index > 0 {
                self.inter_step_delay(options).await;
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
                state.core.current_step_index = index;
            }
            self.handlers_snapshot().fire_step_start(step, index);

            let outcome = self
                .step_executor
                .execute(step, context, &options.step_executor_options, &cancel)
                .await;

            let result = match outcome {
                Ok(result) => result,
                Err(err) => {
                    warn!(step_id = %step.id, error = %err, "step executor raised an uncaught error");
                    self.transition(Lifecycle::Error)?;
                    let elapsed = run_start.elapsed().as_millis() as u64;
                    let summary = self.summary(elapsed);
                    self.handlers_snapshot().fire_complete(&summary);
                    return Err(EngineError::StepExecutorFailure(err.to_string()));
                }
            };

            {
                let mut state = self.state.lock().unwrap();
                state.results.push(result.clone());
            }
            self.handlers_snapshot().fire_step_complete(&result);
            self.emit_progress(steps.len(), run_start.elapsed().as_millis() as u64);

            match result.status {
                StepStatus::Passed | StepStatus::Skipped => {
                    let mut state = self.state.lock().unwrap();
                    state.core.consecutive_failures = 0;
                }
                StepStatus::Failed => {
                    self.handlers_snapshot().fire_error(&result);
                    let consecutive_failures = {
                        let mut state = self.state.lock().unwrap();
                        state.core.consecutive_failures += 1;
                        state.core.consecutive_failures
                    };
                    let budget_reached = options.max_consecutive_failures > 0
                        && consecutive_failures >= options.max_consecutive_failures;
                    if !options.continue_on_failure || budget_reached {
                        self.transition(Lifecycle::Error)?;
                        let elapsed = run_start.elapsed().as_millis() as u64;
                        let summary = self.summary(elapsed);
                        self.handlers_snapshot().fire_complete(&summary);
                        return Ok(summary);
                    }
                }
            }
        }

        // `stop()` already transitioned to `Stopped` and there is no
        // `(Stopped, Stopped)` arm in `can_transition_to` — re-entering
        // `transition()` here would fail the run instead of completing it.
        if self.lifecycle() != Lifecycle::Stopped {
            self.transition(Lifecycle::Completed)?;
        }
        let elapsed = run_start.elapsed().as_millis() as u64;
        let summary = self.summary(elapsed);
        self.handlers_snapshot().fire_complete(&summary);
        info!(total = summary.total_steps, passed = summary.passed_steps, failed = summary.failed_steps, "engine run complete");
        Ok(summary)
    }

    /// Bypasses the loop and returns one result directly; useful for
    /// REPL-style use and for tests (§4.5).
    pub async fn execute(
        &self,
        step: &Step,
        context: &StepExecutionContext,
        options: &step_executor::StepExecutorOptions,
    ) -> Result<StepExecutionResult, step_executor::StepExecutorError> {
        let cancel = CancellationToken::new();
        self.step_executor.execute(step, context, options, &cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_executor::{fake::FakeActionPort, ActionOptions, DefaultActionExecutor};
    use core_types::{LocatorBundle, StepEvent};
    use dom_traversal::{DomPort, InMemoryDom, NodeSpec};
    use element_finder::DefaultElementFinder;
    use std::sync::Arc;
    use step_executor::DefaultStepExecutor;

    fn ten_click_steps() -> Vec<Step> {
        (0..10)
            .map(|i| {
                Step::new(format!("s{i}"), StepEvent::Click, "Button").with_bundle(
                    LocatorBundle::builder("button").id("btn").build().unwrap(),
                )
            })
            .collect()
    }

    fn build_engine() -> (Arc<ReplayEngine>, StepExecutionContext) {
        let dom = Arc::new(
            InMemoryDom::builder()
                .node(None, NodeSpec::new("html", "html"))
                .node(Some("html"), NodeSpec::new("btn", "button").attr("id", "btn"))
                .build(),
        );
        let finder = Arc::new(DefaultElementFinder::new(dom.clone()));
        let action_port = FakeActionPort::new();
        action_port.register("btn", true, true, false);
        let action_executor = Arc::new(DefaultActionExecutor::new(action_port));
        let step_executor = Arc::new(DefaultStepExecutor::new(finder, action_executor));
        let engine = Arc::new(ReplayEngine::new(step_executor));
        let ctx = StepExecutionContext {
            target_document: dom.root_document(),
            ..Default::default()
        };
        (engine, ctx)
    }

    /// Disables every real-time wait the action executor would otherwise
    /// perform (mouse jitter, animation settle) so loop tests run
    /// deterministically and fast.
    fn fast_options() -> ReplayEngineOptions {
        let mut options = ReplayEngineOptions::default();
        options.step_executor_options.action_options = ActionOptions {
            human_like_mouse: false,
            scroll_into_view: false,
            wait_for_animations: false,
            focus_before_action: false,
            ..Default::default()
        };
        options
    }

    #[tokio::test]
    async fn full_run_passes_all_steps_and_reaches_completed() {
        let (engine, ctx) = build_engine();
        let steps = ten_click_steps();
        let summary = engine.start(&steps, &ctx, &fast_options()).await.unwrap();
        assert_eq!(summary.passed_steps, 10);
        assert!(summary.success());
        assert_eq!(engine.state().lifecycle, Lifecycle::Completed);
    }

    #[tokio::test]
    async fn pause_mid_run_suspends_before_next_step() {
        let (engine, ctx) = build_engine();
        let steps = ten_click_steps();

        let completed_before_pause = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        {
            let counter = completed_before_pause.clone();
            let paused_engine = engine.clone();
            engine.handlers_mut().on_step_complete(move |result| {
                if result.step_id == "s2" {
                    paused_engine.pause().ok();
                }
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            });
        }

        let run_engine = engine.clone();
        let run_steps = steps.clone();
        let handle = tokio::spawn(async move {
            run_engine.start(&run_steps, &ctx, &fast_options()).await
        });

        for _ in 0..200 {
            if engine.state().lifecycle == Lifecycle::Paused {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(engine.state().lifecycle, Lifecycle::Paused);
        engine.resume().unwrap();

        let summary = handle.await.unwrap().unwrap();
        assert_eq!(summary.passed_steps, 10);
        assert!(completed_before_pause.load(std::sync::atomic::Ordering::SeqCst) >= 3);
    }

    /// §5/§8: in every terminal path `on_complete` fires exactly once and
    /// the pending `start()` call resolves with a summary — `stop()` must
    /// not make `start()` return an error.
    #[tokio::test]
    async fn stop_mid_run_still_resolves_start_with_a_summary() {
        let (engine, ctx) = build_engine();
        let steps = ten_click_steps();

        let complete_calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        {
            let counter = complete_calls.clone();
            let stopping_engine = engine.clone();
            engine.handlers_mut().on_step_complete(move |result| {
                if result.step_id == "s2" {
                    stopping_engine.stop().ok();
                }
            });
            engine.handlers_mut().on_complete(move |_| {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            });
        }

        let run_engine = engine.clone();
        let run_steps = steps.clone();
        let handle = tokio::spawn(async move {
            run_engine.start(&run_steps, &ctx, &fast_options()).await
        });

        let summary = handle
            .await
            .unwrap()
            .expect("stop() must not turn start() into an error");
        assert_eq!(engine.state().lifecycle, Lifecycle::Stopped);
        assert!(summary.passed_steps < 10);
        assert_eq!(complete_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn illegal_transition_is_rejected() {
        let (engine, _ctx) = build_engine();
        let err = engine.pause().unwrap_err();
        assert!(matches!(err, EngineError::IllegalTransition { .. }));
    }

    #[tokio::test]
    async fn reset_returns_engine_to_fresh_idle_state() {
        let (engine, ctx) = build_engine();
        let steps = ten_click_steps();
        let complete_calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        {
            let counter = complete_calls.clone();
            engine
                .handlers_mut()
                .on_complete(move |_| { counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst); });
        }
        engine.start(&steps, &ctx, &fast_options()).await.unwrap();
        assert_eq!(complete_calls.load(std::sync::atomic::Ordering::SeqCst), 1);

        engine.reset().unwrap();
        assert_eq!(engine.state().lifecycle, Lifecycle::Idle);
        assert!(engine.results().is_empty());

        // No leaked handlers: a second run after reset must not re-fire the
        // handler registered before it (§8).
        engine.start(&steps, &ctx, &fast_options()).await.unwrap();
        assert_eq!(complete_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
