use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use core_types::{LocatorBundle, Step, StepEvent, StepExecutionResult, StepStatus};
use dom_traversal::NodeRef;
use element_finder::{ElementFinder, FinderError, FinderOptions};
use action_executor::{Action, ActionExecutor, ActionOptions};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::errors::StepExecutorError;
use crate::value_resolution::resolve_value;

/// `{document?, csvValues?, fieldMappings?, pageUrl?, tabId?}` (§4.4/§6).
/// `document` is represented here as the target document `NodeRef` the
/// caller resolved ahead of time; there is no "global document" default
/// to fall back to outside of a live page.
#[derive(Clone, Debug, Default)]
pub struct StepExecutionContext {
    pub target_document: NodeRef,
    pub csv_values: HashMap<String, String>,
    pub field_mappings: HashMap<String, String>,
    pub page_url: Option<String>,
    pub tab_id: Option<String>,
}

#[derive(Clone, Debug)]
pub struct StepExecutorOptions {
    pub skip_on_not_found: bool,
    pub finder_options: FinderOptions,
    pub action_options: ActionOptions,
}

impl Default for StepExecutorOptions {
    fn default() -> Self {
        Self {
            skip_on_not_found: false,
            finder_options: FinderOptions::default(),
            action_options: ActionOptions::default(),
        }
    }
}

#[async_trait]
pub trait StepExecutor: Send + Sync {
    async fn execute(
        &self,
        step: &Step,
        context: &StepExecutionContext,
        options: &StepExecutorOptions,
        cancel: &CancellationToken,
    ) -> Result<StepExecutionResult, StepExecutorError>;
}

/// Does the end-to-end work of one step: validate, resolve a value, find
/// the element, run the action, report a result (§4.4).
pub struct DefaultStepExecutor {
    finder: Arc<dyn ElementFinder>,
    action_executor: Arc<dyn ActionExecutor>,
}

impl DefaultStepExecutor {
    pub fn new(finder: Arc<dyn ElementFinder>, action_executor: Arc<dyn ActionExecutor>) -> Self {
        Self {
            finder,
            action_executor,
        }
    }
}

fn epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A `path`-only step (no recorded bundle) still needs *something* to feed
/// the finder; a bare xpath with a wildcard tag lets the xpath strategy run
/// while every attribute/text strategy simply has nothing to match on.
fn bundle_from_path(path: &str) -> LocatorBundle {
    LocatorBundle::builder("*")
        .xpath(path)
        .build()
        .expect("non-empty tag always builds")
}

#[async_trait]
impl StepExecutor for DefaultStepExecutor {
    async fn execute(
        &self,
        step: &Step,
        context: &StepExecutionContext,
        options: &StepExecutorOptions,
        cancel: &CancellationToken,
    ) -> Result<StepExecutionResult, StepExecutorError> {
        step.validate()
            .map_err(|e| StepExecutorError::InvalidStep { reason: e.to_string() })?;
        if !matches!(step.event, StepEvent::Click | StepEvent::Input | StepEvent::Enter | StepEvent::Open) {
            return Err(StepExecutorError::InvalidStep {
                reason: "unrecognised step event".into(),
            });
        }

        if step.event == StepEvent::Open {
            return Ok(self.execute_open(step, context));
        }

        let start_time_ms = epoch_ms();
        let start = Instant::now();

        let bundle = match (&step.bundle, &step.path) {
            (Some(bundle), _) => bundle.clone(),
            (None, Some(path)) => bundle_from_path(path),
            (None, None) => {
                return Err(StepExecutorError::InvalidStep {
                    reason: "non-open step requires a bundle or a path".into(),
                });
            }
        };

        let outcome = self
            .finder
            .find(&bundle, &context.target_document, &options.finder_options, cancel)
            .await;

        let (element, strategy, confidence, retry_attempts) = match outcome {
            Ok(outcome) => (
                outcome.element,
                Some(outcome.strategy.name().to_string()),
                Some(outcome.confidence),
                outcome.retry_attempts,
            ),
            Err(FinderError::ElementNotFound(diag)) => {
                warn!(step_id = %step.id, strategies = ?diag.strategies_attempted, "element not found");
                let status = if options.skip_on_not_found {
                    StepStatus::Skipped
                } else {
                    StepStatus::Failed
                };
                return Ok(self.finish(step, status, start, start_time_ms, None, None, 0, None, None, Some("element not found".into())));
            }
            Err(err) => {
                return Ok(self.finish(
                    step,
                    StepStatus::Failed,
                    start,
                    start_time_ms,
                    None,
                    None,
                    0,
                    None,
                    None,
                    Some(err.to_string()),
                ));
            }
        };

        let (used_value, value_source) = match step.event {
            StepEvent::Input | StepEvent::Enter => {
                let (value, source) = resolve_value(step, context);
                (Some(value), Some(source))
            }
            _ => (None, None),
        };

        let action = match step.event {
            StepEvent::Click => Action::Click,
            StepEvent::Input => Action::Input(used_value.clone().unwrap_or_default()),
            // A user would have typed the value then hit Enter; replay the
            // same two-action sequence rather than pressing Enter cold.
            StepEvent::Enter => {
                if let Some(value) = used_value.clone().filter(|v| !v.is_empty()) {
                    if let Err(err) = self
                        .action_executor
                        .execute(&element, &Action::Input(value), &options.action_options)
                        .await
                    {
                        return Ok(self.finish(
                            step,
                            StepStatus::Failed,
                            start,
                            start_time_ms,
                            strategy,
                            confidence,
                            retry_attempts,
                            used_value,
                            value_source,
                            Some(err.to_string()),
                        ));
                    }
                }
                Action::PressEnter
            }
            StepEvent::Open => unreachable!("handled above"),
        };

        info!(step_id = %step.id, event = ?step.event, strategy = ?strategy, confidence, "dispatching action");

        match self.action_executor.execute(&element, &action, &options.action_options).await {
            Ok(_) => Ok(self.finish(
                step,
                StepStatus::Passed,
                start,
                start_time_ms,
                strategy,
                confidence,
                retry_attempts,
                used_value,
                value_source,
                None,
            )),
            Err(err) => Ok(self.finish(
                step,
                StepStatus::Failed,
                start,
                start_time_ms,
                strategy,
                confidence,
                retry_attempts,
                used_value,
                value_source,
                Some(err.to_string()),
            )),
        }
    }
}

impl DefaultStepExecutor {
    /// Produces no DOM action; the caller is expected to have already
    /// navigated. Verifies the current URL contains the target URL (or
    /// vice versa) and records the match status (§4.4).
    fn execute_open(&self, step: &Step, context: &StepExecutionContext) -> StepExecutionResult {
        let start_time_ms = epoch_ms();
        let start = Instant::now();

        let (status, error) = match (&step.value, &context.page_url) {
            (Some(target), Some(current)) => {
                if current.contains(target.as_str()) || target.contains(current.as_str()) {
                    (StepStatus::Passed, None)
                } else {
                    (
                        StepStatus::Failed,
                        Some(format!("navigated url '{current}' does not match target '{target}'")),
                    )
                }
            }
            _ => (StepStatus::Passed, None),
        };

        self.finish(
            step,
            status,
            start,
            start_time_ms,
            None,
            None,
            0,
            step.value.clone(),
            None,
            error,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        step: &Step,
        status: StepStatus,
        start: Instant,
        start_time_ms: i64,
        locator_strategy: Option<String>,
        locator_confidence: Option<f64>,
        retry_attempts: u32,
        used_value: Option<String>,
        value_source: Option<core_types::ValueSource>,
        error: Option<String>,
    ) -> StepExecutionResult {
        let duration_ms = start.elapsed().as_millis() as u64;
        let end_time_ms = start_time_ms + duration_ms as i64;
        StepExecutionResult {
            step_id: step.id.clone(),
            status,
            duration_ms,
            start_time_ms,
            end_time_ms,
            locator_strategy,
            locator_confidence,
            retry_attempts,
            used_value,
            value_source,
            error,
        }
    }
}
