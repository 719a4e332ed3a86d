//! Workspace-level end-to-end scenarios (spec §8) exercising the full
//! Finder -> Action Executor -> Step Executor -> Engine/Session stack
//! against an `InMemoryDom`, the way no single crate's unit tests can.

use std::collections::HashMap;
use std::sync::Arc;

use action_executor::{fake::FakeActionPort, ActionOptions, DefaultActionExecutor};
use core_types::{Lifecycle, LocatorBundle, Step, StepEvent, StepStatus};
use dom_traversal::{InMemoryDom, NodeSpec};
use element_finder::DefaultElementFinder;
use replay_engine::{ReplayEngine, ReplayEngineOptions};
use replay_session::{ReplaySession, ReplaySessionOptions};
use step_executor::{DefaultStepExecutor, StepExecutionContext};

fn fast_action_options() -> ActionOptions {
    ActionOptions {
        human_like_mouse: false,
        scroll_into_view: false,
        wait_for_animations: false,
        focus_before_action: false,
        ..Default::default()
    }
}

/// Scenario 1 — click by id: `id` should win outright since it is tried
/// before anything else needs to.
#[tokio::test]
async fn scenario_click_by_id() {
    let dom = Arc::new(
        InMemoryDom::builder()
            .node(None, NodeSpec::new("html", "html"))
            .node(Some("html"), NodeSpec::new("btn", "button").attr("id", "submit").text("OK"))
            .build(),
    );
    let action_port = FakeActionPort::new();
    action_port.register("btn", true, true, false);
    let finder = Arc::new(DefaultElementFinder::new(dom.clone()));
    let action_executor = Arc::new(DefaultActionExecutor::new(action_port));
    let step_executor = Arc::new(DefaultStepExecutor::new(finder, action_executor.clone()));
    let engine = ReplayEngine::new(step_executor);

    let steps = vec![
        Step::new("s1", StepEvent::Click, "OK").with_bundle(LocatorBundle::builder("button").id("submit").build().unwrap()),
    ];
    let context = StepExecutionContext {
        target_document: dom.root_document(),
        ..Default::default()
    };
    let mut options = ReplayEngineOptions::default();
    options.step_executor_options.action_options = fast_action_options();

    let summary = engine.start(&steps, &context, &options).await.unwrap();
    assert_eq!(summary.results[0].status, StepStatus::Passed);
    assert_eq!(summary.results[0].locator_strategy.as_deref(), Some("id"));
}

/// Scenario 2 — input with direct CSV injection.
#[tokio::test]
async fn scenario_input_with_csv_injection() {
    let dom = Arc::new(
        InMemoryDom::builder()
            .node(None, NodeSpec::new("html", "html"))
            .node(Some("html"), NodeSpec::new("email", "input").attr("id", "email"))
            .build(),
    );
    let action_port = FakeActionPort::new();
    action_port.register("email", true, true, false);
    let finder = Arc::new(DefaultElementFinder::new(dom.clone()));
    let action_executor = Arc::new(DefaultActionExecutor::new(action_port));
    let step_executor = Arc::new(DefaultStepExecutor::new(finder, action_executor));
    let engine = ReplayEngine::new(step_executor);

    let steps = vec![
        Step::new("s1", StepEvent::Input, "Email").with_bundle(LocatorBundle::builder("input").id("email").build().unwrap()),
    ];
    let context = StepExecutionContext {
        target_document: dom.root_document(),
        csv_values: HashMap::from([("Email".to_string(), "a@b.c".to_string())]),
        ..Default::default()
    };
    let mut options = ReplayEngineOptions::default();
    options.step_executor_options.action_options = fast_action_options();

    let summary = engine.start(&steps, &context, &options).await.unwrap();
    let result = &summary.results[0];
    assert_eq!(result.status, StepStatus::Passed);
    assert_eq!(result.used_value.as_deref(), Some("a@b.c"));
}

/// Scenario 3 — input with mapped CSV column.
#[tokio::test]
async fn scenario_input_with_mapped_csv() {
    let dom = Arc::new(
        InMemoryDom::builder()
            .node(None, NodeSpec::new("html", "html"))
            .node(Some("html"), NodeSpec::new("email", "input").attr("id", "email"))
            .build(),
    );
    let action_port = FakeActionPort::new();
    action_port.register("email", true, true, false);
    let finder = Arc::new(DefaultElementFinder::new(dom.clone()));
    let action_executor = Arc::new(DefaultActionExecutor::new(action_port));
    let step_executor = Arc::new(DefaultStepExecutor::new(finder, action_executor));
    let engine = ReplayEngine::new(step_executor);

    let steps = vec![
        Step::new("s1", StepEvent::Input, "Email Field")
            .with_bundle(LocatorBundle::builder("input").id("email").build().unwrap()),
    ];
    let context = StepExecutionContext {
        target_document: dom.root_document(),
        csv_values: HashMap::from([("email".to_string(), "x@y.z".to_string())]),
        field_mappings: HashMap::from([("email".to_string(), "Email Field".to_string())]),
        ..Default::default()
    };
    let mut options = ReplayEngineOptions::default();
    options.step_executor_options.action_options = fast_action_options();

    let summary = engine.start(&steps, &context, &options).await.unwrap();
    let result = &summary.results[0];
    assert_eq!(result.used_value.as_deref(), Some("x@y.z"));
}

/// Scenario 4 — fallback through strategies: a stale `id` falls through to
/// `aria`.
#[tokio::test]
async fn scenario_fallback_through_strategies() {
    let dom = Arc::new(
        InMemoryDom::builder()
            .node(None, NodeSpec::new("html", "html"))
            .node(
                Some("html"),
                NodeSpec::new("btn", "button").attr("id", "submit-v2").attr("aria-label", "Submit"),
            )
            .build(),
    );
    let action_port = FakeActionPort::new();
    action_port.register("btn", true, true, false);
    let finder = Arc::new(DefaultElementFinder::new(dom.clone()));
    let action_executor = Arc::new(DefaultActionExecutor::new(action_port));
    let step_executor = Arc::new(DefaultStepExecutor::new(finder, action_executor));
    let engine = ReplayEngine::new(step_executor);

    let steps = vec![
        Step::new("s1", StepEvent::Click, "Submit")
            .with_bundle(LocatorBundle::builder("button").id("submit").aria("Submit").build().unwrap()),
    ];
    let context = StepExecutionContext {
        target_document: dom.root_document(),
        ..Default::default()
    };
    let mut options = ReplayEngineOptions::default();
    options.step_executor_options.action_options = fast_action_options();

    let summary = engine.start(&steps, &context, &options).await.unwrap();
    let result = &summary.results[0];
    assert_eq!(result.status, StepStatus::Passed);
    assert_eq!(result.locator_strategy.as_deref(), Some("aria"));
    assert_eq!(result.locator_confidence, Some(element_finder::Strategy::Aria.base_confidence()));
}

/// Scenario 5 — pause after step 3's completion, resume after a delay; the
/// run still completes all ten steps and the lifecycle trace matches §8.
#[tokio::test]
async fn scenario_pause_and_resume() {
    let dom = Arc::new(
        InMemoryDom::builder()
            .node(None, NodeSpec::new("html", "html"))
            .node(Some("html"), NodeSpec::new("btn", "button").attr("id", "btn"))
            .build(),
    );
    let action_port = FakeActionPort::new();
    action_port.register("btn", true, true, false);
    let finder = Arc::new(DefaultElementFinder::new(dom.clone()));
    let action_executor = Arc::new(DefaultActionExecutor::new(action_port));
    let step_executor = Arc::new(DefaultStepExecutor::new(finder, action_executor));
    let engine = Arc::new(ReplayEngine::new(step_executor));

    let steps: Vec<Step> = (0..10)
        .map(|i| {
            Step::new(format!("s{i}"), StepEvent::Click, "Button")
                .with_bundle(LocatorBundle::builder("button").id("btn").build().unwrap())
        })
        .collect();

    let lifecycle_trace = Arc::new(std::sync::Mutex::new(vec![Lifecycle::Idle]));
    {
        let trace = lifecycle_trace.clone();
        engine.handlers_mut().on_state_change(move |_from, to| {
            trace.lock().unwrap().push(to);
        });
        let pause_engine = engine.clone();
        engine.handlers_mut().on_step_complete(move |result| {
            if result.step_id == "s2" {
                pause_engine.pause().ok();
            }
        });
    }

    let context = StepExecutionContext {
        target_document: dom.root_document(),
        ..Default::default()
    };
    let mut options = ReplayEngineOptions::default();
    options.step_executor_options.action_options = fast_action_options();

    let run_engine = engine.clone();
    let run_steps = steps.clone();
    let handle = tokio::spawn(async move { run_engine.start(&run_steps, &context, &options).await });

    for _ in 0..200 {
        if engine.state().lifecycle == Lifecycle::Paused {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert_eq!(engine.state().lifecycle, Lifecycle::Paused);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    engine.resume().unwrap();

    let summary = handle.await.unwrap().unwrap();
    assert_eq!(summary.passed_steps, 10);
    assert_eq!(*lifecycle_trace.lock().unwrap(), vec![
        Lifecycle::Idle,
        Lifecycle::Running,
        Lifecycle::Paused,
        Lifecycle::Running,
        Lifecycle::Completed,
    ]);
}

/// Scenario 6 — 2 rows x 3 steps, step 2 of row 1 fails, `continueOnRowFailure`
/// is true: row 1 stops after its failure, row 2 still runs, session fails
/// overall but both rows complete.
#[tokio::test]
async fn scenario_multi_row_with_mid_row_failure() {
    let dom = Arc::new(
        InMemoryDom::builder()
            .node(None, NodeSpec::new("html", "html"))
            .node(Some("html"), NodeSpec::new("a", "input").attr("id", "a"))
            .node(Some("html"), NodeSpec::new("b", "input").attr("id", "b"))
            .node(Some("html"), NodeSpec::new("c", "input").attr("id", "c"))
            .build(),
    );
    let action_port = FakeActionPort::new();
    action_port.register("a", true, true, false);
    // "b" is deliberately left unregistered so its action always fails.
    action_port.register("c", true, true, false);
    let finder = Arc::new(DefaultElementFinder::new(dom.clone()));
    let action_executor = Arc::new(DefaultActionExecutor::new(action_port));
    let step_executor = Arc::new(DefaultStepExecutor::new(finder, action_executor));
    let engine = Arc::new(ReplayEngine::new(step_executor));
    let session = ReplaySession::new(engine);

    let steps = vec![
        Step::new("s1", StepEvent::Input, "A").with_bundle(LocatorBundle::builder("input").id("a").build().unwrap()),
        Step::new("s2", StepEvent::Input, "B").with_bundle(LocatorBundle::builder("input").id("b").build().unwrap()),
        Step::new("s3", StepEvent::Input, "C").with_bundle(LocatorBundle::builder("input").id("c").build().unwrap()),
    ];
    let rows = vec![HashMap::new(), HashMap::new()];
    let context = StepExecutionContext {
        target_document: dom.root_document(),
        ..Default::default()
    };
    let mut options = ReplaySessionOptions::default();
    options.continue_on_row_failure = true;
    options.skip_unmatched_rows = false;
    options.engine_options.step_executor_options.action_options = fast_action_options();

    let summary = session.start(&steps, &rows, &HashMap::new(), &context, &options).await.unwrap();
    assert!(!summary.success());
    assert_eq!(summary.total_rows, 2);
    assert_eq!(summary.row_results[0].passed, 1);
    assert_eq!(summary.row_results[0].failed, 1);
    assert!(summary.row_results[1].success);
}
