//! Wires one [`replay_config::ReplayConfig`] and a DOM fixture into the
//! full component graph of §2: Finder + Action Executor -> Step Executor
//! -> Engine -> Session, plus the recorder and host-bridge contracts.
//!
//! Ownership flows upward at construction exactly as §2 describes: the
//! context builds the session last, handing it the engine it just built,
//! which in turn holds the step executor built from the finder and action
//! executor.

use std::sync::Arc;

use action_executor::fake::FakeActionPort;
use action_executor::{ActionExecutor, ActionOptions, DefaultActionExecutor};
use dom_traversal::{DomPort, InMemoryDom};
use element_finder::{DefaultElementFinder, ElementFinder, FinderOptions, Strategy};
use host_bridge::DisconnectedHostBridge;
use recorder_contract::NullRecorder;
use replay_config::ReplayConfig;
use replay_engine::{ReplayEngine, ReplayEngineOptions};
use replay_session::{ReplaySession, ReplaySessionOptions};
use step_executor::{DefaultStepExecutor, StepExecutorOptions};

/// Maps the `locator` group's `strategyPriority`/`disabledStrategies`
/// (plain strings, §6) onto the finder's typed priority list.
fn strategy_priority(replay: &ReplayConfig) -> Vec<Strategy> {
    replay
        .locator
        .strategy_priority
        .iter()
        .filter(|name| !replay.locator.disabled_strategies.iter().any(|d| d == *name))
        .filter_map(|name| Strategy::from_name(name))
        .collect()
}

fn finder_options(replay: &ReplayConfig) -> FinderOptions {
    FinderOptions {
        timeout_ms: replay.timing.find_timeout_ms,
        retry_interval_ms: replay.timing.retry_interval_ms,
        max_retries: replay.timing.max_retries,
        fuzzy_match_threshold: replay.locator.fuzzy_match_threshold,
        bounding_box_threshold_px: replay.locator.bounding_box_threshold_px,
        strategy_priority: strategy_priority(replay),
        min_confidence: replay.locator.min_confidence,
    }
}

fn action_options(replay: &ReplayConfig) -> ActionOptions {
    let scroll_behavior = match replay.behavior.scroll_behavior {
        replay_config::ScrollBehavior::Smooth => action_executor::ScrollBehavior::Smooth,
        replay_config::ScrollBehavior::Auto => action_executor::ScrollBehavior::Auto,
    };
    let scroll_block = match replay.behavior.scroll_block {
        replay_config::ScrollBlock::Center => action_executor::ScrollBlock::Center,
        replay_config::ScrollBlock::Start => action_executor::ScrollBlock::Start,
        replay_config::ScrollBlock::End => action_executor::ScrollBlock::End,
        replay_config::ScrollBlock::Nearest => action_executor::ScrollBlock::Nearest,
    };
    ActionOptions {
        scroll_into_view: replay.behavior.scroll_into_view,
        scroll_behavior,
        scroll_block,
        human_like_mouse: replay.behavior.human_like_mouse,
        react_safe_input: replay.behavior.react_safe_input,
        keystroke_delay_ms: replay.timing.keystroke_delay_ms,
        focus_before_action: replay.behavior.focus_before_action,
        wait_for_animations: replay.behavior.wait_for_animations,
        animation_timeout_ms: replay.behavior.animation_timeout_ms,
        show_hidden_elements: replay.behavior.show_hidden_elements,
        verify_actionable: replay.behavior.verify_actionable,
        highlight_elements: replay.visual.highlight_elements,
        highlight_duration_ms: replay.visual.highlight_duration_ms,
        // `ActionOptions` carries one pre/post delay pair; `timing` keeps
        // separate click/input delays (§6). We take the max of the two so
        // neither is silently dropped (recorded as an open decision).
        pre_action_delay_ms: replay.timing.pre_click_delay_ms.max(replay.timing.pre_input_delay_ms),
        post_action_delay_ms: replay.timing.post_click_delay_ms.max(replay.timing.post_input_delay_ms),
    }
}

fn step_executor_options(replay: &ReplayConfig) -> StepExecutorOptions {
    StepExecutorOptions {
        skip_on_not_found: false,
        finder_options: finder_options(replay),
        action_options: action_options(replay),
    }
}

fn engine_options(replay: &ReplayConfig) -> ReplayEngineOptions {
    ReplayEngineOptions {
        step_delay_ms: replay.timing.step_delay_ms,
        human_delay_ms: replay.timing.human_delay_ms,
        continue_on_failure: replay.behavior.continue_on_failure,
        max_consecutive_failures: replay.error.max_consecutive_failures,
        step_executor_options: step_executor_options(replay),
    }
}

/// Builds the [`ReplaySessionOptions`] a fresh session run should use from
/// one config (§6 `session` group).
pub fn session_options(replay: &ReplayConfig) -> ReplaySessionOptions {
    ReplaySessionOptions {
        row_delay_ms: replay.session.row_delay_ms,
        skip_unmatched_rows: replay.session.skip_unmatched_rows,
        continue_on_row_failure: replay.session.continue_on_row_failure,
        max_row_failures: replay.session.max_row_failures,
        engine_options: engine_options(replay),
    }
}

/// Owns the whole component graph for one run against one DOM. There is no
/// process-wide singleton: a fresh context is built per invocation (§9,
/// "no global mutable state" redesign decision).
pub struct AppContext {
    pub dom: Arc<InMemoryDom>,
    pub finder: Arc<dyn ElementFinder>,
    pub action_executor: Arc<dyn ActionExecutor>,
    pub engine: Arc<ReplayEngine>,
    pub session: Arc<ReplaySession>,
    pub recorder: Arc<NullRecorder>,
    pub host_bridge: Arc<DisconnectedHostBridge>,
    pub session_options: ReplaySessionOptions,
}

impl AppContext {
    /// `dom` is a fixture-backed document (§1 scope note: a real host
    /// supplies its own `DomPort`/`ActionPort` implementations; this
    /// crate's CLI only ever drives the in-memory test doubles).
    pub fn build(replay: &ReplayConfig, dom: Arc<InMemoryDom>) -> Self {
        let finder: Arc<dyn ElementFinder> = Arc::new(DefaultElementFinder::new(dom.clone()));

        let action_port = FakeActionPort::new();
        for id in dom.node_ids() {
            action_port.register(id, dom.is_attached(id), dom.is_visible(id), dom.is_disabled(id));
        }
        let action_executor: Arc<dyn ActionExecutor> = Arc::new(DefaultActionExecutor::new(action_port));
        let step_executor = Arc::new(DefaultStepExecutor::new(finder.clone(), action_executor.clone()));
        let engine = Arc::new(ReplayEngine::new(step_executor));
        let session = Arc::new(ReplaySession::new(engine.clone()));

        Self {
            dom,
            finder,
            action_executor,
            engine,
            session,
            recorder: NullRecorder::new(Vec::new()),
            host_bridge: DisconnectedHostBridge::new(),
            session_options: session_options(replay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_traversal::NodeSpec;
    use host_bridge::HostBridge as _;

    #[test]
    fn build_wires_every_component() {
        let dom = Arc::new(InMemoryDom::builder().node(None, NodeSpec::new("html", "html")).build());
        let ctx = AppContext::build(&replay_config::default_config(), dom);
        assert!(ctx.host_bridge.is_connected());
        assert!(ctx.session_options.skip_unmatched_rows);
    }

    #[test]
    fn strategy_priority_respects_disabled_list() {
        let mut replay = replay_config::default_config();
        replay.locator.disabled_strategies = vec!["css".to_string(), "fuzzyText".to_string()];
        let priority = strategy_priority(&replay);
        assert!(!priority.contains(&Strategy::Css));
        assert!(!priority.contains(&Strategy::FuzzyText));
        assert!(priority.contains(&Strategy::Xpath));
    }
}
