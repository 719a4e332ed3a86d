use crate::model::{
    BehaviorConfig, ErrorConfig, LocatorConfig, ReplayConfig, ScrollBehavior, ScrollBlock,
    SessionConfig, TimingConfig, VisualConfig,
};

/// The nine strategy names in default priority order, matching
/// `element_finder::Strategy::default_priority` (kept as plain strings here
/// so this crate has no dependency on `element-finder`; the root crate
/// maps names back to `Strategy` values when wiring the finder).
pub const DEFAULT_STRATEGY_PRIORITY: &[&str] = &[
    "xpath",
    "id",
    "name",
    "aria",
    "placeholder",
    "dataAttributes",
    "css",
    "fuzzyText",
    "boundingBox",
];

pub fn default_config() -> ReplayConfig {
    ReplayConfig {
        timing: TimingConfig {
            find_timeout_ms: 2_000,
            retry_interval_ms: 150,
            max_retries: 13,
            step_delay_ms: 0,
            human_delay_ms: None,
            action_timeout_ms: 5_000,
            navigation_timeout_ms: 30_000,
            pre_click_delay_ms: 0,
            post_click_delay_ms: 0,
            pre_input_delay_ms: 0,
            post_input_delay_ms: 0,
            keystroke_delay_ms: 0,
        },
        locator: LocatorConfig {
            fuzzy_match_threshold: 0.4,
            bounding_box_threshold_px: 200.0,
            strategy_priority: DEFAULT_STRATEGY_PRIORITY.iter().map(|s| s.to_string()).collect(),
            disabled_strategies: Vec::new(),
            enable_shadow_dom: true,
            enable_iframes: true,
            min_confidence: 0.5,
            prefer_exact_match: true,
        },
        behavior: BehaviorConfig {
            continue_on_failure: false,
            scroll_into_view: true,
            scroll_behavior: ScrollBehavior::Smooth,
            scroll_block: ScrollBlock::Center,
            human_like_mouse: true,
            react_safe_input: true,
            focus_before_action: true,
            wait_for_animations: true,
            animation_timeout_ms: 500,
            show_hidden_elements: true,
            verify_actionable: true,
        },
        visual: VisualConfig {
            highlight_elements: false,
            highlight_duration_ms: 200,
            highlight_color: "#ff5722".to_string(),
            highlight_border_width_px: 2,
            show_progress_overlay: true,
            show_step_notifications: true,
        },
        error: ErrorConfig {
            capture_screenshots: false,
            capture_html: false,
            exponential_backoff: false,
            max_backoff_delay_ms: 10_000,
            backoff_multiplier: 2.0,
            max_consecutive_failures: 0,
            verbose_errors: false,
        },
        session: SessionConfig {
            skip_unmatched_rows: true,
            continue_on_row_failure: true,
            max_row_failures: 0,
            row_delay_ms: 0,
        },
    }
}
