use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Smooth,
    Auto,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBlock {
    Center,
    Start,
    End,
    Nearest,
}

/// `timing` config group (§6).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    pub find_timeout_ms: u64,
    pub retry_interval_ms: u64,
    pub max_retries: u32,
    pub step_delay_ms: u64,
    pub human_delay_ms: Option<(u64, u64)>,
    pub action_timeout_ms: u64,
    pub navigation_timeout_ms: u64,
    pub pre_click_delay_ms: u64,
    pub post_click_delay_ms: u64,
    pub pre_input_delay_ms: u64,
    pub post_input_delay_ms: u64,
    pub keystroke_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            find_timeout_ms: 0,
            retry_interval_ms: 0,
            max_retries: 0,
            step_delay_ms: 0,
            human_delay_ms: None,
            action_timeout_ms: 0,
            navigation_timeout_ms: 0,
            pre_click_delay_ms: 0,
            post_click_delay_ms: 0,
            pre_input_delay_ms: 0,
            post_input_delay_ms: 0,
            keystroke_delay_ms: 0,
        }
    }
}

/// `locator` config group (§6).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct LocatorConfig {
    pub fuzzy_match_threshold: f64,
    pub bounding_box_threshold_px: f64,
    pub strategy_priority: Vec<String>,
    pub disabled_strategies: Vec<String>,
    pub enable_shadow_dom: bool,
    pub enable_iframes: bool,
    /// Advisory only (§9 open question b) — not consulted by the finder
    /// itself.
    pub min_confidence: f64,
    pub prefer_exact_match: bool,
}

/// `behavior` config group (§6).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BehaviorConfig {
    pub continue_on_failure: bool,
    pub scroll_into_view: bool,
    pub scroll_behavior: ScrollBehavior,
    pub scroll_block: ScrollBlock,
    pub human_like_mouse: bool,
    pub react_safe_input: bool,
    pub focus_before_action: bool,
    pub wait_for_animations: bool,
    pub animation_timeout_ms: u64,
    pub show_hidden_elements: bool,
    pub verify_actionable: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            continue_on_failure: false,
            scroll_into_view: false,
            scroll_behavior: ScrollBehavior::Auto,
            scroll_block: ScrollBlock::Nearest,
            human_like_mouse: false,
            react_safe_input: false,
            focus_before_action: false,
            wait_for_animations: false,
            animation_timeout_ms: 0,
            show_hidden_elements: false,
            verify_actionable: false,
        }
    }
}

/// `visual` config group (§6).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct VisualConfig {
    pub highlight_elements: bool,
    pub highlight_duration_ms: u64,
    pub highlight_color: String,
    pub highlight_border_width_px: u32,
    pub show_progress_overlay: bool,
    pub show_step_notifications: bool,
}

/// `error` config group (§6).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ErrorConfig {
    pub capture_screenshots: bool,
    pub capture_html: bool,
    pub exponential_backoff: bool,
    pub max_backoff_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// 0 = unlimited.
    pub max_consecutive_failures: u32,
    pub verbose_errors: bool,
}

/// `session` config group (§6).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub skip_unmatched_rows: bool,
    pub continue_on_row_failure: bool,
    /// 0 = unlimited.
    pub max_row_failures: u32,
    pub row_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            skip_unmatched_rows: false,
            continue_on_row_failure: false,
            max_row_failures: 0,
            row_delay_ms: 0,
        }
    }
}

/// The full config surface of §6, one nested struct per group.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ReplayConfig {
    pub timing: TimingConfig,
    pub locator: LocatorConfig,
    pub behavior: BehaviorConfig,
    pub visual: VisualConfig,
    pub error: ErrorConfig,
    pub session: SessionConfig,
}

impl ReplayConfig {
    /// Validated at construction; violations are reported with the field
    /// path and a machine-readable expectation (§6).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.locator.fuzzy_match_threshold) {
            return Err(ConfigError::invalid(
                "locator.fuzzyMatchThreshold",
                "must be between 0.0 and 1.0",
            ));
        }
        if !(0.0..=1.0).contains(&self.locator.min_confidence) {
            return Err(ConfigError::invalid(
                "locator.minConfidence",
                "must be between 0.0 and 1.0",
            ));
        }
        if self.locator.bounding_box_threshold_px < 0.0 {
            return Err(ConfigError::invalid(
                "locator.boundingBoxThreshold",
                "must be non-negative",
            ));
        }
        if self.timing.find_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "timing.findTimeout",
                "must be greater than zero",
            ));
        }
        if let Some((min, max)) = self.timing.human_delay_ms {
            if min > max {
                return Err(ConfigError::invalid(
                    "timing.humanDelay",
                    "[min, max] must have min <= max",
                ));
            }
        }
        if self.error.exponential_backoff && self.error.backoff_multiplier <= 1.0 {
            return Err(ConfigError::invalid(
                "error.backoffMultiplier",
                "must be greater than 1.0 when exponentialBackoff is enabled",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_config;

    #[test]
    fn default_config_validates() {
        assert!(default_config().validate().is_ok());
    }

    #[test]
    fn rejects_fuzzy_threshold_out_of_range() {
        let mut config = default_config();
        config.locator.fuzzy_match_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_human_delay() {
        let mut config = default_config();
        config.timing.human_delay_ms = Some((500, 100));
        assert!(config.validate().is_err());
    }
}
