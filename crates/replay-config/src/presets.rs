use crate::defaults::default_config;
use crate::errors::ConfigError;
use crate::model::ReplayConfig;

/// Named presets are shallow overrides of [`default_config`] (§6).
pub fn preset(name: &str) -> Result<ReplayConfig, ConfigError> {
    let mut config = default_config();
    match name {
        "default" => {}
        "fast" => {
            config.timing.find_timeout_ms = 800;
            config.timing.retry_interval_ms = 80;
            config.timing.max_retries = 5;
            config.behavior.wait_for_animations = false;
            config.behavior.human_like_mouse = false;
            config.behavior.scroll_behavior = crate::model::ScrollBehavior::Auto;
        }
        "realistic" => {
            config.timing.human_delay_ms = Some((150, 600));
            config.behavior.human_like_mouse = true;
            config.timing.keystroke_delay_ms = 35;
            config.behavior.wait_for_animations = true;
        }
        "debug" => {
            config.visual.highlight_elements = true;
            config.visual.highlight_duration_ms = 1_000;
            config.error.verbose_errors = true;
            config.error.capture_screenshots = true;
            config.error.capture_html = true;
        }
        "tolerant" => {
            config.behavior.continue_on_failure = true;
            config.session.continue_on_row_failure = true;
            config.timing.max_retries = 30;
            config.timing.find_timeout_ms = 5_000;
            config.error.max_consecutive_failures = 0;
        }
        other => return Err(ConfigError::UnknownPreset(other.to_string())),
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_named_preset_validates() {
        for name in ["default", "fast", "realistic", "debug", "tolerant"] {
            let config = preset(name).unwrap();
            assert!(config.validate().is_ok(), "{name} preset should validate");
        }
    }

    #[test]
    fn unknown_preset_is_rejected() {
        assert!(matches!(preset("bogus"), Err(ConfigError::UnknownPreset(_))));
    }

    #[test]
    fn fast_preset_shortens_timeouts_relative_to_default() {
        let default = preset("default").unwrap();
        let fast = preset("fast").unwrap();
        assert!(fast.timing.find_timeout_ms < default.timing.find_timeout_ms);
    }
}
