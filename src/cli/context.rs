use crate::config::AppConfig;

/// Holds the resolved configuration for one CLI invocation. Building the
/// full [`crate::app_context::AppContext`] component graph needs a DOM,
/// which only a `replay`/`step` invocation has (from its fixture file), so
/// that happens inside those commands rather than here.
pub struct CliContext {
    config: AppConfig,
}

impl CliContext {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
