//! Typed configuration surface for the replay core: timing, locator,
//! behavior, visual, error, and session groups, with named presets and a
//! layered file/env loader (§6).

mod defaults;
mod errors;
mod loader;
mod model;
mod presets;

pub use defaults::{default_config, DEFAULT_STRATEGY_PRIORITY};
pub use errors::ConfigError;
pub use loader::load_config;
pub use model::{
    BehaviorConfig, ErrorConfig, LocatorConfig, ReplayConfig, ScrollBehavior, ScrollBlock,
    SessionConfig, TimingConfig, VisualConfig,
};
pub use presets::preset;
