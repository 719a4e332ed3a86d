use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppConfig, LoadedConfig};

pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}

/// Loads the effective config: a named preset wins outright; otherwise the
/// layered file/env loader of §6 runs against `config_path`.
pub fn load_effective_config(
    config_path: Option<&std::path::Path>,
    preset: Option<&str>,
) -> crate::errors::AppResult<AppConfig> {
    match preset {
        Some(name) => crate::config::load_preset(name),
        None => crate::config::load_config(config_path).map(|LoadedConfig { config, .. }| config),
    }
}
