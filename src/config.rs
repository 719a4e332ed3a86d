//! Top-level application configuration: a [`replay_config::ReplayConfig`]
//! plus the handful of CLI-only knobs (log level, debug mode) the config
//! surface of §6 deliberately leaves to the host.

use std::path::{Path, PathBuf};

use replay_config::ReplayConfig;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub replay: ReplayConfig,
    pub log_level: String,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            replay: replay_config::default_config(),
            log_level: "info".to_string(),
            debug: false,
        }
    }
}

pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: Option<PathBuf>,
}

/// Loads the `replay` group via [`replay_config::load_config`] (file + env
/// layering, §6); the CLI-only fields come from the file alone when
/// present, defaulting otherwise.
pub fn load_config(config_path: Option<&Path>) -> crate::errors::AppResult<LoadedConfig> {
    let replay = replay_config::load_config(config_path)?;

    let (log_level, debug) = match config_path {
        Some(path) if path.exists() => {
            let content = std::fs::read_to_string(path).map_err(|err| crate::errors::AppError::Io {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;
            let value: serde_yaml::Value =
                serde_yaml::from_str(&content).map_err(|err| crate::errors::AppError::Parse {
                    kind: "config",
                    path: path.display().to_string(),
                    reason: err.to_string(),
                })?;
            let log_level = value
                .get("logLevel")
                .and_then(|v| v.as_str())
                .unwrap_or("info")
                .to_string();
            let debug = value.get("debug").and_then(|v| v.as_bool()).unwrap_or(false);
            (log_level, debug)
        }
        _ => ("info".to_string(), false),
    };

    Ok(LoadedConfig {
        config: AppConfig {
            replay,
            log_level,
            debug,
        },
        path: config_path.map(Path::to_path_buf),
    })
}

/// Builds an [`AppConfig`] from one of the named presets (§6), ignoring
/// any config file.
pub fn load_preset(name: &str) -> crate::errors::AppResult<AppConfig> {
    Ok(AppConfig {
        replay: replay_config::preset(name)?,
        log_level: "info".to_string(),
        debug: false,
    })
}
