use std::env;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::defaults::default_config;
use crate::errors::ConfigError;
use crate::model::ReplayConfig;

const ENV_PREFIX: &str = "REPLAY_CONFIG__";

/// Layered load: built-in defaults -> YAML file -> environment overrides (§6).
pub fn load_config(path: Option<&Path>) -> Result<ReplayConfig, ConfigError> {
    let mut value = serde_json::to_value(default_config())
        .map_err(|err| ConfigError::Parse(err.to_string()))?;

    if let Some(path) = path {
        if path.exists() {
            merge_file(&mut value, path)?;
        }
    }

    merge_env(&mut value)?;

    let config: ReplayConfig =
        serde_json::from_value(value).map_err(|err| ConfigError::Parse(err.to_string()))?;
    config.validate()?;
    Ok(config)
}

fn merge_file(base: &mut Value, path: &Path) -> Result<(), ConfigError> {
    let content = fs::read_to_string(path).map_err(|err| ConfigError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))?;
    let overlay =
        serde_json::to_value(yaml_value).map_err(|err| ConfigError::Parse(err.to_string()))?;
    merge_json(base, overlay);
    Ok(())
}

/// Recognises `REPLAY_CONFIG__<GROUP>__<FIELD>` environment variables,
/// lower-casing each `__`-delimited segment into the matching JSON path.
fn merge_env(base: &mut Value) -> Result<(), ConfigError> {
    for (key, raw) in env::vars() {
        let Some(stripped) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let path: Vec<String> = stripped
            .split("__")
            .filter(|segment| !segment.is_empty())
            .map(|segment| segment.to_ascii_lowercase())
            .collect();
        if path.is_empty() {
            continue;
        }
        let parsed = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
        set_json_path(base, &path, parsed);
    }
    Ok(())
}

fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                merge_json(base_map.entry(key).or_insert(Value::Null), value);
            }
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value;
        }
    }
}

fn set_json_path(base: &mut Value, path: &[String], value: Value) {
    if path.len() == 1 {
        if let Value::Object(map) = base {
            map.insert(path[0].clone(), value);
        }
        return;
    }
    if let Value::Object(map) = base {
        let entry = map
            .entry(path[0].clone())
            .or_insert_with(|| Value::Object(Default::default()));
        set_json_path(entry, &path[1..], value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loading_with_no_file_or_env_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, default_config());
    }

    #[test]
    fn file_overlay_overrides_a_single_field() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timing:\n  find_timeout_ms: 9000\n").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.timing.find_timeout_ms, 9000);
        assert_eq!(config.timing.retry_interval_ms, default_config().timing.retry_interval_ms);
    }

    #[test]
    fn env_overlay_overrides_a_single_field() {
        std::env::set_var("REPLAY_CONFIG__TIMING__MAX_RETRIES", "3");
        let config = load_config(None).unwrap();
        std::env::remove_var("REPLAY_CONFIG__TIMING__MAX_RETRIES");
        assert_eq!(config.timing.max_retries, 3);
    }
}
