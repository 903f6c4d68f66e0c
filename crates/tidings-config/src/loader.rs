//! Config file loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse `defaults.toml` → base
//! 2. Deep-merge the config file, if one is given and exists
//! 3. Apply `TIDINGS_*` env var fallbacks for fields the file did not set
//! 4. Deserialize merged tree → `Config`
//! 5. Validate

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Load the configuration, overlaying `path` on the embedded defaults.
///
/// A missing file is not an error; the defaults (plus env fallbacks) are
/// used instead.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file is malformed, an env var is
/// invalid, or the merged configuration fails validation.
pub fn load(path: Option<&Path>) -> ConfigResult<Config> {
    load_with_env(path, &collect_env_vars())
}

/// [`load`] with an explicit environment snapshot.
///
/// # Errors
///
/// Same as [`load`].
pub fn load_with_env(path: Option<&Path>, env_vars: &HashMap<String, String>) -> ConfigResult<Config> {
    let mut merged = parse_toml(DEFAULTS_TOML, "<embedded defaults>")?;

    let overlay = match path {
        Some(p) => try_load_file(p)?,
        None => None,
    };
    if let Some(overlay) = &overlay {
        deep_merge(&mut merged, overlay);
        if let Some(p) = path {
            info!(path = %p.display(), "loaded config file");
        }
    }

    let env_count = apply_env_fallbacks(&mut merged, overlay.as_ref(), env_vars)?;
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    let config: Config =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: "<merged config>".to_owned(),
                source: e,
            })?;

    validate::validate(&config)?;
    Ok(config)
}

/// Load a config from a specific file path (no defaults layer, no env).
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
/// validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let metadata = std::fs::metadata(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {} byte limit",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            ),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let config = from_toml_str(&content).map_err(|e| match e {
        ConfigError::ParseError { source, .. } => ConfigError::ParseError {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })?;
    Ok(config)
}

/// Parse and validate a config from a TOML string.
///
/// Missing sections and keys take their default values.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the string does not parse or fails
/// validation.
pub fn from_toml_str(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: "<string>".to_owned(),
        source: e,
    })?;
    validate::validate(&config)?;
    Ok(config)
}

/// Recursively deep-merge `overlay` into `base`.
///
/// - Tables merge recursively per-field.
/// - Scalars and arrays from the overlay **replace** the base value.
pub fn deep_merge(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                if let Some(base_val) = base_table.get_mut(key) {
                    deep_merge(base_val, overlay_val);
                } else {
                    base_table.insert(key.clone(), overlay_val.clone());
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
        },
    }
}

/// Try to load a file, returning `None` if the file doesn't exist.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {} byte limit",
                content.len(),
                MAX_CONFIG_FILE_SIZE
            ),
        });
    }

    parse_toml(&content, &path.display().to_string()).map(Some)
}

fn parse_toml(content: &str, origin: &str) -> ConfigResult<toml::Value> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: origin.to_owned(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn test_embedded_defaults_match_default_impl() {
        let config = load_with_env(None, &no_env()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_file_overlay_merges_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tidings.toml");
        std::fs::write(&path, "[hub]\nwarn_on_unhandled = true\n").unwrap();

        let config = load_with_env(Some(&path), &no_env()).unwrap();
        assert!(config.hub.warn_on_unhandled);
        assert_eq!(config.hub.initial_buffer_capacity, 16);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config = load_with_env(Some(&path), &no_env()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_fallback_applies_without_file_value() {
        let mut env = HashMap::new();
        env.insert("TIDINGS_LOG_LEVEL".to_owned(), "debug".to_owned());

        let config = load_with_env(None, &env).unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_file_value_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tidings.toml");
        std::fs::write(&path, "[logging]\nformat = \"yaml\"\n").unwrap();

        let err = load_with_env(Some(&path), &no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tidings.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[hub\ninitial_buffer_capacity = ").unwrap();

        let err = load_with_env(Some(&path), &no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_load_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "hub = 3\n").unwrap();

        let err = load_file(&path).unwrap_err();
        match err {
            ConfigError::ParseError { path: reported, .. } => {
                assert!(reported.ends_with("broken.toml"));
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_file_missing_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_from_toml_str_partial() {
        let config = from_toml_str("[logging]\nlevel = \"trace\"\n").unwrap();
        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.logging.format, "compact");
        assert_eq!(config.hub, crate::HubSection::default());
    }

    #[test]
    fn test_deep_merge_replaces_arrays() {
        let mut base: toml::Value =
            toml::from_str("[logging]\ndirectives = [\"a=info\"]\nlevel = \"info\"\n").unwrap();
        let overlay: toml::Value = toml::from_str("[logging]\ndirectives = [\"b=debug\"]\n").unwrap();

        deep_merge(&mut base, &overlay);
        let directives = base["logging"]["directives"].as_array().unwrap();
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].as_str(), Some("b=debug"));
        assert_eq!(base["logging"]["level"].as_str(), Some("info"));
    }
}
