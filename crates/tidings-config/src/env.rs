//! Environment variable fallbacks.
//!
//! A variable only fills a field that no config file set; explicit file
//! values always win.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Prefix shared by every variable this crate reads.
pub const ENV_PREFIX: &str = "TIDINGS_";

/// How a fallback value is converted into TOML.
#[derive(Debug, Clone, Copy)]
enum Kind {
    Str,
    Uint,
}

/// `(variable, section, key, kind)`
const FALLBACKS: &[(&str, &str, &str, Kind)] = &[
    ("TIDINGS_LOG_LEVEL", "logging", "level", Kind::Str),
    ("TIDINGS_LOG_FORMAT", "logging", "format", Kind::Str),
    ("TIDINGS_BUFFER_CAPACITY", "hub", "initial_buffer_capacity", Kind::Uint),
];

/// Snapshot the process environment, keeping only `TIDINGS_*` variables.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with(ENV_PREFIX))
        .collect()
}

/// Fill fields not set by `file_overlay` from `env_vars`.
///
/// Returns the number of fields filled.
///
/// # Errors
///
/// Returns [`ConfigError::EnvError`] if a numeric variable does not parse.
pub fn apply_env_fallbacks(
    merged: &mut toml::Value,
    file_overlay: Option<&toml::Value>,
    env_vars: &HashMap<String, String>,
) -> ConfigResult<usize> {
    let mut applied: usize = 0;

    for (var, section, key, kind) in FALLBACKS {
        let Some(raw) = env_vars.get(*var) else {
            continue;
        };
        if file_overlay.is_some_and(|overlay| has_key(overlay, section, key)) {
            debug!(var, "config file value takes precedence over environment");
            continue;
        }

        let value = match kind {
            Kind::Str => toml::Value::String(raw.trim().to_owned()),
            Kind::Uint => {
                let parsed: i64 = raw.trim().parse().map_err(|_| ConfigError::EnvError {
                    var_name: (*var).to_owned(),
                    message: format!("expected a non-negative integer, got '{raw}'"),
                })?;
                if parsed < 0 {
                    return Err(ConfigError::EnvError {
                        var_name: (*var).to_owned(),
                        message: format!("expected a non-negative integer, got '{raw}'"),
                    });
                }
                toml::Value::Integer(parsed)
            },
        };

        if let toml::Value::Table(root) = merged {
            let table = root
                .entry((*section).to_owned())
                .or_insert(toml::Value::Table(toml::map::Map::new()));
            if let toml::Value::Table(table) = table {
                table.insert((*key).to_owned(), value);
                applied = applied.saturating_add(1);
            }
        }
    }

    Ok(applied)
}

fn has_key(overlay: &toml::Value, section: &str, key: &str) -> bool {
    overlay
        .get(section)
        .and_then(|s| s.get(key))
        .is_some()
}
