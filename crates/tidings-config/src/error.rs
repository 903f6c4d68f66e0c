//! Errors raised while loading, merging, or validating a Tidings config.

use std::io;

use thiserror::Error;

/// Why a configuration could not be produced.
///
/// `path` fields hold the file path, or a marker such as `<string>` or
/// `<merged config>` when the TOML did not come from a file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("cannot read tidings config {path}: {source}")]
    ReadError {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The TOML did not parse, or did not match the config layout.
    #[error("malformed tidings config {path}: {source}")]
    ParseError {
        /// Origin of the TOML.
        path: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A value parsed but is outside what the hub or logger accepts.
    #[error("invalid tidings config value `{field}`: {message}")]
    ValidationError {
        /// Dotted key, such as `hub.initial_buffer_capacity`.
        field: String,
        /// What is wrong with the value.
        message: String,
    },

    /// A `TIDINGS_*` fallback variable could not be used.
    #[error("cannot apply ${var_name}: {message}")]
    EnvError {
        /// Variable name.
        var_name: String,
        /// What is wrong with the value.
        message: String,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
