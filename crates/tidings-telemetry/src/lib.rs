//! Tidings Telemetry - log subscriber setup for applications embedding Tidings.
//!
//! The library crates only emit `tracing` events; this crate installs the
//! subscriber that formats and writes them:
//! - Level and per-target directives (`EnvFilter`)
//! - Pretty, compact, JSON, or full output
//! - stdout, stderr, or rolling files
//!
//! # Example
//!
//! ```rust,no_run
//! use tidings_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), tidings_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Pretty)
//!     .with_directive("tidings_events=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging,
};
