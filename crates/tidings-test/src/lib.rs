//! Tidings Test - shared test utilities for the Tidings crates.
//!
//! This crate provides event fixtures and recording handlers that can be
//! used across Tidings crates as a dev-dependency.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! tidings-test.workspace = true
//! ```
//!
//! ```rust
//! use tidings_events::EventHub;
//! use tidings_test::{EventA, Recorder};
//!
//! let mut hub = EventHub::new();
//! let token = hub.new_token();
//! let recorder = Recorder::<EventA>::new();
//!
//! hub.register(token, recorder.handler()).unwrap();
//! hub.publish(EventA(7));
//! hub.drain(token).unwrap();
//!
//! assert_eq!(recorder.events(), vec![EventA(7)]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;
