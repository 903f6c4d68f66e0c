//! Tidings Events - typed event queue with grouped, deferred delivery.
//!
//! This crate provides:
//! - Stable runtime identities for event types ([`identity_of`], [`TypeRegistry`])
//! - A type-erased [`EventEnvelope`] for published values
//! - Type-erased [`Subscription`]s wrapping strongly-typed handlers
//! - The [`EventHub`], which routes events into per-group buffers and drains
//!   them on demand
//!
//! # Architecture
//!
//! Consumers allocate a [`SubscriberToken`] per independent group and register
//! one handler per event type against it. Publishing an event queues a single
//! shared envelope for every group that accepts its type. Nothing runs until
//! the group's owner calls [`EventHub::drain`], which walks the buffer in
//! publish order and hands each envelope to the first matching handler.
//!
//! # Example
//!
//! ```rust
//! use tidings_events::{Event, EventHub};
//!
//! struct Deposit(u64);
//! impl Event for Deposit {}
//!
//! # fn main() -> tidings_events::HubResult<()> {
//! let mut hub = EventHub::new();
//! let ledger = hub.new_token();
//!
//! hub.register(ledger, |deposit: &Deposit| {
//!     println!("deposited {}", deposit.0);
//! })?;
//!
//! hub.publish(Deposit(100));
//! let report = hub.drain(ledger)?;
//! assert_eq!(report.delivered, 1);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod config;
mod envelope;
mod error;
mod hub;
mod identity;
mod subscription;

pub use config::{DEFAULT_BUFFER_CAPACITY, HubConfig};
pub use envelope::{Event, EventEnvelope, EventExt};
pub use error::{HubError, HubResult};
pub use hub::{DrainReport, EventHub, SubscriberToken};
pub use identity::{EventTypeId, TypeRegistry, identity_of};
pub use subscription::{HandlerSubscription, Subscription};
