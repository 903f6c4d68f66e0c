//! Prelude module - commonly used types for convenient import.
//!
//! Use `use tidings_events::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use tidings_events::prelude::*;
//!
//! struct Heartbeat;
//! impl Event for Heartbeat {}
//!
//! # fn main() -> HubResult<()> {
//! let mut hub = EventHub::new();
//! let token = hub.new_token();
//! hub.register(token, |_: &Heartbeat| {})?;
//! hub.publish(Heartbeat);
//! hub.drain(token)?;
//! # Ok(())
//! # }
//! ```

// Hub
pub use crate::{DrainReport, EventHub, HubConfig, SubscriberToken};

// Events
pub use crate::{Event, EventEnvelope, EventExt, EventTypeId, identity_of};

// Subscriptions
pub use crate::{HandlerSubscription, Subscription};

// Errors
pub use crate::{HubError, HubResult};
