//! The dispatch hub: subscriber groups, routing and draining.
//!
//! Each [`SubscriberToken`] names an independent group holding the event
//! types it accepts, its subscriptions in registration order, and a FIFO
//! buffer of pending envelopes. [`EventHub::publish`] appends one shared
//! envelope to every group that accepts the event's type;
//! [`EventHub::drain`] hands each pending envelope to the first subscription
//! that accepts it and empties the buffer.
//!
//! Nothing is delivered at publish time. A group only sees events published
//! while it accepted their type, and only when its owner drains it.

use std::any::type_name;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::config::HubConfig;
use crate::envelope::{Event, EventEnvelope};
use crate::error::{HubError, HubResult};
use crate::identity::{EventTypeId, identity_of};
use crate::subscription::{HandlerSubscription, Subscription};

/// Handle naming one subscriber group.
///
/// Issued by [`EventHub::new_token`]; never reused by the issuing hub.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberToken(u32);

impl SubscriberToken {
    /// Sentinel token that is never issued.
    pub const INVALID: Self = Self(0);

    /// Whether this token could have been issued by a hub.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// The raw counter value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SubscriberToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscriber:{}", self.0)
    }
}

/// Outcome of one [`EventHub::drain`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Envelopes a subscription handled.
    pub delivered: usize,
    /// Envelopes no subscription accepted, typically because their type was
    /// unregistered after they were published.
    pub unhandled: usize,
}

impl DrainReport {
    /// Number of envelopes removed from the buffer.
    #[must_use]
    pub fn total(&self) -> usize {
        self.delivered.saturating_add(self.unhandled)
    }

    /// Whether the buffer was already empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

struct SubscriberGroup {
    accepted: HashSet<EventTypeId>,
    subscriptions: Vec<Box<dyn Subscription>>,
    pending: Vec<Arc<EventEnvelope>>,
}

impl SubscriberGroup {
    fn new(capacity: usize) -> Self {
        Self {
            accepted: HashSet::new(),
            subscriptions: Vec::new(),
            pending: Vec::with_capacity(capacity),
        }
    }
}

/// Routes published events into per-group buffers and drains them on demand.
///
/// All mutating operations take `&mut self`. Handlers only see the event, so
/// a group cannot be modified while it is being drained.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use tidings_events::{Event, EventHub};
///
/// struct Saved {
///     id: u64,
/// }
/// impl Event for Saved {}
///
/// # fn main() -> tidings_events::HubResult<()> {
/// let mut hub = EventHub::new();
/// let token = hub.new_token();
///
/// let seen = Arc::new(AtomicUsize::new(0));
/// let seen_clone = Arc::clone(&seen);
/// hub.register(token, move |event: &Saved| {
///     assert_eq!(event.id, 7);
///     seen_clone.fetch_add(1, Ordering::SeqCst);
/// })?;
///
/// hub.publish(Saved { id: 7 });
/// assert_eq!(seen.load(Ordering::SeqCst), 0);
///
/// hub.drain(token)?;
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// # Ok(())
/// # }
/// ```
pub struct EventHub {
    groups: HashMap<SubscriberToken, SubscriberGroup>,
    last_token: SubscriberToken,
    sequence: u64,
    config: HubConfig,
}

impl EventHub {
    /// Create a hub with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    /// Create a hub with the given settings.
    #[must_use]
    pub fn with_config(config: HubConfig) -> Self {
        Self {
            groups: HashMap::new(),
            last_token: SubscriberToken::INVALID,
            sequence: 0,
            config,
        }
    }

    /// The hub's settings.
    #[must_use]
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Issue the next subscriber token.
    ///
    /// The group itself is created by the first registration against the
    /// token.
    ///
    /// # Panics
    ///
    /// Panics if `u32::MAX` tokens have already been issued by this hub.
    pub fn new_token(&mut self) -> SubscriberToken {
        let next = self
            .last_token
            .0
            .checked_add(1)
            .unwrap_or_else(|| panic!("subscriber token space exhausted"));
        self.last_token = SubscriberToken(next);
        debug!(token = %self.last_token, "Subscriber token issued");
        self.last_token
    }

    /// Subscribe `handler` to events of type `E` in the group for `token`.
    ///
    /// # Errors
    ///
    /// Fails if the token is invalid or foreign, or if the group already has
    /// a subscription for `E`.
    pub fn register<E, F>(&mut self, token: SubscriberToken, handler: F) -> HubResult<()>
    where
        E: Event,
        F: FnMut(&E) + Send + 'static,
    {
        self.register_subscription(token, Box::new(HandlerSubscription::<E, F>::new(handler)))
    }

    /// Add a prebuilt subscription to the group for `token`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`register`](Self::register).
    pub fn register_subscription(
        &mut self,
        token: SubscriberToken,
        subscription: Box<dyn Subscription>,
    ) -> HubResult<()> {
        self.check_token(token)?;

        let identity = subscription.accepts_identity();
        let event = subscription.event_name();
        let capacity = self.config.initial_buffer_capacity;
        let group = self
            .groups
            .entry(token)
            .or_insert_with(|| SubscriberGroup::new(capacity));

        if !group.accepted.insert(identity) {
            return Err(rejected(HubError::DuplicateSubscription { token, event }));
        }
        group.subscriptions.push(subscription);

        debug!(%token, event_type = event, %identity, "Subscription registered");
        Ok(())
    }

    /// Remove the group's subscription for `E`.
    ///
    /// Envelopes of `E` already buffered stay in the buffer and are counted
    /// as unhandled by the next drain.
    ///
    /// # Errors
    ///
    /// Fails if the token is invalid or foreign, has no group, or the group
    /// has no subscription for `E`.
    pub fn unregister<E: Event>(&mut self, token: SubscriberToken) -> HubResult<()> {
        let group = self.group_mut(token)?;
        let identity = identity_of::<E>();

        if !group.accepted.remove(&identity) {
            return Err(rejected(HubError::SubscriptionNotFound {
                token,
                event: type_name::<E>(),
            }));
        }
        if let Some(index) = group
            .subscriptions
            .iter()
            .position(|sub| sub.accepts_identity() == identity)
        {
            group.subscriptions.remove(index);
        }

        debug!(%token, event_type = type_name::<E>(), "Subscription unregistered");
        Ok(())
    }

    /// Queue `event` for every group that currently accepts its type.
    ///
    /// All receiving groups share a single envelope. Returns the number of
    /// groups the event was queued for.
    pub fn publish<E: Event>(&mut self, event: E) -> usize {
        let identity = identity_of::<E>();
        self.sequence = self.sequence.wrapping_add(1);
        let envelope = Arc::new(EventEnvelope::sequenced(event, self.sequence));

        let mut routed: usize = 0;
        for group in self.groups.values_mut() {
            if group.accepted.contains(&identity) {
                group.pending.push(Arc::clone(&envelope));
                routed = routed.saturating_add(1);
            }
        }

        trace!(
            event_type = envelope.event_name(),
            sequence = envelope.sequence(),
            routed,
            "Event published"
        );
        routed
    }

    /// Deliver every pending envelope of the group for `token`, in publish
    /// order, then empty its buffer.
    ///
    /// Each envelope goes to the first subscription, in registration order,
    /// that accepts it.
    ///
    /// A panicking handler propagates out of this call. The buffer is taken
    /// out of the group before delivery starts, so after the unwind the group
    /// is empty: envelopes not yet delivered in this pass are dropped, not
    /// kept for the next drain.
    ///
    /// # Errors
    ///
    /// Fails if the token is invalid or foreign, or has no group.
    pub fn drain(&mut self, token: SubscriberToken) -> HubResult<DrainReport> {
        let warn_on_unhandled = self.config.warn_on_unhandled;
        let group = self.group_mut(token)?;

        let mut pending = std::mem::take(&mut group.pending);
        let mut report = DrainReport::default();

        for envelope in &pending {
            let handled = group
                .subscriptions
                .iter_mut()
                .any(|sub| sub.try_invoke(envelope));

            if handled {
                report.delivered = report.delivered.saturating_add(1);
                trace!(
                    %token,
                    event_type = envelope.event_name(),
                    sequence = envelope.sequence(),
                    "Event delivered"
                );
            } else {
                report.unhandled = report.unhandled.saturating_add(1);
                if warn_on_unhandled {
                    warn!(
                        %token,
                        event_type = envelope.event_name(),
                        sequence = envelope.sequence(),
                        "No subscription accepted event"
                    );
                } else {
                    debug!(
                        %token,
                        event_type = envelope.event_name(),
                        sequence = envelope.sequence(),
                        "No subscription accepted event"
                    );
                }
            }
        }

        // Nothing can be queued for this group while it is borrowed here, so
        // the emptied vector can be handed back with its allocation intact.
        pending.clear();
        group.pending = pending;

        if !report.is_empty() {
            debug!(
                %token,
                delivered = report.delivered,
                unhandled = report.unhandled,
                "Subscriber group drained"
            );
        }
        Ok(report)
    }

    /// Number of envelopes waiting in the group for `token`.
    ///
    /// # Errors
    ///
    /// Fails if the token is invalid or foreign, or has no group.
    pub fn pending(&self, token: SubscriberToken) -> HubResult<usize> {
        self.group(token).map(|group| group.pending.len())
    }

    /// Number of subscriptions in the group for `token`.
    ///
    /// # Errors
    ///
    /// Fails if the token is invalid or foreign, or has no group.
    pub fn subscription_count(&self, token: SubscriberToken) -> HubResult<usize> {
        self.group(token).map(|group| group.subscriptions.len())
    }

    /// Whether the group for `token` currently accepts `E`.
    #[must_use]
    pub fn is_subscribed<E: Event>(&self, token: SubscriberToken) -> bool {
        self.groups
            .get(&token)
            .is_some_and(|group| group.accepted.contains(&identity_of::<E>()))
    }

    /// Number of groups created so far.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    fn check_token(&self, token: SubscriberToken) -> HubResult<()> {
        if !token.is_valid() {
            return Err(rejected(HubError::InvalidToken));
        }
        if token > self.last_token {
            return Err(rejected(HubError::UnissuedToken { token }));
        }
        Ok(())
    }

    fn group(&self, token: SubscriberToken) -> HubResult<&SubscriberGroup> {
        self.check_token(token)?;
        self.groups
            .get(&token)
            .ok_or_else(|| rejected(HubError::UnknownGroup { token }))
    }

    fn group_mut(&mut self, token: SubscriberToken) -> HubResult<&mut SubscriberGroup> {
        self.check_token(token)?;
        self.groups
            .get_mut(&token)
            .ok_or_else(|| rejected(HubError::UnknownGroup { token }))
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("group_count", &self.groups.len())
            .field("last_token", &self.last_token)
            .field("sequence", &self.sequence)
            .field("config", &self.config)
            .finish()
    }
}

fn rejected(err: HubError) -> HubError {
    warn!(error = %err, "Hub operation rejected");
    err
}
