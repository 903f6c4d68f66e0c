//! Event trait and the type-erased envelope that carries published events.

use std::any::{Any, type_name};
use std::fmt;

use chrono::{DateTime, Utc};

use crate::identity::{EventTypeId, TypeRegistry, identity_of};

/// A value that can be published through an [`EventHub`](crate::EventHub).
///
/// Opting in is a one-line marker impl:
///
/// ```rust
/// use tidings_events::Event;
///
/// struct UserLoggedIn {
///     user: String,
/// }
///
/// impl Event for UserLoggedIn {}
/// ```
///
/// Identities come from [`EventExt`], which every event gets through a
/// blanket impl and which cannot be implemented by hand.
pub trait Event: Any + Send + Sync {}

/// Identity accessors for every [`Event`].
///
/// ```rust
/// use tidings_events::{Event, EventExt, identity_of};
///
/// struct Flushed;
/// impl Event for Flushed {}
///
/// assert_eq!(Flushed::static_identity(), identity_of::<Flushed>());
/// assert_eq!(Flushed.type_identity(), Flushed::static_identity());
/// ```
pub trait EventExt: Event {
    /// Runtime identity of this event type.
    #[must_use]
    fn static_identity() -> EventTypeId
    where
        Self: Sized;

    /// Runtime identity of `self`'s type.
    #[must_use]
    fn type_identity(&self) -> EventTypeId;

    /// Type name of `self`, used in log output.
    #[must_use]
    fn event_name(&self) -> &'static str;
}

impl<T: Event> EventExt for T {
    fn static_identity() -> EventTypeId {
        identity_of::<T>()
    }

    fn type_identity(&self) -> EventTypeId {
        identity_of::<T>()
    }

    fn event_name(&self) -> &'static str {
        type_name::<T>()
    }
}

impl dyn Event {
    /// Runtime identity of the concrete type behind the trait object.
    #[must_use]
    pub fn type_identity(&self) -> EventTypeId {
        let any: &dyn Any = self;
        TypeRegistry::global().identity_of_type_id(any.type_id())
    }
}

/// A published event with its identity, stripped of its static type.
///
/// Envelopes are immutable once built. The hub shares one envelope between
/// every group buffer it is routed to.
pub struct EventEnvelope {
    identity: EventTypeId,
    event_name: &'static str,
    sequence: u64,
    published_at: DateTime<Utc>,
    payload: Box<dyn Event>,
}

impl EventEnvelope {
    /// Wrap an event outside of a hub (sequence number 0).
    #[must_use]
    pub fn new<E: Event>(event: E) -> Self {
        Self::sequenced(event, 0)
    }

    pub(crate) fn sequenced<E: Event>(event: E, sequence: u64) -> Self {
        Self {
            identity: identity_of::<E>(),
            event_name: type_name::<E>(),
            sequence,
            published_at: Utc::now(),
            payload: Box::new(event),
        }
    }

    /// Identity of the wrapped event's type.
    #[must_use]
    pub fn type_identity(&self) -> EventTypeId {
        self.identity
    }

    /// Type name of the wrapped event.
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        self.event_name
    }

    /// Position of this envelope in its hub's publish order.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// When the envelope was built.
    #[must_use]
    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    /// Whether the wrapped event is an `E`.
    #[must_use]
    pub fn is<E: Event>(&self) -> bool {
        self.identity == identity_of::<E>()
    }

    /// Borrow the wrapped event as `E` if the identities match.
    #[must_use]
    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        if !self.is::<E>() {
            return None;
        }
        let any: &dyn Any = self.payload.as_ref();
        any.downcast_ref::<E>()
    }
}

impl fmt::Debug for EventEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEnvelope")
            .field("identity", &self.identity)
            .field("event_name", &self.event_name)
            .field("sequence", &self.sequence)
            .field("published_at", &self.published_at)
            .finish_non_exhaustive()
    }
}
