//! Type-erased subscriptions.
//!
//! A [`Subscription`] pairs one accepted event type with a handler. The hub
//! stores subscriptions as trait objects and offers each buffered envelope to
//! them in turn; a subscription only runs its handler when the envelope's
//! identity matches its own.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use crate::envelope::{Event, EventEnvelope};
use crate::identity::{EventTypeId, identity_of};

/// A handler for one event type that can be stored without its static type.
pub trait Subscription: Send {
    /// Identity of the event type this subscription handles.
    fn accepts_identity(&self) -> EventTypeId;

    /// Type name of the handled event, for diagnostics.
    fn event_name(&self) -> &'static str;

    /// Run the handler if `envelope` carries the accepted type.
    ///
    /// Returns `false` without side effects on an identity mismatch, `true`
    /// after the handler ran.
    fn try_invoke(&mut self, envelope: &EventEnvelope) -> bool;
}

/// [`Subscription`] backed by a closure over `&E`.
pub struct HandlerSubscription<E, F> {
    identity: EventTypeId,
    handler: F,
    _event: PhantomData<fn(&E)>,
}

impl<E, F> HandlerSubscription<E, F>
where
    E: Event,
    F: FnMut(&E) + Send,
{
    /// Wrap `handler` as a subscription for `E`.
    pub fn new(handler: F) -> Self {
        Self {
            identity: identity_of::<E>(),
            handler,
            _event: PhantomData,
        }
    }
}

impl<E, F> Subscription for HandlerSubscription<E, F>
where
    E: Event,
    F: FnMut(&E) + Send,
{
    fn accepts_identity(&self) -> EventTypeId {
        self.identity
    }

    fn event_name(&self) -> &'static str {
        type_name::<E>()
    }

    fn try_invoke(&mut self, envelope: &EventEnvelope) -> bool {
        if envelope.type_identity() != self.identity {
            return false;
        }
        let Some(event) = envelope.downcast_ref::<E>() else {
            return false;
        };
        (self.handler)(event);
        true
    }
}

impl<E, F> fmt::Debug for HandlerSubscription<E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerSubscription")
            .field("event", &type_name::<E>())
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Tick(u32);
    impl Event for Tick {}

    struct Tock;
    impl Event for Tock {}

    #[test]
    fn test_accepts_identity_matches_event() {
        let sub = HandlerSubscription::new(|_: &Tick| {});
        assert_eq!(sub.accepts_identity(), identity_of::<Tick>());
        assert!(sub.event_name().ends_with("Tick"));
    }

    #[test]
    fn test_try_invoke_matching() {
        let seen = Arc::new(AtomicU32::new(0));
        let seen_clone = Arc::clone(&seen);
        let mut sub = HandlerSubscription::new(move |tick: &Tick| {
            seen_clone.store(tick.0, Ordering::SeqCst);
        });

        assert!(sub.try_invoke(&EventEnvelope::new(Tick(5))));
        assert_eq!(seen.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_try_invoke_mismatch_skips_handler() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);
        let mut sub = HandlerSubscription::new(move |_: &Tick| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!sub.try_invoke(&EventEnvelope::new(Tock)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_boxed_subscriptions_pick_their_type() {
        let ticks = Arc::new(AtomicU32::new(0));
        let tocks = Arc::new(AtomicU32::new(0));
        let ticks_clone = Arc::clone(&ticks);
        let tocks_clone = Arc::clone(&tocks);

        let mut subs: Vec<Box<dyn Subscription>> = vec![
            Box::new(HandlerSubscription::new(move |_: &Tick| {
                ticks_clone.fetch_add(1, Ordering::SeqCst);
            })),
            Box::new(HandlerSubscription::new(move |_: &Tock| {
                tocks_clone.fetch_add(1, Ordering::SeqCst);
            })),
        ];

        let envelope = EventEnvelope::new(Tock);
        let handled = subs.iter_mut().any(|sub| sub.try_invoke(&envelope));

        assert!(handled);
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
        assert_eq!(tocks.load(Ordering::SeqCst), 1);
    }
}
