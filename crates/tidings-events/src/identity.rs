//! Runtime identities for event types.
//!
//! Every distinct event type receives a small integer [`EventTypeId`] the
//! first time it is referenced. Identities are handed out by a monotonic
//! counter and memoized per [`TypeId`], so the same type always maps to the
//! same identity for the lifetime of the registry.

use std::any::{TypeId, type_name};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashMap;
use tracing::trace;

/// Runtime identity of an event type.
///
/// Ordered and comparable. [`EventTypeId::INVALID`] is never assigned to a
/// real type and compares less than every issued identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventTypeId(u32);

impl EventTypeId {
    /// Sentinel identity that no event type ever receives.
    pub const INVALID: Self = Self(0);

    /// Whether this identity was issued by a registry.
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

impl Default for EventTypeId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for EventTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event-type:{}", self.0)
    }
}

static GLOBAL: LazyLock<TypeRegistry> = LazyLock::new(TypeRegistry::new);

/// Memo of [`TypeId`] to [`EventTypeId`] assignments.
///
/// Most code uses the process-wide instance through [`identity_of`]. Separate
/// instances are independent and number their types from 1.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    ids: DashMap<TypeId, EventTypeId>,
    sequence: AtomicU32,
}

impl TypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ids: DashMap::new(),
            sequence: AtomicU32::new(EventTypeId::INVALID.0),
        }
    }

    /// The process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Identity of `T`, assigning the next one on first use.
    ///
    /// # Panics
    ///
    /// Panics if `u32::MAX` distinct types have already been registered.
    pub fn identity_of<T: ?Sized + 'static>(&self) -> EventTypeId {
        self.resolve(TypeId::of::<T>(), type_name::<T>())
    }

    /// Identity of the type behind `type_id`, assigning the next one on
    /// first use.
    ///
    /// Shares the memo with [`identity_of`](Self::identity_of), so a type
    /// reached through either path gets the same identity.
    ///
    /// # Panics
    ///
    /// Panics if `u32::MAX` distinct types have already been registered.
    pub fn identity_of_type_id(&self, type_id: TypeId) -> EventTypeId {
        self.resolve(type_id, "<erased>")
    }

    /// Eagerly assign an identity to `T`.
    ///
    /// Equivalent to [`identity_of`](Self::identity_of); calling it for each
    /// event type at startup pins the numbering to registration order.
    pub fn register<T: ?Sized + 'static>(&self) -> EventTypeId {
        self.identity_of::<T>()
    }

    /// Identity of `T` if one has already been assigned.
    #[must_use]
    pub fn lookup<T: ?Sized + 'static>(&self) -> Option<EventTypeId> {
        self.ids.get(&TypeId::of::<T>()).map(|id| *id)
    }

    /// Number of types that have been assigned an identity.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no type has been assigned an identity yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn resolve(&self, key: TypeId, name: &'static str) -> EventTypeId {
        if let Some(id) = self.ids.get(&key) {
            return *id;
        }

        // The entry holds the shard lock, so two threads racing on the same
        // type still agree on one identity.
        *self.ids.entry(key).or_insert_with(|| {
            let id = self.next_id();
            trace!(event_type = name, ?key, %id, "Assigned event type identity");
            id
        })
    }

    fn next_id(&self) -> EventTypeId {
        let previous = self
            .sequence
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
            .unwrap_or_else(|_| panic!("event type identity space exhausted"));
        EventTypeId(previous.wrapping_add(1))
    }
}

/// Identity of `T` in the process-wide registry.
///
/// Always returns the same value for the same `T`, never returns
/// [`EventTypeId::INVALID`], and never returns the same value for two
/// different types.
#[must_use]
pub fn identity_of<T: ?Sized + 'static>() -> EventTypeId {
    TypeRegistry::global().identity_of::<T>()
}
