//! Event fixtures.

use tidings_events::Event;

/// Event carrying an integer payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventA(pub u32);

impl Event for EventA {}

/// Event carrying a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventB(pub bool);

impl Event for EventB {}

/// Event with a heap-allocated payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Short label.
    pub label: String,
}

impl Notice {
    /// Create a notice with the given label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Event for Notice {}

/// Event that no fixture group subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unrouted;

impl Event for Unrouted {}
