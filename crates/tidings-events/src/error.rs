//! Hub error types.

use thiserror::Error;

use crate::hub::SubscriberToken;

/// Misuse of an [`EventHub`](crate::EventHub).
///
/// Every variant is a caller bug rather than a runtime condition; the hub
/// state is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    /// The sentinel token was passed where a live token is required.
    #[error("invalid subscriber token")]
    InvalidToken,

    /// The token was never issued by this hub.
    #[error("{token} was not issued by this hub")]
    UnissuedToken {
        /// The offending token.
        token: SubscriberToken,
    },

    /// Nothing has been registered against the token yet.
    #[error("no subscriber group for {token}")]
    UnknownGroup {
        /// The token without a group.
        token: SubscriberToken,
    },

    /// The group already handles this event type.
    #[error("{token} already subscribes to {event}")]
    DuplicateSubscription {
        /// The group's token.
        token: SubscriberToken,
        /// Type name of the event.
        event: &'static str,
    },

    /// The group has no subscription for this event type.
    #[error("{token} has no subscription for {event}")]
    SubscriptionNotFound {
        /// The group's token.
        token: SubscriberToken,
        /// Type name of the event.
        event: &'static str,
    },
}

/// Result type for hub operations.
pub type HubResult<T> = Result<T, HubError>;
