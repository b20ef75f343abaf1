//! Session-change notifications delivered by the identity provider.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Identity, Timestamp};

/// Kind of session change reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    /// First notification after a listener registers.
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

impl fmt::Display for AuthEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuthEvent::InitialSession => "INITIAL_SESSION",
            AuthEvent::SignedIn => "SIGNED_IN",
            AuthEvent::SignedOut => "SIGNED_OUT",
            AuthEvent::TokenRefreshed => "TOKEN_REFRESHED",
            AuthEvent::UserUpdated => "USER_UPDATED",
        };
        write!(f, "{}", s)
    }
}

/// One notification from the provider's session-change stream.
///
/// `identity` is the provider's view of the session *after* the change;
/// `None` means there is no active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionChange {
    pub event: AuthEvent,
    pub identity: Option<Identity>,
    pub occurred_at: Timestamp,
}

impl SessionChange {
    pub fn new(event: AuthEvent, identity: Option<Identity>) -> Self {
        Self {
            event,
            identity,
            occurred_at: Timestamp::now(),
        }
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self::new(AuthEvent::SignedIn, Some(identity))
    }

    pub fn signed_out() -> Self {
        Self::new(AuthEvent::SignedOut, None)
    }

    pub fn token_refreshed(identity: Identity) -> Self {
        Self::new(AuthEvent::TokenRefreshed, Some(identity))
    }
}
