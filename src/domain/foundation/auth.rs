//! Identity types for the domain layer.
//!
//! These types describe a signed-in principal as reported by the hosted
//! auth provider. They have **no provider dependencies** - the Supabase
//! adapter (or any other `IdentityProvider`) populates them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::UserId;

/// A signed-in principal: opaque id plus contact attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The unique user identifier from the auth provider.
    pub id: UserId,

    /// Contact email, if the provider exposes one.
    pub email: Option<String>,

    /// Display name if available.
    pub display_name: Option<String>,
}

impl Identity {
    /// Creates a new identity with an email and no display name.
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: Some(email.into()),
            display_name: None,
        }
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Returns the display name, falling back to email, then to the id.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or_else(|| self.id.as_str())
    }
}

/// Failures talking to the identity provider.
///
/// None of these reach the presentation layer: the session tracker treats
/// every one of them as "no identity".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The access token was rejected.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The provider could not be reached or answered with a server error.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The provider answered with a body we could not understand.
    #[error("Malformed auth response: {0}")]
    MalformedResponse(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_id() -> UserId {
        UserId::new("user-123").unwrap()
    }

    #[test]
    fn display_name_wins_over_email() {
        let identity = Identity::new(user_id(), "a@b.com").with_display_name("Alice");
        assert_eq!(identity.display_name_or_email(), "Alice");
    }

    #[test]
    fn email_is_used_without_display_name() {
        let identity = Identity::new(user_id(), "a@b.com");
        assert_eq!(identity.display_name_or_email(), "a@b.com");
    }

    #[test]
    fn id_is_last_resort() {
        let identity = Identity {
            id: user_id(),
            email: None,
            display_name: None,
        };
        assert_eq!(identity.display_name_or_email(), "user-123");
    }

    #[test]
    fn service_unavailable_is_transient() {
        assert!(AuthError::service_unavailable("timeout").is_transient());
        assert!(!AuthError::InvalidToken.is_transient());
        assert!(!AuthError::MalformedResponse("x".into()).is_transient());
    }

    #[test]
    fn service_unavailable_displays_message() {
        let err = AuthError::service_unavailable("Connection refused");
        assert_eq!(err.to_string(), "Auth service unavailable: Connection refused");
    }
}
