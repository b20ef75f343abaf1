//! Identity provider port - the hosted auth service as seen by the client.
//!
//! Two capabilities are needed:
//!
//! - a one-shot "who is the current identity" query, and
//! - a persistent session-change stream (sign-in, sign-out, token refresh).
//!
//! The stream is exposed as `on_session_change(handler) -> Subscription`.
//! The returned [`Subscription`] releases the registration exactly once,
//! either through [`Subscription::cancel`] or when it is dropped.
//!
//! # Example
//!
//! ```ignore
//! let subscription = provider.on_session_change(Arc::new(|change| {
//!     tracing::info!(event = %change.event, "session changed");
//! }));
//! let identity = provider.current_identity().await?;
//! subscription.cancel();
//! ```

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::domain::foundation::{AuthError, Identity};
use crate::domain::session::SessionChange;

/// Callback invoked for every session-change notification.
pub type SessionChangeHandler = Arc<dyn Fn(SessionChange) + Send + Sync>;

/// Handle to a listener registration.
///
/// The release closure runs at most once: on `cancel()` or on drop,
/// whichever comes first.
#[must_use = "dropping a Subscription immediately unregisters the listener"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release.
    pub fn detached() -> Self {
        Self { release: None }
    }

    /// Stops delivery to the registered handler.
    pub fn cancel(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Hosted identity provider capability.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(None)` when there is no session (not an error)
/// - Deliver every later session change to each registered handler
/// - Stop delivering to a handler once its `Subscription` is released
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Asks the provider for the identity behind the current session.
    async fn current_identity(&self) -> Result<Option<Identity>, AuthError>;

    /// Registers a persistent session-change listener.
    fn on_session_change(&self, handler: SessionChangeHandler) -> Subscription;

    /// Ends the current session. Listeners receive `SignedOut`.
    async fn sign_out(&self) -> Result<(), AuthError>;
}
