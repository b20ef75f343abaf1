//! Mock identity provider for testing.
//!
//! Implements `IdentityProvider` without a network. Supports:
//! - a configurable current identity
//! - error injection for the initial query
//! - holding the initial query open until released (race tests)
//! - emitting arbitrary session changes to registered listeners
//!
//! # Example
//!
//! ```ignore
//! let provider = Arc::new(MockIdentityProvider::new().with_identity(identity));
//! let gate = provider.hold_queries();
//!
//! let tracker = SessionTracker::mount(provider.clone());
//! provider.emit(SessionChange::signed_out());
//! gate.release();
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::adapters::Gate;
use crate::domain::foundation::{AuthError, Identity};
use crate::domain::session::SessionChange;
use crate::ports::{IdentityProvider, SessionChangeHandler, Subscription};

use super::ListenerRegistry;

/// Mock identity provider for testing.
#[derive(Default)]
pub struct MockIdentityProvider {
    identity: RwLock<Option<Identity>>,
    force_error: RwLock<Option<AuthError>>,
    gate: RwLock<Option<Gate>>,
    listeners: ListenerRegistry,
    queries: AtomicUsize,
    sign_outs: AtomicUsize,
}

impl MockIdentityProvider {
    /// Creates a provider with no active session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identity the initial query reports.
    pub fn with_identity(self, identity: Identity) -> Self {
        *self.identity.write().unwrap() = Some(identity);
        self
    }

    /// Forces the initial query to fail.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Holds every following query until the returned gate is released.
    ///
    /// The query captures its answer when called, so a release after an
    /// `emit` returns the pre-change identity.
    pub fn hold_queries(&self) -> Gate {
        let gate = Gate::new();
        *self.gate.write().unwrap() = Some(gate.clone());
        gate
    }

    /// Replaces the current identity without notifying listeners.
    pub fn set_identity(&self, identity: Option<Identity>) {
        *self.identity.write().unwrap() = identity;
    }

    /// Updates the current identity and notifies every listener.
    pub fn emit(&self, change: SessionChange) -> usize {
        self.set_identity(change.identity.clone());
        self.listeners.emit(change)
    }

    /// Number of live listener registrations.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of `current_identity` calls so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Number of `sign_out` calls so far.
    pub fn sign_out_count(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn current_identity(&self) -> Result<Option<Identity>, AuthError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let answer = match self.force_error.read().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(self.identity.read().unwrap().clone()),
        };

        let gate = self.gate.read().unwrap().clone();
        if let Some(gate) = gate {
            gate.wait().await;
        }
        answer
    }

    fn on_session_change(&self, handler: SessionChangeHandler) -> Subscription {
        self.listeners.register(handler)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        self.emit(SessionChange::signed_out());
        Ok(())
    }
}
