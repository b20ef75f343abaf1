//! Session - the local view of whether an identity is currently active.

use serde::Serialize;

use crate::domain::foundation::{Identity, StateMachine};

use super::SessionStatus;

/// Process-local session slot.
///
/// Invariant: `identity.is_some()` exactly when `status == Authenticated`.
/// Serialize-only: a session is only ever built through `apply_identity`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Session {
    identity: Option<Identity>,
    status: SessionStatus,
}

impl Session {
    /// A session that has not been checked yet.
    pub fn loading() -> Self {
        Self::default()
    }

    /// A resolved session for the given identity (or lack of one).
    pub fn resolved(identity: Option<Identity>) -> Self {
        let mut session = Self::loading();
        session.apply_identity(identity);
        session
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    /// Overwrites the slot with the latest known identity.
    ///
    /// Last write wins: no history is merged. Returns the new status.
    pub fn apply_identity(&mut self, identity: Option<Identity>) -> SessionStatus {
        let next = SessionStatus::for_identity_present(identity.is_some());
        debug_assert!(self.status.can_transition_to(&next));
        self.identity = identity;
        self.status = next;
        next
    }
}
