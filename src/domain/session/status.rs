//! SessionStatus enum for tracking whether a visitor is signed in.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Client-observable authentication status.
///
/// `Loading` only exists before the first session check completes; after
/// that the status moves between `Anonymous` and `Authenticated` until
/// teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Loading,
    Anonymous,
    Authenticated,
}

impl SessionStatus {
    /// Returns true until the first session check has resolved.
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionStatus::Loading)
    }

    /// Returns the status implied by the presence of an identity.
    pub fn for_identity_present(present: bool) -> Self {
        if present {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        // Self-loops cover token refreshes and repeated sign-out notices.
        matches!(
            (self, target),
            (Loading, Anonymous)
                | (Loading, Authenticated)
                | (Anonymous, Anonymous)
                | (Anonymous, Authenticated)
                | (Authenticated, Anonymous)
                | (Authenticated, Authenticated)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            Loading | Anonymous | Authenticated => vec![Anonymous, Authenticated],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Loading => "Loading",
            SessionStatus::Anonymous => "Anonymous",
            SessionStatus::Authenticated => "Authenticated",
        };
        write!(f, "{}", s)
    }
}
