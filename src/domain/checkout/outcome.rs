//! Result of one `initiate` call as seen by the presentation layer.

use crate::domain::foundation::{CheckoutSessionId, PriceId};

use super::CheckoutError;

/// How an `initiate` call ended. Never an `Err`: failures are values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Token obtained and handed to the payment redirect without error.
    Redirected { session_id: CheckoutSessionId },

    /// The attempt ran and failed; the slot is back to `Idle`.
    Failed(CheckoutError),

    /// Another attempt was in flight; nothing was requested.
    Ignored { active: PriceId },
}

impl CheckoutOutcome {
    pub fn is_redirected(&self) -> bool {
        matches!(self, CheckoutOutcome::Redirected { .. })
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, CheckoutOutcome::Ignored { .. })
    }

    pub fn error(&self) -> Option<&CheckoutError> {
        match self {
            CheckoutOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}
