//! Checkout attempt - which plan, if any, is mid-flight.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{PriceId, StateMachine, ValidationError};

/// Phase of the checkout flow as seen from one plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    #[default]
    Idle,
    /// Waiting on the backend for a checkout session token.
    Pending,
    /// Token received; handing it to the payment redirect.
    Redirecting,
}

impl StateMachine for CheckoutPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CheckoutPhase::*;
        matches!(
            (self, target),
            (Idle, Pending) | (Pending, Redirecting) | (Pending, Idle) | (Redirecting, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CheckoutPhase::*;
        match self {
            Idle => vec![Pending],
            Pending => vec![Redirecting, Idle],
            Redirecting => vec![Idle],
        }
    }
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckoutPhase::Idle => "Idle",
            CheckoutPhase::Pending => "Pending",
            CheckoutPhase::Redirecting => "Redirecting",
        };
        write!(f, "{}", s)
    }
}

/// Process-wide checkout slot. At most one plan is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", content = "price_id", rename_all = "snake_case")]
pub enum CheckoutAttempt {
    #[default]
    Idle,
    Pending(PriceId),
    Redirecting(PriceId),
}

impl CheckoutAttempt {
    /// The plan currently blocking new attempts.
    pub fn active_price_id(&self) -> Option<&PriceId> {
        match self {
            CheckoutAttempt::Idle => None,
            CheckoutAttempt::Pending(id) | CheckoutAttempt::Redirecting(id) => Some(id),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, CheckoutAttempt::Idle)
    }

    pub fn phase(&self) -> CheckoutPhase {
        match self {
            CheckoutAttempt::Idle => CheckoutPhase::Idle,
            CheckoutAttempt::Pending(_) => CheckoutPhase::Pending,
            CheckoutAttempt::Redirecting(_) => CheckoutPhase::Redirecting,
        }
    }

    /// Phase for a specific plan; every plan but the active one is `Idle`.
    pub fn phase_of(&self, price_id: &PriceId) -> CheckoutPhase {
        match self.active_price_id() {
            Some(active) if active == price_id => self.phase(),
            _ => CheckoutPhase::Idle,
        }
    }

    /// Claims the slot for `price_id`.
    ///
    /// Fails with the blocking price id when another attempt is in flight;
    /// the slot is left untouched in that case.
    pub fn begin(&mut self, price_id: PriceId) -> Result<(), PriceId> {
        if let Some(active) = self.active_price_id() {
            return Err(active.clone());
        }
        *self = CheckoutAttempt::Pending(price_id);
        Ok(())
    }

    /// Moves the pending attempt for `price_id` to `Redirecting`.
    pub fn mark_redirecting(&mut self, price_id: &PriceId) -> Result<(), ValidationError> {
        let pending_for_plan =
            matches!(&*self, CheckoutAttempt::Pending(active) if active == price_id);
        if !pending_for_plan {
            return Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot mark {} redirecting while {:?}", price_id, self),
            ));
        }
        self.phase().transition_to(CheckoutPhase::Redirecting)?;
        *self = CheckoutAttempt::Redirecting(price_id.clone());
        Ok(())
    }

    /// Returns the slot to `Idle` unconditionally.
    pub fn clear(&mut self) {
        *self = CheckoutAttempt::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(id: &str) -> PriceId {
        PriceId::new(id).unwrap()
    }

    #[test]
    fn begin_claims_idle_slot() {
        let mut attempt = CheckoutAttempt::Idle;
        assert!(attempt.begin(price("price_pro_monthly")).is_ok());
        assert_eq!(attempt, CheckoutAttempt::Pending(price("price_pro_monthly")));
    }

    #[test]
    fn begin_reports_blocking_plan() {
        let mut attempt = CheckoutAttempt::Redirecting(price("price_pro_monthly"));
        let blocked = attempt.begin(price("price_starter_monthly")).unwrap_err();
        assert_eq!(blocked, price("price_pro_monthly"));
        assert_eq!(
            attempt,
            CheckoutAttempt::Redirecting(price("price_pro_monthly"))
        );
    }

    #[test]
    fn begin_twice_for_same_plan_is_rejected() {
        let mut attempt = CheckoutAttempt::Idle;
        attempt.begin(price("price_pro_monthly")).unwrap();
        assert!(attempt.begin(price("price_pro_monthly")).is_err());
    }

    #[test]
    fn phase_of_other_plans_is_idle() {
        let attempt = CheckoutAttempt::Pending(price("price_pro_monthly"));
        assert_eq!(
            attempt.phase_of(&price("price_pro_monthly")),
            CheckoutPhase::Pending
        );
        assert_eq!(
            attempt.phase_of(&price("price_starter_monthly")),
            CheckoutPhase::Idle
        );
    }

    #[test]
    fn mark_redirecting_requires_matching_pending_plan() {
        let mut attempt = CheckoutAttempt::Pending(price("price_pro_monthly"));
        assert!(attempt.mark_redirecting(&price("price_starter_monthly")).is_err());
        assert!(attempt.mark_redirecting(&price("price_pro_monthly")).is_ok());
        assert_eq!(attempt.phase(), CheckoutPhase::Redirecting);
        assert!(attempt.mark_redirecting(&price("price_pro_monthly")).is_err());
    }

    #[test]
    fn clear_always_returns_to_idle() {
        let mut attempt = CheckoutAttempt::Redirecting(price("price_pro_monthly"));
        attempt.clear();
        assert!(attempt.is_idle());
        assert!(attempt.active_price_id().is_none());
    }

    #[test]
    fn phase_machine_never_skips_pending() {
        assert!(!CheckoutPhase::Idle.can_transition_to(&CheckoutPhase::Redirecting));
        assert!(CheckoutPhase::Redirecting.can_transition_to(&CheckoutPhase::Idle));
        assert!(CheckoutPhase::Pending.can_transition_to(&CheckoutPhase::Idle));
    }

    #[test]
    fn attempt_serializes_with_phase_tag() {
        let attempt = CheckoutAttempt::Pending(price("price_pro_monthly"));
        assert_eq!(
            serde_json::to_value(&attempt).unwrap(),
            serde_json::json!({"phase": "pending", "price_id": "price_pro_monthly"})
        );
    }
}
