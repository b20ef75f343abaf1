//! Pure derivation of a plan's subscribe control.

use crate::domain::foundation::PriceId;

use super::{CheckoutAttempt, CheckoutPhase, Plan};

/// Rendering state of one plan's subscribe button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanControl {
    pub price_id: PriceId,
    pub label: String,
    /// True while any attempt is in flight.
    pub disabled: bool,
    /// True only for the plan that is in flight.
    pub loading: bool,
}

impl PlanControl {
    pub const LOADING_LABEL: &'static str = "Loading...";

    pub fn derive(plan: &Plan, attempt: &CheckoutAttempt) -> Self {
        let loading = attempt.phase_of(&plan.price_id) != CheckoutPhase::Idle;
        let label = if loading {
            Self::LOADING_LABEL.to_string()
        } else {
            plan.subscribe_label()
        };
        Self {
            price_id: plan.price_id.clone(),
            label,
            disabled: !attempt.is_idle(),
            loading,
        }
    }
}
