//! Checkout session gateway port - the backend token endpoint.
//!
//! The backend owns the payment provider's secret key. The client sends it
//! a price id and receives an opaque checkout session token in return.

use async_trait::async_trait;

use crate::domain::checkout::CheckoutError;
use crate::domain::foundation::{CheckoutSessionId, PriceId};

/// Requests checkout session tokens from the backend.
///
/// # Contract
///
/// Implementations must map transport failures, non-success statuses and
/// unusable bodies to `CheckoutError` rather than panicking.
#[async_trait]
pub trait CheckoutSessionGateway: Send + Sync {
    /// Creates a checkout session for the plan behind `price_id`.
    async fn create_checkout_session(
        &self,
        price_id: &PriceId,
    ) -> Result<CheckoutSessionId, CheckoutError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_session_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn CheckoutSessionGateway) {}
    }
}
