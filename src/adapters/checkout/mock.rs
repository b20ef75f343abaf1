//! Mock checkout adapters for testing.
//!
//! - `MockCheckoutGateway` - scripted token responses, call log, optional hold
//! - `MockPaymentRedirect` - scripted redirect errors, call log

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::adapters::Gate;
use crate::domain::checkout::{CheckoutError, RedirectError};
use crate::domain::foundation::{CheckoutSessionId, PriceId};
use crate::ports::{CheckoutSessionGateway, PaymentRedirect};

const DEFAULT_SESSION_ID: &str = "cs_test_mock";

#[derive(Default)]
struct GatewayState {
    responses: VecDeque<Result<CheckoutSessionId, CheckoutError>>,
    calls: Vec<PriceId>,
    gate: Option<Gate>,
}

/// Mock backend token endpoint.
///
/// Pops one scripted response per call; once the script is empty every
/// call succeeds with `cs_test_mock`.
#[derive(Default)]
pub struct MockCheckoutGateway {
    state: Mutex<GatewayState>,
}

impl MockCheckoutGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    pub fn with_session(self, session_id: &str) -> Self {
        let response = CheckoutSessionId::new(session_id)
            .map_err(|e| CheckoutError::malformed(e.to_string()));
        self.push(response);
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: CheckoutError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, response: Result<CheckoutSessionId, CheckoutError>) {
        self.state.lock().unwrap().responses.push_back(response);
    }

    /// Holds every following request until the returned gate is released.
    pub fn hold_requests(&self) -> Gate {
        let gate = Gate::new();
        self.state.lock().unwrap().gate = Some(gate.clone());
        gate
    }

    /// Price ids requested so far, in call order.
    pub fn calls(&self) -> Vec<PriceId> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }
}

#[async_trait]
impl CheckoutSessionGateway for MockCheckoutGateway {
    async fn create_checkout_session(
        &self,
        price_id: &PriceId,
    ) -> Result<CheckoutSessionId, CheckoutError> {
        let (response, gate) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(price_id.clone());
            let response = state.responses.pop_front().unwrap_or_else(|| {
                CheckoutSessionId::new(DEFAULT_SESSION_ID)
                    .map_err(|e| CheckoutError::malformed(e.to_string()))
            });
            (response, state.gate.clone())
        };

        if let Some(gate) = gate {
            gate.wait().await;
        }
        response
    }
}

#[derive(Default)]
struct RedirectState {
    errors: VecDeque<Option<RedirectError>>,
    calls: Vec<CheckoutSessionId>,
    gate: Option<Gate>,
}

/// Mock payment redirect.
///
/// Pops one scripted result per call; an empty script means success.
#[derive(Default)]
pub struct MockPaymentRedirect {
    state: Mutex<RedirectState>,
}

impl MockPaymentRedirect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a redirect that reports `error`.
    pub fn with_error(self, error: RedirectError) -> Self {
        self.state.lock().unwrap().errors.push_back(Some(error));
        self
    }

    /// Holds every following redirect until the returned gate is released.
    pub fn hold_redirects(&self) -> Gate {
        let gate = Gate::new();
        self.state.lock().unwrap().gate = Some(gate.clone());
        gate
    }

    /// Session ids redirected to so far.
    pub fn calls(&self) -> Vec<CheckoutSessionId> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }
}

#[async_trait]
impl PaymentRedirect for MockPaymentRedirect {
    async fn redirect_to_checkout(&self, session_id: &CheckoutSessionId) -> Option<RedirectError> {
        let (result, gate) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(session_id.clone());
            (state.errors.pop_front().flatten(), state.gate.clone())
        };

        if let Some(gate) = gate {
            gate.wait().await;
        }
        result
    }
}
