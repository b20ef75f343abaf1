//! Checkout error taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::PriceId;

/// Error reported by the payment redirect boundary.
///
/// This is a value, not a fault: the redirect returns it instead of
/// panicking when, for example, the session token is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct RedirectError {
    /// Provider error code, if it supplied one.
    pub code: Option<String>,
    pub message: String,
}

impl RedirectError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Why a checkout attempt ended without reaching the payment page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Transport failure reaching the token endpoint.
    #[error("Checkout request failed: {0}")]
    Network(String),

    /// Token endpoint answered with a non-success status.
    #[error("Checkout endpoint returned HTTP {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Token endpoint answered 2xx with a body we could not use.
    #[error("Malformed checkout response: {0}")]
    MalformedResponse(String),

    /// The payment redirect reported an error.
    #[error("Redirect to checkout failed: {0}")]
    Redirect(#[from] RedirectError),

    /// The price id is not in the catalog.
    #[error("Unknown plan: {0}")]
    UnknownPlan(PriceId),
}

impl CheckoutError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Returns true if retrying the same plan may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            CheckoutError::Network(_) => true,
            CheckoutError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            CheckoutError::MalformedResponse(_) | CheckoutError::Redirect(_) => true,
            CheckoutError::UnknownPlan(_) => false,
        }
    }

    /// Short machine-readable category for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckoutError::Network(_) => "network",
            CheckoutError::HttpStatus { .. } => "http_status",
            CheckoutError::MalformedResponse(_) => "malformed_response",
            CheckoutError::Redirect(_) => "redirect",
            CheckoutError::UnknownPlan(_) => "unknown_plan",
        }
    }
}
