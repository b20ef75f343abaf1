//! Stripe hosted-checkout redirect.
//!
//! Builds the hosted checkout URL for a session token and hands it to a
//! [`Navigator`]. Problems that Stripe.js would report at redirect time
//! (bad token, test/live mismatch) come back as `RedirectError` values.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::checkout::RedirectError;
use crate::domain::foundation::CheckoutSessionId;
use crate::ports::{Navigator, PaymentRedirect};

const SESSION_PREFIX: &str = "cs_";
const PUBLISHABLE_PREFIX: &str = "pk_";

/// Stripe client-side settings.
#[derive(Clone)]
pub struct StripeRedirectConfig {
    /// Publishable key (pk_live_... or pk_test_...).
    publishable_key: SecretString,

    /// Hosted checkout origin (default: https://checkout.stripe.com).
    checkout_base_url: Url,
}

impl StripeRedirectConfig {
    pub fn new(publishable_key: impl Into<String>, checkout_base_url: Url) -> Self {
        Self {
            publishable_key: SecretString::new(publishable_key.into()),
            checkout_base_url,
        }
    }

    fn is_test_key(&self) -> bool {
        self.publishable_key.expose_secret().starts_with("pk_test_")
    }
}

/// `PaymentRedirect` for Stripe hosted checkout.
pub struct StripeCheckoutRedirect {
    config: StripeRedirectConfig,
    navigator: Arc<dyn Navigator>,
}

impl StripeCheckoutRedirect {
    pub fn new(config: StripeRedirectConfig, navigator: Arc<dyn Navigator>) -> Self {
        Self { config, navigator }
    }

    /// Resolves the hosted checkout URL for `session_id`.
    pub fn checkout_url(&self, session_id: &CheckoutSessionId) -> Result<Url, RedirectError> {
        if !self
            .config
            .publishable_key
            .expose_secret()
            .starts_with(PUBLISHABLE_PREFIX)
        {
            return Err(RedirectError::new("Invalid publishable key")
                .with_code("invalid_publishable_key"));
        }

        let id = session_id.as_str();
        if !id.starts_with(SESSION_PREFIX) || id.contains('/') {
            return Err(RedirectError::new(format!(
                "Invalid checkout session id: {}",
                id
            ))
            .with_code("invalid_session_id"));
        }

        let session_is_test = id.starts_with("cs_test_");
        let session_is_live = id.starts_with("cs_live_");
        let key_is_test = self.config.is_test_key();
        if (session_is_test && !key_is_test) || (session_is_live && key_is_test) {
            return Err(RedirectError::new(
                "Checkout session and publishable key are from different modes",
            )
            .with_code("livemode_mismatch"));
        }

        self.config
            .checkout_base_url
            .join(&format!("c/pay/{}", id))
            .map_err(|e| RedirectError::new(e.to_string()).with_code("invalid_url"))
    }
}

#[async_trait]
impl PaymentRedirect for StripeCheckoutRedirect {
    async fn redirect_to_checkout(&self, session_id: &CheckoutSessionId) -> Option<RedirectError> {
        let url = match self.checkout_url(session_id) {
            Ok(url) => url,
            Err(err) => return Some(err),
        };
        tracing::info!(%session_id, "Redirecting to hosted checkout");
        self.navigator.navigate(&url).err()
    }
}
