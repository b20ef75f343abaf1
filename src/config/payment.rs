//! Payment configuration

use std::time::Duration;

use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::app::Environment;
use super::error::ValidationError;
use super::values::{parse_url, require};

/// Payment configuration (Stripe hosted checkout)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe publishable key
    pub stripe_publishable_key: SecretString,

    /// Origin serving the checkout-session endpoint
    #[serde(default = "default_checkout_endpoint")]
    pub checkout_endpoint: String,

    /// Path of the checkout-session endpoint on that origin
    #[serde(default = "default_checkout_path")]
    pub checkout_path: String,

    /// Base URL of the hosted checkout page
    #[serde(default = "default_checkout_base_url")]
    pub checkout_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_publishable_key
            .expose_secret()
            .starts_with("pk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_publishable_key
            .expose_secret()
            .starts_with("pk_live_")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Full URL of the checkout-session endpoint.
    pub fn checkout_session_url(&self, environment: Environment) -> Result<Url, ValidationError> {
        let base = parse_url(&self.checkout_endpoint, "CHECKOUT_ENDPOINT", environment)?;
        base.join(&self.checkout_path)
            .map_err(|_| ValidationError::InvalidUrl("CHECKOUT_PATH"))
    }

    pub fn hosted_checkout_url(&self, environment: Environment) -> Result<Url, ValidationError> {
        parse_url(&self.checkout_base_url, "CHECKOUT_BASE_URL", environment)
    }

    /// Validate payment configuration
    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        let key = self.stripe_publishable_key.expose_secret();
        require(key, "STRIPE_PUBLISHABLE_KEY")?;

        // Only the publishable key belongs on the client
        if !key.starts_with("pk_") {
            return Err(ValidationError::InvalidPublishableKey);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }

        self.checkout_session_url(environment)?;
        self.hosted_checkout_url(environment)?;
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_publishable_key: SecretString::new(String::new()),
            checkout_endpoint: default_checkout_endpoint(),
            checkout_path: default_checkout_path(),
            checkout_base_url: default_checkout_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_checkout_endpoint() -> String {
    "http://localhost:3000".to_string()
}

fn default_checkout_path() -> String {
    "/api/create-payment".to_string()
}

fn default_checkout_base_url() -> String {
    "https://checkout.stripe.com".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
