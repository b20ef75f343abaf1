//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SIGNAL_STARTER` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use signal_starter::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Checkout endpoint: {}", config.payment.checkout_endpoint);
//! ```

mod app;
mod auth;
mod error;
mod payment;
mod values;

pub use app::{AppSettings, Environment};
pub use auth::AuthConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Environment and log level
    #[serde(default)]
    pub app: AppSettings,

    /// Identity provider configuration (Supabase)
    pub auth: AuthConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SIGNAL_STARTER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SIGNAL_STARTER__APP__ENVIRONMENT=production` -> `app.environment`
    /// - `SIGNAL_STARTER__AUTH__SUPABASE_URL=...` -> `auth.supabase_url`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SIGNAL_STARTER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Rejects missing keys, template placeholders, secret keys where a
    /// publishable key belongs and plain-HTTP URLs in production.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.app.validate()?;
        self.auth.validate(self.app.environment)?;
        self.payment.validate(self.app.environment)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.app.is_production()
    }
}
