//! Authentication configuration

use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::app::Environment;
use super::error::ValidationError;
use super::values::{parse_url, require};

/// Authentication configuration (Supabase)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Supabase project URL
    pub supabase_url: String,

    /// Supabase anon (public) key
    pub supabase_anon_key: SecretString,
}

impl AuthConfig {
    /// Parsed project URL.
    pub fn project_url(&self, environment: Environment) -> Result<Url, ValidationError> {
        parse_url(&self.supabase_url, "SUPABASE_URL", environment)
    }

    /// Validate authentication configuration
    ///
    /// In production, requires HTTPS for the project URL.
    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        self.project_url(environment)?;
        require(self.supabase_anon_key.expose_secret(), "SUPABASE_ANON_KEY")?;
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: SecretString::new(String::new()),
        }
    }
}
