//! Shared checks for raw configuration values

use reqwest::Url;

use super::app::Environment;
use super::error::ValidationError;

/// True for template values such as `your_supabase_url` or `pk_test_...`.
pub(crate) fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.to_ascii_lowercase().starts_with("your_") || value.contains("...")
}

/// Rejects empty and placeholder values.
pub(crate) fn require(value: &str, name: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingRequired(name));
    }
    if is_placeholder(value) {
        return Err(ValidationError::Placeholder(name));
    }
    Ok(())
}

/// Parses an http(s) URL, requiring HTTPS in production.
pub(crate) fn parse_url(
    value: &str,
    name: &'static str,
    environment: Environment,
) -> Result<Url, ValidationError> {
    require(value, name)?;
    let url = Url::parse(value.trim()).map_err(|_| ValidationError::InvalidUrl(name))?;
    match url.scheme() {
        "https" => Ok(url),
        "http" if environment == Environment::Production => Err(ValidationError::MustBeHttps(name)),
        "http" => Ok(url),
        _ => Err(ValidationError::InvalidUrl(name)),
    }
}
