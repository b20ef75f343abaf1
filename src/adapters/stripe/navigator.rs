//! Navigator that records and logs the checkout URL instead of opening it.

use std::sync::{Mutex, PoisonError};

use reqwest::Url;

use crate::domain::checkout::RedirectError;
use crate::ports::Navigator;

/// Logs each URL at `info` and keeps the most recent one.
#[derive(Debug, Default)]
pub struct LoggingNavigator {
    last: Mutex<Option<Url>>,
}

impl LoggingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_url(&self) -> Option<Url> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for LoggingNavigator {
    fn navigate(&self, url: &Url) -> Result<(), RedirectError> {
        tracing::info!(%url, "Open this URL to complete checkout");
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(url.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_most_recent_url() {
        let navigator = LoggingNavigator::new();
        assert!(navigator.last_url().is_none());

        navigator
            .navigate(&Url::parse("https://checkout.stripe.com/c/pay/cs_1").unwrap())
            .unwrap();
        navigator
            .navigate(&Url::parse("https://checkout.stripe.com/c/pay/cs_2").unwrap())
            .unwrap();

        assert_eq!(
            navigator.last_url().unwrap().as_str(),
            "https://checkout.stripe.com/c/pay/cs_2"
        );
    }
}
