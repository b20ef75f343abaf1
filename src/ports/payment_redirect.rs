//! Payment redirect port - hands a checkout token to the hosted payment page.

use async_trait::async_trait;
use reqwest::Url;

use crate::domain::checkout::RedirectError;
use crate::domain::foundation::CheckoutSessionId;

/// Sends the visitor to the hosted checkout page.
///
/// Errors come back as a value: `None` means the redirect was issued.
#[async_trait]
pub trait PaymentRedirect: Send + Sync {
    async fn redirect_to_checkout(&self, session_id: &CheckoutSessionId) -> Option<RedirectError>;
}

/// Last hop out of the process: whatever actually opens a URL.
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &Url) -> Result<(), RedirectError>;
}
