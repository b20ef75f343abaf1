//! Stripe client-side adapters.
//!
//! Implements the `PaymentRedirect` port for Stripe hosted checkout. The
//! secret key never reaches this side: the backend creates the session and
//! the client only needs the publishable key and the session token.

mod navigator;
mod redirect;

pub use navigator::LoggingNavigator;
pub use redirect::{StripeCheckoutRedirect, StripeRedirectConfig};
