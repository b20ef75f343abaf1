//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the client-side state machines and the hosted services. Adapters
//! implement these ports.
//!
//! - `IdentityProvider` - current identity query and session-change stream
//! - `CheckoutSessionGateway` - backend endpoint issuing checkout tokens
//! - `PaymentRedirect` / `Navigator` - hand-off to the hosted checkout page

mod checkout_gateway;
mod identity_provider;
mod payment_redirect;

pub use checkout_gateway::CheckoutSessionGateway;
pub use identity_provider::{IdentityProvider, SessionChangeHandler, Subscription};
pub use payment_redirect::{Navigator, PaymentRedirect};
