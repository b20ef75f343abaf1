//! Checkout session gateway adapters.
//!
//! - `http_gateway` - JSON over HTTP to the backend create-payment endpoint
//! - `mock` - scripted gateway and redirect for tests

mod http_gateway;
mod mock;

pub use http_gateway::HttpCheckoutGateway;
pub use mock::{MockCheckoutGateway, MockPaymentRedirect};
