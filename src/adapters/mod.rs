//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the client-side state machines to external systems:
//! - `auth` - identity providers (Supabase, mock)
//! - `checkout` - backend token endpoint (HTTP, mock)
//! - `stripe` - hosted checkout redirect

pub mod auth;
pub mod checkout;
pub mod stripe;

mod gate;

pub use gate::Gate;
