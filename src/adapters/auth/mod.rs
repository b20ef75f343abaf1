//! Identity provider adapters.
//!
//! Implementations of the `IdentityProvider` port:
//!
//! - `supabase` - Supabase GoTrue REST API
//! - `mock` - in-memory provider for tests
//! - `listeners` - handler registry both of them share

mod listeners;
mod mock;
mod supabase;

pub use listeners::ListenerRegistry;
pub use mock::MockIdentityProvider;
pub use supabase::{SupabaseConfig, SupabaseIdentityProvider};
