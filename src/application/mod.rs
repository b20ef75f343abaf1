//! Application layer - the two client-side state machines.
//!
//! Each coordinates domain types with the ports it is handed:
//!
//! - `SessionTracker` - identity provider -> session slot -> view
//! - `CheckoutOrchestrator` - plan catalog -> token gateway -> payment redirect

mod checkout_orchestrator;
mod session_tracker;

pub use checkout_orchestrator::CheckoutOrchestrator;
pub use session_tracker::SessionTracker;
