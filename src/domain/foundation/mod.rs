//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the state machine trait and error
//! types that form the vocabulary of the session and checkout domains.

mod auth;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, Identity};
pub use errors::ValidationError;
pub use ids::{AttemptId, CheckoutSessionId, PriceId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
