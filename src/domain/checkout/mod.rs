//! Checkout domain - plan catalog and the single in-flight attempt.
//!
//! ```text
//! Idle --begin--> Pending --token--> Redirecting --resolved/failed--> Idle
//! Pending --request failed--> Idle
//! ```

mod attempt;
mod control;
mod errors;
mod outcome;
mod plan;

pub use attempt::{CheckoutAttempt, CheckoutPhase};
pub use control::PlanControl;
pub use errors::{CheckoutError, RedirectError};
pub use outcome::CheckoutOutcome;
pub use plan::{Plan, PlanCatalog};
