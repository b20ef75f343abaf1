//! Domain layer containing the pure session and checkout state machines.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, identity, errors, state machine trait)
//! - `session` - Session status, provider notifications and view derivation
//! - `checkout` - Plan catalog, checkout attempt and control derivation

pub mod checkout;
pub mod foundation;
pub mod session;
