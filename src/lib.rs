//! Signal Starter - client-side session and checkout state machines
//!
//! This crate tracks the visitor's authentication session against a hosted
//! identity provider and runs subscription checkout against a hosted
//! payment page, one attempt at a time.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
