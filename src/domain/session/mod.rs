//! Session domain - the local view of the visitor's authentication state.
//!
//! - `SessionStatus` - `Loading | Anonymous | Authenticated`
//! - `Session` - single last-write-wins slot
//! - `SessionChange` - notification from the identity provider
//! - `SessionView` - pure derivation of the UI variant

mod aggregate;
mod events;
mod status;
mod view;

pub use aggregate::Session;
pub use events::{AuthEvent, SessionChange};
pub use status::SessionStatus;
pub use view::SessionView;
