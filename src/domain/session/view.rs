//! Pure derivation of which surface to show for a session.

use crate::domain::foundation::UserId;

use super::{Session, SessionStatus};

/// Which UI variant the presentation layer should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionView {
    /// First session check still outstanding.
    Splash,
    /// No active session: show the sign-in surface.
    SignIn,
    /// Active session: show the main surface keyed off identity attributes.
    Main {
        user_id: UserId,
        email: Option<String>,
        display_name: String,
    },
}

impl SessionView {
    /// Derives the view from the current session. Has no side effects.
    pub fn derive(session: &Session) -> Self {
        match (session.status(), session.identity()) {
            (SessionStatus::Loading, _) => SessionView::Splash,
            (SessionStatus::Authenticated, Some(identity)) => SessionView::Main {
                user_id: identity.id.clone(),
                email: identity.email.clone(),
                display_name: identity.display_name_or_email().to_string(),
            },
            (SessionStatus::Authenticated, None) | (SessionStatus::Anonymous, _) => {
                SessionView::SignIn
            }
        }
    }

    pub fn is_splash(&self) -> bool {
        matches!(self, SessionView::Splash)
    }
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self::derive(session)
    }
}
