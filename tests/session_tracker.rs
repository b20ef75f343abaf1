//! Integration tests for the session tracker.
//!
//! Drives `SessionTracker` through the public API against the in-memory
//! identity provider:
//! 1. Initial resolution and subsequent notifications
//! 2. Teardown releasing the subscription exactly once
//! 3. Ordering between the initial query and notifications

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use proptest::prelude::*;

use signal_starter::adapters::auth::MockIdentityProvider;
use signal_starter::application::SessionTracker;
use signal_starter::domain::foundation::{AuthError, Identity, UserId};
use signal_starter::domain::session::{AuthEvent, SessionChange, SessionStatus, SessionView};
use signal_starter::ports::{IdentityProvider, SessionChangeHandler, Subscription};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn identity(email: &str) -> Identity {
    Identity::new(UserId::new(format!("user-{}", email)).unwrap(), email)
}

/// Provider that counts how often its subscription is released.
#[derive(Default)]
struct CountingProvider {
    releases: Arc<AtomicUsize>,
}

#[async_trait]
impl IdentityProvider for CountingProvider {
    async fn current_identity(&self) -> Result<Option<Identity>, AuthError> {
        Ok(None)
    }

    fn on_session_change(&self, _handler: SessionChangeHandler) -> Subscription {
        let releases = self.releases.clone();
        Subscription::new(move || {
            releases.fetch_add(1, Ordering::SeqCst);
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        Ok(())
    }
}

async fn wait_for_query(provider: &MockIdentityProvider) {
    while provider.query_count() == 0 {
        tokio::task::yield_now().await;
    }
}

// =============================================================================
// Resolution
// =============================================================================

#[tokio::test]
async fn resolves_to_main_view_then_follows_sign_out() {
    let provider = Arc::new(MockIdentityProvider::new().with_identity(identity("a@b.com")));
    let tracker = SessionTracker::mount(provider.clone());

    let session = tracker.wait_until_resolved().await;
    assert_eq!(session.status(), SessionStatus::Authenticated);
    match tracker.view() {
        SessionView::Main { email, .. } => assert_eq!(email.as_deref(), Some("a@b.com")),
        other => panic!("expected main view, got {:?}", other),
    }

    provider.emit(SessionChange::new(AuthEvent::SignedOut, None));

    assert_eq!(tracker.status(), SessionStatus::Anonymous);
    assert_eq!(tracker.view(), SessionView::SignIn);
    assert!(tracker.identity().is_none());
}

#[tokio::test]
async fn no_session_resolves_to_sign_in() {
    let provider = Arc::new(MockIdentityProvider::new());
    let tracker = SessionTracker::mount(provider);

    let session = tracker.wait_until_resolved().await;

    assert_eq!(session.status(), SessionStatus::Anonymous);
    assert_eq!(SessionView::derive(&session), SessionView::SignIn);
}

#[tokio::test]
async fn token_refresh_keeps_session_authenticated() {
    let provider = Arc::new(MockIdentityProvider::new().with_identity(identity("a@b.com")));
    let tracker = SessionTracker::mount(provider.clone());
    tracker.wait_until_resolved().await;

    provider.emit(SessionChange::token_refreshed(identity("a@b.com")));

    assert_eq!(tracker.status(), SessionStatus::Authenticated);
}

#[tokio::test]
async fn watchers_observe_each_change() {
    let provider = Arc::new(MockIdentityProvider::new());
    let tracker = SessionTracker::mount(provider.clone());
    tracker.wait_until_resolved().await;
    let mut rx = tracker.watch();

    provider.emit(SessionChange::signed_in(identity("c@d.com")));

    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_authenticated());
}

// =============================================================================
// Teardown
// =============================================================================

#[tokio::test]
async fn unmount_before_any_notification_releases_once() {
    let provider = Arc::new(CountingProvider::default());
    let releases = provider.releases.clone();

    let tracker = SessionTracker::mount(provider);
    tracker.unmount();

    assert_eq!(releases.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn notifications_after_unmount_are_not_delivered() {
    let provider = Arc::new(MockIdentityProvider::new());
    let _gate = provider.hold_queries();
    let tracker = SessionTracker::mount(provider.clone());
    let rx = tracker.watch();

    tracker.unmount();
    let delivered = provider.emit(SessionChange::signed_in(identity("a@b.com")));

    assert_eq!(delivered, 0);
    assert!(rx.borrow().is_loading());
}

// =============================================================================
// Ordering
// =============================================================================

#[tokio::test]
async fn late_initial_query_does_not_override_sign_in() {
    let provider = Arc::new(MockIdentityProvider::new());
    let gate = provider.hold_queries();
    let tracker = SessionTracker::mount(provider.clone());
    wait_for_query(&provider).await;

    provider.emit(SessionChange::signed_in(identity("new@b.com")));
    gate.release();
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert_eq!(
        tracker.identity().and_then(|i| i.email),
        Some("new@b.com".to_string())
    );
}

proptest! {
    #[test]
    fn last_notification_wins(emails in proptest::collection::vec(
        proptest::option::of("[a-z]{1,8}@example\\.com"),
        1..8,
    )) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let (status, email) = runtime.block_on(async {
            let provider = Arc::new(
                MockIdentityProvider::new().with_identity(identity("initial@example.com")),
            );
            let gate = provider.hold_queries();
            let tracker = SessionTracker::mount(provider.clone());
            wait_for_query(&provider).await;

            for email in &emails {
                let change = match email {
                    Some(email) => SessionChange::signed_in(identity(email)),
                    None => SessionChange::signed_out(),
                };
                provider.emit(change);
            }
            gate.release();
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }

            (tracker.status(), tracker.identity().and_then(|i| i.email))
        });

        let last = emails.last().cloned().flatten();
        let expected = if last.is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        };
        prop_assert_eq!(status, expected);
        prop_assert_eq!(email, last);
    }
}
