//! SessionTracker - keeps the local session slot in step with the identity provider.
//!
//! On mount the tracker:
//! 1. Subscribes to session-change notifications
//! 2. Issues the one-shot "current identity" query in the background
//! 3. Applies whichever answers arrive to a single last-write-wins slot
//!
//! Once any notification has been applied, a late answer to the initial
//! query is discarded. Unmounting cancels the subscription exactly once and
//! stops all further writes.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

use crate::domain::foundation::{AuthError, Identity};
use crate::domain::session::{Session, SessionChange, SessionStatus, SessionView};
use crate::ports::{IdentityProvider, Subscription};

/// Where an identity update came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateSource {
    InitialQuery,
    Notification,
}

impl UpdateSource {
    fn as_str(&self) -> &'static str {
        match self {
            UpdateSource::InitialQuery => "initial_query",
            UpdateSource::Notification => "notification",
        }
    }
}

#[derive(Debug)]
struct WriteGuard {
    mounted: bool,
    notified: bool,
}

/// State shared between the tracker, its listener and its query task.
struct TrackerShared {
    slot: watch::Sender<Session>,
    writes: Mutex<WriteGuard>,
}

impl TrackerShared {
    fn new() -> Self {
        let (slot, _) = watch::channel(Session::loading());
        Self {
            slot,
            writes: Mutex::new(WriteGuard {
                mounted: true,
                notified: false,
            }),
        }
    }

    fn apply_notification(&self, change: SessionChange) {
        tracing::debug!(event = %change.event, "Session change received");
        self.apply(change.identity, UpdateSource::Notification);
    }

    fn apply_query(&self, result: Result<Option<Identity>, AuthError>) {
        let identity = match result {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(error = %e, "Current identity query failed, treating as anonymous");
                None
            }
        };
        self.apply(identity, UpdateSource::InitialQuery);
    }

    /// Writes under the guard lock so the stale-query check and the write
    /// cannot interleave with a notification.
    fn apply(&self, identity: Option<Identity>, source: UpdateSource) -> bool {
        let mut guard = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        if !guard.mounted {
            tracing::trace!(source = source.as_str(), "Ignoring update after unmount");
            return false;
        }
        match source {
            UpdateSource::Notification => guard.notified = true,
            UpdateSource::InitialQuery if guard.notified => {
                tracing::debug!("Discarding initial query result superseded by a notification");
                return false;
            }
            UpdateSource::InitialQuery => {}
        }

        let previous = self.slot.borrow().status();
        self.slot.send_modify(|session| {
            session.apply_identity(identity);
        });
        let current = self.slot.borrow().status();
        if previous != current {
            tracing::info!(
                from = %previous,
                to = %current,
                source = source.as_str(),
                "Session status changed"
            );
        }
        true
    }

    /// Returns true on the first call only.
    fn close(&self) -> bool {
        let mut guard = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut guard.mounted, false)
    }

    fn is_mounted(&self) -> bool {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .mounted
    }
}

/// Tracks the visitor's session for the lifetime of the host view.
///
/// Reads never block: before the first answer arrives the session is
/// `Loading`, which renders as the splash view.
pub struct SessionTracker {
    shared: Arc<TrackerShared>,
    provider: Arc<dyn IdentityProvider>,
    subscription: Option<Subscription>,
    query_task: Option<JoinHandle<()>>,
    query_abort: Option<AbortHandle>,
}

impl SessionTracker {
    /// Subscribes to the provider and starts the initial identity query.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn mount(provider: Arc<dyn IdentityProvider>) -> Self {
        let shared = Arc::new(TrackerShared::new());

        // Subscribe before querying so no change between the two is lost.
        let listener: Weak<TrackerShared> = Arc::downgrade(&shared);
        let subscription = provider.on_session_change(Arc::new(move |change| {
            if let Some(shared) = listener.upgrade() {
                shared.apply_notification(change);
            }
        }));

        // The query runs in its own task so a panicking provider still
        // resolves the session.
        let query_provider = Arc::clone(&provider);
        let query = tokio::spawn(async move { query_provider.current_identity().await });
        let query_abort = query.abort_handle();

        let query_target = Arc::downgrade(&shared);
        let query_task = tokio::spawn(async move {
            let result = match query.await {
                Ok(result) => result,
                Err(e) => Err(AuthError::service_unavailable(format!(
                    "identity query did not complete: {}",
                    e
                ))),
            };
            if let Some(shared) = query_target.upgrade() {
                shared.apply_query(result);
            }
        });

        tracing::debug!("Session tracker mounted");

        Self {
            shared,
            provider,
            subscription: Some(subscription),
            query_task: Some(query_task),
            query_abort: Some(query_abort),
        }
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.shared.slot.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.shared.slot.borrow().status()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.shared.slot.borrow().identity().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.status().is_loading()
    }

    /// The UI variant for the current session.
    pub fn view(&self) -> SessionView {
        SessionView::derive(&self.shared.slot.borrow())
    }

    /// Receiver that observes every session write.
    pub fn watch(&self) -> watch::Receiver<Session> {
        self.shared.slot.subscribe()
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.is_mounted()
    }

    /// Waits until the session leaves `Loading` and returns it.
    pub async fn wait_until_resolved(&self) -> Session {
        let mut rx = self.shared.slot.subscribe();
        loop {
            {
                let session = rx.borrow_and_update();
                if !session.is_loading() {
                    return session.clone();
                }
            }
            if rx.changed().await.is_err() {
                return rx.borrow().clone();
            }
        }
    }

    /// Ends the session at the provider.
    ///
    /// The resulting `SIGNED_OUT` notification updates the slot.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await
    }

    /// Tears the tracker down.
    ///
    /// Equivalent to dropping it.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if !self.shared.close() {
            return;
        }
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
        if let Some(query) = self.query_abort.take() {
            query.abort();
        }
        if let Some(task) = self.query_task.take() {
            task.abort();
        }
        tracing::debug!(status = %self.status(), "Session tracker unmounted");
    }
}

impl Drop for SessionTracker {
    fn drop(&mut self) {
        self.teardown();
    }
}
