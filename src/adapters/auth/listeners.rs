//! Listener registry shared by identity provider adapters.
//!
//! Handlers are snapshotted before delivery so no lock is held while a
//! callback runs; a handler may therefore cancel its own subscription or
//! register new ones from inside the callback.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use crate::domain::session::SessionChange;
use crate::ports::{SessionChangeHandler, Subscription};

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: BTreeMap<u64, SessionChangeHandler>,
}

/// Registration table for session-change handlers.
///
/// Delivery order follows registration order.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<RwLock<Registry>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler. Releasing the returned subscription removes it.
    pub fn register(&self, handler: SessionChangeHandler) -> Subscription {
        let id = {
            let mut registry = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            let id = registry.next_id;
            registry.next_id += 1;
            registry.handlers.insert(id, handler);
            id
        };
        tracing::debug!(listener_id = id, "Session listener registered");

        let weak: Weak<RwLock<Registry>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .handlers
                    .remove(&id);
                tracing::debug!(listener_id = id, "Session listener removed");
            }
        })
    }

    /// Delivers `change` to every registered handler.
    ///
    /// Returns how many handlers were invoked.
    pub fn emit(&self, change: SessionChange) -> usize {
        let handlers: Vec<SessionChangeHandler> = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .handlers
            .values()
            .cloned()
            .collect();

        tracing::debug!(
            event = %change.event,
            listeners = handlers.len(),
            "Emitting session change"
        );
        for handler in &handlers {
            handler(change.clone());
        }
        handlers.len()
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .handlers
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
