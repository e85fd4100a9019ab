//! Session state container.
//!
//! DESIGN
//! ======
//! One container per request on the server and one per page session in the
//! browser, owned by the `AuthClient` that mutates it. Handles are cheap
//! clones of a `watch` channel, so UI code can subscribe and re-render on
//! every change. Each mutation is a single `send_modify`; nothing holds the
//! channel across an await point.

use std::sync::Arc;

use serde_json::Value;
use time::OffsetDateTime;
use tokio::sync::watch;

/// Derived authentication status. Never stored, always computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Unauthenticated,
    Authenticated,
    Loading,
}

/// Point-in-time copy of the container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    /// Backend-defined session record. Replaced wholesale, never merged.
    pub data: Option<Value>,
    /// True while a session fetch is in flight.
    pub loading: bool,
    pub last_refreshed_at: Option<OffsetDateTime>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn status(&self) -> AuthStatus {
        if self.loading {
            AuthStatus::Loading
        } else if self.data.is_some() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }
}

/// Shared handle to one session container.
#[derive(Debug, Clone)]
pub struct SessionState {
    tx: Arc<watch::Sender<SessionSnapshot>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn data(&self) -> Option<Value> {
        self.tx.borrow().data.clone()
    }

    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.tx.borrow().status()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.tx.borrow().loading
    }

    #[must_use]
    pub fn last_refreshed_at(&self) -> Option<OffsetDateTime> {
        self.tx.borrow().last_refreshed_at
    }

    /// Receiver notified on every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    /// Replace the session record. A JSON `null` counts as no session.
    pub(crate) fn set_data(&self, data: Option<Value>) {
        let data = data.filter(|value| !value.is_null());
        self.tx.send_modify(|state| state.data = data);
    }

    pub(crate) fn clear_data(&self) {
        self.tx.send_modify(|state| state.data = None);
    }

    pub(crate) fn begin_loading(&self) {
        self.tx.send_modify(|state| state.loading = true);
    }

    /// Marks the fetch done and stamps the refresh time.
    pub(crate) fn finish_loading(&self) {
        self.tx.send_modify(|state| {
            state.loading = false;
            state.last_refreshed_at = Some(OffsetDateTime::now_utc());
        });
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
