use crate::auth::User;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Loading,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StateChanged {
        from: SessionState,
        to: SessionState,
    },
    /// A fresh user record replaced the previous one.
    UserUpdated(User),
    /// A protected call was rejected; the session was torn down.
    Expired,
}

/// Observer of session changes. Called synchronously, in registration order.
pub trait SessionListener: Send + Sync {
    fn on_event(&self, event: &SessionEvent);
}

/// Records events; for tests and debugging.
#[derive(Default, Clone)]
pub struct InMemorySessionListener {
    events: Arc<RwLock<Vec<SessionEvent>>>,
}

impl InMemorySessionListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Just the state transitions, in order.
    pub fn transitions(&self) -> Vec<(SessionState, SessionState)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::StateChanged { from, to } => Some((from, to)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.write().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl SessionListener for InMemorySessionListener {
    fn on_event(&self, event: &SessionEvent) {
        self.events
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}

/// Logs every event through `tracing`.
pub struct TracingSessionListener;

impl SessionListener for TracingSessionListener {
    fn on_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::StateChanged { from, to } => {
                tracing::debug!(?from, ?to, "session state changed")
            }
            SessionEvent::UserUpdated(user) => {
                tracing::debug!(email = %user.email, plan = %user.plan, "session user updated")
            }
            SessionEvent::Expired => tracing::info!("session expired"),
        }
    }
}
