use super::state::{SessionEvent, SessionListener, SessionState};
use crate::auth::{AuthClient, RegisteredUser, User};
use crate::client::ApiClient;
use crate::payment::PaymentClient;
use crate::tts::TtsClient;
use crate::video::VideoClient;
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of a login or registration attempt.
///
/// Failures are reported here instead of as errors so forms can show them inline.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthOutcome {
    pub success: bool,
    pub error: Option<String>,
    pub user: Option<User>,
}

impl AuthOutcome {
    fn ok(user: Option<User>) -> Self {
        Self {
            success: true,
            error: None,
            user,
        }
    }

    fn failed(error: &Error, fallback: &str) -> Self {
        Self {
            success: false,
            error: Some(error.user_message().unwrap_or(fallback).to_string()),
            user: None,
        }
    }
}

/// The signed-in session: bearer token, current user and loading flag.
///
/// This is the only writer of the token and the user. `user` is set only
/// while `token` is set, and both are cleared together.
pub struct Session {
    api: ApiClient,
    token: Option<String>,
    user: Option<User>,
    loading: bool,
    listeners: Vec<Arc<dyn SessionListener>>,
}

impl Session {
    /// Start from whatever token is persisted: `Loading` if there is one,
    /// `Unauthenticated` otherwise. Call [`Session::refresh`] to finish loading.
    pub fn new(api: ApiClient) -> Result<Self> {
        let token = api.token_store().load()?;
        let loading = token.is_some();
        Ok(Self {
            api,
            token,
            user: None,
            loading,
            listeners: Vec::new(),
        })
    }

    pub fn subscribe(&mut self, listener: Arc<dyn SessionListener>) {
        self.listeners.push(listener);
    }

    pub fn state(&self) -> SessionState {
        if self.loading {
            SessionState::Loading
        } else if self.user.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn auth(&self) -> &AuthClient {
        self.api.auth()
    }

    pub fn payment(&self) -> &PaymentClient {
        self.api.payment()
    }

    pub fn tts(&self) -> &TtsClient {
        self.api.tts()
    }

    pub fn video(&self) -> &VideoClient {
        self.api.video()
    }

    /// Re-fetch the current user for the persisted token.
    ///
    /// Any failure drops the token: a token that cannot produce a user is stale.
    pub async fn refresh(&mut self) -> SessionState {
        if self.token.is_none() {
            self.mutate(|s| s.loading = false);
            return self.state();
        }

        self.mutate(|s| s.loading = true);
        match self.api.auth().current_user().await {
            Ok(user) => self.accept_user(user),
            Err(e) => {
                warn!("Failed to fetch user: {}", e);
                self.clear_persisted();
                self.mutate(|s| s.reset());
                if e.is_session_expired() {
                    self.emit(SessionEvent::Expired);
                }
            }
        }
        self.state()
    }

    /// Re-fetch the user of a live session, e.g. after a generation moved the
    /// daily counter.
    ///
    /// Only 401/403 ends the session; any other failure keeps the current user.
    pub async fn reload_user(&mut self) -> Result<()> {
        if self.token.is_none() {
            return Ok(());
        }
        let result = self.api.auth().current_user().await;
        match self.guard(result) {
            Ok(user) => {
                self.accept_user(user);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to reload user, keeping the current one: {}", e);
                Err(e)
            }
        }
    }

    /// Log in, persist the token, then load the user.
    pub async fn login(&mut self, email: &str, password: &str) -> AuthOutcome {
        let token = match self.api.auth().login(email, password).await {
            Ok(response) => response.access_token,
            Err(e) => {
                warn!("Login failed: {}", e);
                return AuthOutcome::failed(&e, "Login failed");
            }
        };

        if let Err(e) = self.api.token_store().save(&token) {
            error!("Failed to persist token: {}", e);
            return AuthOutcome::failed(&e, "Login failed");
        }
        self.mutate(|s| {
            s.token = Some(token);
            s.user = None;
            s.loading = true;
        });

        match self.api.auth().current_user().await {
            Ok(user) => {
                self.accept_user(user.clone());
                info!(email = %user.email, "logged in");
                AuthOutcome::ok(Some(user))
            }
            Err(e) => {
                warn!("Login succeeded but fetching the user failed: {}", e);
                self.clear_persisted();
                self.mutate(|s| s.reset());
                AuthOutcome::failed(&e, "Login failed")
            }
        }
    }

    /// Create an account.
    ///
    /// When the backend hands back a token with the new user, the session is
    /// authenticated right away without another fetch. Without a token the
    /// session is left as it was and the caller should ask the user to log in.
    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> AuthOutcome {
        let registered = match self.api.auth().register(name, email, password).await {
            Ok(registered) => registered,
            Err(e) => {
                warn!("Registration failed: {}", e);
                return AuthOutcome::failed(&e, "Registration failed");
            }
        };

        match registered {
            RegisteredUser {
                user,
                access_token: Some(token),
            } => {
                if let Err(e) = self.api.token_store().save(&token) {
                    error!("Failed to persist token: {}", e);
                    return AuthOutcome::failed(&e, "Registration failed");
                }
                self.mutate(|s| s.token = Some(token));
                self.accept_user(user.clone());
                AuthOutcome::ok(Some(user))
            }
            RegisteredUser {
                user,
                access_token: None,
            } => {
                info!(email = %user.email, "registered; log in to start a session");
                AuthOutcome::ok(Some(user))
            }
        }
    }

    /// Drop the token and the user, persisted and in memory.
    pub fn logout(&mut self) {
        self.clear_persisted();
        self.mutate(|s| s.reset());
    }

    /// Pass through the result of a protected call, ending the session on 401/403.
    pub fn guard<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if e.is_session_expired() {
                self.expire();
            }
        }
        result
    }

    fn expire(&mut self) {
        self.clear_persisted();
        self.mutate(|s| s.reset());
        self.emit(SessionEvent::Expired);
    }

    fn accept_user(&mut self, user: User) {
        self.mutate(|s| {
            s.user = Some(user.clone());
            s.loading = false;
        });
        self.emit(SessionEvent::UserUpdated(user));
    }

    fn reset(&mut self) {
        self.token = None;
        self.user = None;
        self.loading = false;
    }

    fn clear_persisted(&self) {
        if let Err(e) = self.api.token_store().clear() {
            error!("Failed to clear persisted token: {}", e);
        }
    }

    fn mutate(&mut self, f: impl FnOnce(&mut Self)) {
        let from = self.state();
        f(self);
        debug_assert!(self.user.is_none() || self.token.is_some());
        let to = self.state();
        if from != to {
            self.emit(SessionEvent::StateChanged { from, to });
        }
    }

    fn emit(&self, event: SessionEvent) {
        for listener in &self.listeners {
            listener.on_event(&event);
        }
    }
}
