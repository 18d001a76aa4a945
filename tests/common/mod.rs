//! Mock backend fixture shared by the integration tests.

#![allow(dead_code)]

use mockito::{Mock, Server, ServerGuard};
use std::sync::Arc;
use vocalis::session::store::{MemoryTokenStore, TokenStore};
use vocalis::{ApiClient, ClientConfig, Session};

pub const TOKEN: &str = "tok-123";

pub fn user_json(plan: &str, daily_count: u32) -> String {
    format!(
        r#"{{"id": 1, "name": "U", "email": "u@x.com", "plan": "{}", "daily_count": {}}}"#,
        plan, daily_count
    )
}

/// A mockito server plus an in-memory token store wired into an [`ApiClient`].
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub store: Arc<MemoryTokenStore>,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        Self {
            server: Server::new_async().await,
            store: Arc::new(MemoryTokenStore::new()),
        }
    }

    /// Start with `token` already persisted, as after an earlier run.
    pub async fn with_token(token: &str) -> Self {
        Self {
            server: Server::new_async().await,
            store: Arc::new(MemoryTokenStore::with_token(token)),
        }
    }

    pub fn base_url(&self) -> String {
        self.server.url()
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::with_token_store(&ClientConfig::new(self.server.url()), self.store.clone())
            .expect("client")
    }

    pub fn session(&self) -> Session {
        Session::new(self.api()).expect("session")
    }

    /// Session already authenticated as a user on `plan`.
    pub async fn signed_in(&mut self, plan: &str, daily_count: u32) -> Session {
        self.store.save(TOKEN).expect("save token");
        let me = self.mock_me(plan, daily_count).await;
        let mut session = self.session();
        session.refresh().await;
        me.remove_async().await;
        session
    }

    pub fn persisted_token(&self) -> Option<String> {
        self.store.load().expect("load token")
    }

    pub async fn mock_me(&mut self, plan: &str, daily_count: u32) -> Mock {
        self.mock_json("GET", "/auth/me", 200, &user_json(plan, daily_count))
            .await
    }

    pub async fn mock_json(&mut self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }
}
