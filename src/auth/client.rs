//! Authentication client.

use super::types::{LoginRequest, RegisterRequest, RegisteredUser, TokenResponse, User};
use crate::transport::{endpoint, HttpTransport};
use crate::Result;
use std::sync::Arc;

/// `/auth/*` operations. Returns parsed bodies; never touches the token store.
#[derive(Clone)]
pub struct AuthClient {
    transport: Arc<HttpTransport>,
}

impl AuthClient {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        self.transport
            .send_json(&endpoint::AUTH_LOGIN, &LoginRequest { email, password })
            .await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<RegisteredUser> {
        self.transport
            .send_json(
                &endpoint::AUTH_REGISTER,
                &RegisterRequest {
                    name,
                    email,
                    password,
                },
            )
            .await
    }

    pub async fn current_user(&self) -> Result<User> {
        self.transport.get_json(&endpoint::AUTH_ME).await
    }
}
