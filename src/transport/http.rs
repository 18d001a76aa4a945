use super::endpoint::Endpoint;
use crate::config::ClientConfig;
use crate::session::store::TokenStore;
use crate::{Error, ErrorContext, Result};
use reqwest::multipart::Form;
use reqwest::{Proxy, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

/// Request-issuing wrapper around `reqwest`.
///
/// Reads the persisted token before every call and attaches it as a bearer
/// credential. No retries, no caching, no rate limiting.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let base_url = config.base_url()?;

        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        // Requests have no deadline unless one is configured.
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Some(proxy_url) = &config.proxy_url {
            match Proxy::all(proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => warn!("Ignoring invalid proxy URL {}: {}", proxy_url, e),
            }
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn current_token(&self) -> Result<Option<String>> {
        self.tokens.load()
    }

    /// Resolve a URL handed out by the backend, which may be absolute or root-relative.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        let base = Url::parse(&format!("{}/", self.base_url))
            .map_err(|e| Error::configuration(format!("Invalid base URL: {}", e)))?;
        base.join(url).map_err(|e| {
            Error::schema_with_context(
                format!("Backend returned an unusable URL: {}", e),
                ErrorContext::new().with_details(url.to_string()),
            )
        })
    }

    fn request(&self, endpoint: &Endpoint) -> Result<RequestBuilder> {
        let url = format!("{}{}", self.base_url, endpoint.path);
        let mut req = self.client.request(endpoint.method.as_reqwest(), &url);
        if let Some(token) = self.tokens.load()? {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        let req = self.request(endpoint)?;
        self.execute(endpoint, req).await
    }

    pub async fn send_json<B, T>(&self, endpoint: &Endpoint, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(endpoint)?.json(body);
        self.execute(endpoint, req).await
    }

    pub async fn send_query<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let req = self.request(endpoint)?.query(query);
        self.execute(endpoint, req).await
    }

    /// Multipart upload; reqwest sets the boundary content type itself.
    pub async fn send_multipart<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        form: Form,
    ) -> Result<T> {
        let req = self.request(endpoint)?.multipart(form);
        self.execute(endpoint, req).await
    }

    /// Fetch a backend-served asset (generated audio or video) as raw bytes.
    ///
    /// The bearer token is only sent to the backend's own origin; assets on
    /// other hosts are fetched anonymously.
    pub async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        let same_origin = self.is_backend_origin(url);
        let mut req = self.client.get(url.clone());
        if same_origin {
            if let Some(token) = self.tokens.load()? {
                req = req.bearer_auth(token);
            }
        }
        let response = req.send().await.map_err(TransportError::Http)?;
        let status = response.status();
        let body = response.bytes().await.map_err(TransportError::Http)?;
        if !status.is_success() {
            let endpoint = Endpoint::asset(same_origin);
            return Err(self.reject(&endpoint, status.as_u16(), &body));
        }
        Ok(body.to_vec())
    }

    fn is_backend_origin(&self, url: &Url) -> bool {
        Url::parse(&self.base_url)
            .map(|base| base.origin() == url.origin())
            .unwrap_or(false)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        req: RequestBuilder,
    ) -> Result<T> {
        debug!(method = ?endpoint.method, path = endpoint.path, "sending request");
        let response = req.send().await.map_err(TransportError::Http)?;
        let status = response.status();
        let body = response.bytes().await.map_err(TransportError::Http)?;

        if !status.is_success() {
            return Err(self.reject(endpoint, status.as_u16(), &body));
        }

        serde_json::from_slice(&body).map_err(|e| {
            Error::schema_with_context(
                format!("Unexpected response body: {}", e),
                ErrorContext::new()
                    .with_source(endpoint.path)
                    .with_details(preview(&body)),
            )
        })
    }

    fn reject(&self, endpoint: &Endpoint, status: u16, body: &[u8]) -> Error {
        let detail = extract_detail(body);
        if endpoint.protected && matches!(status, 401 | 403) {
            warn!(path = endpoint.path, status, "Protected call rejected, clearing persisted token");
            if let Err(e) = self.tokens.clear() {
                error!("Failed to clear persisted token: {}", e);
            }
            return Error::session_expired(status, detail);
        }
        debug!(path = endpoint.path, status, "Backend rejected request");
        Error::Api {
            status,
            message: detail.unwrap_or_else(|| endpoint.fallback.to_string()),
        }
    }
}

/// Pull the human message out of an error body.
///
/// The backend answers `{"detail": "..."}` for handled errors and
/// `{"detail": [{"msg": "..."}, ...]}` for request validation failures.
pub fn extract_detail(body: &[u8]) -> Option<String> {
    let json: Value = serde_json::from_slice(body).ok()?;
    match json.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

fn preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(200) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.into_owned(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
