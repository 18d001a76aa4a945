//! 客户端配置：后端地址、超时、代理与令牌存储方式。
//!
//! Client configuration.
//!
//! Defaults are production-friendly and every knob is env-overridable:
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `VOCALIS_API_URL` | Backend base URL (default `http://localhost:8000`) |
//! | `VOCALIS_HTTP_TIMEOUT_SECS` | Per-request deadline; unset means no client-side deadline |
//! | `VOCALIS_PROXY_URL` | Proxy for all outgoing requests |
//! | `VOCALIS_TOKEN_STORE` | `keyring` (default), `file` or `memory` |
//! | `VOCALIS_TOKEN_FILE` | Token file path when the store is `file` |

use crate::session::store::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Where the bearer token is persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenStoreKind {
    #[default]
    Keyring,
    File { path: PathBuf },
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: Option<u64>,
    pub proxy_url: Option<String>,
    pub token_store: TokenStoreKind,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            proxy_url: None,
            token_store: TokenStoreKind::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load a YAML config file; environment variables still win over file values.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: ClientConfig = serde_yaml::from_str(&raw).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid config file: {}", e),
                ErrorContext::new().with_source(path.display().to_string()),
            )
        })?;
        Ok(config.with_env_overrides())
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (the process environment in practice).
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("VOCALIS_API_URL").filter(|s| !s.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(secs) = lookup("VOCALIS_HTTP_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            self.timeout_secs = Some(secs).filter(|s| *s > 0);
        }
        if let Some(proxy) = lookup("VOCALIS_PROXY_URL").filter(|s| !s.trim().is_empty()) {
            self.proxy_url = Some(proxy);
        }
        match lookup("VOCALIS_TOKEN_STORE").as_deref().map(str::trim) {
            Some("keyring") => self.token_store = TokenStoreKind::Keyring,
            Some("memory") => self.token_store = TokenStoreKind::Memory,
            Some("file") => {
                if let Some(path) = lookup("VOCALIS_TOKEN_FILE") {
                    self.token_store = TokenStoreKind::File { path: path.into() };
                } else {
                    tracing::warn!("VOCALIS_TOKEN_STORE=file without VOCALIS_TOKEN_FILE; keeping {:?}", self.token_store);
                }
            }
            Some(other) => tracing::warn!("Unknown VOCALIS_TOKEN_STORE value: {}", other),
            None => {}
        }
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn with_proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    pub fn with_token_store(mut self, kind: TokenStoreKind) -> Self {
        self.token_store = kind;
        self
    }

    /// Parsed and checked base URL.
    pub fn base_url(&self) -> Result<url::Url> {
        let parsed = url::Url::parse(self.base_url.trim()).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid base URL: {}", e),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(self.base_url.clone()),
            )
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(Error::configuration_with_context(
                format!("Unsupported URL scheme: {}", other),
                ErrorContext::new().with_field_path("base_url"),
            )),
        }
    }

    pub fn open_token_store(&self) -> Result<Arc<dyn TokenStore>> {
        let store: Arc<dyn TokenStore> = match &self.token_store {
            TokenStoreKind::Keyring => Arc::new(KeyringTokenStore::new()),
            TokenStoreKind::File { path } => Arc::new(FileTokenStore::new(path.clone())),
            TokenStoreKind::Memory => Arc::new(MemoryTokenStore::new()),
        };
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, None);
        assert_eq!(config.token_store, TokenStoreKind::Keyring);
    }

    #[test]
    fn env_overrides_apply() {
        let config = ClientConfig::default().with_overrides_from(lookup(&[
            ("VOCALIS_API_URL", "https://api.example.com"),
            ("VOCALIS_HTTP_TIMEOUT_SECS", "15"),
            ("VOCALIS_TOKEN_STORE", "file"),
            ("VOCALIS_TOKEN_FILE", "/tmp/vocalis-token.json"),
        ]));
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout_secs, Some(15));
        assert_eq!(
            config.token_store,
            TokenStoreKind::File {
                path: PathBuf::from("/tmp/vocalis-token.json")
            }
        );
    }

    #[test]
    fn zero_timeout_means_no_deadline() {
        let config = ClientConfig::default()
            .with_overrides_from(lookup(&[("VOCALIS_HTTP_TIMEOUT_SECS", "0")]));
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn yaml_config_parses_partial_documents() {
        let config: ClientConfig = serde_yaml::from_str(
            "base_url: https://tts.example.org\ntoken_store:\n  kind: memory\n",
        )
        .unwrap();
        assert_eq!(config.base_url, "https://tts.example.org");
        assert_eq!(config.token_store, TokenStoreKind::Memory);
        assert!(config.proxy_url.is_none());
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = ClientConfig::new("ftp://example.com").base_url().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(ClientConfig::new("not a url").base_url().is_err());
    }
}
