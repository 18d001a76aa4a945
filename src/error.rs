use crate::transport::TransportError;
use thiserror::Error;

/// Message surfaced whenever a protected call is rejected with 401/403.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path of the offending input (e.g., "images", "text")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected shape, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., an endpoint path or "token_store")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the Vocalis client.
///
/// Validation failures never reach the network. `Api` carries the backend's
/// `detail` (or the operation's fallback message); `SessionExpired` is the
/// 401/403 case on a protected endpoint, after which the persisted token is gone.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Remote error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP {status}: {message}")]
    SessionExpired {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    #[error("Response schema mismatch: {message}{}", format_context(.context))]
    Schema {
        message: String,
        context: ErrorContext,
    },

    #[error("Token store error: {message}")]
    TokenStore { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::validation_with_context(msg, ErrorContext::new())
    }

    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn schema_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Schema {
            message: msg.into(),
            context,
        }
    }

    pub fn token_store(msg: impl Into<String>) -> Self {
        Error::TokenStore {
            message: msg.into(),
        }
    }

    pub fn session_expired(status: u16, detail: Option<String>) -> Self {
        Error::SessionExpired {
            status,
            message: SESSION_EXPIRED_MESSAGE.to_string(),
            detail,
        }
    }

    /// True for 401/403 rejections of protected calls.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Error::SessionExpired { .. })
    }

    /// HTTP status of a backend rejection, if this error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } | Error::SessionExpired { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The message meant for a human: validation text, backend `detail`, or the
    /// re-authentication prompt. `None` for failures that only make sense in logs.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Error::Validation { message, .. }
            | Error::Api { message, .. }
            | Error::SessionExpired { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. }
            | Error::Validation { context, .. }
            | Error::Schema { context, .. } => Some(context),
            _ => None,
        }
    }
}
