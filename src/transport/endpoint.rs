//! Backend endpoint table.

use reqwest::Method;

/// One backend REST endpoint.
///
/// `protected` endpoints require the bearer token; a 401/403 from them ends the session.
/// `fallback` is the user-facing message when the backend gives no `detail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: &'static str,
    pub protected: bool,
    pub fallback: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_reqwest(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
        }
    }
}

impl Endpoint {
    const fn public(method: HttpMethod, path: &'static str, fallback: &'static str) -> Self {
        Self {
            method,
            path,
            protected: false,
            fallback,
        }
    }

    const fn protected(method: HttpMethod, path: &'static str, fallback: &'static str) -> Self {
        Self {
            method,
            path,
            protected: true,
            fallback,
        }
    }

    /// A generated file served by URL rather than a fixed route. Only assets on
    /// the backend's own origin are fetched with the token.
    pub(crate) const fn asset(same_origin: bool) -> Self {
        Self {
            method: HttpMethod::Get,
            path: "<asset>",
            protected: same_origin,
            fallback: "Failed to download file",
        }
    }
}

pub const AUTH_LOGIN: Endpoint = Endpoint::public(HttpMethod::Post, "/auth/login", "Login failed");
pub const AUTH_REGISTER: Endpoint =
    Endpoint::public(HttpMethod::Post, "/auth/register", "Registration failed");
pub const AUTH_ME: Endpoint =
    Endpoint::protected(HttpMethod::Get, "/auth/me", "Failed to fetch user");

pub const PAYMENT_CREATE: Endpoint = Endpoint::protected(
    HttpMethod::Post,
    "/api/payment/create",
    "Failed to initiate payment",
);
pub const PAYMENT_HISTORY: Endpoint = Endpoint::protected(
    HttpMethod::Get,
    "/api/payment/history",
    "Failed to fetch payment history",
);
pub const PAYMENT_UPGRADE: Endpoint = Endpoint::protected(
    HttpMethod::Post,
    "/api/payment/upgrade",
    "Failed to initiate payment. Please try again.",
);
pub const PAYMENT_SUBSCRIPTION_REQUEST: Endpoint = Endpoint::protected(
    HttpMethod::Post,
    "/api/payment/subscription-request",
    "Failed to submit subscription request",
);

pub const TTS_GENERATE: Endpoint = Endpoint::protected(
    HttpMethod::Post,
    "/api/generate-voice",
    "Failed to generate voice",
);
pub const TTS_HISTORY: Endpoint = Endpoint::protected(
    HttpMethod::Get,
    "/api/history",
    "Failed to fetch voice history",
);
pub const TTS_PLAN: Endpoint =
    Endpoint::protected(HttpMethod::Get, "/api/plan", "Failed to fetch plan info");

pub const VIDEO_SLIDESHOW: Endpoint = Endpoint::protected(
    HttpMethod::Post,
    "/api/video/slideshow",
    "Failed to generate slideshow",
);

/// Every endpoint the client talks to, in the order of the backend's route files.
pub const ALL: [Endpoint; 11] = [
    AUTH_LOGIN,
    AUTH_REGISTER,
    AUTH_ME,
    PAYMENT_CREATE,
    PAYMENT_HISTORY,
    PAYMENT_UPGRADE,
    PAYMENT_SUBSCRIPTION_REQUEST,
    TTS_GENERATE,
    TTS_HISTORY,
    TTS_PLAN,
    VIDEO_SLIDESHOW,
];
