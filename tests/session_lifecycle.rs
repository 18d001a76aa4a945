//! Session lifecycle against a mock backend: restore, login, register,
//! logout and the 401/403 teardown.

mod common;

use common::{user_json, MockServerFixture, TOKEN};
use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;
use vocalis::session::store::TokenStore;
use vocalis::session::InMemorySessionListener;
use vocalis::{Plan, SessionEvent, SessionState};

#[tokio::test]
async fn login_persists_token_and_loads_user() {
    let mut fx = MockServerFixture::new().await;
    let login = fx
        .server
        .mock("POST", "/auth/login")
        .match_body(Matcher::Json(json!({"email": "u@x.com", "password": "p"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"access_token": TOKEN, "token_type": "bearer"}).to_string())
        .create_async()
        .await;
    let me = fx
        .server
        .mock("GET", "/auth/me")
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_json("Trial", 1))
        .create_async()
        .await;

    let mut session = fx.session();
    let listener = InMemorySessionListener::new();
    session.subscribe(Arc::new(listener.clone()));

    let outcome = session.login("u@x.com", "p").await;

    assert!(outcome.success, "{:?}", outcome.error);
    assert_eq!(outcome.user.as_ref().map(|u| u.name.as_str()), Some("U"));
    assert_eq!(session.state(), SessionState::Authenticated);
    assert_eq!(session.token(), Some(TOKEN));
    let user = session.user().expect("user");
    assert_eq!(user.plan, Plan::Trial);
    assert_eq!(user.daily_count, 1);
    assert_eq!(fx.persisted_token().as_deref(), Some(TOKEN));
    assert_eq!(
        listener.transitions(),
        vec![
            (SessionState::Unauthenticated, SessionState::Loading),
            (SessionState::Loading, SessionState::Authenticated),
        ]
    );
    login.assert_async().await;
    me.assert_async().await;
}

#[tokio::test]
async fn failed_login_reports_backend_detail_and_changes_nothing() {
    let mut fx = MockServerFixture::new().await;
    let _login = fx
        .mock_json(
            "POST",
            "/auth/login",
            401,
            r#"{"detail": "Incorrect email or password"}"#,
        )
        .await;
    let me = fx
        .server
        .mock("GET", "/auth/me")
        .expect(0)
        .create_async()
        .await;

    let mut session = fx.session();
    let outcome = session.login("u@x.com", "wrong").await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("Incorrect email or password"));
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert!(session.token().is_none());
    assert!(fx.persisted_token().is_none());
    me.assert_async().await;
}

#[tokio::test]
async fn failed_login_without_detail_uses_fallback() {
    let mut fx = MockServerFixture::new().await;
    let _login = fx
        .server
        .mock("POST", "/auth/login")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let mut session = fx.session();
    let outcome = session.login("u@x.com", "p").await;

    assert_eq!(outcome.error.as_deref(), Some("Login failed"));
}

#[tokio::test]
async fn login_whose_user_fetch_fails_ends_signed_out() {
    let mut fx = MockServerFixture::new().await;
    let _login = fx
        .mock_json("POST", "/auth/login", 200, r#"{"access_token": "tok-123"}"#)
        .await;
    let _me = fx.mock_json("GET", "/auth/me", 500, r#"{"detail": "db down"}"#).await;

    let mut session = fx.session();
    let outcome = session.login("u@x.com", "p").await;

    assert!(!outcome.success);
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert!(session.token().is_none());
    assert!(fx.persisted_token().is_none());
}

#[tokio::test]
async fn persisted_token_is_restored() {
    let mut fx = MockServerFixture::with_token(TOKEN).await;
    let _me = fx.mock_me("Starter", 0).await;

    let mut session = fx.session();
    assert_eq!(session.state(), SessionState::Loading);
    assert!(session.user().is_none());

    assert_eq!(session.refresh().await, SessionState::Authenticated);
    assert_eq!(session.user().map(|u| u.plan), Some(Plan::Starter));
}

#[tokio::test]
async fn stale_persisted_token_is_dropped() {
    let mut fx = MockServerFixture::with_token("stale").await;
    let _me = fx
        .mock_json(
            "GET",
            "/auth/me",
            401,
            r#"{"detail": "Could not validate credentials"}"#,
        )
        .await;

    let mut session = fx.session();
    let listener = InMemorySessionListener::new();
    session.subscribe(Arc::new(listener.clone()));

    assert_eq!(session.refresh().await, SessionState::Unauthenticated);
    assert!(session.token().is_none());
    assert!(fx.persisted_token().is_none());
    assert!(listener.events().contains(&SessionEvent::Expired));
}

#[tokio::test]
async fn restore_failure_other_than_401_also_drops_token() {
    let mut fx = MockServerFixture::with_token(TOKEN).await;
    let _me = fx.mock_json("GET", "/auth/me", 502, "{}").await;

    let mut session = fx.session();
    session.refresh().await;

    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert!(fx.persisted_token().is_none());
}

#[tokio::test]
async fn no_persisted_token_means_signed_out_without_a_request() {
    let mut fx = MockServerFixture::new().await;
    let me = fx.server.mock("GET", "/auth/me").expect(0).create_async().await;

    let mut session = fx.session();
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert_eq!(session.refresh().await, SessionState::Unauthenticated);
    me.assert_async().await;
}

#[tokio::test]
async fn logout_clears_memory_and_storage_together() {
    let mut fx = MockServerFixture::new().await;
    let mut session = fx.signed_in("Pro", 0).await;
    assert!(session.is_authenticated());

    session.logout();

    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert!(session.token().is_none());
    assert!(session.user().is_none());
    assert!(fx.persisted_token().is_none());
}

#[tokio::test]
async fn registration_with_token_signs_in_immediately() {
    let mut fx = MockServerFixture::new().await;
    let _register = fx
        .server
        .mock("POST", "/auth/register")
        .match_body(Matcher::Json(
            json!({"name": "U", "email": "u@x.com", "password": "p"}),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": 7, "name": "U", "email": "u@x.com", "plan": "Free",
                "daily_voice_count": 0, "access_token": TOKEN
            })
            .to_string(),
        )
        .create_async()
        .await;
    let me = fx.server.mock("GET", "/auth/me").expect(0).create_async().await;

    let mut session = fx.session();
    let outcome = session.register("U", "u@x.com", "p").await;

    assert!(outcome.success);
    assert_eq!(session.state(), SessionState::Authenticated);
    assert_eq!(session.user().map(|u| u.plan), Some(Plan::Trial));
    assert_eq!(fx.persisted_token().as_deref(), Some(TOKEN));
    me.assert_async().await;
}

#[tokio::test]
async fn registration_without_token_leaves_session_signed_out() {
    let mut fx = MockServerFixture::new().await;
    let _register = fx
        .mock_json("POST", "/auth/register", 200, &user_json("Free", 0))
        .await;

    let mut session = fx.session();
    let outcome = session.register("U", "u@x.com", "p").await;

    assert!(outcome.success);
    assert_eq!(outcome.user.map(|u| u.email), Some("u@x.com".to_string()));
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert!(session.user().is_none());
    assert!(fx.persisted_token().is_none());
}

#[tokio::test]
async fn duplicate_registration_surfaces_detail() {
    let mut fx = MockServerFixture::new().await;
    let _register = fx
        .mock_json(
            "POST",
            "/auth/register",
            400,
            r#"{"detail": "Email already registered"}"#,
        )
        .await;

    let mut session = fx.session();
    let outcome = session.register("U", "u@x.com", "p").await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("Email already registered"));
}

#[tokio::test]
async fn rejected_protected_call_tears_session_down() {
    let mut fx = MockServerFixture::new().await;
    let mut session = fx.signed_in("Starter", 0).await;
    let listener = InMemorySessionListener::new();
    session.subscribe(Arc::new(listener.clone()));
    let _history = fx
        .mock_json("GET", "/api/history", 401, r#"{"detail": "Token expired"}"#)
        .await;

    let result = session.tts().voice_history().await;
    let err = session.guard(result).unwrap_err();

    assert!(err.is_session_expired());
    assert_eq!(
        err.user_message(),
        Some(vocalis::error::SESSION_EXPIRED_MESSAGE)
    );
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert!(session.token().is_none());
    assert!(session.user().is_none());
    assert!(fx.store.load().unwrap().is_none());
    assert_eq!(
        listener.events(),
        vec![
            SessionEvent::StateChanged {
                from: SessionState::Authenticated,
                to: SessionState::Unauthenticated,
            },
            SessionEvent::Expired,
        ]
    );
}

#[tokio::test]
async fn ordinary_api_errors_keep_the_session() {
    let mut fx = MockServerFixture::new().await;
    let mut session = fx.signed_in("Starter", 0).await;
    let _history = fx
        .mock_json("GET", "/api/history", 500, r#"{"detail": "boom"}"#)
        .await;

    let result = session.tts().voice_history().await;
    let err = session.guard(result).unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(session.is_authenticated());
    assert_eq!(fx.persisted_token().as_deref(), Some(TOKEN));
}
