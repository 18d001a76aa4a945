//! # vocalis
//!
//! 这是 Vocalis 文字转语音服务的类型化客户端：会话管理、语音生成、套餐与支付、幻灯片视频。
//!
//! Typed client for the Vocalis text-to-speech service.
//!
//! ## Overview
//!
//! Every operation maps to one backend REST endpoint. The crate owns the
//! client-side session (bearer token + current user) and the headless view
//! models that gate and drive those operations; the backend does the actual
//! speech synthesis, video rendering and payment processing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vocalis::{ApiClient, ClientConfig, Session};
//!
//! #[tokio::main]
//! async fn main() -> vocalis::Result<()> {
//!     let api = ApiClient::new(&ClientConfig::from_env())?;
//!     let mut session = Session::new(api)?;
//!     session.refresh().await;
//!
//!     let outcome = session.login("u@x.com", "pw").await;
//!     if !outcome.success {
//!         eprintln!("{}", outcome.error.unwrap_or_default());
//!         return Ok(());
//!     }
//!
//!     let result = session.tts().generate_voice("Hello there").await;
//!     let generation = session.guard(result)?;
//!     println!("{:?}", generation.audio_url);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`transport`] | HTTP wrapper that injects the bearer token |
//! | [`auth`] | Login, registration, current user |
//! | [`payment`] | Payments, upgrades, subscription requests |
//! | [`tts`] | Voice generation, history, plan info |
//! | [`video`] | Image slideshow to video |
//! | [`session`] | Session state machine and token persistence |
//! | [`views`] | Headless view models with gating and notices |
//! | [`config`] | Client configuration |

pub mod auth;
pub mod client;
pub mod config;
pub mod payment;
pub mod session;
pub mod transport;
pub mod tts;
pub mod utils;
pub mod video;
pub mod views;

pub use auth::{Plan, User};
pub use client::ApiClient;
pub use config::{ClientConfig, TokenStoreKind};
pub use session::{AuthOutcome, Session, SessionEvent, SessionListener, SessionState};
pub use views::{Notice, NoticeLevel};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
