//! 视图模型：表单状态、输入校验、按会话状态做功能门控，并以提示消息反馈结果。
//!
//! Headless view models.
//!
//! Each view owns its ephemeral UI state and takes the [`Session`](crate::Session)
//! as a call parameter. Views never write the token or user themselves; they
//! route protected results through [`Session::guard`](crate::Session::guard).

pub mod account;
pub mod dashboard;
pub mod pricing;
pub mod slideshow;
pub mod voice;

pub use account::{LoginForm, RegisterForm};
pub use dashboard::Dashboard;
pub use pricing::{PlanOffer, PricingPage, UpgradeOutcome, PLAN_CATALOGUE};
pub use slideshow::{cache_busted_url, SlideshowForm};
pub use voice::VoiceGenerator;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A transient user-facing message (the toast of a graphical UI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Error notice for a failed call: the error's own message, or `fallback`.
    pub fn from_error(err: &crate::Error, fallback: &str) -> Self {
        Self::error(err.user_message().unwrap_or(fallback))
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{}] {}", tag, self.message)
    }
}
