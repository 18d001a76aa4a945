//! 认证模块：登录、注册与当前用户查询。

mod client;
mod types;

pub use client::AuthClient;
pub use types::{Plan, RegisteredUser, TokenResponse, User, TRIAL_DAILY_LIMIT};
