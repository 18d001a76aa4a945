//! Authentication types.

use crate::utils::timestamp;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Voice generations a Trial user may run per day.
pub const TRIAL_DAILY_LIMIT: u32 = 3;

/// Subscription tier.
///
/// The backend names the free tier `Free` and its single paid tier `Paid`;
/// both are accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plan {
    #[serde(alias = "Free")]
    Trial,
    #[serde(alias = "Paid")]
    Starter,
    Pro,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trial => "Trial",
            Self::Starter => "Starter",
            Self::Pro => "Pro",
        }
    }

    pub fn is_trial(&self) -> bool {
        matches!(self, Self::Trial)
    }

    /// Daily generation cap; `None` for unlimited plans.
    pub fn daily_limit(&self) -> Option<u32> {
        match self {
            Self::Trial => Some(TRIAL_DAILY_LIMIT),
            Self::Starter | Self::Pro => None,
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trial" | "free" => Ok(Self::Trial),
            "starter" | "paid" => Ok(Self::Starter),
            "pro" => Ok(Self::Pro),
            other => Err(Error::validation(format!("Unknown plan: {}", other))),
        }
    }
}

/// The signed-in user as reported by `/auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub plan: Plan,
    #[serde(alias = "daily_voice_count", default)]
    pub daily_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_video_count: Option<u32>,
    #[serde(
        default,
        deserialize_with = "timestamp::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether another voice generation is allowed today.
    pub fn can_generate(&self) -> bool {
        match self.plan.daily_limit() {
            Some(limit) => self.daily_count < limit,
            None => true,
        }
    }

    /// Generations left today, for capped plans.
    pub fn remaining_today(&self) -> Option<u32> {
        self.plan
            .daily_limit()
            .map(|limit| limit.saturating_sub(self.daily_count))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// `/auth/register` reply: the created user, optionally with a token.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredUser {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}
