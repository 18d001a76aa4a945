//! TTS (Text-to-Speech) types.

use crate::auth::Plan;
use crate::utils::timestamp;
use crate::{Error, ErrorContext, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reply of `/api/generate-voice`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceGeneration {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Base64 audio, sent to Trial users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_data: Option<String>,
    /// Hosted audio, sent to paid users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub daily_count: Option<u32>,
    #[serde(default)]
    pub limit_reached: bool,
    #[serde(default)]
    pub tokens_used: Option<u64>,
    #[serde(default)]
    pub tokens_remaining: Option<u64>,
}

/// Where the generated audio can be played from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    Inline(Vec<u8>),
    Remote(String),
}

impl VoiceGeneration {
    /// Decode the audio payload. Inline data wins when both are present.
    pub fn audio(&self) -> Result<Option<AudioSource>> {
        if let Some(data) = self.audio_data.as_deref().filter(|d| !d.is_empty()) {
            let bytes = STANDARD.decode(data.trim()).map_err(|e| {
                Error::schema_with_context(
                    format!("audio_data is not valid base64: {}", e),
                    ErrorContext::new().with_field_path("audio_data"),
                )
            })?;
            return Ok(Some(AudioSource::Inline(bytes)));
        }
        Ok(self
            .audio_url
            .as_ref()
            .filter(|u| !u.is_empty())
            .map(|u| AudioSource::Remote(u.clone())))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceHistoryEntry {
    pub id: i64,
    pub text: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub audio_url: Option<String>,
}

/// Reply of `/api/plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanInfo {
    pub features: Vec<String>,
    #[serde(default)]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub daily_limit: Option<u32>,
    #[serde(default)]
    pub remaining_generations: Option<u32>,
    #[serde(default)]
    pub max_words_per_generation: Option<u32>,
    #[serde(default)]
    pub max_total_tokens: Option<u64>,
    #[serde(default)]
    pub tokens_used: Option<u64>,
    #[serde(default)]
    pub tokens_remaining: Option<u64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateVoiceRequest<'a> {
    pub text: &'a str,
}
