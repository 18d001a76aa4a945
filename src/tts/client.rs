//! TTS (Text-to-Speech) client.

use super::types::{GenerateVoiceRequest, PlanInfo, VoiceGeneration, VoiceHistoryEntry};
use crate::transport::{endpoint, HttpTransport};
use crate::Result;
use std::sync::Arc;

/// Client for voice generation, generation history and plan info.
#[derive(Clone)]
pub struct TtsClient {
    transport: Arc<HttpTransport>,
}

impl TtsClient {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// Synthesize `text`. A `success: false` reply is returned as-is, not as an error.
    pub async fn generate_voice(&self, text: &str) -> Result<VoiceGeneration> {
        self.transport
            .send_json(&endpoint::TTS_GENERATE, &GenerateVoiceRequest { text })
            .await
    }

    /// History in backend order; not re-sorted.
    pub async fn voice_history(&self) -> Result<Vec<VoiceHistoryEntry>> {
        self.transport.get_json(&endpoint::TTS_HISTORY).await
    }

    pub async fn plan_info(&self) -> Result<PlanInfo> {
        self.transport.get_json(&endpoint::TTS_PLAN).await
    }
}
