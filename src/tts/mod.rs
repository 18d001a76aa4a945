//! TTS（文字转语音）模块：提交文本生成语音，查询历史与套餐信息。

mod client;
mod types;

pub use client::TtsClient;
pub use types::{AudioSource, PlanInfo, VoiceGeneration, VoiceHistoryEntry};
