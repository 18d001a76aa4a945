//! Voice generator form.

use super::Notice;
use crate::auth::User;
use crate::tts::AudioSource;
use crate::{Error, Result, Session};
use std::path::Path;
use tracing::error;

pub const EMPTY_TEXT_MESSAGE: &str = "Please enter some text to generate voice";
pub const LIMIT_REACHED_MESSAGE: &str =
    "Daily limit reached. Upgrade your plan for unlimited generations.";
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate voice";

#[derive(Debug, Default)]
pub struct VoiceGenerator {
    text: String,
    generating: bool,
    audio: Option<AudioSource>,
}

impl VoiceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Audio from the last successful generation.
    pub fn audio(&self) -> Option<&AudioSource> {
        self.audio.as_ref()
    }

    /// Trial users get 3 generations a day; paid plans are unlimited.
    pub fn can_generate(user: &User) -> bool {
        user.can_generate()
    }

    /// Whether the generate button is enabled.
    pub fn submit_enabled(&self, user: &User) -> bool {
        Self::can_generate(user) && !self.generating && !self.text.trim().is_empty()
    }

    /// Trial audio is watermarked and cannot be downloaded.
    pub fn can_download(user: &User) -> bool {
        !user.plan.is_trial()
    }

    /// Generate speech for the current text.
    ///
    /// Empty text, an exhausted Trial quota or a request already in flight are
    /// rejected without a network call. On success the previous audio is
    /// replaced and the session user is refreshed so the daily counter moves.
    pub async fn generate(&mut self, session: &mut Session) -> Notice {
        let Some(user) = session.user() else {
            return Notice::error("Please log in to generate voice");
        };
        if self.text.trim().is_empty() {
            return Notice::error(EMPTY_TEXT_MESSAGE);
        }
        if !Self::can_generate(user) {
            return Notice::error(LIMIT_REACHED_MESSAGE);
        }
        if self.generating {
            return Notice::error("A generation is already in progress");
        }

        self.generating = true;
        let result = session.tts().generate_voice(&self.text).await;
        let result = session.guard(result);
        self.generating = false;

        let generation = match result {
            Ok(generation) => generation,
            Err(e) => {
                error!("Voice generation error: {}", e);
                return Notice::from_error(&e, GENERATION_FAILED_MESSAGE);
            }
        };

        if !generation.success {
            return Notice::error(
                generation
                    .message
                    .unwrap_or_else(|| GENERATION_FAILED_MESSAGE.to_string()),
            );
        }

        match generation.audio() {
            Ok(audio) => self.audio = audio,
            Err(e) => {
                error!("Voice generation returned unusable audio: {}", e);
                return Notice::error(GENERATION_FAILED_MESSAGE);
            }
        }

        if let Err(e) = session.reload_user().await {
            if e.is_session_expired() {
                return Notice::from_error(&e, GENERATION_FAILED_MESSAGE);
            }
        }
        Notice::success("Voice generated successfully!")
    }

    /// Save the last generated audio to `path`. Paid plans only.
    pub async fn download(&self, session: &mut Session, path: impl AsRef<Path>) -> Result<()> {
        let user = session
            .user()
            .ok_or_else(|| Error::validation("Please log in to download audio"))?;
        if !Self::can_download(user) {
            return Err(Error::validation(
                "Downloads are not available on the Trial plan",
            ));
        }
        let bytes = match &self.audio {
            Some(AudioSource::Inline(bytes)) => bytes.clone(),
            Some(AudioSource::Remote(url)) => {
                let url = session.api().transport().resolve(url)?;
                let result = session.api().transport().fetch_bytes(&url).await;
                session.guard(result)?
            }
            None => return Err(Error::validation("Nothing to download yet")),
        };
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }
}
