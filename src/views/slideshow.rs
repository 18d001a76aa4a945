//! Image slideshow form.

use super::Notice;
use crate::video::{ImageUpload, SlideDuration, SlideshowRequest, Transition, MAX_IMAGES};
use crate::{Result, Session};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::error;
use url::Url;

const FALLBACK_MESSAGE: &str = "Something went wrong";

#[derive(Debug)]
pub struct SlideshowForm {
    files: Vec<ImageUpload>,
    duration: SlideDuration,
    slide_effect: bool,
    transition: Transition,
    video_url: Option<String>,
    loading: bool,
    error: Option<String>,
}

impl Default for SlideshowForm {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            duration: SlideDuration::default(),
            slide_effect: true,
            transition: Transition::default(),
            video_url: None,
            loading: false,
            error: None,
        }
    }
}

impl SlideshowForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most the first three selected files, as the file picker does.
    pub fn select_files(&mut self, mut files: Vec<ImageUpload>) {
        files.truncate(MAX_IMAGES);
        self.files = files;
    }

    pub fn set_duration(&mut self, duration: SlideDuration) {
        self.duration = duration;
    }

    pub fn set_slide_effect(&mut self, enabled: bool) {
        self.slide_effect = enabled;
    }

    pub fn set_transition(&mut self, transition: Transition) {
        self.transition = transition;
    }

    pub fn files(&self) -> &[ImageUpload] {
        &self.files
    }

    /// Playable URL of the last generated video.
    pub fn video_url(&self) -> Option<&str> {
        self.video_url.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn request(&self) -> SlideshowRequest {
        SlideshowRequest::new(self.files.clone())
            .with_duration(self.duration)
            .with_slide_effect(self.slide_effect)
            .with_transition(self.transition)
    }

    pub async fn submit(&mut self, session: &mut Session) -> Notice {
        if self.loading {
            return Notice::error("A slideshow is already being generated");
        }
        self.error = None;
        self.video_url = None;
        self.loading = true;

        let request = self.request();
        let result = session.video().generate_slideshow(&request).await;
        let result = session.guard(result);
        self.loading = false;

        let outcome = result.and_then(|video| {
            cache_busted_url(session.api().base_url(), &video.video_url, now_millis())
        });
        match outcome {
            Ok(url) => {
                self.video_url = Some(url);
                Notice::success("Slideshow video generated successfully.")
            }
            Err(e) => {
                error!("Slideshow generation failed: {}", e);
                let notice = Notice::from_error(&e, FALLBACK_MESSAGE);
                self.error = Some(notice.message.clone());
                notice
            }
        }
    }
}

/// Resolve `video_url` against `base_url` and append `t=<stamp>` so players
/// reload the source instead of serving a cached file.
pub fn cache_busted_url(base_url: &str, video_url: &str, stamp: u128) -> Result<String> {
    let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
        .map_err(|e| crate::Error::configuration(format!("Invalid base URL: {}", e)))?;
    let mut url = base.join(video_url).map_err(|e| {
        crate::Error::schema_with_context(
            format!("Backend returned an unusable video URL: {}", e),
            crate::ErrorContext::new().with_details(video_url.to_string()),
        )
    })?;
    url.query_pairs_mut().append_pair("t", &stamp.to_string());
    Ok(url.into())
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_urls_resolve_against_the_backend() {
        assert_eq!(
            cache_busted_url("http://localhost:8000", "/v/1.mp4", 42).unwrap(),
            "http://localhost:8000/v/1.mp4?t=42"
        );
    }

    #[test]
    fn absolute_urls_keep_their_host_and_query() {
        assert_eq!(
            cache_busted_url(
                "http://localhost:8000/",
                "https://cdn.example.com/static/videos/a.mp4?sig=abc",
                7
            )
            .unwrap(),
            "https://cdn.example.com/static/videos/a.mp4?sig=abc&t=7"
        );
    }

    #[test]
    fn file_selection_is_truncated_to_three() {
        let mut form = SlideshowForm::new();
        form.select_files(
            (0..5)
                .map(|i| ImageUpload::new(format!("{}.png", i), vec![i]))
                .collect(),
        );
        assert_eq!(form.files().len(), 3);
        assert_eq!(form.files()[2].file_name, "2.png");
    }
}
