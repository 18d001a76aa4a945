//! Slideshow video client.

use super::types::{SlideshowRequest, SlideshowVideo, MAX_IMAGES, MIN_IMAGES};
use crate::transport::{endpoint, HttpTransport};
use crate::{Error, ErrorContext, Result};
use reqwest::multipart::{Form, Part};
use std::sync::Arc;
use tracing::debug;

pub const IMAGE_COUNT_MESSAGE: &str = "Please select 2 to 3 images.";
pub const AUTH_REQUIRED_MESSAGE: &str = "Authentication required. Please log in.";

#[derive(Clone)]
pub struct VideoClient {
    transport: Arc<HttpTransport>,
}

impl VideoClient {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// Upload images and render a slideshow.
    ///
    /// Image count and token presence are checked before anything is sent.
    pub async fn generate_slideshow(&self, request: &SlideshowRequest) -> Result<SlideshowVideo> {
        let count = request.images.len();
        if !(MIN_IMAGES..=MAX_IMAGES).contains(&count) {
            return Err(Error::validation_with_context(
                IMAGE_COUNT_MESSAGE,
                ErrorContext::new()
                    .with_field_path("images")
                    .with_details(format!("got {} image(s)", count)),
            ));
        }

        if self.transport.current_token()?.is_none() {
            return Err(Error::validation_with_context(
                AUTH_REQUIRED_MESSAGE,
                ErrorContext::new().with_field_path("token"),
            ));
        }

        let mut form = Form::new();
        for image in &request.images {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(image.mime_type())
                .map_err(|e| Error::validation(format!("Invalid mime: {}", e)))?;
            form = form.part("images", part);
        }
        let form = form
            .text("duration_seconds", request.duration.seconds().to_string())
            .text("slide_effect", request.slide_effect.to_string())
            .text("transition", request.transition.as_str());

        debug!(
            images = count,
            duration = request.duration.seconds(),
            transition = request.transition.as_str(),
            "uploading slideshow"
        );
        self.transport
            .send_multipart(&endpoint::VIDEO_SLIDESHOW, form)
            .await
    }
}
