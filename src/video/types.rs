//! Slideshow video types.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const MIN_IMAGES: usize = 2;
pub const MAX_IMAGES: usize = 3;

/// One image to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self { file_name, bytes })
    }

    /// MIME type guessed from the file extension.
    pub fn mime_type(&self) -> &'static str {
        let ext = Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            Some("bmp") => "image/bmp",
            _ => "application/octet-stream",
        }
    }
}

/// Seconds each image stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideDuration {
    #[default]
    Two,
    Three,
    Four,
}

impl SlideDuration {
    pub fn seconds(&self) -> u32 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }
}

impl TryFrom<u32> for SlideDuration {
    type Error = Error;

    fn try_from(secs: u32) -> Result<Self> {
        match secs {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            other => Err(Error::validation(format!(
                "Duration must be 2, 3 or 4 seconds, got {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    None,
    #[default]
    Slide,
    #[serde(rename = "kenburns")]
    KenBurns,
    ZoomIn,
    ZoomOut,
}

impl Transition {
    pub const ALL: [Transition; 5] = [
        Self::None,
        Self::Slide,
        Self::KenBurns,
        Self::ZoomIn,
        Self::ZoomOut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Slide => "slide",
            Self::KenBurns => "kenburns",
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| Error::validation(format!("Unknown transition: {}", s.trim())))
    }
}

/// Everything the slideshow endpoint needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideshowRequest {
    pub images: Vec<ImageUpload>,
    pub duration: SlideDuration,
    pub slide_effect: bool,
    pub transition: Transition,
}

impl SlideshowRequest {
    pub fn new(images: Vec<ImageUpload>) -> Self {
        Self {
            images,
            duration: SlideDuration::default(),
            slide_effect: true,
            transition: Transition::default(),
        }
    }

    pub fn with_duration(mut self, duration: SlideDuration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_slide_effect(mut self, enabled: bool) -> Self {
        self.slide_effect = enabled;
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }
}

/// Reply of `/api/video/slideshow`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideshowVideo {
    pub video_url: String,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}
