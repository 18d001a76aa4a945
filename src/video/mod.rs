//! 视频模块：上传 2-3 张图片生成幻灯片视频。

mod client;
mod types;

pub use client::{VideoClient, AUTH_REQUIRED_MESSAGE, IMAGE_COUNT_MESSAGE};
pub use types::{
    ImageUpload, SlideDuration, SlideshowRequest, SlideshowVideo, Transition, MAX_IMAGES,
    MIN_IMAGES,
};
