//! Slideshow upload: local checks, multipart shape and rejection handling.

mod common;

use common::{MockServerFixture, TOKEN};
use mockito::Matcher;
use vocalis::video::{
    ImageUpload, SlideDuration, SlideshowRequest, Transition, AUTH_REQUIRED_MESSAGE,
    IMAGE_COUNT_MESSAGE,
};
use vocalis::Error;

fn images(n: usize) -> Vec<ImageUpload> {
    (0..n)
        .map(|i| ImageUpload::new(format!("img{}.png", i), vec![0x89, b'P', b'N', b'G', i as u8]))
        .collect()
}

#[tokio::test]
async fn image_count_outside_two_to_three_is_rejected_locally() {
    let mut fx = MockServerFixture::with_token(TOKEN).await;
    let upload = fx
        .server
        .mock("POST", "/api/video/slideshow")
        .expect(0)
        .create_async()
        .await;
    let api = fx.api();

    for n in [0, 1, 4] {
        let err = api
            .video()
            .generate_slideshow(&SlideshowRequest::new(images(n)))
            .await
            .unwrap_err();
        match err {
            Error::Validation { message, context } => {
                assert_eq!(message, IMAGE_COUNT_MESSAGE);
                assert_eq!(context.field_path.as_deref(), Some("images"));
            }
            other => panic!("expected validation error for {} images, got {:?}", n, other),
        }
    }
    upload.assert_async().await;
}

#[tokio::test]
async fn missing_token_is_rejected_locally() {
    let mut fx = MockServerFixture::new().await;
    let upload = fx
        .server
        .mock("POST", "/api/video/slideshow")
        .expect(0)
        .create_async()
        .await;

    let err = fx
        .api()
        .video()
        .generate_slideshow(&SlideshowRequest::new(images(2)))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), Some(AUTH_REQUIRED_MESSAGE));
    upload.assert_async().await;
}

#[tokio::test]
async fn multipart_carries_images_and_options() {
    let mut fx = MockServerFixture::with_token(TOKEN).await;
    let upload = fx
        .server
        .mock("POST", "/api/video/slideshow")
        .match_header("authorization", "Bearer tok-123")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".into()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="images"; filename="img0.png""#.into()),
            Matcher::Regex(r#"name="images"; filename="img2.png""#.into()),
            Matcher::Regex(r#"name="duration_seconds"\s+3"#.into()),
            Matcher::Regex(r#"name="slide_effect"\s+false"#.into()),
            Matcher::Regex(r#"name="transition"\s+kenburns"#.into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"video_url": "/static/videos/abc.mp4", "success": true}"#)
        .create_async()
        .await;

    let request = SlideshowRequest::new(images(3))
        .with_duration(SlideDuration::Three)
        .with_slide_effect(false)
        .with_transition(Transition::KenBurns);
    let video = fx.api().video().generate_slideshow(&request).await.unwrap();

    assert_eq!(video.video_url, "/static/videos/abc.mp4");
    upload.assert_async().await;
}

#[tokio::test]
async fn default_options_are_sent() {
    let mut fx = MockServerFixture::with_token(TOKEN).await;
    let upload = fx
        .server
        .mock("POST", "/api/video/slideshow")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="duration_seconds"\s+2"#.into()),
            Matcher::Regex(r#"name="slide_effect"\s+true"#.into()),
            Matcher::Regex(r#"name="transition"\s+slide"#.into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"video_url": "/v/1.mp4"}"#)
        .create_async()
        .await;

    fx.api()
        .video()
        .generate_slideshow(&SlideshowRequest::new(images(2)))
        .await
        .unwrap();

    upload.assert_async().await;
}

#[tokio::test]
async fn rejected_upload_clears_token_and_asks_for_login() {
    for status in [401, 403] {
        let mut fx = MockServerFixture::with_token(TOKEN).await;
        let _upload = fx
            .mock_json(
                "POST",
                "/api/video/slideshow",
                status,
                r#"{"detail": "Not authenticated"}"#,
            )
            .await;

        let err = fx
            .api()
            .video()
            .generate_slideshow(&SlideshowRequest::new(images(2)))
            .await
            .unwrap_err();

        assert!(err.is_session_expired(), "status {}", status);
        assert_eq!(
            err.user_message(),
            Some("Session expired. Please log in again.")
        );
        assert!(fx.persisted_token().is_none());
    }
}

#[tokio::test]
async fn server_error_surfaces_detail() {
    let mut fx = MockServerFixture::with_token(TOKEN).await;
    let _upload = fx
        .mock_json(
            "POST",
            "/api/video/slideshow",
            500,
            r#"{"detail": "ffmpeg failed"}"#,
        )
        .await;

    let err = fx
        .api()
        .video()
        .generate_slideshow(&SlideshowRequest::new(images(2)))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), Some("ffmpeg failed"));
    assert_eq!(fx.persisted_token().as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn image_read_from_disk_keeps_name_and_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.JPG");
    std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

    let image = ImageUpload::from_path(&path).await.unwrap();

    assert_eq!(image.file_name, "photo.JPG");
    assert_eq!(image.mime_type(), "image/jpeg");
    assert_eq!(image.bytes, vec![0xFF, 0xD8, 0xFF]);
}
