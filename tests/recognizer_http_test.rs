mod common;

use common::TestConfig;
use httpmock::prelude::*;
use rice_check::domain::model::{CapturedPhoto, Facing};
use rice_check::domain::ports::Recognizer;
use rice_check::adapters::recognizer::MAX_ERROR_BODY_CHARS;
use rice_check::{HttpRecognizer, RiceError};

fn ascii_photo() -> CapturedPhoto {
    CapturedPhoto::new("test://photo", b"not-really-png-bytes".to_vec(), Facing::Front)
}

#[tokio::test]
async fn test_upload_is_single_multipart_file_part() {
    let server = MockServer::start_async().await;
    let recognize = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/recognize")
                .header_exists("content-type")
                .body_contains("name=\"file\"")
                .body_contains("filename=\"imageName.png\"")
                .body_contains("image/png")
                .body_contains("not-really-png-bytes");
            then.status(200).json_body(serde_json::json!([0.6, 0.1]));
        })
        .await;

    let recognizer = HttpRecognizer::new(&TestConfig::new(server.base_url(), "unused")).unwrap();
    let result = recognizer.recognize(&ascii_photo()).await.unwrap();

    recognize.assert_async().await;
    assert_eq!(result.scores(), &[0.6, 0.1]);
    assert_eq!(result.positives(), 1);
}

#[tokio::test]
async fn test_base_path_is_kept() {
    let server = MockServer::start_async().await;
    let recognize = server
        .mock_async(|when, then| {
            when.method(POST).path("/faces/recognize");
            then.status(200).body("[]");
        })
        .await;

    let recognizer =
        HttpRecognizer::new(&TestConfig::new(server.url("/faces"), "unused")).unwrap();
    let result = recognizer.recognize(&ascii_photo()).await.unwrap();

    recognize.assert_async().await;
    assert_eq!(result.faces(), 0);
}

#[tokio::test]
async fn test_server_error_is_network_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/recognize");
            then.status(500).body("model crashed");
        })
        .await;

    let recognizer = HttpRecognizer::new(&TestConfig::new(server.base_url(), "unused")).unwrap();
    let err = recognizer.recognize(&ascii_photo()).await.unwrap_err();

    assert!(err.is_network_failure());
    match err {
        RiceError::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model crashed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_long_error_page_is_cut() {
    let server = MockServer::start_async().await;
    let page = format!("<html>{}</html>", "stack frame\n".repeat(400));
    server
        .mock_async(|when, then| {
            when.method(POST).path("/recognize");
            then.status(502).body(page.clone());
        })
        .await;

    let recognizer = HttpRecognizer::new(&TestConfig::new(server.base_url(), "unused")).unwrap();
    let err = recognizer.recognize(&ascii_photo()).await.unwrap_err();

    match err {
        RiceError::HttpStatus { status, body } => {
            assert_eq!(status, 502);
            assert!(body.starts_with("<html>stack frame"));
            assert_eq!(body.chars().count(), MAX_ERROR_BODY_CHARS + 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_array_body_is_rejected() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/recognize");
            then.status(200)
                .json_body(serde_json::json!({"faces": [0.9]}));
        })
        .await;

    let recognizer = HttpRecognizer::new(&TestConfig::new(server.base_url(), "unused")).unwrap();
    let err = recognizer.recognize(&ascii_photo()).await.unwrap_err();

    assert!(matches!(err, RiceError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_out_of_range_score_is_rejected() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/recognize");
            then.status(200).json_body(serde_json::json!([0.4, 42.0]));
        })
        .await;

    let recognizer = HttpRecognizer::new(&TestConfig::new(server.base_url(), "unused")).unwrap();
    let err = recognizer.recognize(&ascii_photo()).await.unwrap_err();

    assert!(err.is_network_failure());
    assert!(matches!(err, RiceError::InvalidScore { index: 1, .. }));
}
