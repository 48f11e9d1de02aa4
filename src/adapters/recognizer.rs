use crate::domain::model::{CapturedPhoto, RecognitionResult};
use crate::domain::ports::{ConfigProvider, Recognizer};
use crate::utils::error::{Result, RiceError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use url::Url;

pub const RECOGNIZE_PATH: &str = "recognize";
pub const UPLOAD_FIELD: &str = "file";
pub const UPLOAD_FILENAME: &str = "imageName.png";
pub const UPLOAD_MIME: &str = "image/png";
/// Error bodies longer than this are cut before they reach notifications.
pub const MAX_ERROR_BODY_CHARS: usize = 512;

/// Client for the remote face-recognition service.
pub struct HttpRecognizer {
    client: Client,
    url: Url,
}

impl HttpRecognizer {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            url: recognize_url(config.endpoint())?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Appends the recognize path to the configured base, keeping any base path.
pub fn recognize_url(base: &str) -> Result<Url> {
    let mut base = Url::parse(base).map_err(|e| RiceError::InvalidConfigValueError {
        field: "service.endpoint".to_string(),
        value: base.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })?;

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(RECOGNIZE_PATH)
        .map_err(|e| RiceError::ConfigError {
            message: format!("cannot build recognize url: {}", e),
        })
}

/// Decodes a response body into validated scores.
pub fn parse_scores(body: &str) -> Result<RecognitionResult> {
    let scores: Vec<f64> =
        serde_json::from_str(body).map_err(|e| RiceError::MalformedResponse {
            message: format!("expected a JSON array of numbers: {}", e),
        })?;
    RecognitionResult::new(scores)
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[async_trait]
impl Recognizer for HttpRecognizer {
    async fn recognize(&self, photo: &CapturedPhoto) -> Result<RecognitionResult> {
        let part = Part::bytes(photo.bytes.clone())
            .file_name(UPLOAD_FILENAME)
            .mime_str(UPLOAD_MIME)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        tracing::debug!(url = %self.url, bytes = photo.bytes.len(), "uploading photo");
        let response = self.client.post(self.url.clone()).multipart(form).send().await?;

        let status = response.status();
        tracing::debug!("recognition response status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(bytes = body.len(), "recognition error body");
            return Err(RiceError::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let result = parse_scores(&body)?;
        tracing::info!(faces = result.faces(), "recognition finished");
        Ok(result)
    }
}
