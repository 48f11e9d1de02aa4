#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use rice_check::domain::model::{Facing, MultiFacePolicy};
use rice_check::domain::ports::{ConfigProvider, PermissionGate, PermissionStatus};
use std::time::Duration;
use tempfile::TempDir;

pub struct TestConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub photo: String,
    pub policy: MultiFacePolicy,
}

impl TestConfig {
    pub fn new(endpoint: impl Into<String>, photo: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(10),
            photo: photo.into(),
            policy: MultiFacePolicy::AggregateAnyPositive,
        }
    }
}

impl ConfigProvider for TestConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_timeout(&self) -> Duration {
        self.timeout
    }

    fn camera_source(&self, _facing: Facing) -> &str {
        &self.photo
    }

    fn initial_facing(&self) -> Facing {
        Facing::Back
    }

    fn multi_face_policy(&self) -> MultiFacePolicy {
        self.policy
    }
}

/// Writes a small PNG that stands in for the camera and returns its path.
pub fn write_photo(dir: &TempDir) -> String {
    let path = dir.path().join("selfie.png");
    DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([240, 230, 210])))
        .save_with_format(&path, ImageFormat::Png)
        .expect("write test photo");
    path.to_str().expect("utf-8 temp path").to_string()
}

/// Denied until the user asks, then granted.
pub struct PromptPermission {
    pub status: PermissionStatus,
}

impl PromptPermission {
    pub fn undecided() -> Self {
        Self {
            status: PermissionStatus::Undetermined,
        }
    }
}

impl PermissionGate for PromptPermission {
    fn status(&self) -> PermissionStatus {
        self.status
    }

    async fn request(&mut self) -> PermissionStatus {
        self.status = PermissionStatus::Granted;
        self.status
    }
}
