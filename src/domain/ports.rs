use crate::domain::model::{CapturedPhoto, Facing, MultiFacePolicy, RecognitionResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Undetermined,
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }
}

/// Exclusive handle on a camera. At most one facing is bound at a time.
pub trait Camera: Send {
    fn open(&mut self, facing: Facing) -> Result<()>;
    fn close(&mut self);
    fn is_open(&self) -> bool;
    fn capture(&mut self) -> impl std::future::Future<Output = Result<CapturedPhoto>> + Send;
}

pub trait PermissionGate: Send {
    fn status(&self) -> PermissionStatus;
    fn request(&mut self) -> impl std::future::Future<Output = PermissionStatus> + Send;
}

#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, photo: &CapturedPhoto) -> Result<RecognitionResult>;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn camera_source(&self, facing: Facing) -> &str;
    fn initial_facing(&self) -> Facing;
    fn multi_face_policy(&self) -> MultiFacePolicy;
}
