use crate::domain::model::{CapturedPhoto, Facing};
use crate::domain::ports::{Camera, ConfigProvider, PermissionGate, PermissionStatus};
use crate::utils::error::{Result, RiceError};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};

#[cfg(feature = "v4l")]
use crate::adapters::v4l_capture::V4lDevice;

const DEVICE_PREFIX: &str = "/dev/video";

pub fn is_device_path(source: &str) -> bool {
    source.starts_with(DEVICE_PREFIX)
}

/// Lossless PNG at the source's native resolution.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

enum ActiveSource {
    File(PathBuf),
    #[cfg(feature = "v4l")]
    Device(V4lDevice),
}

/// Camera backed by one source per facing: a V4L2 device node or an image file.
pub struct SourceCamera {
    back: String,
    front: String,
    facing: Facing,
    active: Option<ActiveSource>,
}

impl SourceCamera {
    pub fn new(back: impl Into<String>, front: impl Into<String>) -> Self {
        Self {
            back: back.into(),
            front: front.into(),
            facing: Facing::Back,
            active: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(
            config.camera_source(Facing::Back),
            config.camera_source(Facing::Front),
        )
    }

    pub fn source(&self, facing: Facing) -> &str {
        match facing {
            Facing::Back => &self.back,
            Facing::Front => &self.front,
        }
    }

    fn open_source(source: &str) -> Result<ActiveSource> {
        if is_device_path(source) {
            #[cfg(feature = "v4l")]
            {
                return V4lDevice::open(source).map(ActiveSource::Device);
            }
            #[cfg(not(feature = "v4l"))]
            {
                return Err(RiceError::CameraUnavailable {
                    source_name: source.to_string(),
                    reason: "built without the 'v4l' feature".to_string(),
                });
            }
        }

        let path = Path::new(source);
        if !path.is_file() {
            return Err(RiceError::CameraUnavailable {
                source_name: source.to_string(),
                reason: "no such image file".to_string(),
            });
        }
        Ok(ActiveSource::File(path.to_path_buf()))
    }
}

impl Camera for SourceCamera {
    fn open(&mut self, facing: Facing) -> Result<()> {
        self.close();
        let source = self.source(facing).to_string();
        self.active = Some(Self::open_source(&source)?);
        self.facing = facing;
        tracing::debug!(%facing, source = %source, "camera bound");
        Ok(())
    }

    fn close(&mut self) {
        if self.active.take().is_some() {
            tracing::debug!(facing = %self.facing, "camera released");
        }
    }

    fn is_open(&self) -> bool {
        self.active.is_some()
    }

    async fn capture(&mut self) -> Result<CapturedPhoto> {
        let facing = self.facing;
        let path = match &self.active {
            None => {
                return Err(RiceError::CaptureFailure {
                    message: "camera is not bound".to_string(),
                })
            }
            Some(ActiveSource::File(path)) => path.clone(),
            #[cfg(feature = "v4l")]
            Some(ActiveSource::Device(device)) => {
                let frame = device.capture()?;
                let bytes = encode_png(&frame)?;
                return Ok(CapturedPhoto::new(
                    format!("v4l://{}", device.path()),
                    bytes,
                    facing,
                ));
            }
        };

        let raw = tokio::fs::read(&path).await?;
        let bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
            let image = image::load_from_memory(&raw)?;
            encode_png(&image)
        })
        .await
        .map_err(|e| RiceError::CaptureFailure {
            message: format!("encoder task failed: {}", e),
        })??;

        Ok(CapturedPhoto::new(
            format!("file://{}", path.display()),
            bytes,
            facing,
        ))
    }
}

/// Access is granted when at least one configured source can be opened for reading.
pub struct SourcePermission {
    sources: Vec<String>,
}

impl SourcePermission {
    pub fn new(sources: Vec<String>) -> Self {
        Self { sources }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(vec![
            config.camera_source(Facing::Back).to_string(),
            config.camera_source(Facing::Front).to_string(),
        ])
    }

    fn check(&self) -> PermissionStatus {
        if self
            .sources
            .iter()
            .any(|source| std::fs::File::open(source).is_ok())
        {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}

impl PermissionGate for SourcePermission {
    fn status(&self) -> PermissionStatus {
        self.check()
    }

    async fn request(&mut self) -> PermissionStatus {
        let status = self.check();
        if !status.is_granted() {
            tracing::warn!(sources = ?self.sources, "no camera source is readable");
        }
        status
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StaticPermission(pub PermissionStatus);

impl PermissionGate for StaticPermission {
    fn status(&self) -> PermissionStatus {
        self.0
    }

    async fn request(&mut self) -> PermissionStatus {
        self.0
    }
}
