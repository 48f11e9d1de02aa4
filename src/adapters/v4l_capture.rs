//! V4L2 still capture via the `v4l` crate.

use crate::utils::error::{Result, RiceError};
use image::{DynamicImage, RgbImage};
use v4l::buffer::Type as BufType;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::FourCC;

// Drivers clamp this to the largest size they support.
const REQUESTED_WIDTH: u32 = 1920;
const REQUESTED_HEIGHT: u32 = 1080;

pub struct V4lDevice {
    device: Device,
    path: String,
    width: u32,
    height: u32,
}

impl V4lDevice {
    pub fn open(path: &str) -> Result<Self> {
        let unavailable = |reason: String| RiceError::CameraUnavailable {
            source_name: path.to_string(),
            reason,
        };

        let device = Device::with_path(path).map_err(|e| unavailable(e.to_string()))?;
        let caps = device
            .query_caps()
            .map_err(|e| unavailable(format!("failed to query capabilities: {e}")))?;
        if !caps
            .capabilities
            .contains(v4l::capability::Flags::VIDEO_CAPTURE)
        {
            return Err(unavailable("not a video capture device".to_string()));
        }

        let mut fmt = device
            .format()
            .map_err(|e| unavailable(format!("failed to get format: {e}")))?;
        fmt.fourcc = FourCC::new(b"YUYV");
        fmt.width = REQUESTED_WIDTH;
        fmt.height = REQUESTED_HEIGHT;

        let negotiated = device
            .set_format(&fmt)
            .map_err(|e| unavailable(format!("failed to set format: {e}")))?;
        if negotiated.fourcc != FourCC::new(b"YUYV") {
            return Err(unavailable(format!(
                "unsupported pixel format: {:?} (need YUYV)",
                negotiated.fourcc
            )));
        }

        tracing::info!(
            device = path,
            card = %caps.card,
            width = negotiated.width,
            height = negotiated.height,
            "opened camera"
        );

        Ok(Self {
            device,
            path: path.to_string(),
            width: negotiated.width,
            height: negotiated.height,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn capture(&self) -> Result<DynamicImage> {
        let mut stream = MmapStream::with_buffers(&self.device, BufType::VideoCapture, 4)
            .map_err(|e| RiceError::CaptureFailure {
                message: format!("failed to create mmap stream: {e}"),
            })?;
        let (buf, meta) = stream.next().map_err(|e| RiceError::CaptureFailure {
            message: format!("failed to dequeue buffer: {e}"),
        })?;
        tracing::debug!(seq = meta.sequence, bytes = buf.len(), "frame dequeued");

        let rgb = yuyv_to_rgb(buf, self.width, self.height)?;
        RgbImage::from_raw(self.width, self.height, rgb)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| RiceError::CaptureFailure {
                message: "frame size does not match negotiated format".to_string(),
            })
    }
}

/// BT.601 YUYV 4:2:2 to packed RGB8.
pub fn yuyv_to_rgb(buf: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let pixels = (width * height) as usize;
    if buf.len() < pixels * 2 {
        return Err(RiceError::CaptureFailure {
            message: format!(
                "YUYV buffer too short: expected {}, got {}",
                pixels * 2,
                buf.len()
            ),
        });
    }

    let mut rgb = Vec::with_capacity(pixels * 3);
    for chunk in buf[..pixels * 2].chunks_exact(4) {
        let u = chunk[1] as f32 - 128.0;
        let v = chunk[3] as f32 - 128.0;
        for y in [chunk[0], chunk[2]] {
            let y = y as f32;
            rgb.push((y + 1.402 * v).clamp(0.0, 255.0) as u8);
            rgb.push((y - 0.344_136 * u - 0.714_136 * v).clamp(0.0, 255.0) as u8);
            rgb.push((y + 1.772 * u).clamp(0.0, 255.0) as u8);
        }
    }
    Ok(rgb)
}
