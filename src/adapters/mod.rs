// Adapters layer: concrete camera, permission and recognition service implementations.

pub mod camera;
pub mod recognizer;
#[cfg(feature = "v4l")]
pub mod v4l_capture;

pub use camera::{SourceCamera, SourcePermission, StaticPermission};
pub use recognizer::HttpRecognizer;
