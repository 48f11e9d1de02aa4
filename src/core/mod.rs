pub mod flow;
pub mod verdict;

pub use crate::domain::model::{CapturedPhoto, FlowState, RecognitionResult, Verdict};
pub use crate::domain::ports::{Camera, ConfigProvider, PermissionGate, Recognizer};
pub use crate::utils::error::Result;
