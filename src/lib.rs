pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HttpRecognizer, SourceCamera, SourcePermission, StaticPermission};
pub use config::settings::Settings;
pub use crate::core::{flow::CaptureAndClassifyFlow, verdict::interpret};
pub use domain::model::{Facing, MultiFacePolicy, Verdict};
pub use utils::error::{Result, RiceError};
