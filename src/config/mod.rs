pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::app::screen::Locale;
#[cfg(feature = "cli")]
use crate::domain::model::{Facing, MultiFacePolicy};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "rice-check")]
#[command(about = "Take a photo and find out who likes rice")]
pub struct CliConfig {
    #[arg(long, short = 'c', help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "RICE_CHECK_ENDPOINT", help = "Base URL of the recognition service")]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, help = "Back camera: /dev/videoN or an image file")]
    pub back_camera: Option<String>,

    #[arg(long, help = "Front camera: /dev/videoN or an image file")]
    pub front_camera: Option<String>,

    #[arg(long)]
    pub facing: Option<Facing>,

    #[arg(long, help = "aggregate | unsupported")]
    pub policy: Option<MultiFacePolicy>,

    #[arg(long)]
    pub locale: Option<Locale>,

    #[arg(long, help = "Capture once, print the verdict and exit")]
    pub once: bool,

    #[arg(long, help = "Skip the camera access check")]
    pub assume_granted: bool,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub log_json: bool,
}
