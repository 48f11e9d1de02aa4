use crate::app::screen::Locale;
use crate::config::toml_config::FileConfig;
use crate::domain::model::{Facing, MultiFacePolicy};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, RiceError};
use crate::utils::validation::{self, Validate};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const MAX_TIMEOUT_SECONDS: u64 = 600;
pub const DEFAULT_BACK_CAMERA: &str = "/dev/video0";
pub const DEFAULT_FRONT_CAMERA: &str = "/dev/video1";

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub back_camera: String,
    pub front_camera: String,
    pub initial_facing: Facing,
    pub policy: MultiFacePolicy,
    pub locale: Locale,
}

impl Settings {
    /// Defaults, then whatever the file sets. The endpoint has no default.
    pub fn from_file_config(file: &FileConfig) -> Self {
        Self {
            endpoint: file.endpoint().unwrap_or_default().to_string(),
            timeout_seconds: file.timeout_seconds().unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            back_camera: file
                .camera_source(Facing::Back)
                .unwrap_or(DEFAULT_BACK_CAMERA)
                .to_string(),
            front_camera: file
                .camera_source(Facing::Front)
                .unwrap_or(DEFAULT_FRONT_CAMERA)
                .to_string(),
            initial_facing: file.initial_facing().unwrap_or_default(),
            policy: file.multi_face_policy().unwrap_or_default(),
            locale: file.locale().unwrap_or_default(),
        }
    }

    /// File first, then command line flags and environment on top.
    #[cfg(feature = "cli")]
    pub fn resolve(cli: &crate::config::CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                tracing::debug!("loading configuration from {}", path.display());
                FileConfig::from_file(path)?
            }
            None => FileConfig::default(),
        };

        let mut settings = Self::from_file_config(&file);
        if let Some(endpoint) = &cli.endpoint {
            settings.endpoint = endpoint.clone();
        }
        if let Some(timeout) = cli.timeout_secs {
            settings.timeout_seconds = timeout;
        }
        if let Some(back) = &cli.back_camera {
            settings.back_camera = back.clone();
        }
        if let Some(front) = &cli.front_camera {
            settings.front_camera = front.clone();
        }
        if let Some(facing) = cli.facing {
            settings.initial_facing = facing;
        }
        if let Some(policy) = cli.policy {
            settings.policy = policy;
        }
        if let Some(locale) = cli.locale {
            settings.locale = locale;
        }

        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(RiceError::MissingConfigError {
                field: "service.endpoint".to_string(),
            });
        }
        validation::validate_url("service.endpoint", &self.endpoint)?;
        validation::validate_range(
            "service.timeout_seconds",
            self.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
        validation::validate_path("camera.back", &self.back_camera)?;
        validation::validate_path("camera.front", &self.front_camera)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn camera_source(&self, facing: Facing) -> &str {
        match facing {
            Facing::Back => &self.back_camera,
            Facing::Front => &self.front_camera,
        }
    }

    fn initial_facing(&self) -> Facing {
        self.initial_facing
    }

    fn multi_face_policy(&self) -> MultiFacePolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply() {
        let file = FileConfig::from_toml_str("[service]\nendpoint = \"http://localhost:8080\"\n").unwrap();
        let settings = Settings::from_file_config(&file);

        assert!(settings.validate().is_ok());
        assert_eq!(settings.request_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECONDS));
        assert_eq!(settings.camera_source(Facing::Back), DEFAULT_BACK_CAMERA);
        assert_eq!(settings.camera_source(Facing::Front), DEFAULT_FRONT_CAMERA);
        assert_eq!(settings.multi_face_policy(), MultiFacePolicy::AggregateAnyPositive);
        assert_eq!(settings.locale, Locale::En);
    }

    #[test]
    fn test_missing_endpoint_rejected() {
        let settings = Settings::from_file_config(&FileConfig::default());
        assert!(matches!(
            settings.validate(),
            Err(RiceError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_timeout_bounds() {
        let file = FileConfig::from_toml_str(
            "[service]\nendpoint = \"http://localhost\"\ntimeout_seconds = 0\n",
        )
        .unwrap();
        assert!(Settings::from_file_config(&file).validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides_file() {
        use crate::config::CliConfig;
        use clap::Parser;
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"[service]\nendpoint = \"http://file-host:8080\"\ntimeout_seconds = 10\n[display]\nlocale = \"ru\"\n",
        )
        .unwrap();

        let cli = CliConfig::parse_from([
            "rice-check",
            "--config",
            file.path().to_str().unwrap(),
            "--endpoint",
            "http://flag-host:9090",
            "--policy",
            "unsupported",
            "--facing",
            "front",
        ]);
        let settings = Settings::resolve(&cli).unwrap();

        assert_eq!(settings.endpoint, "http://flag-host:9090");
        assert_eq!(settings.timeout_seconds, 10);
        assert_eq!(settings.policy, MultiFacePolicy::Unsupported);
        assert_eq!(settings.initial_facing, Facing::Front);
        assert_eq!(settings.locale, Locale::Ru);
    }
}
