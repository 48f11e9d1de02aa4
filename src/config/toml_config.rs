use crate::app::screen::Locale;
use crate::domain::model::{Facing, MultiFacePolicy};
use crate::utils::error::{Result, RiceError};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk configuration. Every key is optional; defaults fill the gaps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub service: Option<ServiceConfig>,
    pub camera: Option<CameraConfig>,
    pub classifier: Option<ClassifierConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraConfig {
    pub back: Option<String>,
    pub front: Option<String>,
    pub initial_facing: Option<Facing>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    pub multi_face_policy: Option<MultiFacePolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    pub locale: Option<Locale>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content)?;
        toml::from_str(&processed).map_err(|e| RiceError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.service.as_ref()?.endpoint.as_deref()
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.service.as_ref()?.timeout_seconds
    }

    pub fn camera_source(&self, facing: Facing) -> Option<&str> {
        let camera = self.camera.as_ref()?;
        match facing {
            Facing::Back => camera.back.as_deref(),
            Facing::Front => camera.front.as_deref(),
        }
    }

    pub fn initial_facing(&self) -> Option<Facing> {
        self.camera.as_ref()?.initial_facing
    }

    pub fn multi_face_policy(&self) -> Option<MultiFacePolicy> {
        self.classifier.as_ref()?.multi_face_policy
    }

    pub fn locale(&self) -> Option<Locale> {
        self.display.as_ref()?.locale
    }
}

/// Replaces `${VAR}` with the environment value; unknown variables are left as written.
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RiceError::ConfigError {
        message: format!("invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });
    Ok(result.into_owned())
}
