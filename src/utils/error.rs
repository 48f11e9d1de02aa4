use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiceError {
    #[error("Camera permission not granted")]
    PermissionDenied,

    #[error("Camera source unavailable: {source_name}: {reason}")]
    CameraUnavailable { source_name: String, reason: String },

    #[error("Photo capture failed: {message}")]
    CaptureFailure { message: String },

    #[error("Image encoding failed: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Recognition request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Recognition service returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Malformed recognition response: {message}")]
    MalformedResponse { message: String },

    #[error("Invalid confidence score at index {index}: {value}")]
    InvalidScore { index: usize, value: f64 },

    #[error("{faces} faces detected, only one face per photo is supported")]
    UnsupportedCardinality { faces: usize },

    #[error("Operation '{operation}' is not allowed while {state}")]
    InvalidState { operation: String, state: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Permission,
    Camera,
    Network,
    Classification,
    Usage,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RiceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RiceError::PermissionDenied => ErrorCategory::Permission,
            RiceError::CameraUnavailable { .. }
            | RiceError::CaptureFailure { .. }
            | RiceError::ImageError(_) => ErrorCategory::Camera,
            RiceError::Transport(_)
            | RiceError::HttpStatus { .. }
            | RiceError::MalformedResponse { .. }
            | RiceError::InvalidScore { .. } => ErrorCategory::Network,
            RiceError::UnsupportedCardinality { .. } => ErrorCategory::Classification,
            RiceError::InvalidState { .. } => ErrorCategory::Usage,
            RiceError::ConfigError { .. }
            | RiceError::InvalidConfigValueError { .. }
            | RiceError::MissingConfigError { .. } => ErrorCategory::Configuration,
            RiceError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Classification | ErrorCategory::Usage => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Permission => ErrorSeverity::Medium,
            ErrorCategory::Camera | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Transport errors, bad statuses and undecodable or out-of-range bodies all
    /// count as a failed network exchange.
    pub fn is_network_failure(&self) -> bool {
        self.category() == ErrorCategory::Network
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RiceError::PermissionDenied => "Grant access to the camera source and request permission again",
            RiceError::CameraUnavailable { .. } => "Check that the camera device or image file exists and is readable",
            RiceError::CaptureFailure { .. } | RiceError::ImageError(_) => "Try taking the photo again",
            RiceError::Transport(e) if e.is_timeout() => {
                "The recognition service did not answer in time, raise --timeout-secs or try later"
            }
            RiceError::Transport(_) => "Check the network connection and the service endpoint",
            RiceError::HttpStatus { .. } => "The recognition service rejected the photo, try another one",
            RiceError::MalformedResponse { .. } | RiceError::InvalidScore { .. } => {
                "The recognition service answered with an unexpected payload, check the endpoint"
            }
            RiceError::UnsupportedCardinality { .. } => "Take a photo with exactly one face in it",
            RiceError::InvalidState { .. } => "Clear the current result before starting a new check",
            RiceError::ConfigError { .. }
            | RiceError::InvalidConfigValueError { .. }
            | RiceError::MissingConfigError { .. } => "Fix the configuration file or command line flags",
            RiceError::IoError(_) => "Check file permissions and disk state",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Permission => "Camera permission is required".to_string(),
            ErrorCategory::Camera => format!("Could not take a photo: {}", self),
            ErrorCategory::Network => format!("Could not analyze the photo: {}", self),
            ErrorCategory::Classification | ErrorCategory::Usage => self.to_string(),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, RiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_class_covers_bad_payloads() {
        let status = RiceError::HttpStatus {
            status: 500,
            body: "boom".to_string(),
        };
        let malformed = RiceError::MalformedResponse {
            message: "expected array".to_string(),
        };
        let score = RiceError::InvalidScore { index: 0, value: 1.5 };

        assert!(status.is_network_failure());
        assert!(malformed.is_network_failure());
        assert!(score.is_network_failure());
        assert!(!RiceError::PermissionDenied.is_network_failure());
    }

    #[test]
    fn test_severity_ordering() {
        let cardinality = RiceError::UnsupportedCardinality { faces: 2 };
        let config = RiceError::MissingConfigError {
            field: "service.endpoint".to_string(),
        };

        assert_eq!(cardinality.severity(), ErrorSeverity::Low);
        assert_eq!(config.severity(), ErrorSeverity::High);
        assert!(config.severity() > cardinality.severity());
    }
}
