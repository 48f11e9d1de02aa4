use crate::utils::error::{Result, RiceError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scores at or above this value count as a positive match.
pub const POSITIVE_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    #[default]
    Back,
    Front,
}

impl Facing {
    pub fn toggled(self) -> Self {
        match self {
            Facing::Back => Facing::Front,
            Facing::Front => Facing::Back,
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facing::Back => write!(f, "back"),
            Facing::Front => write!(f, "front"),
        }
    }
}

impl std::str::FromStr for Facing {
    type Err = RiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "back" | "rear" => Ok(Facing::Back),
            "front" | "selfie" => Ok(Facing::Front),
            other => Err(RiceError::InvalidConfigValueError {
                field: "facing".to_string(),
                value: other.to_string(),
                reason: "Expected 'back' or 'front'".to_string(),
            }),
        }
    }
}

/// How results with more than one face are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiFacePolicy {
    /// Aggregate over all faces: at least one positive wins.
    #[default]
    #[serde(alias = "aggregate")]
    AggregateAnyPositive,
    /// Photos with several faces are rejected.
    #[serde(alias = "single")]
    Unsupported,
}

impl std::str::FromStr for MultiFacePolicy {
    type Err = RiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "aggregate_any_positive" | "aggregate" => Ok(MultiFacePolicy::AggregateAnyPositive),
            "unsupported" | "single" => Ok(MultiFacePolicy::Unsupported),
            other => Err(RiceError::InvalidConfigValueError {
                field: "multi_face_policy".to_string(),
                value: other.to_string(),
                reason: "Expected 'aggregate' or 'unsupported'".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    NoFacesFound,
    SingleFaceDefinite,
    SingleFaceLikely,
    MultipleFacesAtLeastOnePositive,
    MultipleFacesLikely,
    MultipleFacesUnsupported,
}

/// A photo taken by the camera, PNG encoded.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    pub uri: String,
    pub bytes: Vec<u8>,
    pub facing: Facing,
    pub captured_at: DateTime<Utc>,
}

impl CapturedPhoto {
    pub fn new(uri: impl Into<String>, bytes: Vec<u8>, facing: Facing) -> Self {
        Self {
            uri: uri.into(),
            bytes,
            facing,
            captured_at: Utc::now(),
        }
    }
}

impl fmt::Debug for CapturedPhoto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedPhoto")
            .field("uri", &self.uri)
            .field("bytes", &self.bytes.len())
            .field("facing", &self.facing)
            .field("captured_at", &self.captured_at)
            .finish()
    }
}

/// Per-face confidence scores, each guaranteed finite and within `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecognitionResult {
    scores: Vec<f64>,
}

impl RecognitionResult {
    pub fn new(scores: Vec<f64>) -> Result<Self> {
        if let Some((index, &value)) = scores
            .iter()
            .enumerate()
            .find(|(_, s)| !s.is_finite() || **s < 0.0 || **s > 1.0)
        {
            return Err(RiceError::InvalidScore { index, value });
        }
        Ok(Self { scores })
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn faces(&self) -> usize {
        self.scores.len()
    }

    pub fn positives(&self) -> usize {
        self.scores
            .iter()
            .filter(|s| **s >= POSITIVE_THRESHOLD)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    PermissionRequired,
    Idle,
    Capturing,
    Uploading {
        photo: CapturedPhoto,
    },
    Displaying {
        photo: CapturedPhoto,
        result: RecognitionResult,
        verdict: Verdict,
    },
}

impl FlowState {
    pub fn phase(&self) -> Phase {
        match self {
            FlowState::PermissionRequired => Phase::PermissionRequired,
            FlowState::Idle => Phase::Idle,
            FlowState::Capturing => Phase::Capturing,
            FlowState::Uploading { .. } => Phase::Uploading,
            FlowState::Displaying { verdict, .. } => Phase::Displaying(*verdict),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PermissionRequired,
    Idle,
    Capturing,
    Uploading,
    Displaying(Verdict),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::PermissionRequired => write!(f, "waiting for camera permission"),
            Phase::Idle => write!(f, "idle"),
            Phase::Capturing => write!(f, "capturing"),
            Phase::Uploading => write!(f, "uploading"),
            Phase::Displaying(_) => write!(f, "displaying a verdict"),
        }
    }
}

/// Error surfaced to the user after a failed capture session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub suggestion: String,
}

impl From<&RiceError> for Notification {
    fn from(err: &RiceError) -> Self {
        Self {
            message: err.user_friendly_message(),
            suggestion: err.recovery_suggestion().to_string(),
        }
    }
}

/// Observable view of the flow, published on every transition.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSnapshot {
    pub phase: Phase,
    pub facing: Facing,
    pub photo_uri: Option<String>,
    pub scores: Option<Vec<f64>>,
    pub notification: Option<Notification>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognition_result_accepts_bounds() {
        let result = RecognitionResult::new(vec![0.0, 0.5, 1.0]).unwrap();
        assert_eq!(result.faces(), 3);
        assert_eq!(result.positives(), 2);
    }

    #[test]
    fn test_recognition_result_rejects_out_of_range() {
        let err = RecognitionResult::new(vec![0.3, 1.2]).unwrap_err();
        match err {
            RiceError::InvalidScore { index, value } => {
                assert_eq!(index, 1);
                assert_eq!(value, 1.2);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(RecognitionResult::new(vec![-0.1]).is_err());
        assert!(RecognitionResult::new(vec![f64::NAN]).is_err());
    }

    #[test]
    fn test_facing_parse_and_toggle() {
        assert_eq!("Front".parse::<Facing>().unwrap(), Facing::Front);
        assert_eq!(Facing::Back.toggled(), Facing::Front);
        assert_eq!(Facing::Front.toggled().toggled(), Facing::Front);
        assert!("sideways".parse::<Facing>().is_err());
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "aggregate-any-positive".parse::<MultiFacePolicy>().unwrap(),
            MultiFacePolicy::AggregateAnyPositive
        );
        assert_eq!(
            "unsupported".parse::<MultiFacePolicy>().unwrap(),
            MultiFacePolicy::Unsupported
        );
        assert!("majority".parse::<MultiFacePolicy>().is_err());
    }
}
