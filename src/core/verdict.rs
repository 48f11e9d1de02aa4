use crate::domain::model::{MultiFacePolicy, Verdict, POSITIVE_THRESHOLD};

/// Maps per-face scores to a verdict, aggregating multi-face photos.
pub fn interpret(scores: &[f64]) -> Verdict {
    let positives = scores.iter().filter(|s| **s >= POSITIVE_THRESHOLD).count();

    match (scores.len(), positives) {
        (0, _) => Verdict::NoFacesFound,
        (1, 0) => Verdict::SingleFaceLikely,
        (1, _) => Verdict::SingleFaceDefinite,
        (_, 0) => Verdict::MultipleFacesLikely,
        (_, _) => Verdict::MultipleFacesAtLeastOnePositive,
    }
}

impl MultiFacePolicy {
    pub fn interpret(self, scores: &[f64]) -> Verdict {
        match self {
            MultiFacePolicy::Unsupported if scores.len() > 1 => Verdict::MultipleFacesUnsupported,
            _ => interpret(scores),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_faces() {
        assert_eq!(interpret(&[]), Verdict::NoFacesFound);
        assert_eq!(
            MultiFacePolicy::Unsupported.interpret(&[]),
            Verdict::NoFacesFound
        );
    }

    #[test]
    fn test_single_face_threshold() {
        for score in [0.5, 0.51, 0.8, 1.0] {
            assert_eq!(interpret(&[score]), Verdict::SingleFaceDefinite, "score {score}");
        }
        for score in [0.0, 0.2, 0.49, 0.4999] {
            assert_eq!(interpret(&[score]), Verdict::SingleFaceLikely, "score {score}");
        }
    }

    #[test]
    fn test_multiple_faces_all_negative() {
        assert_eq!(interpret(&[0.1, 0.2]), Verdict::MultipleFacesLikely);
        assert_eq!(interpret(&[0.0, 0.0, 0.49]), Verdict::MultipleFacesLikely);
    }

    #[test]
    fn test_multiple_faces_any_positive() {
        assert_eq!(
            interpret(&[0.2, 0.9]),
            Verdict::MultipleFacesAtLeastOnePositive
        );
        assert_eq!(
            interpret(&[0.5, 0.5, 0.5]),
            Verdict::MultipleFacesAtLeastOnePositive
        );
    }

    #[test]
    fn test_unsupported_policy_rejects_groups_only() {
        let policy = MultiFacePolicy::Unsupported;
        assert_eq!(policy.interpret(&[0.2, 0.9]), Verdict::MultipleFacesUnsupported);
        assert_eq!(policy.interpret(&[0.1, 0.1]), Verdict::MultipleFacesUnsupported);
        assert_eq!(policy.interpret(&[0.9]), Verdict::SingleFaceDefinite);
        assert_eq!(policy.interpret(&[0.1]), Verdict::SingleFaceLikely);
    }

    #[test]
    fn test_interpret_is_deterministic() {
        let scores = [0.3, 0.7, 0.1];
        let first = interpret(&scores);
        assert_eq!(first, interpret(&scores));
        assert_eq!(
            MultiFacePolicy::AggregateAnyPositive.interpret(&scores),
            first
        );
    }
}
