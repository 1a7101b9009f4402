use atelier_culture::CultureError;
use atelier_safety::SafetyViolation;
use atelier_types::ArtifactKind;
use thiserror::Error;

/// Errors from the template generator family.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneratorError {
    /// The requested culture is not in the knowledge base.
    #[error(transparent)]
    Culture(#[from] CultureError),

    /// An unsafe combination that adjustment could not resolve; carries the
    /// full violation list.
    #[error("safety validation failed for {kind}: {} violation(s)", violations.len())]
    Safety {
        kind: ArtifactKind,
        violations: Vec<SafetyViolation>,
    },

    /// The generic parameters are unusable for this kind.
    #[error("invalid parameters for {kind}: {message}")]
    InvalidParameters {
        kind: ArtifactKind,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safety_error_reports_violation_count() {
        let err = GeneratorError::Safety {
            kind: ArtifactKind::Playground,
            violations: vec![],
        };
        assert!(err.to_string().contains("0 violation(s)"));
    }
}
