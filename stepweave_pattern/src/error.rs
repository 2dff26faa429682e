// Configuration error kinds.
//
// All errors here are deterministic authoring mistakes, not runtime
// faults: regenerating with the same inputs reproduces the same error, so
// nothing is retried. The preset assembly layer decides whether to skip
// the offending pattern or abort its batch; the generator itself never
// emits a partial pattern once an error is detected.

use crate::time::Ratio;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A pattern layer named a subdivision the catalog does not know.
    #[error("unknown beat division `{0}`")]
    InvalidDivision(String),

    /// A competition group's combined weight exceeds the 127 chance
    /// budget. `inherited` is true when carried-forward weight from a
    /// suppressed loser pushed the group over; either way the weights are
    /// an authoring bug and are reported rather than clamped, since
    /// clamping would silently change the pattern's musical intent.
    #[error(
        "probability budget exceeded at bar position {start}: group total {total} > 127 (inherited weight involved: {inherited})"
    )]
    ProbabilityBudgetExceeded {
        start: Ratio,
        total: u32,
        inherited: bool,
    },

    /// Malformed Euclidean rhythm parameters.
    #[error("invalid euclidean parameters: {onsets} onsets over {steps} steps")]
    InvalidParameters { onsets: i64, steps: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PatternError::InvalidDivision("1/7".to_string());
        assert_eq!(err.to_string(), "unknown beat division `1/7`");

        let err = PatternError::ProbabilityBudgetExceeded {
            start: Ratio::new(1, 4),
            total: 140,
            inherited: true,
        };
        assert!(err.to_string().contains("1/4"));
        assert!(err.to_string().contains("140"));
    }
}
