//! Error taxonomy for scenario steps

use std::fmt::Debug;
use thiserror::Error;

/// Result type alias for step bodies
pub type StepResult<T> = std::result::Result<T, StepError>;

/// Why a step failed.
///
/// Assertion failures (expected value mismatch) are kept distinct from action
/// failures (the underlying UI action could not complete at all) so that run
/// reports show actual-vs-expected for the former and the driver diagnostic
/// for the latter. Fixture failures carry the fixture name; a failing
/// pre-condition fixture aborts the dependent main body.
#[derive(Error, Debug)]
pub enum StepError {
    #[error("Assertion failed: expected {expected}, got {actual}")]
    Assertion { expected: String, actual: String },

    #[error("Action failed: {0}")]
    Action(String),

    #[error("Fixture '{name}' failed: {reason}")]
    Fixture { name: String, reason: String },

    #[error("Step timed out after {ms}ms")]
    Timeout { ms: u64 },
}

impl StepError {
    /// True for expected-value mismatches, false for action/infrastructure
    /// failures.
    pub fn is_assertion(&self) -> bool {
        matches!(self, StepError::Assertion { .. })
    }
}

/// Assert that two values are equal, reporting actual vs expected.
pub fn expect_eq<T: PartialEq + Debug>(actual: T, expected: T) -> StepResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(StepError::Assertion {
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        })
    }
}

/// Assert that a condition holds, naming what was checked.
pub fn expect_true(condition: bool, description: &str) -> StepResult<()> {
    if condition {
        Ok(())
    } else {
        Err(StepError::Assertion {
            expected: format!("{} (true)", description),
            actual: "false".to_string(),
        })
    }
}

/// Assert that `haystack` contains `needle`.
pub fn expect_contains(haystack: &str, needle: &str) -> StepResult<()> {
    if haystack.contains(needle) {
        Ok(())
    } else {
        Err(StepError::Assertion {
            expected: format!("text containing {:?}", needle),
            actual: format!("{:?}", haystack),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expect_eq_mismatch_captures_both_sides() {
        let err = expect_eq("Login", "My account").unwrap_err();
        assert!(err.is_assertion());
        let msg = err.to_string();
        assert!(msg.contains("Login"));
        assert!(msg.contains("My account"));
    }

    #[test]
    fn test_expect_contains() {
        assert!(expect_contains("Password query confirmation", "Password").is_ok());
        assert!(expect_contains("Order shipped", "Password").is_err());
    }

    #[test]
    fn test_action_error_is_not_assertion() {
        let err = StepError::Action("element not found: #submit".to_string());
        assert!(!err.is_assertion());
    }
}
