//! Assertion helpers that return [`AssertionFailure`] instead of panicking.

use crate::AssertionFailure;
use boardcheck_contract::InvariantViolation;
use std::fmt::Debug;

/// Fails with `message` unless `condition` holds.
#[track_caller]
pub fn ensure<F>(condition: bool, message: F) -> Result<(), AssertionFailure>
where
    F: FnOnce() -> String,
{
    if condition {
        Ok(())
    } else {
        Err(AssertionFailure::new(message()))
    }
}

/// Fails unless `actual == expected`.
#[track_caller]
pub fn ensure_eq<T>(what: &str, actual: T, expected: T) -> Result<(), AssertionFailure>
where
    T: PartialEq + Debug,
{
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionFailure::new(format!(
            "{}: expected {:?}, got {:?}",
            what, expected, actual
        )))
    }
}

/// Converts invariant violations into a single failure.
#[track_caller]
pub fn violated(context: &str, violations: Vec<InvariantViolation>) -> AssertionFailure {
    let listed: Vec<String> = violations.iter().map(ToString::to_string).collect();
    AssertionFailure::new(format!(
        "{} violates invariants: {}",
        context,
        listed.join("; ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_eq_reports_both_sides() {
        let err = ensure_eq("turnNumber", 2, 1).unwrap_err();
        assert_eq!(err.message, "turnNumber: expected 1, got 2");
        assert!(err.file.ends_with("expect.rs"));
    }

    #[test]
    fn test_ensure_is_lazy() {
        assert!(ensure(true, || unreachable!()).is_ok());
    }
}
