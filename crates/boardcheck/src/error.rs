//! Harness error types.
//!
//! Every scenario failure is one of these. Deadline expiry is kept apart
//! from assertion failure so a slow opponent is never reported as a wrong
//! one.

use boardcheck_contract::{Fault, SnapshotError, TargetError};
use derive_more::{Display, Error, From};
use std::time::Duration;
use tracing::{error, instrument};

/// An observed outcome contradicted the contract.
#[derive(Debug, Clone, Display, Error)]
#[display("Assertion failed: {} at {}:{}", message, file, line)]
pub struct AssertionFailure {
    /// What was expected and what was seen.
    pub message: String,
    /// Line number where the check was made.
    pub line: u32,
    /// Source file where the check was made.
    pub file: &'static str,
}

impl AssertionFailure {
    /// Creates a new assertion failure at the caller's location.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(assertion = %message, "Assertion failed");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// A polled condition did not become true in time.
#[derive(Debug, Clone, Display, Error)]
#[display("Deadline of {:?} exceeded waiting for {} (last seen: {})", deadline, condition, last_seen)]
pub struct DeadlineExceeded {
    /// The awaited condition.
    pub condition: String,
    /// The budget that ran out.
    pub deadline: Duration,
    /// Summary of the last observed state.
    pub last_seen: String,
}

/// Uncaught faults collected from a page.
#[derive(Debug, Clone)]
pub struct FaultReport {
    /// Every fault, in order.
    pub faults: Vec<Fault>,
}

impl std::error::Error for FaultReport {}

impl std::fmt::Display for FaultReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} uncaught fault(s): ", self.faults.len())?;
        let listed: Vec<String> = self.faults.iter().map(ToString::to_string).collect();
        f.write_str(&listed.join("; "))
    }
}

/// Writing an artifact failed.
#[derive(Debug, Clone, Display, Error)]
#[display("Artifact error: {} at {}:{}", message, file, line)]
pub struct ArtifactError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ArtifactError {
    /// Creates a new artifact error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Any reason a scenario did not pass.
#[derive(Debug, Clone, Display, From)]
pub enum HarnessError {
    /// The target broke the contract.
    #[display("{}", _0)]
    Assertion(AssertionFailure),

    /// An awaited condition timed out.
    #[display("{}", _0)]
    Deadline(DeadlineExceeded),

    /// The page raised uncaught faults.
    #[display("{}", _0)]
    Faults(FaultReport),

    /// A capability call failed.
    #[display("{}", _0)]
    Target(TargetError),

    /// Rendered state could not be parsed.
    #[display("{}", _0)]
    Snapshot(SnapshotError),

    /// An artifact could not be written.
    #[display("{}", _0)]
    Artifact(ArtifactError),
}

impl std::error::Error for HarnessError {}

impl HarnessError {
    /// Short category name used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            HarnessError::Assertion(_) => "assertion",
            HarnessError::Deadline(_) => "deadline",
            HarnessError::Faults(_) => "fault",
            HarnessError::Target(_) => "target",
            HarnessError::Snapshot(_) => "snapshot",
            HarnessError::Artifact(_) => "artifact",
        }
    }
}
