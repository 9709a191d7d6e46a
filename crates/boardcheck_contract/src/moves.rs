//! Move descriptors and the result of submitting one.

use crate::StateSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque, game-specific description of one attempted action.
///
/// The harness never looks inside a descriptor. It either copies one out of
/// `validMoves` or builds a deliberately broken one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveDescriptor(Value);

impl MoveDescriptor {
    /// Wraps an arbitrary JSON payload.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the payload.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the descriptor, returning the payload.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for MoveDescriptor {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for MoveDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structured result of `perform_move`.
///
/// Rejections are ordinary values: `success` is false and `error` says why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// True if the move was applied.
    pub success: bool,
    /// Reason for a rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// State after the attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StateSnapshot>,
}

impl MoveOutcome {
    /// The move was applied.
    pub fn accepted(state: StateSnapshot) -> Self {
        Self {
            success: true,
            error: None,
            state: Some(state),
        }
    }

    /// The move was refused.
    pub fn rejected(error: impl Into<String>, state: StateSnapshot) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            state: Some(state),
        }
    }

    /// Returns the rejection reason if it is present and non-blank.
    pub fn rejection_reason(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.trim().is_empty())
    }

    /// Returns true for a rejection that explains itself.
    pub fn is_explained_rejection(&self) -> bool {
        !self.success && self.rejection_reason().is_some()
    }
}
