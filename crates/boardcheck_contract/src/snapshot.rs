//! The state snapshot schema the harness relies on.

use crate::{Mode, MoveDescriptor, Phase, RoomCode};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{instrument, warn};

/// One seat as seen by the viewing client.
///
/// Anything beyond `id`, `name` and `isAI` is game-specific and kept in
/// `fields`. Private fields of other seats must not appear there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Seat index.
    pub id: usize,
    /// Display name.
    pub name: String,
    /// True if the target's AI plays this seat.
    #[serde(rename = "isAI", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_ai: bool,
    /// Game-specific fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PlayerRecord {
    /// Returns true if the record carries the named field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Removes the named fields from the record.
    pub fn strip_fields<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            self.fields.remove(name.as_ref());
        }
    }
}

/// A parsed snapshot of the target's state, from one client's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    /// Lifecycle phase.
    pub phase: Phase,
    /// Selected mode; absent in the lobby.
    #[serde(default)]
    pub mode: Option<Mode>,
    /// Seat whose turn is active.
    pub current_player: usize,
    /// Seat of the viewing client.
    pub local_player_id: usize,
    /// Accepted moves so far.
    pub turn_number: u32,
    /// Ordered seats.
    pub players: Vec<PlayerRecord>,
    /// Game-specific board.
    pub board: Value,
    /// Winner, null until the game concludes.
    #[serde(default)]
    pub winner: Option<Value>,
    /// Moves the viewer may submit right now.
    pub valid_moves: Vec<MoveDescriptor>,
    /// Split-session join token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_code: Option<RoomCode>,
}

impl StateSnapshot {
    /// Parses the text produced by `render_state_to_text`.
    #[instrument(skip(text), fields(len = text.len()))]
    pub fn parse(text: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(text).map_err(|e| {
            warn!(error = %e, "Unparseable state text");
            SnapshotError::new(format!("State text is not a valid snapshot: {}", e))
        })
    }

    /// Serializes the snapshot back to text.
    pub fn to_text(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self)
            .map_err(|e| SnapshotError::new(format!("Failed to serialize snapshot: {}", e)))
    }

    /// Returns the record for the given seat.
    pub fn player(&self, id: usize) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Returns the first move in `validMoves`.
    pub fn first_valid_move(&self) -> Option<&MoveDescriptor> {
        self.valid_moves.first()
    }

    /// Lists `(seat, field)` pairs where another seat's private field is visible.
    pub fn leaked_fields<S: AsRef<str>>(&self, private: &[S]) -> Vec<(usize, String)> {
        self.players
            .iter()
            .filter(|p| p.id != self.local_player_id)
            .flat_map(|p| {
                private
                    .iter()
                    .filter(|name| p.has_field(name.as_ref()))
                    .map(move |name| (p.id, name.as_ref().to_string()))
            })
            .collect()
    }

    /// Returns true if moves are still possible.
    pub fn is_live(&self) -> bool {
        self.phase == Phase::Playing && !self.valid_moves.is_empty()
    }
}

/// Error parsing or producing a snapshot.
#[derive(Debug, Clone, Display, Error)]
#[display("Snapshot error: {} at {}:{}", message, file, line)]
pub struct SnapshotError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SnapshotError {
    /// Creates a new snapshot error.
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "phase": "playing",
            "mode": "local",
            "currentPlayer": 0,
            "localPlayerId": 0,
            "turnNumber": 0,
            "players": [
                {"id": 0, "name": "Alice", "hand": 5},
                {"id": 1, "name": "Bob"}
            ],
            "board": [[null, null, null], [null, null, null], [null, null, null]],
            "winner": null,
            "validMoves": [{"row": 0, "col": 0}]
        })
    }

    #[test]
    fn test_parse_keeps_extra_player_fields() {
        let snapshot = StateSnapshot::parse(&sample().to_string()).unwrap();
        assert_eq!(snapshot.mode, Some(Mode::Local));
        assert!(snapshot.players[0].has_field("hand"));
        assert!(snapshot.winner.is_none());
        assert!(snapshot.is_live());
    }

    #[test]
    fn test_own_private_field_is_not_a_leak() {
        let snapshot = StateSnapshot::parse(&sample().to_string()).unwrap();
        assert!(snapshot.leaked_fields(&["hand"]).is_empty());
    }

    #[test]
    fn test_other_private_field_is_a_leak() {
        let mut value = sample();
        value["players"][1]["hand"] = json!(4);
        let snapshot = StateSnapshot::parse(&value.to_string()).unwrap();
        assert_eq!(snapshot.leaked_fields(&["hand"]), vec![(1, "hand".to_string())]);
    }

    #[test]
    fn test_missing_board_is_rejected() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("board");
        let err = StateSnapshot::parse(&value.to_string()).unwrap_err();
        assert!(err.message.contains("board"));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(StateSnapshot::parse("<html>").is_err());
    }
}
