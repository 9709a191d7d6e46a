//! Lifecycle phases of a game session.

use serde::{Deserialize, Serialize};

/// Top-level lifecycle stage of a game session.
///
/// The only legal order is `Lobby -> Playing -> GameOver`. An explicit reset
/// returns any phase to `Lobby`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Phase {
    /// Waiting for a game to be configured.
    Lobby,
    /// A game is running and accepts moves.
    Playing,
    /// The game reached a terminal condition.
    GameOver,
}

impl Phase {
    /// Returns true if no further moves may be accepted.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::GameOver)
    }

    /// Returns true if `next` may directly follow `self` without a reset.
    pub fn may_advance_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Lobby, Phase::Lobby)
                | (Phase::Lobby, Phase::Playing)
                | (Phase::Playing, Phase::Playing)
                | (Phase::Playing, Phase::GameOver)
                | (Phase::GameOver, Phase::GameOver)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Phase::GameOver).unwrap(), "\"gameOver\"");
        assert_eq!(Phase::Lobby.to_string(), "lobby");
        let parsed: Phase = serde_json::from_str("\"playing\"").unwrap();
        assert_eq!(parsed, Phase::Playing);
    }

    #[test]
    fn test_no_phase_is_skipped() {
        assert!(Phase::Lobby.may_advance_to(Phase::Playing));
        assert!(Phase::Playing.may_advance_to(Phase::GameOver));
        assert!(!Phase::Lobby.may_advance_to(Phase::GameOver));
        assert!(!Phase::GameOver.may_advance_to(Phase::Playing));
    }
}
