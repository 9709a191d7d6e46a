//! Game start configuration.
//!
//! Targets historically accept a loose option bag (`{mode, players, isHost,
//! roomCode, localPlayerId}`). Here the bag is only the wire form: it is
//! converted into a tagged [`GameConfig`] and validated before any target
//! sees it, so mode-specific fields cannot be missing or contradictory.

use crate::Mode;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// One seat in the player list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSeat {
    /// Display name.
    pub name: String,
    /// True if the target's AI plays this seat.
    #[serde(rename = "isAI", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_ai: bool,
}

impl PlayerSeat {
    /// A seat played by a person.
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_ai: false,
        }
    }

    /// A seat played by the target's AI.
    pub fn ai(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_ai: true,
        }
    }
}

/// Join token for a split session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Wraps a join token.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Which side of a split session this client plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitRole {
    /// Opens the room and owns seat 0.
    Host,
    /// Joins an existing room.
    Guest {
        /// Room to join.
        room_code: RoomCode,
        /// Seat this client controls.
        local_player_id: usize,
    },
}

/// Validated configuration passed to `start_game`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireConfig", into = "WireConfig")]
pub enum GameConfig {
    /// Every seat is played from this client.
    Local {
        /// Ordered seats.
        players: Vec<PlayerSeat>,
        /// Seat override for the viewing client.
        local_player_id: Option<usize>,
    },
    /// At least one seat is played by the target's AI.
    Ai {
        /// Ordered seats.
        players: Vec<PlayerSeat>,
        /// Seat override for the viewing client.
        local_player_id: Option<usize>,
    },
    /// One half of a two-context session.
    LocalSplit {
        /// Ordered seats.
        players: Vec<PlayerSeat>,
        /// Host or guest.
        role: SplitRole,
    },
    /// A mode the harness does not model.
    Custom {
        /// Wire name of the mode.
        mode: String,
        /// Ordered seats.
        players: Vec<PlayerSeat>,
        /// Seat override for the viewing client.
        local_player_id: Option<usize>,
    },
}

impl GameConfig {
    /// Local game with the given seats.
    pub fn local(players: Vec<PlayerSeat>) -> Self {
        GameConfig::Local {
            players,
            local_player_id: None,
        }
    }

    /// Game against the target's AI.
    pub fn ai(players: Vec<PlayerSeat>) -> Self {
        GameConfig::Ai {
            players,
            local_player_id: None,
        }
    }

    /// Host side of a split session.
    pub fn split_host(players: Vec<PlayerSeat>) -> Self {
        GameConfig::LocalSplit {
            players,
            role: SplitRole::Host,
        }
    }

    /// Guest side of a split session.
    pub fn split_guest(players: Vec<PlayerSeat>, room_code: RoomCode, local_player_id: usize) -> Self {
        GameConfig::LocalSplit {
            players,
            role: SplitRole::Guest {
                room_code,
                local_player_id,
            },
        }
    }

    /// Returns the mode this configuration selects.
    pub fn mode(&self) -> Mode {
        match self {
            GameConfig::Local { .. } => Mode::Local,
            GameConfig::Ai { .. } => Mode::Ai,
            GameConfig::LocalSplit { .. } => Mode::LocalSplit,
            GameConfig::Custom { mode, .. } => Mode::from(mode.as_str()),
        }
    }

    /// Returns the ordered seats.
    pub fn players(&self) -> &[PlayerSeat] {
        match self {
            GameConfig::Local { players, .. }
            | GameConfig::Ai { players, .. }
            | GameConfig::LocalSplit { players, .. }
            | GameConfig::Custom { players, .. } => players,
        }
    }

    /// Returns the seat the starting client views the game from.
    ///
    /// Without an override this is seat 0, except in AI games where it is
    /// the first human seat.
    pub fn local_player_id(&self) -> usize {
        match self {
            GameConfig::Local {
                local_player_id, ..
            }
            | GameConfig::Custom {
                local_player_id, ..
            } => local_player_id.unwrap_or(0),
            GameConfig::Ai {
                players,
                local_player_id,
            } => local_player_id
                .or_else(|| players.iter().position(|p| !p.is_ai))
                .unwrap_or(0),
            GameConfig::LocalSplit { role, .. } => match role {
                SplitRole::Host => 0,
                SplitRole::Guest {
                    local_player_id, ..
                } => *local_player_id,
            },
        }
    }

    /// Returns the room code if this is a split-session guest.
    pub fn room_code(&self) -> Option<&RoomCode> {
        match self {
            GameConfig::LocalSplit {
                role: SplitRole::Guest { room_code, .. },
                ..
            } => Some(room_code),
            _ => None,
        }
    }

    /// Returns true if this is a split-session host.
    pub fn is_host(&self) -> bool {
        matches!(
            self,
            GameConfig::LocalSplit {
                role: SplitRole::Host,
                ..
            }
        )
    }

    /// Checks mode-specific requirements.
    #[instrument(skip(self), fields(mode = %self.mode()))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let players = self.players();

        if players.len() < 2 {
            warn!(count = players.len(), "Too few players");
            return Err(ConfigError::new(format!(
                "At least 2 players are required, got {}",
                players.len()
            )));
        }

        if let Some(index) = players.iter().position(|p| p.name.trim().is_empty()) {
            return Err(ConfigError::new(format!("Player {} has an empty name", index)));
        }

        let ai_seats = players.iter().filter(|p| p.is_ai).count();
        match self {
            GameConfig::Local { .. } if ai_seats > 0 => {
                return Err(ConfigError::new(
                    "Local mode cannot contain AI seats".to_string(),
                ));
            }
            GameConfig::Ai { .. } if ai_seats == 0 => {
                return Err(ConfigError::new(
                    "AI mode needs at least one AI seat".to_string(),
                ));
            }
            GameConfig::Ai { .. } if ai_seats == players.len() => {
                return Err(ConfigError::new(
                    "AI mode needs at least one human seat".to_string(),
                ));
            }
            GameConfig::LocalSplit { role, .. } => {
                if ai_seats > 0 {
                    return Err(ConfigError::new(
                        "Split sessions cannot contain AI seats".to_string(),
                    ));
                }
                if let SplitRole::Guest {
                    room_code,
                    local_player_id,
                } = role
                {
                    if room_code.as_str().trim().is_empty() {
                        return Err(ConfigError::new("Guest needs a room code".to_string()));
                    }
                    if *local_player_id == 0 {
                        return Err(ConfigError::new(
                            "Guest cannot take the host's seat 0".to_string(),
                        ));
                    }
                }
            }
            GameConfig::Custom { mode, .. } if mode.trim().is_empty() => {
                return Err(ConfigError::new("Mode name is empty".to_string()));
            }
            _ => {}
        }

        let local = self.local_player_id();
        if local >= players.len() {
            return Err(ConfigError::new(format!(
                "Local player {} is out of range for {} players",
                local,
                players.len()
            )));
        }
        if matches!(self, GameConfig::Ai { .. }) && players[local].is_ai {
            return Err(ConfigError::new(format!(
                "Local player {} is an AI seat",
                local
            )));
        }

        debug!(players = players.len(), local, "Configuration valid");
        Ok(())
    }
}

/// The loose option bag targets receive on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireConfig {
    /// Mode name.
    pub mode: String,
    /// Ordered seats.
    pub players: Vec<PlayerSeat>,
    /// Split sessions: true for the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_host: Option<bool>,
    /// Split sessions: room to join.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_code: Option<String>,
    /// Seat override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_player_id: Option<usize>,
}

impl TryFrom<WireConfig> for GameConfig {
    type Error = ConfigError;

    fn try_from(wire: WireConfig) -> Result<Self, Self::Error> {
        let WireConfig {
            mode,
            players,
            is_host,
            room_code,
            local_player_id,
        } = wire;

        let config = match Mode::from(mode) {
            Mode::Local => GameConfig::Local {
                players,
                local_player_id,
            },
            Mode::Ai => GameConfig::Ai {
                players,
                local_player_id,
            },
            Mode::LocalSplit => {
                let role = if is_host.unwrap_or(false) {
                    SplitRole::Host
                } else {
                    let room_code = room_code.ok_or_else(|| {
                        ConfigError::new("Guest configuration is missing roomCode".to_string())
                    })?;
                    let local_player_id = local_player_id.ok_or_else(|| {
                        ConfigError::new(
                            "Guest configuration is missing localPlayerId".to_string(),
                        )
                    })?;
                    SplitRole::Guest {
                        room_code: RoomCode::new(room_code),
                        local_player_id,
                    }
                };
                GameConfig::LocalSplit { players, role }
            }
            Mode::Other(mode) => GameConfig::Custom {
                mode,
                players,
                local_player_id,
            },
        };

        config.validate()?;
        Ok(config)
    }
}

impl From<GameConfig> for WireConfig {
    fn from(config: GameConfig) -> Self {
        let mode = config.mode().to_string();
        match config {
            GameConfig::Local {
                players,
                local_player_id,
            }
            | GameConfig::Ai {
                players,
                local_player_id,
            }
            | GameConfig::Custom {
                players,
                local_player_id,
                ..
            } => WireConfig {
                mode,
                players,
                is_host: None,
                room_code: None,
                local_player_id,
            },
            GameConfig::LocalSplit { players, role } => match role {
                SplitRole::Host => WireConfig {
                    mode,
                    players,
                    is_host: Some(true),
                    room_code: None,
                    local_player_id: None,
                },
                SplitRole::Guest {
                    room_code,
                    local_player_id,
                } => WireConfig {
                    mode,
                    players,
                    is_host: Some(false),
                    room_code: Some(room_code.as_str().to_string()),
                    local_player_id: Some(local_player_id),
                },
            },
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
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

    fn alice_bob() -> Vec<PlayerSeat> {
        vec![PlayerSeat::human("Alice"), PlayerSeat::human("Bob")]
    }

    #[test]
    fn test_local_defaults_to_seat_zero() {
        let config = GameConfig::local(alice_bob());
        assert!(config.validate().is_ok());
        assert_eq!(config.local_player_id(), 0);
    }

    #[test]
    fn test_single_player_rejected() {
        let config = GameConfig::local(vec![PlayerSeat::human("Solo")]);
        let err = config.validate().unwrap_err();
        assert!(err.message.contains("At least 2 players"));
    }

    #[test]
    fn test_ai_mode_requires_ai_seat() {
        assert!(GameConfig::ai(alice_bob()).validate().is_err());
        let config = GameConfig::ai(vec![PlayerSeat::human("Human"), PlayerSeat::ai("Bot")]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ai_local_seat_is_first_human() {
        let config = GameConfig::ai(vec![PlayerSeat::ai("Bot"), PlayerSeat::human("Human")]);
        assert_eq!(config.local_player_id(), 1);
    }

    #[test]
    fn test_guest_bag_parses() {
        let bag = json!({
            "mode": "local-split",
            "players": [{"name": "Alice"}, {"name": "Bob"}],
            "isHost": false,
            "roomCode": "QX7R",
            "localPlayerId": 1
        });
        let config: GameConfig = serde_json::from_value(bag).unwrap();
        assert_eq!(config.local_player_id(), 1);
        assert_eq!(config.room_code().map(RoomCode::as_str), Some("QX7R"));
    }

    #[test]
    fn test_guest_bag_without_room_code_fails() {
        let bag = json!({
            "mode": "local-split",
            "players": [{"name": "Alice"}, {"name": "Bob"}],
            "isHost": false,
            "localPlayerId": 1
        });
        assert!(serde_json::from_value::<GameConfig>(bag).is_err());
    }

    #[test]
    fn test_wire_shape_matches_camel_case_bag() {
        let config = GameConfig::ai(vec![PlayerSeat::human("Human"), PlayerSeat::ai("Bot")]);
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value,
            json!({
                "mode": "ai",
                "players": [{"name": "Human"}, {"name": "Bot", "isAI": true}]
            })
        );
    }

    #[test]
    fn test_unknown_mode_becomes_custom() {
        let bag = json!({"mode": "puzzle", "players": [{"name": "A"}, {"name": "B"}]});
        let config: GameConfig = serde_json::from_value(bag).unwrap();
        assert_eq!(config.mode(), Mode::Other("puzzle".to_string()));
    }
}
