//! Harness configuration.

use boardcheck_contract::{GameConfig, PlayerSeat};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Deadlines and pauses, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Interval between state polls.
    poll_interval_ms: u64,
    /// Pause that lets a page settle before it is observed.
    settle_ms: u64,
    /// Deadline for a split-session peer to converge.
    split_sync_ms: u64,
    /// Deadline for the AI opponent to reply.
    ai_reply_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_interval_ms: 25,
            settle_ms: 500,
            split_sync_ms: 500,
            ai_reply_ms: 1500,
        }
    }
}

impl Timing {
    /// Builds a timing table from milliseconds.
    pub fn new(poll_interval_ms: u64, settle_ms: u64, split_sync_ms: u64, ai_reply_ms: u64) -> Self {
        Self {
            poll_interval_ms,
            settle_ms,
            split_sync_ms,
            ai_reply_ms,
        }
    }

    /// Interval between state polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Settle pause.
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Split-session convergence deadline.
    pub fn split_sync(&self) -> Duration {
        Duration::from_millis(self.split_sync_ms)
    }

    /// AI reply deadline.
    pub fn ai_reply(&self) -> Duration {
        Duration::from_millis(self.ai_reply_ms)
    }
}

/// Configuration for a conformance run.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Seats for local games.
    #[serde(default = "default_players")]
    players: Vec<PlayerSeat>,

    /// Seats for games against the AI.
    #[serde(default = "default_ai_players")]
    ai_players: Vec<PlayerSeat>,

    /// Player fields only their owner may see.
    #[serde(default = "default_private_fields")]
    private_fields: Vec<String>,

    /// Deadlines and pauses.
    #[serde(default)]
    timing: Timing,

    /// Random moves played by the progression scenario.
    #[serde(default = "default_progression_turns")]
    progression_turns: usize,

    /// Moves allowed before a game is deemed never to finish.
    #[serde(default = "default_completion_turn_limit")]
    completion_turn_limit: usize,

    /// Moves played before the mid-game capture.
    #[serde(default = "default_midgame_moves")]
    midgame_moves: usize,

    /// Seed for random move selection.
    #[serde(default = "default_seed")]
    seed: u64,

    /// Where captures are written.
    #[serde(default = "default_artifact_dir")]
    artifact_dir: PathBuf,
}

fn default_players() -> Vec<PlayerSeat> {
    vec![PlayerSeat::human("Alice"), PlayerSeat::human("Bob")]
}

fn default_ai_players() -> Vec<PlayerSeat> {
    vec![PlayerSeat::human("Human"), PlayerSeat::ai("Bot")]
}

fn default_private_fields() -> Vec<String> {
    vec!["hand".to_string()]
}

fn default_progression_turns() -> usize {
    10
}

fn default_completion_turn_limit() -> usize {
    200
}

fn default_midgame_moves() -> usize {
    5
}

fn default_seed() -> u64 {
    0x5eed
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            players: default_players(),
            ai_players: default_ai_players(),
            private_fields: default_private_fields(),
            timing: Timing::default(),
            progression_turns: default_progression_turns(),
            completion_turn_limit: default_completion_turn_limit(),
            midgame_moves: default_midgame_moves(),
            seed: default_seed(),
            artifact_dir: default_artifact_dir(),
        }
    }
}

impl HarnessConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        info!(seed = config.seed, "Config loaded successfully");
        Ok(config)
    }

    /// Checks that the seat lists form valid local and AI games.
    pub fn validate(&self) -> Result<(), ConfigError> {
        GameConfig::local(self.players.clone())
            .validate()
            .map_err(|e| ConfigError::new(format!("players: {}", e.message)))?;
        GameConfig::ai(self.ai_players.clone())
            .validate()
            .map_err(|e| ConfigError::new(format!("ai_players: {}", e.message)))?;
        Ok(())
    }

    /// Replaces the artifact directory.
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    /// Replaces the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replaces the timing table.
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Replaces the private field names.
    pub fn with_private_fields(mut self, fields: Vec<String>) -> Self {
        self.private_fields = fields;
        self
    }

    /// A local-mode start configuration with the configured seats.
    pub fn local_game(&self) -> GameConfig {
        GameConfig::local(self.players.clone())
    }

    /// An AI-mode start configuration with the configured seats.
    pub fn ai_game(&self) -> GameConfig {
        GameConfig::ai(self.ai_players.clone())
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
    #[instrument(skip(message))]
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

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: HarnessConfig = toml::from_str(
            r#"
            seed = 7

            [timing]
            ai_reply_ms = 3000
            "#,
        )
        .unwrap();
        assert_eq!(*config.seed(), 7);
        assert_eq!(config.timing().ai_reply(), Duration::from_millis(3000));
        assert_eq!(*config.timing().poll_interval_ms(), 25);
        assert_eq!(config.players().len(), 2);
        assert_eq!(config.private_fields(), &vec!["hand".to_string()]);
    }

    #[test]
    fn test_ai_players_need_an_ai() {
        let config: HarnessConfig = toml::from_str(
            r#"
            [[ai_players]]
            name = "One"

            [[ai_players]]
            name = "Two"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
        assert!(HarnessConfig::default().validate().is_ok());
    }
}
