//! The capability interface a game under test must expose.
//!
//! A target is injected into the harness as a value implementing
//! [`GameTarget`]; nothing is read from ambient globals. Pages are opened
//! through a [`Browser`] so every scenario gets an isolated context, and
//! pages sharing a context can reach each other the way browser tabs do.

use crate::{ConfigError, FaultLog, GameConfig, MoveDescriptor, MoveOutcome, PageSurface, StateSnapshot};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Which entry points a target exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// `render_state_to_text`.
    pub render: bool,
    /// `perform_move`.
    pub perform_move: bool,
    /// `start_game`.
    pub start_game: bool,
    /// `receive_state` (optional).
    pub receive_state: bool,
    /// `player_view` (optional).
    pub player_view: bool,
}

impl Capabilities {
    /// The three mandatory entry points, nothing optional.
    pub fn required_only() -> Self {
        Self {
            render: true,
            perform_move: true,
            start_game: true,
            receive_state: false,
            player_view: false,
        }
    }

    /// Every entry point.
    pub fn all() -> Self {
        Self {
            render: true,
            perform_move: true,
            start_game: true,
            receive_state: true,
            player_view: true,
        }
    }

    /// Names of missing mandatory entry points.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            (self.render, "render_state_to_text"),
            (self.perform_move, "perform_move"),
            (self.start_game, "start_game"),
        ]
        .into_iter()
        .filter(|(present, _)| !present)
        .map(|(_, name)| name)
        .collect()
    }
}

/// Failure of a capability call outside the move result contract.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum TargetError {
    /// The target does not implement this entry point or mode.
    #[display("Unsupported capability: {}", _0)]
    Unsupported(String),

    /// The target refused the start configuration.
    #[display("Rejected configuration: {}", _0)]
    Config(String),

    /// The target raised an uncaught error.
    #[display("Target fault: {}", _0)]
    Fault(String),

    /// No visible element matches the selector.
    #[display("No visible element matches {}", _0)]
    ElementNotFound(String),

    /// A capability was called before `load`.
    #[display("Target is not loaded")]
    NotLoaded,
}

impl std::error::Error for TargetError {}

impl From<ConfigError> for TargetError {
    fn from(err: ConfigError) -> Self {
        TargetError::Config(err.message)
    }
}

impl TargetError {
    /// Returns true if the error only signals a missing optional feature.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, TargetError::Unsupported(_))
    }
}

/// Entry points of a game under test.
#[async_trait]
pub trait GameTarget: Send + Sync {
    /// Loads the target, the equivalent of navigating to its page.
    async fn load(&self) -> Result<(), TargetError>;

    /// Reports which entry points exist.
    fn capabilities(&self) -> Capabilities {
        Capabilities::required_only()
    }

    /// Serializes the current state from the viewing client's perspective.
    ///
    /// Must succeed in every phase once loaded.
    async fn render_state_to_text(&self) -> Result<String, TargetError>;

    /// Attempts a move.
    ///
    /// Malformed, out-of-range, out-of-turn and post-game moves are rejected
    /// through the returned [`MoveOutcome`], never through `Err`.
    async fn perform_move(&self, mv: &MoveDescriptor) -> Result<MoveOutcome, TargetError>;

    /// Starts a game, bypassing the lobby. The new state is observable as
    /// soon as this returns.
    async fn start_game(&self, config: &GameConfig) -> Result<(), TargetError>;

    /// Applies a snapshot received from a remote peer.
    async fn receive_state(&self, _state: &StateSnapshot) -> Result<(), TargetError> {
        Err(TargetError::Unsupported("receive_state".to_string()))
    }

    /// Restricts a snapshot to what one seat may see.
    async fn player_view(
        &self,
        _state: &StateSnapshot,
        _player_id: usize,
    ) -> Result<StateSnapshot, TargetError> {
        Err(TargetError::Unsupported("player_view".to_string()))
    }
}

/// Opens isolated contexts.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Context type.
    type Context: BrowserContext;

    /// Opens a fresh context with no shared state.
    async fn new_context(&self) -> Result<Self::Context, TargetError>;
}

/// A set of pages sharing out-of-band channels.
#[async_trait]
pub trait BrowserContext: Send + Sync {
    /// Page type.
    type Page: GameTarget + PageSurface;

    /// Opens a page. `faults` is listening before the page loads.
    async fn new_page(&self, faults: FaultLog) -> Result<Self::Page, TargetError>;

    /// Closes every page of this context.
    async fn close(&self) -> Result<(), TargetError>;
}
