//! The fixed catalogue of conformance scenarios.

use serde::Serialize;
use strum::IntoEnumIterator;

/// A family of related scenarios.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Group {
    /// Lobby screen and lobby bypass.
    Lobby,
    /// Loading and the initial state.
    Initialization,
    /// Accepting and rejecting moves.
    MoveExecution,
    /// Visible page elements.
    UiElements,
    /// Sustained random play.
    Progression,
    /// Private per-seat data.
    HiddenInformation,
    /// The built-in opponent.
    AiOpponent,
    /// Two pages sharing one game.
    SplitSession,
    /// Hostile and out-of-range input.
    Negative,
    /// Styling tokens and typography.
    VisualStandards,
    /// Visual snapshots written to disk.
    Artifacts,
}

/// One conformance scenario. [`ScenarioId::title`] describes each.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ScenarioId {
    LobbyShownOnLoad,
    LocalModeControlPresent,
    StartGameBypassesLobby,
    LoadsWithoutFaults,
    RequiredCapabilities,
    InitialStateValid,
    ValidMovesAtStart,
    ValidMoveAdvancesTurn,
    InvalidMoveRejected,
    TurnAlternates,
    EveryValidMoveAccepted,
    NewGameReturnsToLobby,
    CurrentPlayerVisible,
    BoardVisibleDuringPlay,
    RandomPlayWithoutFaults,
    PrivateFieldsHidden,
    PlayerViewRestricted,
    AiRepliesOnItsTurn,
    SplitPagesConverge,
    MalformedMovesRejected,
    OutOfBoundsRejected,
    NoMovesAfterGameOver,
    StyleTokensDefined,
    BodyTypefaceSet,
    CaptureLobby,
    CaptureInitialBoard,
    CaptureMidGame,
}

impl ScenarioId {
    /// The group this scenario belongs to.
    pub fn group(self) -> Group {
        use ScenarioId::*;
        match self {
            LobbyShownOnLoad | LocalModeControlPresent | StartGameBypassesLobby => Group::Lobby,
            LoadsWithoutFaults | RequiredCapabilities | InitialStateValid | ValidMovesAtStart => {
                Group::Initialization
            }
            ValidMoveAdvancesTurn | InvalidMoveRejected | TurnAlternates
            | EveryValidMoveAccepted => Group::MoveExecution,
            NewGameReturnsToLobby | CurrentPlayerVisible | BoardVisibleDuringPlay => {
                Group::UiElements
            }
            RandomPlayWithoutFaults => Group::Progression,
            PrivateFieldsHidden | PlayerViewRestricted => Group::HiddenInformation,
            AiRepliesOnItsTurn => Group::AiOpponent,
            SplitPagesConverge => Group::SplitSession,
            MalformedMovesRejected | OutOfBoundsRejected | NoMovesAfterGameOver => Group::Negative,
            StyleTokensDefined | BodyTypefaceSet => Group::VisualStandards,
            CaptureLobby | CaptureInitialBoard | CaptureMidGame => Group::Artifacts,
        }
    }

    /// What the scenario checks, in one line.
    pub fn title(self) -> &'static str {
        use ScenarioId::*;
        match self {
            LobbyShownOnLoad => "lobby is shown on load and the board is hidden",
            LocalModeControlPresent => "a local-mode control is present in the lobby",
            StartGameBypassesLobby => "start_game moves straight from lobby to playing",
            LoadsWithoutFaults => "the page loads without uncaught faults",
            RequiredCapabilities => "render, perform_move and start_game are available",
            InitialStateValid => "a fresh local game has the canonical initial state",
            ValidMovesAtStart => "valid moves are available at the start",
            ValidMoveAdvancesTurn => "a valid move succeeds and advances the turn by one",
            InvalidMoveRejected => "an invalid move is rejected with an error",
            TurnAlternates => "the turn passes between players",
            EveryValidMoveAccepted => "every advertised valid move is accepted",
            NewGameReturnsToLobby => "the new-game control returns to the lobby",
            CurrentPlayerVisible => "the current-player indicator is visible",
            BoardVisibleDuringPlay => "the board is visible during play",
            RandomPlayWithoutFaults => "random valid moves are all accepted without faults",
            PrivateFieldsHidden => "other players' private fields are not rendered",
            PlayerViewRestricted => "a non-active player's view has no moves and no secrets",
            AiRepliesOnItsTurn => "the AI replies and hands the turn back",
            SplitPagesConverge => "host and guest pages converge on one game",
            MalformedMovesRejected => "malformed moves are rejected gracefully",
            OutOfBoundsRejected => "an out-of-bounds move is rejected",
            NoMovesAfterGameOver => "no move is accepted after the game ends",
            StyleTokensDefined => "root styling tokens are defined",
            BodyTypefaceSet => "the body typeface is not the default serif",
            CaptureLobby => "capture the lobby",
            CaptureInitialBoard => "capture the initial board",
            CaptureMidGame => "capture a mid-game board",
        }
    }

    /// Scenarios of one group, in catalogue order.
    pub fn in_group(group: Group) -> impl Iterator<Item = ScenarioId> {
        ScenarioId::iter().filter(move |id| id.group() == group)
    }
}

/// Which scenarios to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    groups: Vec<Group>,
    scenarios: Vec<ScenarioId>,
}

impl Filter {
    /// Selects every scenario.
    pub fn all() -> Self {
        Self::default()
    }

    /// Selects the union of the given groups and scenarios. Empty means all.
    pub fn new(groups: Vec<Group>, scenarios: Vec<ScenarioId>) -> Self {
        Self { groups, scenarios }
    }

    /// Returns true if `id` is selected.
    pub fn selects(&self, id: ScenarioId) -> bool {
        (self.groups.is_empty() && self.scenarios.is_empty())
            || self.groups.contains(&id.group())
            || self.scenarios.contains(&id)
    }

    /// Selected scenarios in catalogue order.
    pub fn selected(&self) -> Vec<ScenarioId> {
        ScenarioId::iter().filter(|id| self.selects(*id)).collect()
    }
}
