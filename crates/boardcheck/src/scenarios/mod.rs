//! Scenario bodies, one module per group.
//!
//! Each scenario runs inside a fresh browser context handed to it as a
//! [`Scene`], opens the pages it needs and returns `Passed` or `Skipped`.
//! Any error fails it.

mod ai;
mod artifacts;
mod hidden;
mod init;
mod lobby;
mod moves;
mod negative;
mod progression;
mod split;
mod ui;
mod visual;

use crate::catalogue::ScenarioId;
use crate::driver::Driver;
use crate::{HarnessConfig, HarnessError, Verdict};
use boardcheck_contract::BrowserContext;
use tracing::instrument;

/// A fresh context plus the run configuration.
pub struct Scene<'a, C> {
    context: &'a C,
    config: &'a HarnessConfig,
}

impl<'a, C: BrowserContext> Scene<'a, C> {
    /// Binds a context to a configuration.
    pub fn new(context: &'a C, config: &'a HarnessConfig) -> Self {
        Self { context, config }
    }

    /// The run configuration.
    pub fn config(&self) -> &HarnessConfig {
        self.config
    }

    /// Opens and loads a page.
    pub async fn page(&self) -> Result<Driver<C::Page>, HarnessError> {
        Driver::open(self.context, *self.config.timing()).await
    }

    /// Opens a page and starts a local game with the configured seats.
    pub async fn local_game(&self) -> Result<Driver<C::Page>, HarnessError> {
        let driver = self.page().await?;
        driver.start(&self.config.local_game()).await?;
        Ok(driver)
    }
}

/// Runs one scenario body.
#[instrument(skip(scene))]
pub async fn run<C: BrowserContext>(
    id: ScenarioId,
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    use ScenarioId::*;
    match id {
        LobbyShownOnLoad => lobby::shown_on_load(scene).await,
        LocalModeControlPresent => lobby::local_mode_control_present(scene).await,
        StartGameBypassesLobby => lobby::start_game_bypasses_lobby(scene).await,
        LoadsWithoutFaults => init::loads_without_faults(scene).await,
        RequiredCapabilities => init::required_capabilities(scene).await,
        InitialStateValid => init::initial_state_valid(scene).await,
        ValidMovesAtStart => init::valid_moves_at_start(scene).await,
        ValidMoveAdvancesTurn => moves::valid_move_advances_turn(scene).await,
        InvalidMoveRejected => moves::invalid_move_rejected(scene).await,
        TurnAlternates => moves::turn_alternates(scene).await,
        EveryValidMoveAccepted => moves::every_valid_move_accepted(scene).await,
        NewGameReturnsToLobby => ui::new_game_returns_to_lobby(scene).await,
        CurrentPlayerVisible => ui::current_player_visible(scene).await,
        BoardVisibleDuringPlay => ui::board_visible_during_play(scene).await,
        RandomPlayWithoutFaults => progression::random_play_without_faults(scene).await,
        PrivateFieldsHidden => hidden::private_fields_hidden(scene).await,
        PlayerViewRestricted => hidden::player_view_restricted(scene).await,
        AiRepliesOnItsTurn => ai::replies_on_its_turn(scene).await,
        SplitPagesConverge => split::pages_converge(scene).await,
        MalformedMovesRejected => negative::malformed_moves_rejected(scene).await,
        OutOfBoundsRejected => negative::out_of_bounds_rejected(scene).await,
        NoMovesAfterGameOver => negative::no_moves_after_game_over(scene).await,
        StyleTokensDefined => visual::style_tokens_defined(scene).await,
        BodyTypefaceSet => visual::body_typeface_set(scene).await,
        CaptureLobby => artifacts::capture_lobby(scene).await,
        CaptureInitialBoard => artifacts::capture_initial_board(scene).await,
        CaptureMidGame => artifacts::capture_mid_game(scene).await,
    }
}
