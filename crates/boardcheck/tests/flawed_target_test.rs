//! Deliberately broken targets must be caught.
//!
//! Each flaw wraps the reference page and corrupts one behaviour.

use async_trait::async_trait;
use boardcheck::{HarnessConfig, ScenarioId, Suite, Timing, Verdict};
use boardcheck_contract::{
    Browser, BrowserContext, Capabilities, FaultLog, GameConfig, GameTarget, Mode,
    MoveDescriptor, MoveOutcome, PageSurface, Phase, Selector, Snapshot, StateSnapshot,
    TargetError,
};
use boardcheck_reference::{ReferenceBrowser, ReferenceContext, ReferencePage};
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flaw {
    LeaksHand,
    PanicsOnMalformed,
    FaultsOnMalformed,
    TurnStuck,
    NoPlayerView,
    SerifBody,
    MovesAfterGameOver,
    OnlyAccentToken,
    NoStyleTokens,
    TurnNeverPasses,
    RejectsAdvertisedMove,
    AcceptsOutOfBounds,
    GuestNeverSyncs,
    NewGameIgnoredMidGame,
    HostOpensOnGuestSeat,
}

struct FlawedBrowser {
    inner: ReferenceBrowser,
    flaw: Flaw,
}

struct FlawedContext {
    inner: ReferenceContext,
    flaw: Flaw,
}

struct FlawedPage {
    inner: ReferencePage,
    flaw: Flaw,
}

#[async_trait]
impl Browser for FlawedBrowser {
    type Context = FlawedContext;

    async fn new_context(&self) -> Result<FlawedContext, TargetError> {
        Ok(FlawedContext {
            inner: self.inner.new_context().await?,
            flaw: self.flaw,
        })
    }
}

#[async_trait]
impl BrowserContext for FlawedContext {
    type Page = FlawedPage;

    async fn new_page(&self, faults: FaultLog) -> Result<FlawedPage, TargetError> {
        let inner = match self.flaw {
            // Each page gets a private hub, so rooms never connect.
            Flaw::GuestNeverSyncs => ReferencePage::standalone(faults, Duration::from_millis(20)),
            _ => self.inner.new_page(faults).await?,
        };
        Ok(FlawedPage {
            inner,
            flaw: self.flaw,
        })
    }

    async fn close(&self) -> Result<(), TargetError> {
        self.inner.close().await
    }
}

fn is_cell(mv: &MoveDescriptor) -> bool {
    let value = mv.as_value();
    value.get("row").is_some_and(|v| v.is_u64()) && value.get("col").is_some_and(|v| v.is_u64())
}

impl FlawedPage {
    async fn current(&self) -> Result<StateSnapshot, TargetError> {
        let text = self.inner.render_state_to_text().await?;
        StateSnapshot::parse(&text).map_err(|e| TargetError::Fault(e.message))
    }
}

fn hold_turn(state: &mut StateSnapshot) {
    if state.phase == Phase::Playing {
        state.current_player = 0;
    }
}

#[async_trait]
impl GameTarget for FlawedPage {
    async fn load(&self) -> Result<(), TargetError> {
        self.inner.load().await
    }

    fn capabilities(&self) -> Capabilities {
        match self.flaw {
            Flaw::NoPlayerView => Capabilities {
                player_view: false,
                ..Capabilities::all()
            },
            _ => self.inner.capabilities(),
        }
    }

    async fn render_state_to_text(&self) -> Result<String, TargetError> {
        let text = self.inner.render_state_to_text().await?;
        let mut state =
            StateSnapshot::parse(&text).map_err(|e| TargetError::Fault(e.message))?;
        match self.flaw {
            Flaw::LeaksHand => {
                for player in &mut state.players {
                    player.fields.insert("hand".to_string(), json!(4));
                }
            }
            Flaw::TurnStuck => state.turn_number = 0,
            Flaw::TurnNeverPasses => hold_turn(&mut state),
            Flaw::HostOpensOnGuestSeat
                if state.mode == Some(Mode::LocalSplit)
                    && state.phase == Phase::Playing
                    && state.local_player_id == 0
                    && state.turn_number == 0 =>
            {
                state.current_player = 1;
            }
            _ => return Ok(text),
        }
        state.to_text().map_err(|e| TargetError::Fault(e.message))
    }

    async fn perform_move(&self, mv: &MoveDescriptor) -> Result<MoveOutcome, TargetError> {
        match self.flaw {
            Flaw::PanicsOnMalformed if !is_cell(mv) => {
                panic!("TypeError: cannot read properties of {}", mv)
            }
            Flaw::FaultsOnMalformed if !is_cell(mv) => Err(TargetError::Fault(format!(
                "TypeError: cannot read properties of {}",
                mv
            ))),
            Flaw::TurnStuck => {
                let mut outcome = self.inner.perform_move(mv).await?;
                outcome.state = None;
                Ok(outcome)
            }
            Flaw::TurnNeverPasses => {
                let mut outcome = self.inner.perform_move(mv).await?;
                if let Some(state) = outcome.state.as_mut() {
                    hold_turn(state);
                }
                Ok(outcome)
            }
            Flaw::RejectsAdvertisedMove if mv.as_value() == &json!({"row": 1, "col": 0}) => Ok(
                MoveOutcome::rejected("cell unavailable", self.current().await?),
            ),
            Flaw::AcceptsOutOfBounds if mv.as_value() == &json!({"row": 999, "col": 999}) => {
                Ok(MoveOutcome::accepted(self.current().await?))
            }
            Flaw::MovesAfterGameOver => {
                let state = self.current().await?;
                if state.phase == Phase::GameOver {
                    Ok(MoveOutcome::accepted(state))
                } else {
                    self.inner.perform_move(mv).await
                }
            }
            _ => self.inner.perform_move(mv).await,
        }
    }

    async fn start_game(&self, config: &GameConfig) -> Result<(), TargetError> {
        self.inner.start_game(config).await
    }

    async fn receive_state(&self, state: &StateSnapshot) -> Result<(), TargetError> {
        self.inner.receive_state(state).await
    }

    async fn player_view(
        &self,
        state: &StateSnapshot,
        player_id: usize,
    ) -> Result<StateSnapshot, TargetError> {
        match self.flaw {
            Flaw::NoPlayerView => Err(TargetError::Unsupported("player_view".to_string())),
            _ => self.inner.player_view(state, player_id).await,
        }
    }
}

#[async_trait]
impl PageSurface for FlawedPage {
    async fn is_visible(&self, selector: &Selector) -> Result<bool, TargetError> {
        self.inner.is_visible(selector).await
    }

    async fn click(&self, selector: &Selector) -> Result<(), TargetError> {
        if self.flaw == Flaw::NewGameIgnoredMidGame
            && *selector == Selector::new_game()
            && self.current().await?.turn_number > 0
        {
            return Ok(());
        }
        self.inner.click(selector).await
    }

    async fn style_token(&self, name: &str) -> Result<Option<String>, TargetError> {
        match self.flaw {
            Flaw::OnlyAccentToken if name == "--color-accent" => Ok(Some("#e07a5f".to_string())),
            Flaw::OnlyAccentToken | Flaw::NoStyleTokens => Ok(None),
            _ => self.inner.style_token(name).await,
        }
    }

    async fn body_font_family(&self) -> Result<String, TargetError> {
        match self.flaw {
            Flaw::SerifBody => Ok("serif".to_string()),
            _ => self.inner.body_font_family().await,
        }
    }

    async fn capture(&self) -> Result<Snapshot, TargetError> {
        self.inner.capture().await
    }
}

async fn verdict(flaw: Flaw, id: ScenarioId) -> Verdict {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = HarnessConfig::default()
        .with_artifact_dir(dir.path())
        .with_timing(Timing::new(5, 50, 500, 1000));
    let browser = FlawedBrowser {
        inner: ReferenceBrowser::new(Duration::from_millis(20)),
        flaw,
    };
    Suite::new(browser, config).run_scenario(id).await.verdict
}

fn failure_kind(verdict: &Verdict) -> &str {
    match verdict {
        Verdict::Failed { kind, .. } => kind.as_str(),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_leaked_hand_is_caught() {
    let verdict = verdict(Flaw::LeaksHand, ScenarioId::PrivateFieldsHidden).await;
    assert_eq!(failure_kind(&verdict), "assertion");
}

#[tokio::test]
async fn test_panic_on_malformed_move_is_a_fault() {
    let verdict = verdict(Flaw::PanicsOnMalformed, ScenarioId::MalformedMovesRejected).await;
    assert_eq!(failure_kind(&verdict), "fault");
    let Verdict::Failed { error, .. } = &verdict else {
        unreachable!()
    };
    assert!(error.contains("panicked"), "{}", error);
}

#[tokio::test]
async fn test_target_fault_on_malformed_move_is_a_fault() {
    let verdict = verdict(Flaw::FaultsOnMalformed, ScenarioId::MalformedMovesRejected).await;
    assert_eq!(failure_kind(&verdict), "fault");
}

#[tokio::test]
async fn test_valid_moves_still_pass_with_malformed_fault() {
    let verdict = verdict(Flaw::FaultsOnMalformed, ScenarioId::ValidMoveAdvancesTurn).await;
    assert_eq!(verdict, Verdict::Passed);
}

#[tokio::test]
async fn test_stuck_turn_counter_is_caught() {
    let verdict = verdict(Flaw::TurnStuck, ScenarioId::ValidMoveAdvancesTurn).await;
    assert_eq!(failure_kind(&verdict), "assertion");
}

#[tokio::test]
async fn test_missing_player_view_is_skipped() {
    let verdict = verdict(Flaw::NoPlayerView, ScenarioId::PlayerViewRestricted).await;
    assert!(
        matches!(verdict, Verdict::Skipped { .. }),
        "expected skip, got {:?}",
        verdict
    );
}

#[tokio::test]
async fn test_serif_body_is_caught() {
    let verdict = verdict(Flaw::SerifBody, ScenarioId::BodyTypefaceSet).await;
    assert_eq!(failure_kind(&verdict), "assertion");
}

#[tokio::test]
async fn test_moves_after_game_over_are_caught() {
    let verdict = verdict(Flaw::MovesAfterGameOver, ScenarioId::NoMovesAfterGameOver).await;
    assert_eq!(failure_kind(&verdict), "assertion");
}

#[tokio::test]
async fn test_single_themed_token_is_enough() {
    let verdict = verdict(Flaw::OnlyAccentToken, ScenarioId::StyleTokensDefined).await;
    assert_eq!(verdict, Verdict::Passed);
}

#[tokio::test]
async fn test_unthemed_page_lists_every_token() {
    let verdict = verdict(Flaw::NoStyleTokens, ScenarioId::StyleTokensDefined).await;
    assert_eq!(failure_kind(&verdict), "assertion");
    let Verdict::Failed { error, .. } = &verdict else {
        unreachable!()
    };
    for token in ["--color-bg", "--color-surface", "--color-accent"] {
        assert!(error.contains(token), "{}", error);
    }
}

#[tokio::test]
async fn test_turn_that_never_passes_is_caught() {
    let verdict = verdict(Flaw::TurnNeverPasses, ScenarioId::TurnAlternates).await;
    assert_eq!(failure_kind(&verdict), "assertion");
}

#[tokio::test]
async fn test_rejected_advertised_move_is_caught() {
    let verdict = verdict(Flaw::RejectsAdvertisedMove, ScenarioId::EveryValidMoveAccepted).await;
    assert_eq!(failure_kind(&verdict), "assertion");
}

#[tokio::test]
async fn test_accepted_out_of_bounds_move_is_caught() {
    let verdict = verdict(Flaw::AcceptsOutOfBounds, ScenarioId::OutOfBoundsRejected).await;
    assert_eq!(failure_kind(&verdict), "assertion");
}

#[tokio::test]
async fn test_guest_that_never_syncs_misses_deadline() {
    let verdict = verdict(Flaw::GuestNeverSyncs, ScenarioId::SplitPagesConverge).await;
    assert_eq!(failure_kind(&verdict), "deadline");
}

#[tokio::test]
async fn test_new_game_ignored_mid_game_is_caught() {
    let verdict = verdict(Flaw::NewGameIgnoredMidGame, ScenarioId::NewGameReturnsToLobby).await;
    assert_eq!(failure_kind(&verdict), "deadline");
}

#[tokio::test]
async fn test_host_opening_on_guest_seat_is_caught() {
    let verdict = verdict(Flaw::HostOpensOnGuestSeat, ScenarioId::SplitPagesConverge).await;
    assert_eq!(failure_kind(&verdict), "assertion");
}
