use super::Scene;
use crate::driver::summarize;
use crate::expect::{ensure, ensure_eq};
use crate::{HarnessError, Verdict};
use boardcheck_contract::{BrowserContext, GameTarget, Mode, Phase, TargetError};
use tracing::debug;

pub(super) async fn loads_without_faults<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.page().await?;
    page.settle().await;
    page.expect_no_faults()?;
    Ok(Verdict::Passed)
}

pub(super) async fn required_capabilities<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.page().await?;
    let capabilities = page.capabilities();
    let missing = capabilities.missing_required();
    ensure(missing.is_empty(), || {
        format!("missing required entry points: {}", missing.join(", "))
    })?;

    // Rendering must work in the lobby too.
    match page
        .call("render_state_to_text", page.page().render_state_to_text())
        .await
    {
        Err(HarnessError::Target(TargetError::Unsupported(what))) => {
            ensure(false, || format!("render_state_to_text is unsupported: {}", what))?;
        }
        other => {
            other?;
        }
    }
    debug!(?capabilities, "Capabilities reported");
    Ok(Verdict::Passed)
}

pub(super) async fn initial_state_valid<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.local_game().await?;
    let state = page.state().await?;

    ensure_eq("phase", state.phase, Phase::Playing)?;
    ensure_eq("mode", state.mode.clone(), Some(Mode::Local))?;
    ensure_eq("currentPlayer", state.current_player, 0)?;
    ensure_eq("localPlayerId", state.local_player_id, 0)?;
    ensure_eq("turnNumber", state.turn_number, 0)?;
    ensure(state.winner.is_none(), || {
        format!("winner set at start: {:?}", state.winner)
    })?;
    ensure(!state.valid_moves.is_empty(), || {
        format!("no valid moves at start ({})", summarize(&state))
    })?;

    let names: Vec<&str> = state.players.iter().map(|p| p.name.as_str()).collect();
    let expected: Vec<&str> = scene
        .config()
        .players()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    ensure_eq("player names", names, expected)?;
    Ok(Verdict::Passed)
}

pub(super) async fn valid_moves_at_start<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.local_game().await?;
    let state = page.state().await?;
    ensure(!state.valid_moves.is_empty(), || {
        "validMoves is empty at the start of a game".to_string()
    })?;
    Ok(Verdict::Passed)
}
