use super::Scene;
use crate::expect::{ensure, ensure_eq};
use crate::{HarnessError, Verdict};
use boardcheck_contract::{BrowserContext, MoveDescriptor};
use serde_json::json;
use tracing::debug;

pub(super) async fn valid_move_advances_turn<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.local_game().await?;
    let before = page.state().await?;
    let after = page.play_first_valid().await?;
    ensure_eq(
        "turnNumber",
        Some(after.turn_number),
        before.turn_number.checked_add(1),
    )?;
    Ok(Verdict::Passed)
}

pub(super) async fn invalid_move_rejected<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.local_game().await?;
    let before = page.state().await?;
    let mv = MoveDescriptor::new(json!({"invalid": true}));
    let outcome = page.attempt(&mv).await?;
    ensure(outcome.is_explained_rejection(), || {
        format!("move {} was not rejected with an error: {:?}", mv, outcome)
    })?;
    ensure_eq("turnNumber", page.state().await?.turn_number, before.turn_number)?;
    Ok(Verdict::Passed)
}

pub(super) async fn turn_alternates<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.local_game().await?;
    let mut previous = page.state().await?.current_player;
    ensure_eq("first player", previous, 0)?;

    for _ in 0..2 {
        let after = page.play_first_valid().await?;
        ensure(after.current_player != previous, || {
            format!("player {} moved but still holds the turn", previous)
        })?;
        previous = after.current_player;
    }
    Ok(Verdict::Passed)
}

/// Every move listed at the start is accepted when played from the start.
pub(super) async fn every_valid_move_accepted<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.local_game().await?;
    let advertised = page.state().await?.valid_moves;
    ensure(!advertised.is_empty(), || "no valid moves advertised".to_string())?;

    let config = scene.config().local_game();
    for mv in &advertised {
        page.start(&config).await?;
        page.play(mv).await?;
    }
    debug!(count = advertised.len(), "Every advertised move accepted");
    page.expect_no_faults()?;
    Ok(Verdict::Passed)
}
