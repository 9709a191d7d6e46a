use super::Scene;
use crate::driver::Driver;
use crate::expect::{ensure, ensure_eq};
use crate::{HarnessError, Verdict};
use boardcheck_contract::{BrowserContext, GameTarget, MoveDescriptor, PageSurface, Phase};
use serde_json::{Value, json};
use tracing::{debug, info};

async fn expect_rejected<P: GameTarget + PageSurface>(
    page: &Driver<P>,
    mv: &MoveDescriptor,
) -> Result<(), HarnessError> {
    let before = page.state().await?.turn_number;
    let outcome = page.attempt(mv).await?;
    ensure(outcome.is_explained_rejection(), || {
        format!(
            "move {} should be rejected with an error, got success={} error={:?}",
            mv, outcome.success, outcome.error
        )
    })?;
    ensure_eq(
        &format!("turnNumber after rejected {}", mv),
        page.state().await?.turn_number,
        before,
    )?;
    debug!(mv = %mv, reason = ?outcome.error, "Rejected as expected");
    Ok(())
}

pub(super) async fn malformed_moves_rejected<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.local_game().await?;
    let payloads = [
        Value::Null,
        json!(42),
        json!("bad"),
        json!({}),
        json!({"invalid": true}),
    ];
    for payload in payloads {
        expect_rejected(&page, &MoveDescriptor::new(payload)).await?;
    }
    page.expect_no_faults()?;
    Ok(Verdict::Passed)
}

pub(super) async fn out_of_bounds_rejected<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.local_game().await?;
    expect_rejected(&page, &MoveDescriptor::new(json!({"row": 999, "col": 999}))).await?;
    page.expect_no_faults()?;
    Ok(Verdict::Passed)
}

pub(super) async fn no_moves_after_game_over<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let limit = *scene.config().completion_turn_limit();
    let page = scene.local_game().await?;

    let mut last_move = None;
    let mut state = page.state().await?;
    for _ in 0..limit {
        let Some(mv) = state.first_valid_move().cloned() else {
            break;
        };
        state = page.play(&mv).await?;
        last_move = Some(mv);
    }

    if state.phase != Phase::GameOver {
        return Ok(Verdict::skipped(format!(
            "game did not finish within {} moves",
            limit
        )));
    }
    info!(turns = state.turn_number, winner = ?state.winner, "Game finished");

    expect_rejected(&page, &MoveDescriptor::new(json!({"type": "anyMove"}))).await?;
    if let Some(mv) = last_move {
        expect_rejected(&page, &mv).await?;
    }
    ensure_eq("phase after rejected moves", page.state().await?.phase, Phase::GameOver)?;
    page.expect_no_faults()?;
    Ok(Verdict::Passed)
}
