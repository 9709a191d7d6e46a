use super::Scene;
use crate::expect::{ensure, ensure_eq};
use crate::{HarnessError, Verdict};
use boardcheck_contract::{BrowserContext, StateSnapshot};

fn no_leaks(context: &str, state: &StateSnapshot, private: &[String]) -> Result<(), HarnessError> {
    let leaked = state.leaked_fields(private);
    ensure(leaked.is_empty(), || {
        let listed: Vec<String> = leaked
            .iter()
            .map(|(seat, field)| format!("seat {} `{}`", seat, field))
            .collect();
        format!(
            "{} exposes private fields to seat {}: {}",
            context,
            state.local_player_id,
            listed.join(", ")
        )
    })?;
    Ok(())
}

pub(super) async fn private_fields_hidden<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let private = scene.config().private_fields();
    let page = scene.local_game().await?;
    no_leaks("initial state", &page.state().await?, private)?;

    let after = page.play_first_valid().await?;
    no_leaks("state after a move", &after, private)?;
    Ok(Verdict::Passed)
}

pub(super) async fn player_view_restricted<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.local_game().await?;
    if !page.capabilities().player_view {
        return Ok(Verdict::skipped("player_view is not implemented"));
    }

    let state = page.state().await?;
    let Some(waiting) = state
        .players
        .iter()
        .map(|p| p.id)
        .find(|id| *id != state.current_player)
    else {
        return Ok(Verdict::skipped("no seat is waiting for its turn"));
    };

    let view = page.player_view(&state, waiting).await?;
    ensure_eq("view localPlayerId", view.local_player_id, waiting)?;
    ensure(view.valid_moves.is_empty(), || {
        format!(
            "seat {} sees {} valid moves while seat {} is to move",
            waiting,
            view.valid_moves.len(),
            state.current_player
        )
    })?;
    no_leaks("player view", &view, scene.config().private_fields())?;
    Ok(Verdict::Passed)
}
