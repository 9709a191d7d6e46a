use super::Scene;
use crate::expect::{ensure, ensure_eq};
use crate::{AssertionFailure, HarnessError, Verdict};
use boardcheck_contract::{BrowserContext, GameConfig, Phase};
use tracing::{debug, info};

/// Host and guest pages in one context play one game.
///
/// When the target accepts external snapshots, a third page in the lobby is
/// also fed the host's state and must adopt it.
pub(super) async fn pages_converge<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let players = scene.config().players().clone();
    let host = scene.page().await?;
    let guest = scene.page().await?;
    let deadline = host.timing().split_sync();

    host.start(&GameConfig::split_host(players.clone())).await?;
    let hosted = host.state().await?;
    let Some(room) = hosted.room_code.clone() else {
        return Err(AssertionFailure::new("host state carries no roomCode").into());
    };
    debug!(%room, "Room opened");
    ensure_eq("host currentPlayer before its move", hosted.current_player, 0)?;

    guest
        .start(&GameConfig::split_guest(players, room, 1))
        .await?;
    guest
        .wait_until("guest to join as seat 1", deadline, |s| {
            s.phase == Phase::Playing && s.local_player_id == 1
        })
        .await?;

    let after = host.play_first_valid().await?;
    ensure_eq("host currentPlayer after its move", after.current_player, 1)?;

    let mirrored = guest
        .wait_until("guest to see the host's move", deadline, |s| {
            s.current_player == 1 && s.turn_number == 1
        })
        .await?;
    ensure(!mirrored.valid_moves.is_empty(), || {
        "guest has no valid moves on its own turn".to_string()
    })?;
    ensure_eq("guest board", &mirrored.board, &after.board)?;

    if host.capabilities().receive_state {
        let observer = scene.page().await?;
        observer.receive_state(&after).await?;
        let adopted = observer.state().await?;
        ensure_eq("received turnNumber", adopted.turn_number, after.turn_number)?;
        ensure_eq("received phase", adopted.phase, after.phase)?;
        ensure_eq("received board", &adopted.board, &after.board)?;
        observer.expect_no_faults()?;
    }

    host.expect_no_faults()?;
    guest.expect_no_faults()?;
    info!(turn = mirrored.turn_number, "Split pages converged");
    Ok(Verdict::Passed)
}
