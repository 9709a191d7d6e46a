use super::Scene;
use crate::expect::ensure;
use crate::{HarnessError, Verdict};
use boardcheck_contract::{BrowserContext, Phase, Selector};

pub(super) async fn new_game_returns_to_lobby<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.local_game().await?;
    let control = Selector::new_game();
    ensure(page.is_visible(&control).await?, || {
        format!("no new-game control matches {}", control)
    })?;

    // Reset from mid-game, not from a fresh board.
    page.play_first_valid().await?;

    page.click(&control).await?;
    page.wait_until("phase to return to lobby", page.timing().settle(), |s| {
        s.phase == Phase::Lobby
    })
    .await?;
    ensure(page.is_visible(&Selector::lobby()).await?, || {
        "lobby is not visible after new game".to_string()
    })?;
    Ok(Verdict::Passed)
}

pub(super) async fn current_player_visible<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.local_game().await?;
    let indicator = Selector::current_player();
    ensure(page.is_visible(&indicator).await?, || {
        format!("no current-player indicator matches {}", indicator)
    })?;
    Ok(Verdict::Passed)
}

pub(super) async fn board_visible_during_play<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.local_game().await?;
    let board = Selector::board();
    ensure(page.is_visible(&board).await?, || {
        format!("no board matches {}", board)
    })?;
    Ok(Verdict::Passed)
}
