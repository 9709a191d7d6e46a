use super::Scene;
use crate::expect::{ensure, ensure_eq};
use crate::{HarnessError, Verdict};
use boardcheck_contract::{BrowserContext, Mode, Phase, Selector};

pub(super) async fn shown_on_load<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.page().await?;
    ensure_eq("phase after load", page.state().await?.phase, Phase::Lobby)?;
    ensure(page.is_visible(&Selector::lobby()).await?, || {
        format!("lobby ({}) is not visible after load", Selector::lobby())
    })?;
    ensure(!page.is_visible(&Selector::board()).await?, || {
        "board is visible before a game starts".to_string()
    })?;
    Ok(Verdict::Passed)
}

pub(super) async fn local_mode_control_present<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.page().await?;
    let button = Selector::mode_button(&Mode::Local);
    ensure(page.is_visible(&button).await?, || {
        format!("no local-mode control matches {}", button)
    })?;
    Ok(Verdict::Passed)
}

pub(super) async fn start_game_bypasses_lobby<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.local_game().await?;
    ensure_eq("phase after start_game", page.state().await?.phase, Phase::Playing)?;
    ensure(!page.is_visible(&Selector::lobby()).await?, || {
        "lobby is still visible after start_game".to_string()
    })?;
    Ok(Verdict::Passed)
}
