use super::Scene;
use crate::expect::ensure;
use crate::{HarnessError, Verdict};
use boardcheck_contract::{BrowserContext, Phase};
use tracing::info;

pub(super) async fn replies_on_its_turn<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let config = scene.config().ai_game();
    let human = config.local_player_id();
    let page = scene.page().await?;
    page.start(&config).await?;

    let start = page.state().await?;
    ensure(start.current_player == human, || {
        format!(
            "AI game should open on the human seat {}, got {}",
            human, start.current_player
        )
    })?;

    let after_human = page.play_first_valid().await?;
    if after_human.phase == Phase::GameOver {
        return Ok(Verdict::skipped("game ended on the human's first move"));
    }

    let replied = page
        .wait_until(
            "AI to reply and hand the turn back",
            page.timing().ai_reply(),
            |s| s.current_player == human && s.turn_number >= 2,
        )
        .await?;
    info!(turn = replied.turn_number, "AI replied");
    page.expect_no_faults()?;
    Ok(Verdict::Passed)
}
