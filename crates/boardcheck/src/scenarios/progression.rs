use super::Scene;
use crate::{HarnessError, Verdict};
use boardcheck_contract::BrowserContext;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::info;

pub(super) async fn random_play_without_faults<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let config = scene.config();
    let mut rng = StdRng::seed_from_u64(*config.seed());
    let page = scene.local_game().await?;

    let mut played = 0;
    for _ in 0..*config.progression_turns() {
        let state = page.state().await?;
        let Some(mv) = state.valid_moves.choose(&mut rng).cloned() else {
            break;
        };
        page.play(&mv).await?;
        played += 1;
    }

    info!(played, seed = config.seed(), "Random play finished");
    page.expect_no_faults()?;
    Ok(Verdict::Passed)
}
