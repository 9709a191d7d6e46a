use super::Scene;
use crate::driver::Driver;
use crate::expect::ensure;
use crate::{ArtifactError, HarnessError, Verdict};
use boardcheck_contract::{BrowserContext, GameTarget, PageSurface};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Writes `screenshot-{name}.{ext}` under `dir`.
#[instrument(skip(page))]
async fn save_capture<P: GameTarget + PageSurface>(
    page: &Driver<P>,
    dir: &Path,
    name: &str,
) -> Result<PathBuf, HarnessError> {
    let snapshot = page.capture().await?;
    ensure(!snapshot.bytes.is_empty(), || format!("capture `{}` is empty", name))?;

    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        ArtifactError::new(format!("Failed to create {}: {}", dir.display(), e))
    })?;
    let path = dir.join(format!("screenshot-{}.{}", name, snapshot.extension));
    tokio::fs::write(&path, &snapshot.bytes)
        .await
        .map_err(|e| ArtifactError::new(format!("Failed to write {}: {}", path.display(), e)))?;

    info!(path = %path.display(), bytes = snapshot.bytes.len(), "Capture saved");
    Ok(path)
}

pub(super) async fn capture_lobby<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.page().await?;
    save_capture(&page, scene.config().artifact_dir(), "lobby").await?;
    Ok(Verdict::Passed)
}

pub(super) async fn capture_initial_board<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.local_game().await?;
    page.settle().await;
    save_capture(&page, scene.config().artifact_dir(), "initial").await?;
    Ok(Verdict::Passed)
}

pub(super) async fn capture_mid_game<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.local_game().await?;
    for _ in 0..*scene.config().midgame_moves() {
        if !page.state().await?.is_live() {
            break;
        }
        page.play_first_valid().await?;
    }
    page.settle().await;
    save_capture(&page, scene.config().artifact_dir(), "midgame").await?;
    Ok(Verdict::Passed)
}
