//! boardcheck - conformance harness CLI
//!
//! Runs the scenario catalogue against the bundled reference target.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use boardcheck::{Filter, Group, HarnessConfig, ScenarioId, Suite};
use boardcheck_reference::ReferenceBrowser;
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use std::time::Duration;
use strum::IntoEnumIterator;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    match cli.command {
        Command::Run {
            config,
            group,
            scenario,
            artifacts,
            seed,
            json,
            ai_delay_ms,
        } => {
            run(
                config,
                Filter::new(group, scenario),
                artifacts,
                seed,
                json,
                ai_delay_ms,
            )
            .await
        }
        Command::List { group } => {
            list(group);
            Ok(())
        }
    }
}

fn initialize_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,boardcheck=debug")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run the selected scenarios against the reference target
#[instrument(skip(filter))]
async fn run(
    config: Option<PathBuf>,
    filter: Filter,
    artifacts: Option<PathBuf>,
    seed: Option<u64>,
    json: Option<PathBuf>,
    ai_delay_ms: u64,
) -> Result<()> {
    let mut harness = match config {
        Some(path) => HarnessConfig::from_file(&path)?,
        None => HarnessConfig::default(),
    };
    if let Some(dir) = artifacts {
        harness = harness.with_artifact_dir(dir);
    }
    if let Some(seed) = seed {
        harness = harness.with_seed(seed);
    }

    let browser = ReferenceBrowser::new(Duration::from_millis(ai_delay_ms));
    info!(ai_delay_ms, "Running against the reference target");

    let report = Suite::new(browser, harness).run(&filter).await;
    println!("{}", report);

    if let Some(path) = json {
        std::fs::write(&path, report.to_json()?)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "JSON report written");
    }

    if !report.is_success() {
        bail!("{} scenario(s) failed", report.failed());
    }
    Ok(())
}

/// Print the scenario catalogue
fn list(group: Option<Group>) {
    for id in ScenarioId::iter().filter(|id| group.is_none_or(|g| id.group() == g)) {
        println!("{:<20} {:<28} {}", id.group(), id, id.title());
    }
}
