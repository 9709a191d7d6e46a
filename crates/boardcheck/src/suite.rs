//! The conformance suite runner.

use crate::catalogue::{Filter, ScenarioId};
use crate::scenarios::{self, Scene};
use crate::{HarnessConfig, HarnessError, ScenarioReport, SuiteReport, Verdict};
use boardcheck_contract::{Browser, BrowserContext, TargetError};
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Runs scenarios against pages opened by a [`Browser`].
#[derive(Debug)]
pub struct Suite<B> {
    browser: B,
    config: HarnessConfig,
}

impl<B: Browser> Suite<B> {
    /// Creates a suite.
    pub fn new(browser: B, config: HarnessConfig) -> Self {
        Self { browser, config }
    }

    /// The run configuration.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Runs every selected scenario in catalogue order.
    #[instrument(skip(self, filter))]
    pub async fn run(&self, filter: &Filter) -> SuiteReport {
        let selected = filter.selected();
        info!(count = selected.len(), "Starting conformance run");

        let mut report = SuiteReport::default();
        for id in selected {
            report.scenarios.push(self.run_scenario(id).await);
        }

        info!(
            passed = report.passed(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Conformance run finished"
        );
        report
    }

    /// Runs one scenario in a fresh context.
    #[instrument(skip(self), fields(group = %id.group()))]
    pub async fn run_scenario(&self, id: ScenarioId) -> ScenarioReport {
        let started = Instant::now();
        let verdict = match self.execute(id).await {
            Ok(verdict) => verdict,
            Err(HarnessError::Target(TargetError::Unsupported(what))) => {
                Verdict::skipped(format!("unsupported: {}", what))
            }
            Err(e) => {
                error!(error = %e, "Scenario failed");
                Verdict::from(e)
            }
        };

        match &verdict {
            Verdict::Passed => info!("Scenario passed"),
            Verdict::Skipped { reason } => info!(%reason, "Scenario skipped"),
            Verdict::Failed { .. } => {}
        }
        ScenarioReport::new(id, verdict, started.elapsed())
    }

    async fn execute(&self, id: ScenarioId) -> Result<Verdict, HarnessError> {
        let context = self.browser.new_context().await?;
        let result = scenarios::run(id, &Scene::new(&context, &self.config)).await;
        if let Err(e) = context.close().await {
            warn!(error = %e, "Failed to close context");
        }
        result
    }
}
