//! Scenario verdicts and the run report.

use crate::catalogue::{Group, ScenarioId};
use crate::HarnessError;
use serde::Serialize;
use std::time::Duration;

/// How a scenario ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum Verdict {
    /// Every check held.
    Passed,
    /// The scenario does not apply to this target.
    Skipped {
        /// Why it was skipped.
        reason: String,
    },
    /// A check did not hold.
    Failed {
        /// Error category.
        kind: String,
        /// Rendered error.
        error: String,
    },
}

impl Verdict {
    /// A skip with the given reason.
    pub fn skipped(reason: impl Into<String>) -> Self {
        Verdict::Skipped {
            reason: reason.into(),
        }
    }

    /// Returns true if the scenario failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Failed { .. })
    }

    fn label(&self) -> &'static str {
        match self {
            Verdict::Passed => "PASS",
            Verdict::Skipped { .. } => "SKIP",
            Verdict::Failed { .. } => "FAIL",
        }
    }
}

impl From<HarnessError> for Verdict {
    fn from(err: HarnessError) -> Self {
        Verdict::Failed {
            kind: err.kind().to_string(),
            error: err.to_string(),
        }
    }
}

/// Result of one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// Which scenario ran.
    pub id: ScenarioId,
    /// Its group.
    pub group: Group,
    /// How it ended.
    #[serde(flatten)]
    pub verdict: Verdict,
    /// Wall-clock time spent.
    pub elapsed_ms: u64,
}

impl ScenarioReport {
    /// Builds a report for `id`.
    pub fn new(id: ScenarioId, verdict: Verdict, elapsed: Duration) -> Self {
        Self {
            id,
            group: id.group(),
            verdict,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}

/// Results of a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteReport {
    /// Scenario results in run order.
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    /// Number of passed scenarios.
    pub fn passed(&self) -> usize {
        self.count(|v| matches!(v, Verdict::Passed))
    }

    /// Number of skipped scenarios.
    pub fn skipped(&self) -> usize {
        self.count(|v| matches!(v, Verdict::Skipped { .. }))
    }

    /// Number of failed scenarios.
    pub fn failed(&self) -> usize {
        self.count(Verdict::is_failure)
    }

    /// Returns true if nothing failed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Looks up the verdict of one scenario.
    pub fn verdict(&self, id: ScenarioId) -> Option<&Verdict> {
        self.scenarios
            .iter()
            .find(|r| r.id == id)
            .map(|r| &r.verdict)
    }

    fn count(&self, pred: impl Fn(&Verdict) -> bool) -> usize {
        self.scenarios.iter().filter(|r| pred(&r.verdict)).count()
    }

    /// Serializes the report as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl std::fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for report in &self.scenarios {
            write!(
                f,
                "{} {:<20} {:<28} {:>6}ms",
                report.verdict.label(),
                report.group,
                report.id,
                report.elapsed_ms
            )?;
            match &report.verdict {
                Verdict::Passed => writeln!(f)?,
                Verdict::Skipped { reason } => writeln!(f, "  ({})", reason)?,
                Verdict::Failed { error, .. } => writeln!(f, "\n     {}", error)?,
            }
        }
        write!(
            f,
            "{} passed, {} skipped, {} failed",
            self.passed(),
            self.skipped(),
            self.failed()
        )
    }
}
