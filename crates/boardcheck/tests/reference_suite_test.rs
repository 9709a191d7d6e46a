//! The whole catalogue against the reference target.

use boardcheck::{Filter, Group, HarnessConfig, ScenarioId, Suite, Timing, Verdict};
use boardcheck_reference::ReferenceBrowser;
use std::time::Duration;

fn fast_config(artifacts: &std::path::Path) -> HarnessConfig {
    HarnessConfig::default()
        .with_artifact_dir(artifacts)
        .with_timing(Timing::new(5, 50, 500, 1000))
}

fn fast_browser() -> ReferenceBrowser {
    ReferenceBrowser::new(Duration::from_millis(20))
}

#[tokio::test]
async fn test_reference_passes_every_scenario() {
    let dir = tempfile::tempdir().expect("tempdir");
    let suite = Suite::new(fast_browser(), fast_config(dir.path()));

    let report = suite.run(&Filter::all()).await;

    for scenario in &report.scenarios {
        assert_eq!(
            scenario.verdict,
            Verdict::Passed,
            "{} did not pass",
            scenario.id
        );
    }
    assert_eq!(report.passed(), 27);
    assert!(report.is_success());
}

#[tokio::test]
async fn test_artifacts_are_written() {
    let dir = tempfile::tempdir().expect("tempdir");
    let suite = Suite::new(fast_browser(), fast_config(dir.path()));

    let report = suite
        .run(&Filter::new(vec![Group::Artifacts], Vec::new()))
        .await;
    assert_eq!(report.passed(), 3);

    for name in ["lobby", "initial", "midgame"] {
        let path = dir.path().join(format!("screenshot-{}.txt", name));
        let bytes = std::fs::read(&path).expect("capture exists");
        assert!(!bytes.is_empty(), "{} is empty", path.display());
    }
}

#[tokio::test]
async fn test_filter_runs_only_selected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let suite = Suite::new(fast_browser(), fast_config(dir.path()));

    let report = suite
        .run(&Filter::new(
            Vec::new(),
            vec![ScenarioId::TurnAlternates, ScenarioId::NoMovesAfterGameOver],
        ))
        .await;

    let ran: Vec<ScenarioId> = report.scenarios.iter().map(|r| r.id).collect();
    assert_eq!(
        ran,
        vec![ScenarioId::TurnAlternates, ScenarioId::NoMovesAfterGameOver]
    );
    assert!(report.is_success());
}

#[tokio::test]
async fn test_slow_ai_is_a_deadline_not_an_assertion() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = HarnessConfig::default()
        .with_artifact_dir(dir.path())
        .with_timing(Timing::new(5, 50, 500, 100));
    let suite = Suite::new(ReferenceBrowser::new(Duration::from_secs(5)), config);

    let report = suite.run_scenario(ScenarioId::AiRepliesOnItsTurn).await;

    let Verdict::Failed { kind, .. } = &report.verdict else {
        panic!("expected failure, got {:?}", report.verdict);
    };
    assert_eq!(kind, "deadline");
}

#[tokio::test]
async fn test_json_report_names_scenarios() {
    let dir = tempfile::tempdir().expect("tempdir");
    let suite = Suite::new(fast_browser(), fast_config(dir.path()));

    let report = suite
        .run(&Filter::new(vec![Group::VisualStandards], Vec::new()))
        .await;
    let json: serde_json::Value =
        serde_json::from_str(&report.to_json().expect("json")).expect("parse");

    assert_eq!(json["scenarios"][0]["id"], "style-tokens-defined");
    assert_eq!(json["scenarios"][1]["id"], "body-typeface-set");
    assert_eq!(json["scenarios"][1]["verdict"], "passed");
}
