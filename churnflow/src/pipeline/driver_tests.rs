//! Integration tests for sequential pipeline execution.

use super::{PipelineBuilder, PipelineDriver, StageSpec};
use crate::core::{StageOutput, StageStatus};
use crate::stages::Stage;
use crate::testing::{MockStage, RecordingCommandRunner};
use crate::versioning::{DataVersioner, VersioningOutcome};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn driver_with(
    stages: Vec<StageSpec>,
    runner: Arc<RecordingCommandRunner>,
) -> PipelineDriver {
    let mut builder = PipelineBuilder::new("churn-pipeline");
    for stage in stages {
        builder = builder.stage(stage).unwrap();
    }
    let spec = builder.build().unwrap();
    let versioner = DataVersioner::new("dvc", "git", ".", runner);
    PipelineDriver::new(spec, versioner, ".")
}

fn six_stages() -> Vec<Arc<MockStage>> {
    ["ingest", "validate", "prepare", "transform", "register-features", "train"]
        .iter()
        .map(|name| Arc::new(MockStage::new(*name)))
        .collect()
}

#[tokio::test]
async fn test_all_stages_run_in_order_on_success() {
    let stages = six_stages();
    let specs = stages
        .iter()
        .map(|s| StageSpec::new(s.name(), s.clone() as Arc<dyn Stage>))
        .collect();
    let runner = Arc::new(RecordingCommandRunner::new());
    let result = driver_with(specs, runner).run().await;

    assert!(result.success);
    assert!(result.error.is_none());
    assert_eq!(result.results.len(), 6);
    let names: Vec<&str> = result.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["ingest", "validate", "prepare", "transform", "register-features", "train"]
    );
    for stage in &stages {
        assert_eq!(stage.call_count(), 1);
    }
}

#[tokio::test]
async fn test_failure_at_stage_three_skips_the_rest() {
    let stages = six_stages();
    stages[2].set_output(StageOutput::fail("script 'scripts/prepare.py' exited with status 1"));
    let specs = stages
        .iter()
        .map(|s| StageSpec::new(s.name(), s.clone() as Arc<dyn Stage>))
        .collect();
    let runner = Arc::new(RecordingCommandRunner::new());
    let result = driver_with(specs, runner).run().await;

    assert!(!result.success);
    assert_eq!(result.results.len(), 3);
    assert_eq!(result.failed_stage().map(|r| r.name.as_str()), Some("prepare"));
    assert!(result.error.unwrap().contains("prepare"));

    // Stages 4-6 are never invoked.
    assert_eq!(stages[3].call_count(), 0);
    assert_eq!(stages[4].call_count(), 0);
    assert_eq!(stages[5].call_count(), 0);
}

#[tokio::test]
async fn test_declared_outputs_are_versioned_after_success() {
    let stage = Arc::new(MockStage::new("ingest"));
    let spec = StageSpec::new("ingest", stage as Arc<dyn Stage>)
        .with_outputs(["data/raw/telco_churn.csv"])
        .with_commit_message("Version raw ingested data");
    let runner = Arc::new(RecordingCommandRunner::new());
    let result = driver_with(vec![spec], runner.clone()).run().await;

    assert!(result.success);
    // Status probe reported unchanged, so only the probe ran.
    assert_eq!(result.results[0].versioning, Some(VersioningOutcome::Unchanged));
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args[0], "status");
}

#[tokio::test]
async fn test_stage_without_outputs_skips_versioning_entirely() {
    let stage = Arc::new(MockStage::new("validate"));
    let spec = StageSpec::new("validate", stage as Arc<dyn Stage>);
    let runner = Arc::new(RecordingCommandRunner::new());
    let result = driver_with(vec![spec], runner.clone()).run().await;

    assert!(result.success);
    assert_eq!(result.results[0].versioning, None);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_versioning_failure_does_not_abort_the_run() {
    let first = Arc::new(MockStage::new("transform"));
    let second = Arc::new(MockStage::new("train"));
    let specs = vec![
        StageSpec::new("transform", first as Arc<dyn Stage>)
            .with_outputs(["data/processed/customer_features.db"])
            .with_commit_message("Version transformed features"),
        StageSpec::new("train", second.clone() as Arc<dyn Stage>),
    ];
    let runner = Arc::new(RecordingCommandRunner::new());
    runner.fail_command("dvc status");
    runner.fail_command("dvc add");
    let result = driver_with(specs, runner).run().await;

    // The stage itself completed; only its versioning failed.
    assert!(result.success);
    assert_eq!(result.results[0].status, StageStatus::Ok);
    assert!(result.results[0].versioning.as_ref().unwrap().is_failed());
    assert_eq!(second.call_count(), 1);
}

#[tokio::test]
async fn test_versioned_outcome_recorded_when_changes_detected() {
    let stage = Arc::new(MockStage::new("train"));
    let spec = StageSpec::new("train", stage as Arc<dyn Stage>)
        .with_outputs(["models/model.pkl"])
        .with_commit_message("Version trained model");
    let runner = Arc::new(RecordingCommandRunner::new());
    runner.fail_command("dvc status");
    let result = driver_with(vec![spec], runner.clone()).run().await;

    assert!(result.success);
    assert_eq!(
        result.results[0].versioning,
        Some(VersioningOutcome::Versioned { committed: true })
    );
    let subcommands: Vec<String> = runner
        .calls()
        .iter()
        .map(|c| format!("{} {}", c.program, c.args[0]))
        .collect();
    assert_eq!(
        subcommands,
        vec!["dvc status", "dvc add", "git add", "git commit", "dvc push"]
    );
}
