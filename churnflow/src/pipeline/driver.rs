//! Sequential pipeline execution engine.
//!
//! Runs stages strictly in declaration order. A stage failure aborts the
//! run immediately; versioning failures after a successful stage do not.

use super::PipelineSpec;
use crate::core::{PipelineRunResult, StageResult};
use crate::stages::StageContext;
use crate::versioning::{DataVersioner, VersioningOutcome};
use chrono::Utc;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Executes a pipeline specification front to back.
#[derive(Debug)]
pub struct PipelineDriver {
    spec: PipelineSpec,
    versioner: DataVersioner,
    pipeline_dir: PathBuf,
}

impl PipelineDriver {
    /// Creates a new driver.
    #[must_use]
    pub fn new(
        spec: PipelineSpec,
        versioner: DataVersioner,
        pipeline_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            spec,
            versioner,
            pipeline_dir: pipeline_dir.into(),
        }
    }

    /// Returns the pipeline specification.
    #[must_use]
    pub fn spec(&self) -> &PipelineSpec {
        &self.spec
    }

    /// Runs every stage in order.
    ///
    /// The run stops at the first stage failure; stages after it are never
    /// executed and have no result entry. Versioning outcomes are attached
    /// to their stage's result and are never fatal.
    pub async fn run(&self) -> PipelineRunResult {
        let run_id = Uuid::new_v4();
        let ctx = StageContext::new(run_id, self.pipeline_dir.clone());
        let start = Instant::now();
        info!(
            pipeline = %self.spec.name,
            %run_id,
            stages = self.spec.len(),
            "starting pipeline run"
        );

        let mut results = Vec::with_capacity(self.spec.len());
        let mut run_error = None;

        for stage in &self.spec.stages {
            let started_at = Utc::now();
            info!(stage = %stage.name, "stage started");
            let output = stage.runner.execute(&ctx).await;

            if !output.is_success() {
                let reason = output
                    .error
                    .unwrap_or_else(|| "stage failed without a reason".to_string());
                error!(stage = %stage.name, error = %reason, "stage failed, aborting pipeline");
                results.push(StageResult::failed(&stage.name, started_at, &reason));
                run_error = Some(format!("stage '{}' failed: {reason}", stage.name));
                break;
            }

            let mut result =
                StageResult::completed(&stage.name, started_at, output.data.unwrap_or_default());
            if !stage.outputs.is_empty() {
                let outcome = self
                    .versioner
                    .version_files(&stage.outputs, stage.commit_message.as_deref())
                    .await;
                if let VersioningOutcome::Failed { reason } = &outcome {
                    warn!(
                        stage = %stage.name,
                        reason = %reason,
                        "output versioning failed, continuing"
                    );
                }
                result = result.with_versioning(outcome);
            }
            info!(stage = %stage.name, "stage completed");
            results.push(result);
        }

        let success = run_error.is_none();
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        if success {
            info!(pipeline = %self.spec.name, %run_id, duration_ms, "pipeline run complete");
        } else {
            error!(pipeline = %self.spec.name, %run_id, duration_ms, "pipeline run failed");
        }

        PipelineRunResult {
            run_id,
            pipeline: self.spec.name.clone(),
            results,
            duration_ms,
            success,
            error: run_error,
        }
    }
}
