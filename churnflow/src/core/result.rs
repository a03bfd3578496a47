//! Typed results for stages and whole pipeline runs.

use super::StageStatus;
use crate::versioning::VersioningOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Typed result returned by a stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult {
    /// Stage name.
    pub name: String,
    /// Stage status.
    pub status: StageStatus,
    /// When the stage started.
    pub started_at: DateTime<Utc>,
    /// When the stage ended.
    pub ended_at: DateTime<Utc>,
    /// Result data.
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
    /// Error message if failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Outcome of versioning this stage's declared outputs, if any were
    /// declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versioning: Option<VersioningOutcome>,
}

impl StageResult {
    /// Creates a completed stage result.
    #[must_use]
    pub fn completed(
        name: impl Into<String>,
        started_at: DateTime<Utc>,
        data: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            name: name.into(),
            status: StageStatus::Ok,
            started_at,
            ended_at: Utc::now(),
            data,
            error: None,
            versioning: None,
        }
    }

    /// Creates a failed stage result.
    #[must_use]
    pub fn failed(
        name: impl Into<String>,
        started_at: DateTime<Utc>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status: StageStatus::Fail,
            started_at,
            ended_at: Utc::now(),
            data: HashMap::new(),
            error: Some(error.into()),
            versioning: None,
        }
    }

    /// Attaches a versioning outcome.
    #[must_use]
    pub fn with_versioning(mut self, outcome: VersioningOutcome) -> Self {
        self.versioning = Some(outcome);
        self
    }

    /// Returns true if the stage completed successfully.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Result of executing a whole pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRunResult {
    /// The unique ID for this pipeline run.
    pub run_id: Uuid,
    /// The pipeline name.
    pub pipeline: String,
    /// Per-stage results, in execution order. Stages after the first
    /// failure never execute and have no entry.
    pub results: Vec<StageResult>,
    /// Total execution time in milliseconds.
    pub duration_ms: f64,
    /// Whether every stage completed successfully.
    pub success: bool,
    /// Error message if failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineRunResult {
    /// Returns the result of the stage that failed, if any.
    #[must_use]
    pub fn failed_stage(&self) -> Option<&StageResult> {
        self.results.iter().find(|r| !r.is_success())
    }

    /// Returns the number of stages that completed successfully.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }
}
