//! Stage trait and implementations.
//!
//! Stages are the sequential units of work in a churnflow pipeline. They
//! coordinate only through the filesystem: each stage's script must leave
//! its outputs where the next stage expects them.

mod register;
mod script;

pub use register::RegisterFeaturesStage;
pub use script::ScriptStage;

use crate::core::StageOutput;
use async_trait::async_trait;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Execution context handed to each stage.
#[derive(Debug, Clone)]
pub struct StageContext {
    run_id: Uuid,
    pipeline_dir: PathBuf,
}

impl StageContext {
    /// Creates a new stage context.
    #[must_use]
    pub fn new(run_id: Uuid, pipeline_dir: impl Into<PathBuf>) -> Self {
        Self {
            run_id,
            pipeline_dir: pipeline_dir.into(),
        }
    }

    /// The ID of the pipeline run this stage executes in.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Working directory for stage scripts; relative stage paths resolve
    /// against it.
    #[must_use]
    pub fn pipeline_dir(&self) -> &Path {
        &self.pipeline_dir
    }
}

/// Trait for pipeline stages.
///
/// Execution is synchronous from the pipeline's point of view: the driver
/// awaits each stage to completion before the next one starts.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// Returns the name of the stage.
    fn name(&self) -> &str;

    /// Executes the stage.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The stage execution context
    ///
    /// # Returns
    ///
    /// The stage output indicating success or failure.
    async fn execute(&self, ctx: &StageContext) -> StageOutput;
}
