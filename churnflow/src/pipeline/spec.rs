//! Pipeline and stage specifications.

use crate::errors::PipelineValidationError;
use crate::stages::Stage;
use std::path::PathBuf;
use std::sync::Arc;

/// Specification for a single stage in a pipeline.
#[derive(Debug, Clone)]
pub struct StageSpec {
    /// The unique name of the stage.
    pub name: String,
    /// The stage implementation.
    pub runner: Arc<dyn Stage>,
    /// Output files the stage leaves behind; versioned after success.
    pub outputs: Vec<PathBuf>,
    /// Commit message used when versioning the outputs.
    pub commit_message: Option<String>,
}

impl StageSpec {
    /// Creates a new stage specification.
    #[must_use]
    pub fn new(name: impl Into<String>, runner: Arc<dyn Stage>) -> Self {
        Self {
            name: name.into(),
            runner,
            outputs: Vec::new(),
            commit_message: None,
        }
    }

    /// Declares output files.
    #[must_use]
    pub fn with_outputs(
        mut self,
        outputs: impl IntoIterator<Item = impl Into<PathBuf>>,
    ) -> Self {
        self.outputs.extend(outputs.into_iter().map(Into::into));
        self
    }

    /// Sets the versioning commit message.
    #[must_use]
    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = Some(message.into());
        self
    }

    /// Validates the stage specification.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage name is empty or whitespace-only.
    pub fn validate(&self) -> Result<(), PipelineValidationError> {
        if self.name.trim().is_empty() {
            return Err(PipelineValidationError::new(
                "Stage name cannot be empty or whitespace-only",
            ));
        }
        Ok(())
    }
}

/// Specification for an entire pipeline: an ordered stage list.
///
/// Order is the only coordination contract between stages; there are no
/// dependencies, branches, or parallel groups.
#[derive(Debug, Clone)]
pub struct PipelineSpec {
    /// The pipeline name.
    pub name: String,
    /// Stages, in execution order.
    pub stages: Vec<StageSpec>,
}

impl PipelineSpec {
    /// Creates a new pipeline specification with no stages.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or whitespace-only.
    pub fn new(name: impl Into<String>) -> Result<Self, PipelineValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PipelineValidationError::new(
                "Pipeline name cannot be empty or whitespace-only",
            ));
        }
        Ok(Self {
            name,
            stages: Vec::new(),
        })
    }

    /// Returns the stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the pipeline has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
