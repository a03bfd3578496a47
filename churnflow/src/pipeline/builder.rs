//! Pipeline builder with validation.

use super::{PipelineSpec, StageSpec};
use crate::errors::PipelineValidationError;
use std::collections::HashSet;

/// Builder for creating validated pipelines.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    name: String,
    stages: Vec<StageSpec>,
    seen: HashSet<String>,
}

impl PipelineBuilder {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Appends a stage to the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage name is invalid or already used.
    pub fn stage(mut self, spec: StageSpec) -> Result<Self, PipelineValidationError> {
        spec.validate()?;
        if !self.seen.insert(spec.name.clone()) {
            return Err(PipelineValidationError::new(format!(
                "Duplicate stage '{}'",
                spec.name
            ))
            .with_stages(vec![spec.name]));
        }
        self.stages.push(spec);
        Ok(self)
    }

    /// Returns the number of stages added so far.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Builds the validated pipeline specification.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline name is empty.
    pub fn build(self) -> Result<PipelineSpec, PipelineValidationError> {
        let mut spec = PipelineSpec::new(self.name)?;
        spec.stages = self.stages;
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockStage;
    use std::sync::Arc;

    #[test]
    fn test_builder_preserves_order() {
        let spec = PipelineBuilder::new("churn-pipeline")
            .stage(StageSpec::new("ingest", Arc::new(MockStage::new("ingest"))))
            .unwrap()
            .stage(StageSpec::new("validate", Arc::new(MockStage::new("validate"))))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(spec.stage_names(), vec!["ingest", "validate"]);
    }

    #[test]
    fn test_builder_rejects_duplicate_stage() {
        let result = PipelineBuilder::new("p")
            .stage(StageSpec::new("ingest", Arc::new(MockStage::new("ingest"))))
            .unwrap()
            .stage(StageSpec::new("ingest", Arc::new(MockStage::new("ingest"))));
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_rejects_empty_pipeline_name() {
        assert!(PipelineBuilder::new("  ").build().is_err());
    }
}
