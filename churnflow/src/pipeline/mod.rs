//! Pipeline building and execution.
//!
//! This module provides:
//! - Stage and pipeline specifications
//! - A builder with validation
//! - The sequential execution driver
//! - Assembly of a pipeline from configuration

mod builder;
mod driver;
mod spec;

#[cfg(test)]
mod driver_tests;

pub use builder::PipelineBuilder;
pub use driver::PipelineDriver;
pub use spec::{PipelineSpec, StageSpec};

use crate::config::PipelineConfig;
use crate::core::StageKind;
use crate::errors::ChurnflowError;
use crate::stages::{RegisterFeaturesStage, ScriptStage, Stage};
use crate::versioning::{CommandRunner, DataVersioner, SystemCommandRunner};
use std::sync::Arc;

/// Assembles a pipeline specification from configuration.
///
/// # Errors
///
/// Returns an error if a script stage lacks a script path or the stage list
/// fails validation.
pub fn build_pipeline(
    config: &PipelineConfig,
    runner: Arc<dyn CommandRunner>,
) -> Result<PipelineSpec, ChurnflowError> {
    let mut builder = PipelineBuilder::new(&config.name);
    for stage in &config.stages {
        let implementation: Arc<dyn Stage> = match stage.kind {
            StageKind::Script => {
                let script = stage.script.clone().ok_or_else(|| {
                    ChurnflowError::Config(format!(
                        "stage '{}' has kind 'script' but no script path",
                        stage.name
                    ))
                })?;
                Arc::new(ScriptStage::new(
                    &stage.name,
                    &config.interpreter,
                    script,
                    stage.args.clone(),
                    runner.clone(),
                ))
            }
            StageKind::RegisterFeatures => Arc::new(RegisterFeaturesStage::new(
                &stage.name,
                &config.feature_db_path,
                &config.feature_metadata_path,
            )),
        };

        let mut spec = StageSpec::new(&stage.name, implementation)
            .with_outputs(stage.outputs.iter().cloned());
        if let Some(message) = &stage.commit_message {
            spec = spec.with_commit_message(message);
        }
        builder = builder.stage(spec)?;
    }
    Ok(builder.build()?)
}

impl PipelineDriver {
    /// Creates a driver for `config` backed by real subprocesses.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured stage list fails validation.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ChurnflowError> {
        let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner::new());
        let spec = build_pipeline(config, runner.clone())?;
        let versioner = DataVersioner::from_config(config, runner);
        Ok(Self::new(spec, versioner, config.pipeline_dir.clone()))
    }
}
