//! Pipeline configuration.
//!
//! Environment bindings (interpreter, working directory, tool executables,
//! store paths) and the ordered stage list live in an explicit configuration
//! structure supplied at startup rather than embedded constants. The
//! defaults reproduce the six-stage churn workflow.

use crate::core::StageKind;
use crate::errors::ChurnflowError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a single pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    /// The unique stage name.
    pub name: String,
    /// The kind of stage.
    #[serde(default)]
    pub kind: StageKind,
    /// Path of the stage script, relative to the pipeline directory.
    /// Required for [`StageKind::Script`] stages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<PathBuf>,
    /// Extra arguments passed to the script after its path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Output files this stage leaves behind, versioned after success.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<PathBuf>,
    /// Commit message used when versioning the outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
}

impl StageConfig {
    /// Creates a script stage configuration.
    #[must_use]
    pub fn script(name: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind: StageKind::Script,
            script: Some(script.into()),
            args: Vec::new(),
            outputs: Vec::new(),
            commit_message: None,
        }
    }

    /// Creates an in-process feature-registration stage configuration.
    #[must_use]
    pub fn register_features(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StageKind::RegisterFeatures,
            script: None,
            args: Vec::new(),
            outputs: Vec::new(),
            commit_message: None,
        }
    }

    /// Appends script arguments.
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Declares output files for versioning.
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
}

/// Configuration for a whole pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// The pipeline name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Interpreter used to run stage scripts.
    #[serde(default = "default_interpreter")]
    pub interpreter: PathBuf,
    /// Working directory for every stage script and versioning command.
    #[serde(default = "default_pipeline_dir")]
    pub pipeline_dir: PathBuf,
    /// The DVC executable.
    #[serde(default = "default_dvc_executable")]
    pub dvc_executable: PathBuf,
    /// The git executable.
    #[serde(default = "default_git_executable")]
    pub git_executable: PathBuf,
    /// SQLite store holding the transformed `customer_features` table.
    #[serde(default = "default_feature_db_path")]
    pub feature_db_path: PathBuf,
    /// JSON file holding the feature metadata mapping.
    #[serde(default = "default_feature_metadata_path")]
    pub feature_metadata_path: PathBuf,
    /// Ordered stage list.
    #[serde(default = "default_stages")]
    pub stages: Vec<StageConfig>,
}

fn default_name() -> String {
    "churn-pipeline".to_string()
}

fn default_interpreter() -> PathBuf {
    PathBuf::from("python3")
}

fn default_pipeline_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_dvc_executable() -> PathBuf {
    PathBuf::from("dvc")
}

fn default_git_executable() -> PathBuf {
    PathBuf::from("git")
}

fn default_feature_db_path() -> PathBuf {
    PathBuf::from("data/processed/customer_features.db")
}

fn default_feature_metadata_path() -> PathBuf {
    PathBuf::from("features.json")
}

fn default_stages() -> Vec<StageConfig> {
    vec![
        StageConfig::script("ingest", "scripts/ingest.py")
            .with_outputs([
                "data/raw/telco_churn.csv",
                "data/raw/hf_bank_customer_support.csv",
            ])
            .with_commit_message("Version raw ingested data"),
        StageConfig::script("validate", "scripts/validate.py")
            .with_outputs(["data/validation_report.csv"])
            .with_commit_message("Version validation report"),
        StageConfig::script("prepare", "scripts/prepare.py")
            .with_outputs(["data/prepared/customer_data_cleaned.csv"])
            .with_commit_message("Version prepared data"),
        StageConfig::script("transform", "scripts/transform.py")
            .with_outputs(["data/processed/customer_features.db"])
            .with_commit_message("Version transformed features"),
        StageConfig::register_features("register-features")
            .with_outputs(["features.json"])
            .with_commit_message("Version feature store metadata"),
        StageConfig::script("train", "scripts/model_training.py")
            .with_args(["--db-path", "data/processed/customer_features.db"])
            .with_outputs(["models/model.pkl"])
            .with_commit_message("Version trained model"),
    ]
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            interpreter: default_interpreter(),
            pipeline_dir: default_pipeline_dir(),
            dvc_executable: default_dvc_executable(),
            git_executable: default_git_executable(),
            feature_db_path: default_feature_db_path(),
            feature_metadata_path: default_feature_metadata_path(),
            stages: default_stages(),
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON file. Absent fields fall back to
    /// their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ChurnflowError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Sets the working directory.
    #[must_use]
    pub fn with_pipeline_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pipeline_dir = dir.into();
        self
    }

    /// Sets the interpreter.
    #[must_use]
    pub fn with_interpreter(mut self, interpreter: impl Into<PathBuf>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    /// Replaces the stage list.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<StageConfig>) -> Self {
        self.stages = stages;
        self
    }
}
