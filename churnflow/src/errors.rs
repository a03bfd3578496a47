//! Error types for the churnflow pipeline.
//!
//! Two tiers exist: fatal errors (stage script failure, malformed metadata,
//! schema introspection failure, invalid configuration) abort the run, while
//! versioning failures are deliberately not errors at all — they are
//! reported as a [`crate::versioning::VersioningOutcome`] variant.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for churnflow operations.
#[derive(Debug, Error)]
pub enum ChurnflowError {
    /// A pipeline validation error occurred.
    #[error("{0}")]
    Validation(#[from] PipelineValidationError),

    /// The feature metadata file exists but is not valid JSON.
    #[error("malformed feature metadata file '{path}': {source}")]
    MalformedMetadata {
        /// Path of the offending file.
        path: PathBuf,
        /// The underlying parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// Schema introspection against the tabular store failed.
    #[error("schema introspection failed for '{path}': {source}")]
    SchemaIntrospection {
        /// Path of the SQLite store.
        path: PathBuf,
        /// The underlying SQLite failure.
        #[source]
        source: rusqlite::Error,
    },

    /// The expected feature table is absent from the tabular store.
    #[error("table '{table}' not found in '{path}'")]
    MissingTable {
        /// The table that was queried.
        table: String,
        /// Path of the SQLite store.
        path: PathBuf,
    },

    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error raised when pipeline validation fails.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PipelineValidationError {
    /// The error message.
    pub message: String,
    /// The stages involved in the error.
    pub stages: Vec<String>,
}

impl PipelineValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stages: Vec::new(),
        }
    }

    /// Sets the stages involved in the error.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<String>) -> Self {
        self.stages = stages;
        self
    }
}
