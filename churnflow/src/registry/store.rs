//! File-backed feature metadata store.

use crate::errors::ChurnflowError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Descriptive metadata for a single feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureMetadata {
    /// What the feature measures.
    pub description: String,
    /// Where the feature came from.
    pub source: String,
    /// Version tag of the registration.
    pub version: String,
}

impl FeatureMetadata {
    /// Creates new feature metadata.
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        source: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            source: source.into(),
            version: version.into(),
        }
    }
}

/// The full set of feature metadata entries, persisted as a single JSON
/// object keyed by feature name.
///
/// Entries are kept in a `BTreeMap` so serialization order is stable and
/// repeated registration runs over an unchanged schema produce
/// byte-identical files.
#[derive(Debug, Clone)]
pub struct FeatureStore {
    metadata_path: PathBuf,
    features: BTreeMap<String, FeatureMetadata>,
}

impl FeatureStore {
    /// Loads the store from `metadata_path`.
    ///
    /// A missing file yields an empty store. A file that exists but fails to
    /// parse is a fatal [`ChurnflowError::MalformedMetadata`].
    pub fn load(metadata_path: impl Into<PathBuf>) -> Result<Self, ChurnflowError> {
        let metadata_path = metadata_path.into();
        if !metadata_path.exists() {
            warn!(
                path = %metadata_path.display(),
                "feature metadata file not found, initializing empty store"
            );
            return Ok(Self {
                metadata_path,
                features: BTreeMap::new(),
            });
        }

        let raw = std::fs::read_to_string(&metadata_path)?;
        let features = serde_json::from_str(&raw).map_err(|source| {
            ChurnflowError::MalformedMetadata {
                path: metadata_path.clone(),
                source,
            }
        })?;
        Ok(Self {
            metadata_path,
            features,
        })
    }

    /// Returns the metadata for `name`, if registered.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FeatureMetadata> {
        self.features.get(name)
    }

    /// Inserts or overwrites the entry for `name`. In-memory only until
    /// [`FeatureStore::save`] is called.
    pub fn put(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        source: impl Into<String>,
        version: impl Into<String>,
    ) {
        let name = name.into();
        debug!(feature = %name, "registered feature metadata");
        self.features
            .insert(name, FeatureMetadata::new(description, source, version));
    }

    /// Serializes the full mapping to the metadata path.
    ///
    /// The content is written to a temporary file in the target directory
    /// and atomically renamed over the destination, so a crash mid-write
    /// leaves the previous version intact.
    pub fn save(&self) -> Result<(), ChurnflowError> {
        let dir = self
            .metadata_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(tmp.as_file(), &self.features)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.metadata_path).map_err(|e| e.error)?;
        info!(
            path = %self.metadata_path.display(),
            features = self.features.len(),
            "feature metadata saved"
        );
        Ok(())
    }

    /// Returns the number of registered features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns true if no features are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Returns the registered feature names in sorted order.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    /// Returns the path this store persists to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.metadata_path
    }
}
