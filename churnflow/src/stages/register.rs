//! In-process feature registration stage.

use super::{Stage, StageContext};
use crate::core::StageOutput;
use crate::registry::{auto_register, RuleTable, SqliteSchemaSource};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

/// Runs feature auto-discovery against the transformed SQLite store and
/// persists the resulting metadata.
///
/// Unlike script stages this runs inside the pipeline process; a
/// registration failure (missing store, malformed metadata file) fails the
/// stage and therefore the run.
#[derive(Debug)]
pub struct RegisterFeaturesStage {
    name: String,
    db_path: PathBuf,
    metadata_path: PathBuf,
    rules: RuleTable,
}

impl RegisterFeaturesStage {
    /// Creates a registration stage with the default churn rule table.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        db_path: impl Into<PathBuf>,
        metadata_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            db_path: db_path.into(),
            metadata_path: metadata_path.into(),
            rules: RuleTable::default(),
        }
    }

    /// Replaces the classification rule table.
    #[must_use]
    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = rules;
        self
    }
}

#[async_trait]
impl Stage for RegisterFeaturesStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, ctx: &StageContext) -> StageOutput {
        // Relative store paths resolve against the pipeline directory, the
        // same way script stages see them.
        let db_path = ctx.pipeline_dir().join(&self.db_path);
        let metadata_path = ctx.pipeline_dir().join(&self.metadata_path);

        let source = SqliteSchemaSource::new(db_path);
        match auto_register(&source, &metadata_path, &self.rules) {
            Ok(registered) => {
                info!(stage = %self.name, registered, "feature registration complete");
                StageOutput::ok_value("features_registered", serde_json::json!(registered))
            }
            Err(e) => StageOutput::fail(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FeatureStore;
    use rusqlite::Connection;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_register_stage_writes_metadata_file() {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(dir.path().join("customer_features.db")).unwrap();
        conn.execute(
            "CREATE TABLE customer_features (CustomerID TEXT, Contract_TwoYear INTEGER)",
            [],
        )
        .unwrap();
        drop(conn);

        let stage =
            RegisterFeaturesStage::new("register-features", "customer_features.db", "features.json");
        let ctx = StageContext::new(Uuid::new_v4(), dir.path());

        let output = stage.execute(&ctx).await;
        assert!(output.is_success());
        assert_eq!(
            output.data.unwrap().get("features_registered"),
            Some(&serde_json::json!(1))
        );

        let store = FeatureStore::load(dir.path().join("features.json")).unwrap();
        assert!(store.get("Contract_TwoYear").is_some());
        assert!(store.get("CustomerID").is_none());
    }

    #[tokio::test]
    async fn test_register_stage_fails_without_store() {
        let dir = tempfile::tempdir().unwrap();
        let stage =
            RegisterFeaturesStage::new("register-features", "missing.db", "features.json");
        let ctx = StageContext::new(Uuid::new_v4(), dir.path());

        let output = stage.execute(&ctx).await;
        assert!(!output.is_success());
        assert!(output.error.unwrap().contains("missing.db"));
    }
}
