//! Feature auto-discovery from the transformed tabular store.
//!
//! Discovery lists the column names of the feature table, skips identifier
//! columns, classifies the rest through the rule table, and upserts the
//! resulting metadata into the store. Entries for columns that have since
//! disappeared from the schema are left in place.

use super::rules::{is_identifier_column, RuleTable, FEATURE_VERSION};
use super::store::FeatureStore;
use crate::errors::ChurnflowError;
use rusqlite::{Connection, OpenFlags};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Table inspected for engineered feature columns.
pub const FEATURE_TABLE: &str = "customer_features";

/// A tabular data source whose schema can be introspected.
pub trait SchemaSource: Send + Sync + Debug {
    /// Returns the column names of `table` in declared order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened or the table does not
    /// exist.
    fn column_names(&self, table: &str) -> Result<Vec<String>, ChurnflowError>;
}

/// [`SchemaSource`] over a file-backed SQLite store.
///
/// A connection is opened read-only per introspection call and closed when
/// the call returns.
#[derive(Debug, Clone)]
pub struct SqliteSchemaSource {
    db_path: PathBuf,
}

impl SqliteSchemaSource {
    /// Creates a schema source for the store at `db_path`.
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Returns the store path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

impl SchemaSource for SqliteSchemaSource {
    fn column_names(&self, table: &str) -> Result<Vec<String>, ChurnflowError> {
        let introspection_err = |source: rusqlite::Error| ChurnflowError::SchemaIntrospection {
            path: self.db_path.clone(),
            source,
        };

        // Read-only open: a missing store file is a hard error instead of
        // SQLite silently creating an empty database.
        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(introspection_err)?;

        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .map_err(introspection_err)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .map_err(introspection_err)?;

        let mut columns = Vec::new();
        for name in rows {
            columns.push(name.map_err(introspection_err)?);
        }

        if columns.is_empty() {
            return Err(ChurnflowError::MissingTable {
                table: table.to_string(),
                path: self.db_path.clone(),
            });
        }
        Ok(columns)
    }
}

/// Auto-discovers features from `source` and registers them in the metadata
/// file at `metadata_path`.
///
/// Returns the number of features registered. Existing entries are
/// overwritten; nothing is pruned.
///
/// # Errors
///
/// Returns an error if the metadata file is malformed, schema introspection
/// fails, or the save fails.
pub fn auto_register(
    source: &dyn SchemaSource,
    metadata_path: &Path,
    rules: &RuleTable,
) -> Result<usize, ChurnflowError> {
    let mut store = FeatureStore::load(metadata_path)?;
    let columns = source.column_names(FEATURE_TABLE)?;

    let mut registered = 0;
    for column in columns {
        if is_identifier_column(&column) {
            debug!(column = %column, "skipping identifier column");
            continue;
        }
        let (description, feature_source) = rules.classify(&column);
        store.put(column, description, feature_source, FEATURE_VERSION);
        registered += 1;
    }

    store.save()?;
    info!(
        registered,
        path = %metadata_path.display(),
        "auto feature registration complete"
    );
    Ok(registered)
}
