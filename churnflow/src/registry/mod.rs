//! Feature registry: a flat, file-backed mapping from feature name to
//! descriptive metadata, auto-populated from the transformed store's schema.

mod discovery;
mod rules;
mod store;

pub use discovery::{auto_register, SchemaSource, SqliteSchemaSource, FEATURE_TABLE};
pub use rules::{
    is_identifier_column, FeatureMatcher, FeatureRule, RuleTable, FEATURE_VERSION,
};
pub use store::{FeatureMetadata, FeatureStore};
