//! Stage output type with factory methods.

use super::StageStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The output of a stage execution.
///
/// `StageOutput` is immutable once created and provides factory methods
/// for creating outputs with different statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageOutput {
    /// The status of the stage execution.
    pub status: StageStatus,

    /// The output data (for successful executions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<HashMap<String, serde_json::Value>>,

    /// Error message (for failed executions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Default for StageOutput {
    fn default() -> Self {
        Self::ok_empty()
    }
}

impl StageOutput {
    /// Creates a successful output with data.
    #[must_use]
    pub fn ok(data: HashMap<String, serde_json::Value>) -> Self {
        Self {
            status: StageStatus::Ok,
            data: Some(data),
            error: None,
        }
    }

    /// Creates a successful output with no data.
    #[must_use]
    pub fn ok_empty() -> Self {
        Self {
            status: StageStatus::Ok,
            data: None,
            error: None,
        }
    }

    /// Creates a successful output with a single value.
    #[must_use]
    pub fn ok_value(key: impl Into<String>, value: serde_json::Value) -> Self {
        let mut data = HashMap::new();
        data.insert(key.into(), value);
        Self::ok(data)
    }

    /// Creates a failure output with an error message.
    #[must_use]
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            status: StageStatus::Fail,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Returns true if the output indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_empty() {
        let output = StageOutput::ok_empty();
        assert_eq!(output.status, StageStatus::Ok);
        assert!(output.data.is_none());
        assert!(output.error.is_none());
        assert!(output.is_success());
    }

    #[test]
    fn test_ok_value() {
        let output = StageOutput::ok_value("rows", serde_json::json!(42));
        let data = output.data.unwrap();
        assert_eq!(data.get("rows"), Some(&serde_json::json!(42)));
    }

    #[test]
    fn test_fail() {
        let output = StageOutput::fail("script exited with status 1");
        assert_eq!(output.status, StageStatus::Fail);
        assert!(!output.is_success());
        assert_eq!(
            output.error.as_deref(),
            Some("script exited with status 1")
        );
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let json = serde_json::to_string(&StageOutput::ok_empty()).unwrap();
        assert_eq!(json, r#"{"status":"ok"}"#);
    }
}
