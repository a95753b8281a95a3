use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-row outcome reported by the backend after an import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub row_number: u32,
    #[serde(default)]
    pub original_data: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Result of a spreadsheet-plus-mapping import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    #[serde(default)]
    pub total_records: usize,
    #[serde(default)]
    pub success_count: usize,
    #[serde(default)]
    pub error_count: usize,
    #[serde(default)]
    pub errors: Vec<ValidationOutcome>,
}

impl ImportReport {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0 || !self.errors.is_empty()
    }
}

/// Acknowledgement returned by the JSON import-mapping call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of an advisory row check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl RowValidation {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings: Vec::new(),
        }
    }

    /// Combines two results; valid only if both are.
    #[must_use]
    pub fn merge(mut self, other: RowValidation) -> Self {
        self.is_valid = self.is_valid && other.is_valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }
}
