use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One spreadsheet column assigned to one target field.
///
/// The legacy backend field names (`excelColumn`, `grispiField`) are accepted
/// when reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    #[serde(alias = "excelColumn")]
    pub source_column: String,
    #[serde(alias = "grispiField")]
    pub target_field_key: String,
}

impl ColumnMapping {
    pub fn new(source_column: impl Into<String>, target_field_key: impl Into<String>) -> Self {
        Self {
            source_column: source_column.into(),
            target_field_key: target_field_key.into(),
        }
    }
}

/// Wire shape the backend reads for template and spreadsheet imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegacyColumnMapping<'a> {
    #[serde(rename = "excelColumn")]
    pub source_column: &'a str,
    #[serde(rename = "grispiField")]
    pub target_field_key: &'a str,
}

impl<'a> From<&'a ColumnMapping> for LegacyColumnMapping<'a> {
    fn from(mapping: &'a ColumnMapping) -> Self {
        Self {
            source_column: &mapping.source_column,
            target_field_key: &mapping.target_field_key,
        }
    }
}

/// Converts mappings to the backend's field names.
pub fn legacy_mappings(mappings: &[ColumnMapping]) -> Vec<LegacyColumnMapping<'_>> {
    mappings.iter().map(LegacyColumnMapping::from).collect()
}

/// The exported mapping artifact, also the body of the import-mapping call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub import_type: String,
    pub mappings: Vec<ColumnMapping>,
    pub total_rows: usize,
    pub mapped_fields: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredFieldInfo {
    #[serde(default)]
    pub required: bool,
}

/// Required-field flags as reported by the backend, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequiredFields {
    pub fields: BTreeMap<String, RequiredFieldInfo>,
}

impl RequiredFields {
    /// Builds a set where every given key is required.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = keys
            .into_iter()
            .map(|k| (k.into(), RequiredFieldInfo { required: true }))
            .collect();
        Self { fields }
    }

    /// Keys flagged `required: true`.
    pub fn required_keys(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(_, info)| info.required)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
