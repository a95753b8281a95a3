use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mapping::ColumnMapping;

/// A named, stored mapping reusable across imports of one entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingTemplate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "importType")]
    pub entity_type: String,
    #[serde(default)]
    pub mappings: Vec<ColumnMapping>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl MappingTemplate {
    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.id,
            name: self.name.clone(),
            entity_type: self.entity_type.clone(),
            mapping_count: self.mappings.len(),
            is_default: self.is_default,
            created_at: self.created_at,
        }
    }
}

/// Body of a template create or update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRequest {
    pub name: String,
    pub description: String,
    #[serde(rename = "importType", alias = "entityType")]
    pub entity_type: String,
    pub mappings: Vec<ColumnMapping>,
    pub created_by: String,
}

/// Listing row for a stored template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: i64,
    pub name: String,
    pub entity_type: String,
    pub mapping_count: usize,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}
