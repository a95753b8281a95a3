//! Target field definitions.
//!
//! A [`FieldCatalog`] is the ordered set of fields an entity type accepts.
//! Catalogs are static per entity type, except when a plugin replaces one
//! wholesale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Value type of a target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Enum,
    Array,
    Object,
    Date,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Enum => "enum",
            FieldType::Array => "array",
            FieldType::Object => "object",
            FieldType::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" | "text" => Ok(FieldType::String),
            "number" | "numeric" => Ok(FieldType::Number),
            "boolean" | "bool" => Ok(FieldType::Boolean),
            "enum" => Ok(FieldType::Enum),
            "array" | "list" => Ok(FieldType::Array),
            "object" => Ok(FieldType::Object),
            "date" | "datetime" => Ok(FieldType::Date),
            _ => Err(ModelError::UnknownFieldType(s.to_string())),
        }
    }
}

/// Validation hints attached to a field.
///
/// `min`/`max` bound the trimmed character length for text fields and the
/// numeric value for number fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, alias = "options", skip_serializing_if = "Vec::is_empty")]
    pub enum_options: Vec<String>,
}

/// A field an import target accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetField {
    /// Unique key within the entity type (e.g. `firstName`).
    #[serde(alias = "value")]
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub value_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TargetField {
    pub fn new(key: impl Into<String>, label: impl Into<String>, value_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value_type,
            required: false,
            validation: None,
            description: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_validation(mut self, validation: FieldValidation) -> Self {
        self.validation = Some(validation);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Ordered field set for one entity type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    pub fields: Vec<TargetField>,
}

impl FieldCatalog {
    pub fn new(fields: Vec<TargetField>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&TargetField> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Label for a key, falling back to the key itself.
    pub fn label_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).map_or(key, |f| f.label.as_str())
    }

    /// Keys of fields flagged as required, in catalog order.
    pub fn required_keys(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.key.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetField> {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_field_shape() {
        let json = r#"{
            "value": "role",
            "label": "Role",
            "type": "enum",
            "required": true,
            "validation": { "options": ["ADMIN", "AGENT", "CUSTOMER"] }
        }"#;
        let field: TargetField = serde_json::from_str(json).expect("parse field");
        assert_eq!(field.key, "role");
        assert_eq!(field.value_type, FieldType::Enum);
        assert!(field.required);
        assert_eq!(
            field.validation.unwrap().enum_options,
            vec!["ADMIN", "AGENT", "CUSTOMER"]
        );
    }

    #[test]
    fn catalog_lookups() {
        let catalog = FieldCatalog::new(vec![
            TargetField::new("firstName", "First name", FieldType::String).required(),
            TargetField::new("emails", "E-mails", FieldType::Array),
        ]);
        assert_eq!(catalog.required_keys(), vec!["firstName"]);
        assert_eq!(catalog.label_for("emails"), "E-mails");
        assert_eq!(catalog.label_for("missing"), "missing");
        assert!(catalog.contains("firstName"));
    }
}
