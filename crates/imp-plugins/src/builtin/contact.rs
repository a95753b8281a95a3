use std::sync::LazyLock;

use async_trait::async_trait;
use imp_model::{FieldCatalog, FieldType, RowValidation, TargetField};
use regex::Regex;
use serde_json::Value;

use crate::catalog::{EMAIL_PATTERN, PHONE_PATTERN, length, options, pattern};
use crate::error::Result;
use crate::plugin::EntityTypePlugin;
use crate::row::{Row, row_text, to_flag, to_list};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("Invalid e-mail regex"));
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("Invalid phone regex"));

/// Contacts: people with names, e-mails and phones.
pub struct ContactPlugin {
    catalog: FieldCatalog,
}

impl ContactPlugin {
    pub fn new() -> Self {
        let catalog = FieldCatalog::new(vec![
            TargetField::new("externalId", "External ID", FieldType::String)
                .with_description("Unique identifier in the source system"),
            TargetField::new("firstName", "First name", FieldType::String)
                .required()
                .with_validation(length(Some(2.0), Some(50.0))),
            TargetField::new("lastName", "Last name", FieldType::String)
                .required()
                .with_validation(length(Some(2.0), Some(50.0))),
            TargetField::new("phone", "Phone", FieldType::String)
                .with_validation(pattern(PHONE_PATTERN)),
            TargetField::new("emails", "E-mails", FieldType::Array)
                .with_validation(pattern(EMAIL_PATTERN)),
            TargetField::new("language", "Language", FieldType::Enum)
                .with_validation(options(&["TR", "EN", "DE", "FR"])),
            TargetField::new("enabled", "Enabled", FieldType::Boolean),
        ]);
        Self { catalog }
    }
}

impl Default for ContactPlugin {
    fn default() -> Self {
        Self::new()
    }
}

fn short(row: &Row, key: &str) -> bool {
    row_text(row, key).is_none_or(|v| v.trim().chars().count() < 2)
}

#[async_trait]
impl EntityTypePlugin for ContactPlugin {
    fn name(&self) -> &str {
        "Contact"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn entity_type(&self) -> &str {
        "Contact"
    }

    fn field_catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    async fn initialize(&self) -> Result<()> {
        tracing::debug!(plugin = self.name(), "Plugin initialized");
        Ok(())
    }

    async fn validate_row(&self, row: &Row) -> Option<RowValidation> {
        let mut errors = Vec::new();

        if short(row, "firstName") {
            errors.push("First name must be at least 2 characters".to_string());
        }
        if short(row, "lastName") {
            errors.push("Last name must be at least 2 characters".to_string());
        }

        if let Value::Array(emails) = to_list(row.get("emails")) {
            for email in emails.iter().filter_map(Value::as_str) {
                if !EMAIL_REGEX.is_match(email) {
                    errors.push(format!("Invalid e-mail format: {email}"));
                }
            }
        }

        if let Some(phone) = row_text(row, "phone").filter(|p| !p.is_empty())
            && !PHONE_REGEX.is_match(&phone)
        {
            errors.push("Invalid phone format".to_string());
        }

        Some(RowValidation::from_errors(errors))
    }

    async fn transform_rows(&self, rows: Vec<Row>) -> Vec<Row> {
        rows.into_iter()
            .map(|mut row| {
                let emails = to_list(row.get("emails"));
                let phones = to_list(row.get("phones"));
                let enabled = to_flag(row.get("enabled"));
                row.insert("emails".into(), emails);
                row.insert("phones".into(), phones);
                row.insert("enabled".into(), enabled);
                row
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::row_from_pairs;

    #[tokio::test]
    async fn test_validate_contact_row() {
        let plugin = ContactPlugin::new();
        let row = row_from_pairs([
            ("firstName", "A"),
            ("lastName", "Lovelace"),
            ("emails", "ada@x.io,broken"),
            ("phone", "call me"),
        ]);
        let result = plugin.validate_row(&row).await.unwrap();
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![
                "First name must be at least 2 characters",
                "Invalid e-mail format: broken",
                "Invalid phone format",
            ]
        );
    }

    #[tokio::test]
    async fn test_transform_contact_rows() {
        let plugin = ContactPlugin::new();
        let rows = vec![row_from_pairs([("emails", "a@x.io, b@x.io"), ("enabled", "1")])];
        let out = plugin.transform_rows(rows).await;
        assert_eq!(out[0]["emails"], serde_json::json!(["a@x.io", "b@x.io"]));
        assert_eq!(out[0]["phones"], serde_json::json!([]));
        assert_eq!(out[0]["enabled"], Value::Bool(true));
    }
}
