use async_trait::async_trait;
use imp_model::{FieldCatalog, FieldType, RowValidation, TargetField};
use serde_json::Value;

use crate::catalog::{length, options};
use crate::plugin::EntityTypePlugin;
use crate::row::{Row, row_text, to_list};
use crate::validate::parse_datetime;

const STATUSES: [&str; 4] = ["OPEN", "IN_PROGRESS", "RESOLVED", "CLOSED"];
const PRIORITIES: [&str; 4] = ["LOW", "MEDIUM", "HIGH", "URGENT"];
const CHANNELS: [&str; 4] = ["EMAIL", "WEB", "PHONE", "CHAT"];

/// Support tickets.
pub struct TicketPlugin {
    catalog: FieldCatalog,
}

impl TicketPlugin {
    pub fn new() -> Self {
        let catalog = FieldCatalog::new(vec![
            TargetField::new("externalId", "External ID", FieldType::String)
                .with_description("Unique identifier in the source system"),
            TargetField::new("title", "Title", FieldType::String)
                .required()
                .with_validation(length(Some(5.0), Some(200.0))),
            TargetField::new("description", "Description", FieldType::String)
                .required()
                .with_validation(length(Some(10.0), None)),
            TargetField::new("status", "Status", FieldType::Enum)
                .with_validation(options(&STATUSES)),
            TargetField::new("priority", "Priority", FieldType::Enum)
                .with_validation(options(&PRIORITIES)),
            TargetField::new("type", "Type", FieldType::Enum)
                .with_validation(options(&["QUESTION", "INCIDENT", "PROBLEM", "TASK"])),
            TargetField::new("assignee", "Assignee", FieldType::Object),
            TargetField::new("requester", "Requester", FieldType::Object),
            TargetField::new("organization", "Organization", FieldType::Object),
            TargetField::new("channel", "Channel", FieldType::Enum)
                .with_validation(options(&CHANNELS)),
            TargetField::new("tags", "Tags", FieldType::Array),
        ]);
        Self { catalog }
    }
}

impl Default for TicketPlugin {
    fn default() -> Self {
        Self::new()
    }
}

fn check_choice(row: &Row, key: &str, label: &str, allowed: &[&str], errors: &mut Vec<String>) {
    let Some(value) = row_text(row, key).filter(|v| !v.is_empty()) else {
        return;
    };
    if !allowed.contains(&value.to_uppercase().as_str()) {
        errors.push(format!(
            "Invalid {label}: {value}. Allowed values: {}",
            allowed.join(", ")
        ));
    }
}

fn upper_or(row: &Row, key: &str, default: &str) -> Value {
    let value = row_text(row, key)
        .filter(|v| !v.is_empty())
        .map_or_else(|| default.to_string(), |v| v.to_uppercase());
    Value::String(value)
}

#[async_trait]
impl EntityTypePlugin for TicketPlugin {
    fn name(&self) -> &str {
        "Ticket"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn entity_type(&self) -> &str {
        "Ticket"
    }

    fn field_catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    async fn validate_row(&self, row: &Row) -> Option<RowValidation> {
        let mut errors = Vec::new();

        let title = row_text(row, "title").unwrap_or_default();
        if title.trim().chars().count() < 5 {
            errors.push("Title must be at least 5 characters".to_string());
        }
        if title.chars().count() > 200 {
            errors.push("Title must be at most 200 characters".to_string());
        }

        let description = row_text(row, "description").unwrap_or_default();
        if description.trim().chars().count() < 10 {
            errors.push("Description must be at least 10 characters".to_string());
        }

        check_choice(row, "status", "status", &STATUSES, &mut errors);
        check_choice(row, "priority", "priority", &PRIORITIES, &mut errors);
        check_choice(row, "channel", "channel", &CHANNELS, &mut errors);

        Some(RowValidation::from_errors(errors))
    }

    /// Upper-cases status, priority and channel (defaulting to OPEN, MEDIUM
    /// and WEB), splits tags and rewrites parseable dates as RFC 3339.
    async fn transform_rows(&self, rows: Vec<Row>) -> Vec<Row> {
        rows.into_iter()
            .map(|mut row| {
                let status = upper_or(&row, "status", "OPEN");
                let priority = upper_or(&row, "priority", "MEDIUM");
                let channel = upper_or(&row, "channel", "WEB");
                let tags = to_list(row.get("tags"));
                row.insert("status".into(), status);
                row.insert("priority".into(), priority);
                row.insert("channel".into(), channel);
                row.insert("tags".into(), tags);

                for key in ["createdAt", "updatedAt"] {
                    if let Some(parsed) = row_text(&row, key).as_deref().and_then(parse_datetime) {
                        row.insert(key.into(), Value::String(parsed.to_rfc3339()));
                    }
                }
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
    async fn test_validate_ticket_row() {
        let plugin = TicketPlugin::new();
        let row = row_from_pairs([
            ("title", "Printer on fire"),
            ("description", "short"),
            ("status", "open"),
            ("channel", "fax"),
        ]);
        let result = plugin.validate_row(&row).await.unwrap();
        assert_eq!(
            result.errors,
            vec![
                "Description must be at least 10 characters",
                "Invalid channel: fax. Allowed values: EMAIL, WEB, PHONE, CHAT",
            ]
        );
    }

    #[tokio::test]
    async fn test_transform_defaults() {
        let plugin = TicketPlugin::new();
        let rows = vec![row_from_pairs([
            ("priority", "high"),
            ("tags", "vip, billing"),
            ("createdAt", "2024-02-03 04:05:06"),
        ])];
        let out = plugin.transform_rows(rows).await;
        assert_eq!(out[0]["status"], "OPEN");
        assert_eq!(out[0]["priority"], "HIGH");
        assert_eq!(out[0]["channel"], "WEB");
        assert_eq!(out[0]["tags"], serde_json::json!(["vip", "billing"]));
        assert_eq!(out[0]["createdAt"], "2024-02-03T04:05:06+00:00");
        assert!(out[0].get("updatedAt").is_none());
    }
}
