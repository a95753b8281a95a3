use std::sync::LazyLock;

use async_trait::async_trait;
use imp_model::{FieldCatalog, FieldType, RowValidation, TargetField};
use regex::Regex;
use serde_json::Value;

use crate::catalog::{EMAIL_PATTERN, PHONE_PATTERN, length, pattern};
use crate::plugin::EntityTypePlugin;
use crate::row::{Row, row_text, to_flag, to_list};

const DOMAIN_PATTERN: &str = r"^[a-zA-Z0-9][a-zA-Z0-9-]{1,61}[a-zA-Z0-9]\.[a-zA-Z]{2,}$";
const WEBSITE_PATTERN: &str = r"^https?://(www\.)?[-a-zA-Z0-9@:%._\+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_\+.~#?&/=]*)$";

static DOMAIN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DOMAIN_PATTERN).expect("Invalid domain regex"));
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("Invalid e-mail regex"));
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("Invalid phone regex"));
static WEBSITE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(WEBSITE_PATTERN).expect("Invalid website regex"));

/// Companies and organizations.
pub struct OrganizationPlugin {
    catalog: FieldCatalog,
}

impl OrganizationPlugin {
    pub fn new() -> Self {
        let catalog = FieldCatalog::new(vec![
            TargetField::new("externalId", "External ID", FieldType::String)
                .with_description("Unique identifier in the source system"),
            TargetField::new("name", "Company name", FieldType::String)
                .required()
                .with_validation(length(Some(2.0), Some(100.0))),
            TargetField::new("domain", "Domain", FieldType::String)
                .with_validation(pattern(DOMAIN_PATTERN)),
            TargetField::new("description", "Description", FieldType::String),
            TargetField::new("address", "Address", FieldType::String),
            TargetField::new("phone", "Phone", FieldType::String)
                .with_validation(pattern(PHONE_PATTERN)),
            TargetField::new("email", "E-mail", FieldType::String)
                .with_validation(pattern(EMAIL_PATTERN)),
            TargetField::new("website", "Website", FieldType::String)
                .with_validation(pattern(WEBSITE_PATTERN)),
            TargetField::new("tags", "Tags", FieldType::Array),
            TargetField::new("enabled", "Enabled", FieldType::Boolean),
        ]);
        Self { catalog }
    }
}

impl Default for OrganizationPlugin {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(row: &Row, key: &str) -> Option<String> {
    row_text(row, key).filter(|v| !v.trim().is_empty())
}

fn lower_trimmed(row: &Row, key: &str) -> Value {
    Value::String(non_empty(row, key).map(|v| v.trim().to_lowercase()).unwrap_or_default())
}

#[async_trait]
impl EntityTypePlugin for OrganizationPlugin {
    fn name(&self) -> &str {
        "Organization"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn entity_type(&self) -> &str {
        "Organization"
    }

    fn field_catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    async fn validate_row(&self, row: &Row) -> Option<RowValidation> {
        let mut errors = Vec::new();

        let name = row_text(row, "name").unwrap_or_default();
        if name.trim().chars().count() < 2 {
            errors.push("Company name must be at least 2 characters".to_string());
        }
        if name.chars().count() > 100 {
            errors.push("Company name must be at most 100 characters".to_string());
        }

        if let Some(domain) = non_empty(row, "domain")
            && !DOMAIN_REGEX.is_match(&domain)
        {
            errors.push(format!("Invalid domain format: {domain}"));
        }
        if let Some(email) = non_empty(row, "email")
            && !EMAIL_REGEX.is_match(&email)
        {
            errors.push(format!("Invalid e-mail format: {email}"));
        }
        if let Some(phone) = non_empty(row, "phone")
            && !PHONE_REGEX.is_match(&phone)
        {
            errors.push("Invalid phone format".to_string());
        }
        if let Some(website) = non_empty(row, "website")
            && !WEBSITE_REGEX.is_match(&website)
        {
            errors.push(format!("Invalid website format: {website}"));
        }

        Some(RowValidation::from_errors(errors))
    }

    async fn transform_rows(&self, rows: Vec<Row>) -> Vec<Row> {
        rows.into_iter()
            .map(|mut row| {
                let name = Value::String(
                    row_text(&row, "name").map(|n| n.trim().to_string()).unwrap_or_default(),
                );
                let domain = lower_trimmed(&row, "domain");
                let email = lower_trimmed(&row, "email");
                let website = match non_empty(&row, "website") {
                    Some(site) if site.starts_with("http") => site,
                    Some(site) => format!("https://{site}"),
                    None => String::new(),
                };
                let tags = to_list(row.get("tags"));
                let enabled = to_flag(row.get("enabled"));

                row.insert("name".into(), name);
                row.insert("domain".into(), domain);
                row.insert("email".into(), email);
                row.insert("website".into(), Value::String(website));
                row.insert("tags".into(), tags);
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
    async fn test_validate_organization_row() {
        let plugin = OrganizationPlugin::new();
        let good = row_from_pairs([
            ("name", "Acme"),
            ("domain", "acme.com"),
            ("website", "https://www.acme.com/about"),
        ]);
        assert!(plugin.validate_row(&good).await.unwrap().is_valid);

        let bad = row_from_pairs([("name", "A"), ("domain", "-acme"), ("email", "x@")]);
        let result = plugin.validate_row(&bad).await.unwrap();
        assert_eq!(
            result.errors,
            vec![
                "Company name must be at least 2 characters",
                "Invalid domain format: -acme",
                "Invalid e-mail format: x@",
            ]
        );
    }

    #[tokio::test]
    async fn test_transform_normalizes() {
        let plugin = OrganizationPlugin::new();
        let rows = vec![row_from_pairs([
            ("name", "  Acme  "),
            ("domain", " ACME.com"),
            ("website", "acme.com"),
            ("enabled", "true"),
        ])];
        let out = plugin.transform_rows(rows).await;
        assert_eq!(out[0]["name"], "Acme");
        assert_eq!(out[0]["domain"], "acme.com");
        assert_eq!(out[0]["website"], "https://acme.com");
        assert_eq!(out[0]["enabled"], Value::Bool(true));
        assert_eq!(out[0]["tags"], serde_json::json!([]));
    }
}
