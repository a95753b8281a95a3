//! Static field catalogs for the built-in entity types.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use imp_model::{EntityType, FieldCatalog, FieldType, FieldValidation, TargetField};

pub(crate) const PHONE_PATTERN: &str = r"^[+]?[0-9\s\-()]+$";
pub(crate) const EMAIL_PATTERN: &str = r"^[\w\.-]+@[\w\.-]+\.[a-zA-Z]{2,}$";

static DEFAULT_CATALOGS: OnceLock<BTreeMap<String, FieldCatalog>> = OnceLock::new();

/// Returns the built-in catalogs keyed by entity type name.
pub fn default_catalogs() -> &'static BTreeMap<String, FieldCatalog> {
    DEFAULT_CATALOGS.get_or_init(|| {
        EntityType::ALL
            .iter()
            .map(|entity| (entity.as_str().to_string(), default_catalog(*entity)))
            .collect()
    })
}

/// Builds the built-in catalog for one entity type.
pub fn default_catalog(entity: EntityType) -> FieldCatalog {
    match entity {
        EntityType::User => user_catalog(),
        EntityType::Organization => organization_catalog(),
        EntityType::Group => group_catalog(),
        EntityType::Ticket => ticket_catalog(),
        EntityType::CustomField => custom_field_catalog(),
    }
}

pub(crate) fn length(min: Option<f64>, max: Option<f64>) -> FieldValidation {
    FieldValidation {
        min,
        max,
        ..FieldValidation::default()
    }
}

pub(crate) fn pattern(pattern: &str) -> FieldValidation {
    FieldValidation {
        pattern: Some(pattern.to_string()),
        ..FieldValidation::default()
    }
}

pub(crate) fn options(values: &[&str]) -> FieldValidation {
    FieldValidation {
        enum_options: values.iter().map(|v| (*v).to_string()).collect(),
        ..FieldValidation::default()
    }
}

fn field(key: &str, label: &str, value_type: FieldType) -> TargetField {
    TargetField::new(key, label, value_type)
}

fn user_catalog() -> FieldCatalog {
    FieldCatalog::new(vec![
        field("externalId", "External ID", FieldType::String)
            .required()
            .with_description("Unique identifier (generated when blank)"),
        field("firstName", "First name", FieldType::String)
            .required()
            .with_validation(length(Some(2.0), Some(50.0))),
        field("lastName", "Last name", FieldType::String)
            .required()
            .with_validation(length(Some(2.0), Some(50.0))),
        field("phone", "Phone", FieldType::String)
            .with_validation(pattern(PHONE_PATTERN))
            .with_description("E.164 phone number (+90...)"),
        field("emails", "E-mails", FieldType::Array)
            .with_validation(pattern(EMAIL_PATTERN))
            .with_description("Comma-separated e-mail list"),
        field("phones", "Phones", FieldType::Array)
            .with_description("Comma-separated phone list"),
        field("tags", "Tags", FieldType::Array).with_description("Space-separated tag list"),
        field("role", "Role", FieldType::Enum)
            .required()
            .with_validation(options(&["ADMIN", "AGENT", "CUSTOMER"]))
            .with_description("User role (default CUSTOMER)"),
        field("language", "Language", FieldType::Enum)
            .with_validation(options(&["TR", "EN", "DE", "FR"]))
            .with_description("User language (default TR)"),
        field("organization", "Organization", FieldType::String)
            .with_description("Organization ID (created when missing)"),
        field("groups", "Groups", FieldType::Array)
            .with_description("Space-separated group names (created when missing)"),
        field("enabled", "Enabled", FieldType::Boolean),
    ])
}

fn organization_catalog() -> FieldCatalog {
    FieldCatalog::new(vec![
        field("externalId", "External ID", FieldType::String).required(),
        field("name", "Organization name", FieldType::String)
            .required()
            .with_validation(length(Some(2.0), Some(100.0))),
        field("description", "Description", FieldType::String),
        field("details", "Details", FieldType::String),
        field("notes", "Notes", FieldType::String),
        field("group", "Group", FieldType::String).with_description("Group name"),
        field("domains", "Domains", FieldType::Array)
            .with_description("Comma-separated domain list"),
        field("tags", "Tags", FieldType::Array).with_description("Space-separated tag list"),
    ])
}

fn group_catalog() -> FieldCatalog {
    FieldCatalog::new(vec![
        field("name", "Group name", FieldType::String)
            .required()
            .with_validation(length(Some(2.0), Some(100.0))),
    ])
}

fn ticket_catalog() -> FieldCatalog {
    let date = |key: &str, label: &str| {
        field(key, label, FieldType::Date).with_description("YYYY-MM-DDTHH:mm:ss")
    };
    FieldCatalog::new(vec![
        field("externalId", "External ID", FieldType::String).required(),
        field("subject", "Subject", FieldType::String)
            .with_validation(length(Some(3.0), Some(200.0))),
        field("description", "Description", FieldType::String),
        field("status", "Status", FieldType::Enum)
            .with_validation(options(&["OPEN", "IN_PROGRESS", "RESOLVED", "CLOSED"])),
        field("priority", "Priority", FieldType::Enum)
            .with_validation(options(&["LOW", "MEDIUM", "HIGH", "URGENT"])),
        field("type", "Type", FieldType::Enum)
            .with_validation(options(&["BUG", "FEATURE", "QUESTION", "TASK"])),
        field("channel", "Channel", FieldType::Enum)
            .with_validation(options(&["EMAIL", "PHONE", "CHAT", "WEB"])),
        field("form", "Form", FieldType::String),
        date("createdAt", "Created at"),
        date("updatedAt", "Updated at"),
        date("solvedAt", "Solved at"),
        field("creator", "Creator", FieldType::String),
        field("requester", "Requester", FieldType::String),
        field("assignee", "Assignee", FieldType::String),
        field("assigneeGroup", "Assignee group", FieldType::String),
        field("organization", "Organization", FieldType::String),
        field("tags", "Tags", FieldType::Array),
    ])
}

fn custom_field_catalog() -> FieldCatalog {
    FieldCatalog::new(vec![
        field("key", "Key", FieldType::String).required(),
        field("type", "Type", FieldType::Enum)
            .required()
            .with_validation(options(&["TEXT", "NUMBER", "DATE", "CHECKBOX", "DROPDOWN"])),
        field("name", "Name", FieldType::String).required(),
        field("description", "Description", FieldType::String),
        field("permission", "Permission", FieldType::Enum)
            .required()
            .with_validation(options(&["READ-WRITE", "READ-ONLY", "AGENT_ONLY", "CUSTOMER_ONLY"])),
        field("required", "Required", FieldType::Boolean),
        field("descriptionForAgents", "Description for agents", FieldType::String),
        field("descriptionForCustomers", "Description for customers", FieldType::String),
        field("titleForAgents", "Title for agents", FieldType::String),
        field("titleForCustomers", "Title for customers", FieldType::String),
        field("enabled", "Enabled", FieldType::Boolean),
        field("options", "Options", FieldType::Array)
            .with_description("$-separated option list (DROPDOWN only)"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entity_has_catalog() {
        let catalogs = default_catalogs();
        assert_eq!(catalogs.len(), EntityType::ALL.len());
        for entity in EntityType::ALL {
            let catalog = &catalogs[entity.as_str()];
            assert!(!catalog.is_empty(), "{entity} catalog is empty");
            assert!(!catalog.required_keys().is_empty());
        }
    }

    #[test]
    fn test_user_required_fields() {
        let catalog = default_catalog(EntityType::User);
        assert_eq!(
            catalog.required_keys(),
            vec!["externalId", "firstName", "lastName", "role"]
        );
    }

    #[test]
    fn test_keys_unique_within_catalog() {
        for catalog in default_catalogs().values() {
            let mut keys: Vec<_> = catalog.iter().map(|f| f.key.as_str()).collect();
            keys.sort_unstable();
            let before = keys.len();
            keys.dedup();
            assert_eq!(before, keys.len());
        }
    }
}
