use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Built-in import targets understood by the backend.
///
/// Plugins may contribute further entity types by name; those are carried as
/// plain strings and never parsed into this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    User,
    Organization,
    Group,
    Ticket,
    CustomField,
}

impl EntityType {
    /// All built-in entity types, in display order.
    pub const ALL: [EntityType; 5] = [
        EntityType::User,
        EntityType::Organization,
        EntityType::Group,
        EntityType::Ticket,
        EntityType::CustomField,
    ];

    /// Returns the name used in backend paths and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::User => "User",
            EntityType::Organization => "Organization",
            EntityType::Group => "Group",
            EntityType::Ticket => "Ticket",
            EntityType::CustomField => "CustomField",
        }
    }

    /// Returns a short human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            EntityType::User => "Customers and user accounts",
            EntityType::Organization => "Companies and organizations",
            EntityType::Group => "User groups",
            EntityType::Ticket => "Support tickets",
            EntityType::CustomField => "Custom field definitions",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = ModelError;

    /// Parses an entity type name, ignoring case and `-`/`_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "user" | "users" => Ok(EntityType::User),
            "organization" | "organizations" => Ok(EntityType::Organization),
            "group" | "groups" => Ok(EntityType::Group),
            "ticket" | "tickets" => Ok(EntityType::Ticket),
            "customfield" | "customfields" => Ok(EntityType::CustomField),
            _ => Err(ModelError::UnknownEntityType(s.to_string())),
        }
    }
}
