//! Plugins shipped with the wizard.
//!
//! Contact, Ticket and Organization are always registered. Any plugin in
//! the [`PluginFactory`] can also be enabled by name from the configuration
//! file.

mod contact;
mod group;
mod organization;
mod ticket;

use std::collections::BTreeMap;

use crate::error::{PluginError, Result};
use crate::plugin::EntityTypePlugin;

pub use contact::ContactPlugin;
pub use group::GroupPlugin;
pub use organization::OrganizationPlugin;
pub use ticket::TicketPlugin;

type Constructor = fn() -> Box<dyn EntityTypePlugin>;

/// Plugins registered on every start, in registration order.
pub fn builtin_plugins() -> Vec<Box<dyn EntityTypePlugin>> {
    vec![
        Box::new(ContactPlugin::new()),
        Box::new(TicketPlugin::new()),
        Box::new(OrganizationPlugin::new()),
    ]
}

/// Name-to-constructor table used to resolve configured external plugins.
pub struct PluginFactory {
    constructors: BTreeMap<&'static str, Constructor>,
}

impl PluginFactory {
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Adds a constructor; an existing entry with the same name is replaced.
    pub fn with(mut self, name: &'static str, constructor: Constructor) -> Self {
        self.constructors.insert(name, constructor);
        self
    }

    /// Creates a fresh plugin instance by name (case-insensitive).
    pub fn create(&self, name: &str) -> Result<Box<dyn EntityTypePlugin>> {
        self.constructors
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name.trim()))
            .map(|(_, constructor)| constructor())
            .ok_or_else(|| PluginError::UnknownPlugin(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.constructors.keys().copied()
    }
}

impl Default for PluginFactory {
    fn default() -> Self {
        Self::empty()
            .with("Contact", || Box::new(ContactPlugin::new()))
            .with("Group", || Box::new(GroupPlugin::new()))
            .with("Organization", || Box::new(OrganizationPlugin::new()))
            .with("Ticket", || Box::new(TicketPlugin::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let names: Vec<_> = builtin_plugins().iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, vec!["Contact", "Ticket", "Organization"]);
    }

    #[test]
    fn test_factory_lookup() {
        let factory = PluginFactory::default();
        assert_eq!(factory.create("group").unwrap().name(), "Group");
        assert!(matches!(
            factory.create("Billing"),
            Err(PluginError::UnknownPlugin(name)) if name == "Billing"
        ));
        assert_eq!(factory.names().count(), 4);
    }
}
