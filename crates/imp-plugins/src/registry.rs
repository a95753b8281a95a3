//! Plugin registry.
//!
//! The registry is an explicitly constructed value: build it once at
//! startup with [`PluginRegistry::initialize_all`], pass it to whatever
//! needs catalogs or row hooks, and call [`PluginRegistry::shutdown`] when
//! done.

use std::collections::BTreeMap;

use async_trait::async_trait;
use imp_model::{FieldCatalog, RowValidation};

use crate::builtin::PluginFactory;
use crate::catalog::default_catalogs;
use crate::error::{PluginError, Result};
use crate::plugin::EntityTypePlugin;
use crate::row::Row;

/// Source of external plugins, consulted after the built-ins are registered.
#[async_trait]
pub trait PluginDiscovery: Send + Sync {
    async fn discover(&self) -> Result<Vec<Box<dyn EntityTypePlugin>>>;
}

/// Discovery driven by the `[plugins] external` list of the config file.
///
/// Names are resolved through a [`PluginFactory`]; unknown names are
/// logged and skipped.
pub struct ConfigDiscovery<'a> {
    names: Vec<String>,
    factory: &'a PluginFactory,
}

impl<'a> ConfigDiscovery<'a> {
    pub fn new(names: Vec<String>, factory: &'a PluginFactory) -> Self {
        Self { names, factory }
    }
}

#[async_trait]
impl PluginDiscovery for ConfigDiscovery<'_> {
    async fn discover(&self) -> Result<Vec<Box<dyn EntityTypePlugin>>> {
        let mut plugins = Vec::with_capacity(self.names.len());
        for name in &self.names {
            match self.factory.create(name) {
                Ok(plugin) => plugins.push(plugin),
                Err(e) => tracing::warn!(plugin = %name, error = %e, "Skipping external plugin"),
            }
        }
        Ok(plugins)
    }
}

/// Registered plugins, keyed by name, in registration order.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn EntityTypePlugin>>,
    initialized: bool,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes and stores a plugin.
    ///
    /// A plugin with the same name is replaced in place and the displaced
    /// instance is torn down. When `initialize()` fails the plugin is not
    /// stored and any existing one is left alone.
    pub async fn register(&mut self, plugin: Box<dyn EntityTypePlugin>) -> Result<()> {
        plugin
            .initialize()
            .await
            .map_err(|e| PluginError::Initialization {
                plugin: plugin.name().to_string(),
                message: e.to_string(),
            })?;

        tracing::info!(
            plugin = plugin.name(),
            version = plugin.version(),
            entity_type = plugin.entity_type(),
            "Plugin registered"
        );

        match self.position(plugin.name()) {
            Some(idx) => {
                let displaced = std::mem::replace(&mut self.plugins[idx], plugin);
                if let Err(e) = displaced.teardown().await {
                    tracing::warn!(
                        plugin = displaced.name(),
                        error = %e,
                        "Teardown of replaced plugin failed"
                    );
                }
            }
            None => self.plugins.push(plugin),
        }
        Ok(())
    }

    /// Tears down and removes a plugin. A failing teardown is logged and
    /// the plugin is removed anyway. Returns whether a plugin was removed.
    pub async fn unregister(&mut self, name: &str) -> bool {
        let Some(idx) = self.position(name) else {
            return false;
        };
        let plugin = self.plugins.remove(idx);
        if let Err(e) = plugin.teardown().await {
            tracing::warn!(plugin = %name, error = %e, "Plugin teardown failed");
        } else {
            tracing::info!(plugin = %name, "Plugin unregistered");
        }
        true
    }

    /// Registers `builtins` in order, then whatever `discovery` yields.
    ///
    /// Failures are logged and skipped. Only the first call has any effect.
    pub async fn initialize_all(
        &mut self,
        builtins: Vec<Box<dyn EntityTypePlugin>>,
        discovery: &dyn PluginDiscovery,
    ) {
        if self.initialized {
            return;
        }

        for plugin in builtins {
            if let Err(e) = self.register(plugin).await {
                tracing::error!(error = %e, "Failed to register built-in plugin");
            }
        }

        match discovery.discover().await {
            Ok(external) => {
                for plugin in external {
                    if let Err(e) = self.register(plugin).await {
                        tracing::warn!(error = %e, "Failed to register external plugin");
                    }
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to load external plugins"),
        }

        self.initialized = true;
    }

    /// Unregisters every plugin, newest first.
    pub async fn shutdown(&mut self) {
        let names: Vec<String> = self.plugins.iter().rev().map(|p| p.name().to_string()).collect();
        for name in names {
            self.unregister(&name).await;
        }
        self.initialized = false;
    }

    pub fn get(&self, name: &str) -> Option<&dyn EntityTypePlugin> {
        self.position(name).map(|idx| self.plugins[idx].as_ref())
    }

    pub fn plugins(&self) -> impl Iterator<Item = &dyn EntityTypePlugin> + '_ {
        self.plugins.iter().map(AsRef::as_ref)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Default catalogs with each plugin's catalog laid over its entity
    /// type. Later registrations win.
    pub fn effective_catalogs(&self) -> BTreeMap<String, FieldCatalog> {
        let mut catalogs = default_catalogs().clone();
        for plugin in &self.plugins {
            catalogs.insert(plugin.entity_type().to_string(), plugin.field_catalog().clone());
        }
        catalogs
    }

    /// Effective catalog for one entity type, if any.
    pub fn catalog_for(&self, entity_type: &str) -> Option<FieldCatalog> {
        match self.plugin_for(entity_type) {
            Some(plugin) => Some(plugin.field_catalog().clone()),
            None => default_catalogs().get(entity_type).cloned(),
        }
    }

    /// Entity type names: built-ins first, then plugin-only types in
    /// registration order.
    pub fn entity_type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = imp_model::EntityType::ALL
            .iter()
            .map(|e| e.as_str().to_string())
            .collect();
        for plugin in &self.plugins {
            if !names.iter().any(|n| n == plugin.entity_type()) {
                names.push(plugin.entity_type().to_string());
            }
        }
        names
    }

    /// Runs the row hook of the plugin owning `entity_type`.
    pub async fn validate_row(&self, entity_type: &str, row: &Row) -> Option<RowValidation> {
        self.plugin_for(entity_type)?.validate_row(row).await
    }

    /// Runs the transform hook of the plugin owning `entity_type`; rows
    /// pass through unchanged when there is none.
    pub async fn transform_rows(&self, entity_type: &str, rows: Vec<Row>) -> Vec<Row> {
        match self.plugin_for(entity_type) {
            Some(plugin) => plugin.transform_rows(rows).await,
            None => rows,
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.plugins.iter().position(|p| p.name() == name)
    }

    fn plugin_for(&self, entity_type: &str) -> Option<&dyn EntityTypePlugin> {
        self.plugins
            .iter()
            .rev()
            .find(|p| p.entity_type() == entity_type)
            .map(AsRef::as_ref)
    }
}
