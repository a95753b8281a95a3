//! Registry lifecycle tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use imp_model::{FieldCatalog, FieldType, RowValidation, TargetField};
use imp_plugins::{
    ConfigDiscovery, EntityTypePlugin, PluginDiscovery, PluginError, PluginFactory,
    PluginRegistry, Result, Row, builtin_plugins, row_from_pairs,
};

struct TestPlugin {
    name: &'static str,
    entity_type: &'static str,
    catalog: FieldCatalog,
    fail_init: bool,
    fail_teardown: bool,
    teardowns: Arc<AtomicUsize>,
}

impl TestPlugin {
    fn new(name: &'static str, entity_type: &'static str) -> Self {
        Self {
            name,
            entity_type,
            catalog: FieldCatalog::new(vec![
                TargetField::new("code", "Code", FieldType::String).required(),
            ]),
            fail_init: false,
            fail_teardown: false,
            teardowns: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl EntityTypePlugin for TestPlugin {
    fn name(&self) -> &str {
        self.name
    }

    fn version(&self) -> &str {
        "0.0.1"
    }

    fn entity_type(&self) -> &str {
        self.entity_type
    }

    fn field_catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    async fn initialize(&self) -> Result<()> {
        if self.fail_init {
            return Err(PluginError::Discovery("boom".into()));
        }
        Ok(())
    }

    async fn teardown(&self) -> Result<()> {
        self.teardowns.fetch_add(1, Ordering::SeqCst);
        if self.fail_teardown {
            return Err(PluginError::Discovery("stuck".into()));
        }
        Ok(())
    }

    async fn validate_row(&self, row: &Row) -> Option<RowValidation> {
        let errors = if row.contains_key("code") {
            Vec::new()
        } else {
            vec!["code missing".to_string()]
        };
        Some(RowValidation::from_errors(errors))
    }
}

struct FailingDiscovery;

#[async_trait]
impl PluginDiscovery for FailingDiscovery {
    async fn discover(&self) -> Result<Vec<Box<dyn EntityTypePlugin>>> {
        Err(PluginError::Discovery("service unavailable".into()))
    }
}

#[tokio::test]
async fn failed_initialize_is_not_stored() {
    let mut registry = PluginRegistry::new();
    let mut plugin = TestPlugin::new("Broken", "Broken");
    plugin.fail_init = true;

    let err = registry.register(Box::new(plugin)).await.unwrap_err();
    assert!(matches!(err, PluginError::Initialization { ref plugin, .. } if plugin == "Broken"));
    assert!(registry.is_empty());
}

#[tokio::test]
async fn failed_teardown_still_removes() {
    let mut registry = PluginRegistry::new();
    let mut plugin = TestPlugin::new("Sticky", "Sticky");
    plugin.fail_teardown = true;
    let teardowns = Arc::clone(&plugin.teardowns);

    registry.register(Box::new(plugin)).await.unwrap();
    assert!(registry.unregister("Sticky").await);
    assert_eq!(teardowns.load(Ordering::SeqCst), 1);
    assert!(registry.get("Sticky").is_none());
    assert!(!registry.unregister("Sticky").await);
}

#[tokio::test]
async fn replacing_a_plugin_tears_down_the_old_one() {
    let mut registry = PluginRegistry::new();
    let old = TestPlugin::new("Dup", "Dup");
    let old_teardowns = Arc::clone(&old.teardowns);
    let new = TestPlugin::new("Dup", "Dup");
    let new_teardowns = Arc::clone(&new.teardowns);

    registry.register(Box::new(old)).await.unwrap();
    registry.register(Box::new(new)).await.unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(old_teardowns.load(Ordering::SeqCst), 1);
    assert_eq!(new_teardowns.load(Ordering::SeqCst), 0);

    let mut broken = TestPlugin::new("Dup", "Dup");
    broken.fail_init = true;
    assert!(registry.register(Box::new(broken)).await.is_err());
    assert_eq!(new_teardowns.load(Ordering::SeqCst), 0);
    assert!(registry.get("Dup").is_some());
}

#[tokio::test]
async fn initialize_all_orders_and_is_idempotent() {
    let factory = PluginFactory::default();
    let discovery = ConfigDiscovery::new(vec!["Group".into(), "Billing".into()], &factory);
    let mut registry = PluginRegistry::new();

    registry.initialize_all(builtin_plugins(), &discovery).await;
    let names: Vec<_> = registry.plugins().map(|p| p.name().to_string()).collect();
    assert_eq!(names, vec!["Contact", "Ticket", "Organization", "Group"]);
    assert!(registry.is_initialized());

    registry.initialize_all(builtin_plugins(), &discovery).await;
    assert_eq!(registry.len(), 4);
}

#[tokio::test]
async fn discovery_failure_keeps_builtins() {
    let mut registry = PluginRegistry::new();
    registry.initialize_all(builtin_plugins(), &FailingDiscovery).await;
    assert_eq!(registry.len(), 3);
}

#[tokio::test]
async fn plugin_catalog_replaces_default_wholesale() {
    let mut registry = PluginRegistry::new();
    registry
        .register(Box::new(TestPlugin::new("UserOverride", "User")))
        .await
        .unwrap();

    let catalogs = registry.effective_catalogs();
    let user = &catalogs["User"];
    assert_eq!(user.len(), 1);
    assert!(user.contains("code"));
    assert!(!user.contains("firstName"));
    // Untouched entity types keep their defaults.
    assert!(catalogs["Group"].contains("name"));
}

#[tokio::test]
async fn builtins_add_contact_and_override_ticket() {
    let mut registry = PluginRegistry::new();
    for plugin in builtin_plugins() {
        registry.register(plugin).await.unwrap();
    }
    let catalogs = registry.effective_catalogs();
    assert!(catalogs.contains_key("Contact"));
    assert!(catalogs["Ticket"].contains("title"));
    assert!(!catalogs["Ticket"].contains("solvedAt"));

    let names = registry.entity_type_names();
    assert_eq!(names.first().map(String::as_str), Some("User"));
    assert_eq!(names.last().map(String::as_str), Some("Contact"));
}

#[tokio::test]
async fn hooks_route_by_entity_type() {
    let mut registry = PluginRegistry::new();
    registry
        .register(Box::new(TestPlugin::new("Codes", "Code")))
        .await
        .unwrap();

    let result = registry
        .validate_row("Code", &row_from_pairs([("other", "x")]))
        .await
        .unwrap();
    assert_eq!(result.errors, vec!["code missing"]);

    assert!(registry.validate_row("User", &Row::new()).await.is_none());

    let rows = vec![row_from_pairs([("a", "b")])];
    let out = registry.transform_rows("User", rows.clone()).await;
    assert_eq!(out, rows);
}

#[tokio::test]
async fn shutdown_tears_down_everything() {
    let mut registry = PluginRegistry::new();
    let plugin = TestPlugin::new("One", "One");
    let teardowns = Arc::clone(&plugin.teardowns);
    registry.register(Box::new(plugin)).await.unwrap();

    registry.shutdown().await;
    assert!(registry.is_empty());
    assert_eq!(teardowns.load(Ordering::SeqCst), 1);
}
