//! The entity-type plugin trait.

use async_trait::async_trait;
use imp_model::{FieldCatalog, RowValidation};

use crate::error::Result;
use crate::row::Row;

/// An import target contributed by a plugin.
///
/// A plugin owns the field catalog for its entity type. When its entity
/// type matches a built-in one, the plugin catalog replaces the default
/// catalog entirely.
///
/// Validation is advisory: callers show the result but never block an
/// import on it.
#[async_trait]
pub trait EntityTypePlugin: Send + Sync {
    /// Unique registry key (e.g. `"Contact"`).
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    /// Entity type name this plugin provides a catalog for.
    fn entity_type(&self) -> &str;

    fn field_catalog(&self) -> &FieldCatalog;

    /// Called once before the plugin is stored in the registry.
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Called when the plugin is removed from the registry.
    async fn teardown(&self) -> Result<()> {
        Ok(())
    }

    /// Checks one mapped row. `None` means the plugin has no opinion.
    async fn validate_row(&self, _row: &Row) -> Option<RowValidation> {
        None
    }

    /// Normalizes mapped rows before submission.
    async fn transform_rows(&self, rows: Vec<Row>) -> Vec<Row> {
        rows
    }
}
