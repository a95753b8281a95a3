use async_trait::async_trait;
use imp_model::{EntityType, FieldCatalog, RowValidation};

use crate::catalog::default_catalog;
use crate::plugin::EntityTypePlugin;
use crate::row::Row;
use crate::validate::validate_against_catalog;

/// Opt-in plugin that validates group rows against the group catalog.
pub struct GroupPlugin {
    catalog: FieldCatalog,
}

impl GroupPlugin {
    pub fn new() -> Self {
        Self {
            catalog: default_catalog(EntityType::Group),
        }
    }
}

impl Default for GroupPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityTypePlugin for GroupPlugin {
    fn name(&self) -> &str {
        "Group"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn entity_type(&self) -> &str {
        EntityType::Group.as_str()
    }

    fn field_catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    async fn validate_row(&self, row: &Row) -> Option<RowValidation> {
        Some(validate_against_catalog(&self.catalog, row))
    }

    async fn transform_rows(&self, rows: Vec<Row>) -> Vec<Row> {
        rows.into_iter()
            .map(|mut row| {
                if let Some(serde_json::Value::String(name)) = row.get_mut("name") {
                    *name = name.trim().to_string();
                }
                row
            })
            .collect()
    }
}
