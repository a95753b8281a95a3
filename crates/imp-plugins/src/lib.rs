//! Field catalogs and entity-type plugins.
//!
//! Every built-in entity type has a static [`FieldCatalog`](imp_model::FieldCatalog)
//! (see [`default_catalogs`]). Plugins implementing [`EntityTypePlugin`] can
//! replace a catalog wholesale or contribute a new entity type, and may add
//! advisory row validation and row transformation hooks.
//!
//! # Example
//!
//! ```ignore
//! use imp_plugins::{ConfigDiscovery, PluginFactory, PluginRegistry, builtin_plugins};
//!
//! let factory = PluginFactory::default();
//! let discovery = ConfigDiscovery::new(vec!["Group".into()], &factory);
//! let mut registry = PluginRegistry::new();
//! registry.initialize_all(builtin_plugins(), &discovery).await;
//! let catalogs = registry.effective_catalogs();
//! ```

pub mod builtin;
mod catalog;
mod error;
mod plugin;
mod registry;
mod row;
mod validate;

// === Error Types ===
pub use error::{PluginError, Result};

// === Catalogs ===
pub use catalog::{default_catalog, default_catalogs};

// === Plugins ===
pub use builtin::{PluginFactory, builtin_plugins};
pub use plugin::EntityTypePlugin;
pub use registry::{ConfigDiscovery, PluginDiscovery, PluginRegistry};

// === Rows and validation ===
pub use row::{Row, row_from_pairs, row_text, split_list};
pub use validate::validate_against_catalog;
