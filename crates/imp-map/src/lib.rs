//! Column mapping engine for spreadsheet imports.
//!
//! [`MappingState`] holds one entry per spreadsheet column, each either
//! unmapped or pointing at a target field key. Everything else is derived
//! from it on read: required-field [`Coverage`], the [`ExportPayload`]
//! artifact, template requests and the projected CSV.
//!
//! [`ExportPayload`]: imp_model::ExportPayload

mod coverage;
mod csv_out;
mod error;
mod export;
mod state;
mod store;

pub use coverage::{Coverage, required_field_coverage};
pub use csv_out::{generate_csv, generate_mapped_csv};
pub use error::{MappingError, Result, StoreError};
pub use export::{artifact_file_name, write_artifact};
pub use state::{
    DEFAULT_TEMPLATE_AUTHOR, DuplicateTarget, MappingState, MappingSummary, OverlayReport,
};
pub use store::{FileTemplateStore, TemplateStore};
