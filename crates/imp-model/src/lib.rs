pub mod entity;
pub mod error;
pub mod field;
pub mod mapping;
pub mod report;
pub mod table;
pub mod template;
pub mod timestamp;

pub use entity::EntityType;
pub use error::{ModelError, Result};
pub use field::{FieldCatalog, FieldType, FieldValidation, TargetField};
pub use mapping::{
    ColumnMapping, ExportPayload, LegacyColumnMapping, RequiredFieldInfo, RequiredFields,
    legacy_mappings,
};
pub use report::{ImportAck, ImportReport, RowValidation, ValidationOutcome};
pub use table::SpreadsheetTable;
pub use template::{MappingTemplate, TemplateRequest, TemplateSummary};
