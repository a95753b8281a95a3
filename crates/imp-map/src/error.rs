//! Error types for mapping operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from mapping operations.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Column not present in the loaded spreadsheet.
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// Export or template save with nothing mapped.
    #[error("no fields mapped")]
    NoFieldsMapped,

    /// Template name is empty or whitespace.
    #[error("template name is required")]
    BlankTemplateName,

    /// CSV output failed.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Artifact could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize mapping: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors from the file-backed template store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("template {0} not found")]
    NotFound(i64),

    #[error("failed to access template store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid template file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, MappingError>;
