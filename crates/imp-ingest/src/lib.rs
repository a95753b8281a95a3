//! Spreadsheet ingestion for the import wizard.
//!
//! Loads the first sheet of a workbook (or a CSV file) into a
//! [`SpreadsheetTable`](imp_model::SpreadsheetTable), and derives the
//! previews and per-column samples shown while mapping.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use imp_ingest::{load_table, preview};
//!
//! let table = load_table(Path::new("users.xlsx"))?;
//! let head = preview(&table, 5);
//! println!("{} of {} rows", head.rows.len(), head.total_rows);
//! ```

mod error;
mod loader;
mod preview;
mod samples;

// === Error Types ===
pub use error::{IngestError, Result};

// === Loading ===
pub use loader::{
    MAX_FILE_SIZE, SourceFormat, cell_to_string, check_file_size, check_file_size_with_limit,
    load_csv_from_reader, load_table,
};

// === Preview ===
pub use preview::{DEFAULT_PREVIEW_ROWS, TablePreview, preview};

// === Column Samples ===
pub use samples::{ColumnSamples, DEFAULT_SAMPLE_COUNT, column_samples, sample_values};
