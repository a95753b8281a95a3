//! CSV output of a loaded table, whole or projected through a mapping.
//!
//! Fields are quoted only when they contain a comma, a double quote or a
//! line break; embedded quotes are doubled. Records end with `\n`.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use imp_model::{ColumnMapping, SpreadsheetTable};

use crate::error::{MappingError, Result};

/// Writes `headers` followed by `rows`.
pub fn generate_csv(headers: &[String], rows: &[Vec<String>]) -> Result<String> {
    let mut writer = new_writer();
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    finish(writer)
}

/// Writes only the mapped columns, in mapping order.
///
/// Each header is the target key, or the source column when the target is
/// empty. Mappings naming a column the table lacks are skipped, and a row
/// too short for a column yields an empty cell. Returns an empty string
/// when no mapping resolves to a column.
pub fn generate_mapped_csv(table: &SpreadsheetTable, mappings: &[ColumnMapping]) -> Result<String> {
    let mut headers = Vec::new();
    let mut indices = Vec::new();
    for mapping in mappings {
        match table.column_index(&mapping.source_column) {
            Some(idx) => {
                indices.push(idx);
                headers.push(if mapping.target_field_key.is_empty() {
                    mapping.source_column.as_str()
                } else {
                    mapping.target_field_key.as_str()
                });
            }
            None => {
                tracing::debug!(column = %mapping.source_column, "Mapped column missing from table");
            }
        }
    }

    if indices.is_empty() {
        return Ok(String::new());
    }

    let mut writer = new_writer();
    writer.write_record(&headers)?;
    for row in &table.rows {
        writer.write_record(
            indices
                .iter()
                .map(|&idx| row.get(idx).map_or("", String::as_str)),
        )?;
    }
    finish(writer)
}

fn new_writer() -> csv::Writer<Vec<u8>> {
    WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| MappingError::Csv(e.into_error().into()))?;
    // Input is all `String`, so the output is valid UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SpreadsheetTable {
        SpreadsheetTable::new(
            vec!["Name".into(), "Notes".into(), "Email".into()],
            vec![
                vec!["Acme, Inc. \"big\"".into(), "line1\nline2".into(), "a@x.io".into()],
                vec!["Plain".into(), "".into(), "".into()],
            ],
            "Sheet1",
        )
    }

    #[test]
    fn test_quotes_special_values() {
        let csv = generate_mapped_csv(&table(), &[ColumnMapping::new("Name", "name")]).unwrap();
        insta::assert_snapshot!(csv.trim_end(), @r#"
        name
        "Acme, Inc. ""big"""
        Plain
        "#);
    }

    #[test]
    fn test_mapping_order_and_fallback_header() {
        let mappings = vec![
            ColumnMapping::new("Email", "emails"),
            ColumnMapping::new("Missing", "x"),
            ColumnMapping::new("Notes", ""),
        ];
        let csv = generate_mapped_csv(&table(), &mappings).unwrap();
        assert_eq!(csv, "emails,Notes\na@x.io,\"line1\nline2\"\n,\n");
    }

    #[test]
    fn test_no_resolved_columns() {
        let csv = generate_mapped_csv(&table(), &[ColumnMapping::new("Nope", "x")]).unwrap();
        assert!(csv.is_empty());
    }

    #[test]
    fn test_full_table() {
        let t = table();
        let csv = generate_csv(&t.headers, &t.rows).unwrap();
        assert!(csv.starts_with("Name,Notes,Email\n\"Acme, Inc. \"\"big\"\"\""));
        assert!(csv.ends_with("Plain,,\n"));
    }
}
