//! Terminal rendering for the wizard's steps.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use imp_ingest::{ColumnSamples, TablePreview};
use imp_map::{Coverage, DuplicateTarget, MappingState, MappingSummary};
use imp_model::{FieldCatalog, ImportAck, ImportReport, MappingTemplate, TemplateSummary};

use crate::i18n::{Language, Message};
use crate::wizard::Step;

/// Longest cell text shown before truncation.
const MAX_CELL_CHARS: usize = 40;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell(text: &str) -> Cell {
    Cell::new(text).fg(Color::DarkGrey)
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_CELL_CHARS - 1).collect();
        format!("{head}…")
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

/// Step indicator, e.g. `[1/5] Upload > *Preview* > ...`.
pub fn step_line(language: Language, current: Step) -> String {
    let titles: Vec<String> = Step::ALL
        .iter()
        .map(|step| {
            let title = language.text(step_message(*step));
            if *step == current {
                format!("*{title}*")
            } else {
                title.to_string()
            }
        })
        .collect();
    format!(
        "[{}/{}] {}",
        current.index() + 1,
        Step::ALL.len(),
        titles.join(" > ")
    )
}

fn step_message(step: Step) -> Message {
    match step {
        Step::Upload => Message::StepUpload,
        Step::Preview => Message::StepPreview,
        Step::Mapping => Message::StepMapping,
        Step::Summary => Message::StepSummary,
        Step::Result => Message::StepResult,
    }
}

pub fn preview_table(preview: &TablePreview) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("#")];
    header.extend(preview.headers.iter().map(|h| header_cell(h)));
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, row) in preview.rows.iter().enumerate() {
        let mut cells = vec![dim_cell(&(index + 1).to_string())];
        cells.extend(row.iter().map(|value| Cell::new(truncate(value))));
        table.add_row(cells);
    }
    table
}

pub fn samples_table(samples: &[ColumnSamples]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Column"), header_cell("Sample values")]);
    apply_table_style(&mut table);
    for column in samples {
        let values = if column.samples.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(truncate(&column.samples.join(", ")))
        };
        table.add_row(vec![Cell::new(&column.column), values]);
    }
    table
}

/// Column-by-column mapping with target labels and required markers.
pub fn mapping_table(
    state: &MappingState,
    catalog: &FieldCatalog,
    required_keys: &[String],
    samples: &[ColumnSamples],
) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Target field"),
        header_cell("Key"),
        header_cell("Required"),
        header_cell("Samples"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for (column, target) in state.entries() {
        let sample = samples
            .iter()
            .find(|s| s.column == column)
            .map(|s| truncate(&s.samples.join(", ")))
            .unwrap_or_default();
        let row = match target {
            Some(key) => {
                let required = required_keys.iter().any(|k| k == key);
                vec![
                    Cell::new(column),
                    Cell::new(catalog.label_for(key)).fg(Color::Green),
                    Cell::new(key),
                    if required {
                        Cell::new("*").fg(Color::Yellow)
                    } else {
                        Cell::new("")
                    },
                    dim_cell(&sample),
                ]
            }
            None => vec![
                Cell::new(column),
                dim_cell("-"),
                dim_cell("-"),
                Cell::new(""),
                dim_cell(&sample),
            ],
        };
        table.add_row(row);
    }
    table
}

pub fn fields_table(catalog: &FieldCatalog) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Label"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Validation"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for field in catalog.iter() {
        let mut rules = Vec::new();
        if let Some(validation) = &field.validation {
            if let Some(pattern) = &validation.pattern {
                rules.push(format!("pattern {pattern}"));
            }
            if let Some(min) = validation.min {
                rules.push(format!("min {min}"));
            }
            if let Some(max) = validation.max {
                rules.push(format!("max {max}"));
            }
            if !validation.enum_options.is_empty() {
                rules.push(format!("one of {}", validation.enum_options.join("|")));
            }
        }
        table.add_row(vec![
            Cell::new(&field.key),
            Cell::new(&field.label),
            Cell::new(field.value_type),
            if field.required {
                Cell::new("yes").fg(Color::Yellow)
            } else {
                Cell::new("")
            },
            Cell::new(truncate(&rules.join("; "))),
        ]);
    }
    table
}

pub fn types_table(types: &[(String, String)]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Type"), header_cell("Description")]);
    apply_table_style(&mut table);
    for (name, description) in types {
        table.add_row(vec![Cell::new(name), Cell::new(description)]);
    }
    table
}

pub fn templates_table(templates: &[TemplateSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Name"),
        header_cell("Type"),
        header_cell("Mappings"),
        header_cell("Default"),
        header_cell("Created"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for template in templates {
        table.add_row(vec![
            Cell::new(template.id),
            Cell::new(&template.name),
            Cell::new(&template.entity_type),
            Cell::new(template.mapping_count),
            if template.is_default {
                Cell::new("*").fg(Color::Green)
            } else {
                Cell::new("")
            },
            dim_cell(&template.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }
    table
}

pub fn template_mappings_table(template: &MappingTemplate) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Column"), header_cell("Target field")]);
    apply_table_style(&mut table);
    for mapping in &template.mappings {
        table.add_row(vec![
            Cell::new(&mapping.source_column),
            Cell::new(&mapping.target_field_key),
        ]);
    }
    table
}

pub fn languages_table(current: Language) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Language"),
        header_cell("Native name"),
        header_cell(""),
    ]);
    apply_table_style(&mut table);
    for language in Language::ALL {
        let marker = if language == current {
            Cell::new("*").fg(Color::Green)
        } else {
            Cell::new("")
        };
        let direction = if language.is_rtl() { " (RTL)" } else { "" };
        table.add_row(vec![
            Cell::new(language.code()),
            Cell::new(language.name()),
            Cell::new(format!("{}{direction}", language.native_name())),
            marker,
        ]);
    }
    table
}

/// Per-row backend errors, translated.
pub fn report_table(report: &ImportReport, language: Language) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Data"),
        header_cell("Errors"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for outcome in &report.errors {
        let data = outcome
            .original_data
            .iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(text) => format!("{key}: {text}"),
                other => format!("{key}: {other}"),
            })
            .collect::<Vec<_>>()
            .join("\n");
        let errors = outcome
            .errors
            .iter()
            .map(|e| language.translate_error(e))
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(outcome.row_number),
            dim_cell(&data),
            Cell::new(errors).fg(Color::Red),
        ]);
    }
    table
}

/// Plain-text lines describing the mapping before submission.
pub fn summary_text(
    language: Language,
    entity_type: &str,
    summary: &MappingSummary,
    coverage: &Coverage,
    duplicates: &[DuplicateTarget],
) -> String {
    let mut lines = vec![
        format!("Entity type: {entity_type}"),
        format!(
            "Mapped columns: {}/{}",
            summary.mapped, summary.total_columns
        ),
        coverage_line(language, coverage),
    ];
    if !coverage.missing.is_empty() {
        lines.push(language.format(
            Message::MissingRequired,
            &[("fields", &coverage.missing.join(", "))],
        ));
    }
    for duplicate in duplicates {
        lines.push(language.format(
            Message::DuplicateTarget,
            &[
                ("field", &duplicate.target),
                ("columns", &duplicate.columns.join(", ")),
            ],
        ));
    }
    lines.join("\n")
}

pub fn coverage_line(language: Language, coverage: &Coverage) -> String {
    let covered = coverage.covered.len();
    let total = covered + coverage.missing.len();
    language.format(
        Message::RequiredCoverage,
        &[
            ("covered", &covered.to_string()),
            ("total", &total.to_string()),
            ("percent", &coverage.percent().to_string()),
        ],
    )
}

/// One-line result of a spreadsheet import.
pub fn report_line(language: Language, report: &ImportReport) -> String {
    if report.has_errors() {
        language.format(
            Message::ImportFinishedWithErrors,
            &[("errors", &report.error_count.to_string())],
        )
    } else {
        language.format(
            Message::ImportSucceeded,
            &[
                ("success", &report.success_count.to_string()),
                ("total", &report.total_records.to_string()),
            ],
        )
    }
}

/// Result of handing a mapping payload to the backend. The backend only
/// acknowledges receipt, so the count is the rows that were sent.
pub fn submission_line(language: Language, ack: &ImportAck, total_rows: usize) -> String {
    if ack.success {
        language.format(
            Message::ImportSubmitted,
            &[("total", &total_rows.to_string())],
        )
    } else {
        let failed = language.text(Message::ImportFailed);
        match ack.error.as_deref() {
            Some(raw) => format!("{failed}: {}", language.translate_error(raw)),
            None => failed.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imp_map::required_field_coverage;
    use imp_model::{FieldType, TargetField, ValidationOutcome};
    use insta::assert_snapshot;
    use std::collections::BTreeMap;

    #[test]
    fn test_summary_text() {
        let mut state = MappingState::from_headers(&[
            "Name".to_string(),
            "Mail".to_string(),
            "Email".to_string(),
            "Notes".to_string(),
        ]);
        state.set_mapping("Name", Some("firstName")).unwrap();
        state.set_mapping("Mail", Some("emails")).unwrap();
        state.set_mapping("Email", Some("emails")).unwrap();
        let required = vec!["firstName".to_string(), "lastName".to_string()];
        let coverage = state.required_field_coverage(&required);

        let text = summary_text(
            Language::English,
            "User",
            &state.summary(&required),
            &coverage,
            &state.duplicate_targets(),
        );
        assert_snapshot!(text, @r"
        Entity type: User
        Mapped columns: 3/4
        Required fields: 1/2 (50%)
        Unmapped required fields: lastName
        Field 'emails' is mapped from more than one column: Mail, Email
        ");
    }

    #[test]
    fn test_coverage_line_turkish() {
        let coverage = required_field_coverage(["a", "b"], &["a".to_string(), "b".to_string()]);
        assert_eq!(
            coverage_line(Language::Turkish, &coverage),
            "Zorunlu alanlar: 2/2 (%100)"
        );
    }

    #[test]
    fn test_submission_line_reports_rows_sent() {
        let ack = ImportAck {
            success: true,
            error: None,
        };
        assert_eq!(
            submission_line(Language::English, &ack, 42),
            "Import submitted: 42 rows"
        );
        assert_eq!(
            submission_line(Language::Turkish, &ack, 3),
            "İçe aktarma gönderildi: 3 kayıt"
        );

        let rejected = ImportAck {
            success: false,
            error: Some("Server error".to_string()),
        };
        assert!(
            submission_line(Language::English, &rejected, 42).starts_with("Import failed: ")
        );
    }

    #[test]
    fn test_step_line_marks_current() {
        assert_eq!(
            step_line(Language::English, Step::Mapping),
            "[3/5] Upload > Preview > *Mapping* > Summary > Result"
        );
    }

    #[test]
    fn test_report_table_translates_errors() {
        let report = ImportReport {
            total_records: 2,
            success_count: 1,
            error_count: 1,
            errors: vec![ValidationOutcome {
                row_number: 3,
                original_data: BTreeMap::from([(
                    "externalId".to_string(),
                    serde_json::Value::String("EXT008".to_string()),
                )]),
                errors: vec!["External ID already exists: EXT008".to_string()],
            }],
        };
        let mut table = report_table(&report, Language::German);
        table.force_no_tty();
        let rendered = table.to_string();
        assert!(rendered.contains("Externe ID existiert bereits: EXT008"));
        assert!(rendered.contains("externalId: EXT008"));
        assert_eq!(
            report_line(Language::English, &report),
            "Import finished with errors: 1 failed records"
        );
    }

    #[test]
    fn test_fields_table_lists_required() {
        let catalog = FieldCatalog::new(vec![
            TargetField::new("firstName", "First name", FieldType::String).required(),
            TargetField::new("notes", "Notes", FieldType::String),
        ]);
        let mut table = fields_table(&catalog);
        table.force_no_tty();
        let rendered = table.to_string();
        assert!(rendered.contains("firstName"));
        assert!(rendered.contains("yes"));
        assert!(rendered.contains("Notes"));
    }

    #[test]
    fn test_truncate_long_values() {
        let long = "x".repeat(60);
        let cut = truncate(&long);
        assert_eq!(cut.chars().count(), MAX_CELL_CHARS);
        assert!(cut.ends_with('…'));
    }
}
