//! Mapping state for the column-mapping step.
//!
//! One entry per distinct spreadsheet column, each unmapped or pointing at a
//! target field key. Counts, coverage and exports are recomputed on read.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use imp_model::{ColumnMapping, ExportPayload, MappingTemplate, TemplateRequest};

use crate::coverage::{Coverage, required_field_coverage};
use crate::error::{MappingError, Result};

/// Author recorded on template requests built from a mapping.
pub const DEFAULT_TEMPLATE_AUTHOR: &str = "user";

/// Column-to-target mapping for one loaded spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingState {
    /// Distinct headers, in spreadsheet order.
    columns: Vec<String>,
    /// Non-empty targets keyed by column.
    targets: HashMap<String, String>,
}

/// Result of overlaying a template onto the state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayReport {
    /// Entries written to existing columns.
    pub applied: usize,
    /// Template columns missing from the spreadsheet.
    pub ignored: Vec<String>,
}

/// A target key selected by more than one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateTarget {
    pub target: String,
    pub columns: Vec<String>,
}

/// Summary counts shown before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingSummary {
    /// Distinct spreadsheet columns.
    pub total_columns: usize,
    /// Columns with a target.
    pub mapped: usize,
    /// Required target fields.
    pub required_total: usize,
    /// Required target fields that are mapped.
    pub required_mapped: usize,
}

impl MappingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state with every header unmapped.
    pub fn from_headers(headers: &[String]) -> Self {
        let mut state = Self::new();
        state.initialize(headers);
        state
    }

    /// Resets the state to one unmapped entry per distinct header.
    ///
    /// Repeated headers keep their first position.
    pub fn initialize(&mut self, headers: &[String]) {
        self.targets.clear();
        self.columns.clear();
        for header in headers {
            if !self.columns.contains(header) {
                self.columns.push(header.clone());
            }
        }
        if self.columns.len() != headers.len() {
            tracing::debug!(
                headers = headers.len(),
                distinct = self.columns.len(),
                "Duplicate headers collapsed"
            );
        }
    }

    /// Sets or clears the target for one column.
    ///
    /// `None` and the empty string both mean unmapped.
    pub fn set_mapping(&mut self, source_column: &str, target: Option<&str>) -> Result<()> {
        if !self.has_column(source_column) {
            return Err(MappingError::ColumnNotFound(source_column.to_string()));
        }
        self.assign(source_column, target);
        Ok(())
    }

    fn assign(&mut self, source_column: &str, target: Option<&str>) {
        match target.filter(|t| !t.is_empty()) {
            Some(target) => {
                self.targets
                    .insert(source_column.to_string(), target.to_string());
            }
            None => {
                self.targets.remove(source_column);
            }
        }
    }

    /// Clears every target, keeping the columns.
    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn target_for(&self, column: &str) -> Option<&str> {
        self.targets.get(column).map(String::as_str)
    }

    /// All entries in column order; unmapped columns yield `None`.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&str>)> + '_ {
        self.columns
            .iter()
            .map(|c| (c.as_str(), self.target_for(c)))
    }

    /// Mapped entries in column order.
    pub fn mappings(&self) -> Vec<ColumnMapping> {
        self.entries()
            .filter_map(|(column, target)| target.map(|t| ColumnMapping::new(column, t)))
            .collect()
    }

    pub fn mapped_count(&self) -> usize {
        self.targets.len()
    }

    pub fn unmapped_columns(&self) -> Vec<&str> {
        self.entries()
            .filter(|(_, target)| target.is_none())
            .map(|(column, _)| column)
            .collect()
    }

    /// Coverage of `required_keys` by the current targets.
    pub fn required_field_coverage(&self, required_keys: &[String]) -> Coverage {
        required_field_coverage(self.targets.values().map(String::as_str), required_keys)
    }

    /// Builds the export artifact from mapped entries, in column order.
    ///
    /// Calling it twice with the same arguments yields equal payloads.
    pub fn to_export_payload(
        &self,
        entity_type: &str,
        total_rows: usize,
        timestamp: DateTime<Utc>,
    ) -> Result<ExportPayload> {
        let mappings = self.mappings();
        if mappings.is_empty() {
            return Err(MappingError::NoFieldsMapped);
        }
        Ok(ExportPayload {
            import_type: entity_type.to_string(),
            mapped_fields: mappings.len(),
            mappings,
            total_rows,
            timestamp,
        })
    }

    /// Overlays a stored template.
    pub fn load_template(&mut self, template: &MappingTemplate) -> OverlayReport {
        let report = self.apply_mappings(&template.mappings);
        tracing::info!(
            template = %template.name,
            applied = report.applied,
            ignored = report.ignored.len(),
            "Template applied"
        );
        report
    }

    /// Writes each mapping onto its column. Columns not mentioned keep their
    /// current target; unknown columns are skipped.
    pub fn apply_mappings(&mut self, mappings: &[ColumnMapping]) -> OverlayReport {
        let mut report = OverlayReport::default();
        for mapping in mappings {
            if self.has_column(&mapping.source_column) {
                self.assign(&mapping.source_column, Some(mapping.target_field_key.as_str()));
                report.applied += 1;
            } else {
                tracing::debug!(column = %mapping.source_column, "Template column not in spreadsheet");
                report.ignored.push(mapping.source_column.clone());
            }
        }
        report
    }

    /// Builds a template create request from mapped entries.
    pub fn save_as_template(
        &self,
        name: &str,
        description: &str,
        entity_type: &str,
    ) -> Result<TemplateRequest> {
        if name.trim().is_empty() {
            return Err(MappingError::BlankTemplateName);
        }
        Ok(TemplateRequest {
            name: name.trim().to_string(),
            description: description.to_string(),
            entity_type: entity_type.to_string(),
            mappings: self.mappings(),
            created_by: DEFAULT_TEMPLATE_AUTHOR.to_string(),
        })
    }

    /// Targets chosen by more than one column, in column order.
    pub fn duplicate_targets(&self) -> Vec<DuplicateTarget> {
        let mut duplicates: Vec<DuplicateTarget> = Vec::new();
        for (column, target) in self.entries() {
            let Some(target) = target else {
                continue;
            };
            match duplicates.iter_mut().find(|d| d.target == target) {
                Some(entry) => entry.columns.push(column.to_string()),
                None => duplicates.push(DuplicateTarget {
                    target: target.to_string(),
                    columns: vec![column.to_string()],
                }),
            }
        }
        duplicates.retain(|d| d.columns.len() > 1);
        duplicates
    }

    /// Summary counts against `required_keys`.
    pub fn summary(&self, required_keys: &[String]) -> MappingSummary {
        let coverage = self.required_field_coverage(required_keys);
        MappingSummary {
            total_columns: self.columns.len(),
            mapped: self.mapped_count(),
            required_total: coverage.covered.len() + coverage.missing.len(),
            required_mapped: coverage.covered.len(),
        }
    }
}
