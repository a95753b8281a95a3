//! Five-step import flow: Upload, Preview, Mapping, Summary, Result.
//!
//! [`Wizard`] owns everything accumulated along the way (the loaded table,
//! the chosen entity type, the mapping state and the submission outcome).
//! Forward moves go through [`Wizard::advance`], which checks the step's
//! guard; backward moves through [`Wizard::go_to`] keep all state.
//! [`Wizard::reset`] discards everything.
//!
//! Uploads and submissions are bracketed by a busy flag. While it is set,
//! a second upload or submission and every step change are rejected.

use std::fmt;
use std::path::{Path, PathBuf};

use imp_map::MappingState;
use imp_model::{FieldCatalog, ImportAck, ImportReport, SpreadsheetTable};
use thiserror::Error;

/// Wizard steps, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    #[default]
    Upload,
    Preview,
    Mapping,
    Summary,
    Result,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::Upload,
        Step::Preview,
        Step::Mapping,
        Step::Summary,
        Step::Result,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Step> {
        Step::ALL.get(self.index() + 1).copied()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Upload => "upload",
            Step::Preview => "preview",
            Step::Mapping => "mapping",
            Step::Summary => "summary",
            Step::Result => "result",
        };
        f.write_str(name)
    }
}

/// Why a step change or operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("no spreadsheet loaded")]
    NoTable,

    #[error("no entity type selected")]
    NoEntityType,

    #[error("no fields mapped")]
    NothingMapped,

    #[error("required fields not mapped: {}", .missing.join(", "))]
    RequiredFieldsMissing { missing: Vec<String> },

    #[error("nothing has been submitted yet")]
    NotSubmitted,

    #[error("already at the last step")]
    AtLastStep,

    #[error("cannot jump forward from {from} to {to}")]
    NotEarlier { from: Step, to: Step },

    #[error("{operation} is only possible in the {expected} step (current: {current})")]
    WrongStep {
        operation: &'static str,
        expected: Step,
        current: Step,
    },

    #[error("another operation is still in progress")]
    Busy,
}

/// How the Summary step was concluded.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Files written, nothing submitted.
    Exported {
        artifact: PathBuf,
        csv: Option<PathBuf>,
    },
    /// JSON mapping accepted by the backend.
    Submitted(ImportAck),
    /// Spreadsheet imported by the backend, with per-row errors.
    Imported(ImportReport),
    /// Ticket filed with the mapped CSV attached.
    Ticket { id: String },
}

impl Outcome {
    /// Whether the outcome should make the process exit non-zero.
    pub fn has_errors(&self) -> bool {
        match self {
            Outcome::Imported(report) => report.has_errors(),
            Outcome::Submitted(ack) => !ack.success,
            Outcome::Exported { .. } | Outcome::Ticket { .. } => false,
        }
    }
}

/// Entity type chosen for the import, with its catalog and required keys.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySelection {
    pub name: String,
    pub catalog: FieldCatalog,
    pub required_keys: Vec<String>,
}

#[derive(Debug, Default)]
pub struct Wizard {
    step: Step,
    source: Option<PathBuf>,
    table: Option<SpreadsheetTable>,
    entity: Option<EntitySelection>,
    mapping: MappingState,
    outcome: Option<Outcome>,
    busy: bool,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn table(&self) -> Option<&SpreadsheetTable> {
        self.table.as_ref()
    }

    pub fn entity(&self) -> Option<&EntitySelection> {
        self.entity.as_ref()
    }

    pub fn mapping(&self) -> &MappingState {
        &self.mapping
    }

    pub fn mapping_mut(&mut self) -> &mut MappingState {
        &mut self.mapping
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Marks an upload as in flight.
    pub fn begin_upload(&mut self) -> Result<(), TransitionError> {
        self.ensure_idle()?;
        if self.step() != Step::Upload {
            return Err(TransitionError::WrongStep {
                operation: "upload",
                expected: Step::Upload,
                current: self.step(),
            });
        }
        self.busy = true;
        Ok(())
    }

    /// Stores the uploaded table, resets the mapping to one empty entry per
    /// header, and moves to Preview.
    pub fn complete_upload(&mut self, source: PathBuf, table: SpreadsheetTable) {
        self.mapping.initialize(&table.headers);
        tracing::info!(
            file = %source.display(),
            sheet = %table.sheet_name,
            columns = table.headers.len(),
            rows = table.row_count(),
            "Spreadsheet loaded"
        );
        self.source = Some(source);
        self.table = Some(table);
        self.outcome = None;
        self.busy = false;
        self.step = Step::Preview;
    }

    /// Clears the busy flag after a failed upload or submission.
    pub fn abort(&mut self) {
        self.busy = false;
    }

    /// Chooses the entity type. Allowed until the Summary step.
    pub fn select_entity(&mut self, selection: EntitySelection) -> Result<(), TransitionError> {
        self.ensure_idle()?;
        if self.step() > Step::Mapping {
            return Err(TransitionError::WrongStep {
                operation: "entity selection",
                expected: Step::Mapping,
                current: self.step(),
            });
        }
        tracing::info!(
            entity_type = %selection.name,
            fields = selection.catalog.len(),
            required = selection.required_keys.len(),
            "Entity type selected"
        );
        self.entity = Some(selection);
        Ok(())
    }

    /// Moves one step forward if the current step's guard passes.
    pub fn advance(&mut self) -> Result<Step, TransitionError> {
        self.ensure_idle()?;
        let current = self.step();
        let next = current.next().ok_or(TransitionError::AtLastStep)?;
        self.check_guard(current)?;
        self.step = next;
        tracing::info!(from = %current, to = %next, "Wizard advanced");
        Ok(next)
    }

    /// Returns to `step` (or stays), keeping all accumulated state.
    pub fn go_to(&mut self, step: Step) -> Result<(), TransitionError> {
        self.ensure_idle()?;
        let current = self.step();
        if step > current {
            return Err(TransitionError::NotEarlier {
                from: current,
                to: step,
            });
        }
        self.step = step;
        tracing::debug!(from = %current, to = %step, "Wizard moved back");
        Ok(())
    }

    /// Discards all state and returns to Upload.
    pub fn reset(&mut self) {
        *self = Self::default();
        tracing::debug!("Wizard reset");
    }

    /// Marks a submission as in flight. Only valid in Summary.
    pub fn begin_submit(&mut self) -> Result<(), TransitionError> {
        self.ensure_idle()?;
        if self.step() != Step::Summary {
            return Err(TransitionError::WrongStep {
                operation: "submission",
                expected: Step::Summary,
                current: self.step(),
            });
        }
        self.busy = true;
        Ok(())
    }

    /// Records the outcome and moves to Result.
    pub fn complete_submission(&mut self, outcome: Outcome) {
        tracing::info!(errors = outcome.has_errors(), "Submission finished");
        self.outcome = Some(outcome);
        self.busy = false;
        self.step = Step::Result;
    }

    fn ensure_idle(&self) -> Result<(), TransitionError> {
        if self.busy {
            Err(TransitionError::Busy)
        } else {
            Ok(())
        }
    }

    fn check_guard(&self, from: Step) -> Result<(), TransitionError> {
        match from {
            Step::Upload | Step::Preview => {
                if self.table.is_none() {
                    return Err(TransitionError::NoTable);
                }
            }
            Step::Mapping => {
                let entity = self.entity.as_ref().ok_or(TransitionError::NoEntityType)?;
                if self.mapping.mapped_count() == 0 {
                    return Err(TransitionError::NothingMapped);
                }
                let coverage = self.mapping.required_field_coverage(&entity.required_keys);
                if !coverage.is_complete() {
                    return Err(TransitionError::RequiredFieldsMissing {
                        missing: coverage.missing,
                    });
                }
            }
            Step::Summary => {
                if self.outcome.is_none() {
                    return Err(TransitionError::NotSubmitted);
                }
            }
            Step::Result => return Err(TransitionError::AtLastStep),
        }
        Ok(())
    }
}
