//! CLI argument definitions for the import wizard.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "import-wizard",
    version,
    about = "Spreadsheet import wizard - map spreadsheet columns onto import fields",
    long_about = "Map the columns of an Excel or CSV file onto the fields of an import\n\
                  entity type, then export the mapping, write the projected CSV, or\n\
                  submit it to the import backend or the ticketing API."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Configuration file (default: platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides the configuration file).
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Display language for messages (overrides the saved preference).
    #[arg(long = "lang", value_name = "CODE", global = true)]
    pub language: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the first rows of a spreadsheet with per-column samples.
    Preview(PreviewArgs),

    /// Map a spreadsheet onto an entity type and export or submit it.
    Map(MapArgs),

    /// List the fields of an entity type.
    Fields(FieldsArgs),

    /// List the available entity types.
    Types(TypesArgs),

    /// Manage stored mapping templates.
    #[command(subcommand)]
    Templates(TemplatesCommand),

    /// Show or change the display language.
    #[command(subcommand)]
    Language(LanguageCommand),
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Spreadsheet to read (.xlsx, .xls, .xlsb, .ods or .csv).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Number of rows to show (default from configuration).
    #[arg(long = "rows", value_name = "N")]
    pub rows: Option<usize>,

    /// Also send the file to the backend preview endpoint.
    #[arg(long = "remote")]
    pub remote: bool,
}

#[derive(Args)]
pub struct MapArgs {
    /// Spreadsheet to import.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Entity type to import into (e.g. User, Organization, Ticket).
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub entity_type: String,

    /// Column assignment as COLUMN=FIELD; repeat for several columns.
    #[arg(long = "map", short = 'm', value_name = "COLUMN=FIELD")]
    pub mappings: Vec<String>,

    /// Apply a stored template before the --map assignments.
    #[arg(long = "template", value_name = "ID", conflicts_with = "default_template")]
    pub template: Option<i64>,

    /// Apply the entity type's default template, if one exists.
    #[arg(long = "default-template")]
    pub default_template: bool,

    /// Save the final mapping as a new template with this name.
    #[arg(long = "save-template", value_name = "NAME")]
    pub save_template: Option<String>,

    /// Description for --save-template.
    #[arg(long = "template-description", value_name = "TEXT", default_value = "")]
    pub template_description: String,

    /// Use the backend's required-field list instead of the catalog's.
    #[arg(long = "remote-required")]
    pub remote_required: bool,

    /// Where to write the mapping JSON (file or directory).
    #[arg(long = "out", value_name = "PATH", default_value = ".")]
    pub out: PathBuf,

    /// Also write the mapped CSV to this path.
    #[arg(long = "csv", value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Run the entity type's row checks and report problems (advisory).
    #[arg(long = "check-rows")]
    pub check_rows: bool,

    /// Send the file to the backend preview endpoint first.
    #[arg(long = "remote-preview")]
    pub remote_preview: bool,

    /// Submit the result after exporting.
    #[arg(long = "submit", value_enum)]
    pub submit: Option<SubmitTarget>,
}

#[derive(Args)]
pub struct FieldsArgs {
    /// Entity type whose fields to list.
    #[arg(value_name = "TYPE")]
    pub entity_type: String,

    /// Ask the backend instead of the local catalog.
    #[arg(long = "remote")]
    pub remote: bool,
}

#[derive(Args)]
pub struct TypesArgs {
    /// Ask the backend instead of the local registry.
    #[arg(long = "remote")]
    pub remote: bool,
}

#[derive(Subcommand)]
pub enum TemplatesCommand {
    /// List templates for an entity type.
    List {
        #[arg(value_name = "TYPE")]
        entity_type: String,
    },
    /// Show one template's mappings.
    Show {
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Rename a template or change its column mappings.
    Update {
        #[arg(value_name = "ID")]
        id: i64,

        /// New template name.
        #[arg(long = "name", value_name = "NAME")]
        name: Option<String>,

        /// New description.
        #[arg(long = "description", value_name = "TEXT")]
        description: Option<String>,

        /// Set a column's field as COLUMN=FIELD; COLUMN= drops the column.
        #[arg(long = "map", short = 'm', value_name = "COLUMN=FIELD")]
        mappings: Vec<String>,
    },
    /// Delete a template.
    Delete {
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Make a template the default for its entity type.
    SetDefault {
        #[arg(value_name = "ID")]
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum LanguageCommand {
    /// Print the current display language.
    Get,
    /// List supported languages.
    List,
    /// Save the display language preference.
    Set {
        #[arg(value_name = "CODE")]
        code: String,
    },
}

/// Where `map --submit` sends the result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SubmitTarget {
    /// JSON mapping to the import-mapping endpoint.
    Backend,
    /// Spreadsheet plus mapping to the import-excel endpoint.
    Excel,
    /// Mapped CSV attached to a ticket.
    Ticket,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
