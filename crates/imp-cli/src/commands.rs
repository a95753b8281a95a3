//! Command implementations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use imp_cli::config::AppConfig;
use imp_cli::i18n::{Language, Message};
use imp_cli::logging::redact_value;
use imp_cli::settings::{self, Settings};
use imp_cli::store::Templates;
use imp_cli::summary::{
    fields_table, languages_table, mapping_table, preview_table, report_line, report_table,
    samples_table, step_line, submission_line, summary_text, template_mappings_table,
    templates_table, types_table,
};
use imp_cli::wizard::{EntitySelection, Outcome, TransitionError, Wizard};
use imp_client::{BackendClient, TicketClient};
use imp_ingest::{DEFAULT_SAMPLE_COUNT, column_samples, load_table, preview, sample_values};
use imp_map::{DEFAULT_TEMPLATE_AUTHOR, TemplateStore, generate_mapped_csv, write_artifact};
use imp_model::{
    ColumnMapping, EntityType, ExportPayload, MappingTemplate, SpreadsheetTable, TemplateRequest,
};
use imp_plugins::{
    ConfigDiscovery, PluginFactory, PluginRegistry, builtin_plugins, row_from_pairs,
};

use crate::cli::{
    Command, FieldsArgs, LanguageCommand, MapArgs, PreviewArgs, SubmitTarget, TemplatesCommand,
    TypesArgs,
};

/// Runs one command and returns the process exit code.
pub async fn run(command: Command, config: &AppConfig, language: Language) -> Result<i32> {
    match command {
        Command::Preview(args) => run_preview(&args, config).await.map(|()| 0),
        Command::Map(args) => {
            let outcome = run_map(&args, config, language).await?;
            Ok(if outcome.has_errors() { 1 } else { 0 })
        }
        Command::Fields(args) => run_fields(&args, config).await.map(|()| 0),
        Command::Types(args) => run_types(&args, config).await.map(|()| 0),
        Command::Templates(command) => run_templates(&command, config).await.map(|()| 0),
        Command::Language(command) => run_language(&command, language).map(|()| 0),
    }
}

/// Display language: `--lang`, then the configuration file, then the saved
/// preference, then the environment, then the default.
pub fn resolve_language(
    flag: Option<&str>,
    configured: Option<&str>,
    saved: Option<&Settings>,
    env: Option<Language>,
) -> Language {
    for code in [flag, configured].into_iter().flatten() {
        match Language::from_code(code) {
            Some(language) => return language,
            None => tracing::warn!(code, "Unsupported language code, ignoring"),
        }
    }
    saved
        .map(Settings::language)
        .or(env)
        .unwrap_or(imp_cli::i18n::DEFAULT_LANGUAGE)
}

fn backend_client(config: &AppConfig) -> Result<BackendClient> {
    BackendClient::new(config.api.base_url.as_str(), config.api.timeout())
        .context("create backend client")
}

async fn build_registry(config: &AppConfig) -> PluginRegistry {
    let factory = PluginFactory::default();
    let discovery = ConfigDiscovery::new(config.plugins.external.clone(), &factory);
    let mut registry = PluginRegistry::new();
    registry.initialize_all(builtin_plugins(), &discovery).await;
    registry
}

fn load_spreadsheet(path: &Path) -> Result<SpreadsheetTable> {
    load_table(path).with_context(|| format!("load spreadsheet {}", path.display()))
}

pub async fn run_preview(args: &PreviewArgs, config: &AppConfig) -> Result<()> {
    if args.remote {
        let backend = backend_client(config)?;
        match backend.preview_spreadsheet(&args.file).await {
            Ok(remote) => {
                println!("{}", serde_json::to_string_pretty(&remote)?);
                return Ok(());
            }
            Err(error) => {
                tracing::warn!(error = %error, "Remote preview failed, using local data");
            }
        }
    }

    let table = load_spreadsheet(&args.file)?;
    let rows = args.rows.unwrap_or(config.general.preview_rows);
    let head = preview(&table, rows);
    println!(
        "{} ({}): {} of {} rows",
        args.file.display(),
        table.sheet_name,
        head.rows.len(),
        head.total_rows
    );
    println!("{}", preview_table(&head));
    println!("{}", samples_table(&column_samples(&table, DEFAULT_SAMPLE_COUNT)));
    Ok(())
}

pub async fn run_fields(args: &FieldsArgs, config: &AppConfig) -> Result<()> {
    if args.remote {
        let backend = backend_client(config)?;
        let fields = backend
            .entity_fields(&args.entity_type)
            .await
            .with_context(|| format!("fetch fields for {}", args.entity_type))?;
        for field in fields {
            println!("{field}");
        }
        return Ok(());
    }

    let mut registry = build_registry(config).await;
    let catalog = registry.catalog_for(&args.entity_type);
    registry.shutdown().await;
    let catalog = catalog.with_context(|| format!("unknown entity type '{}'", args.entity_type))?;
    println!("{}", fields_table(&catalog));
    Ok(())
}

pub async fn run_types(args: &TypesArgs, config: &AppConfig) -> Result<()> {
    let rows: Vec<(String, String)> = if args.remote {
        let backend = backend_client(config)?;
        backend
            .entity_types()
            .await
            .context("fetch entity types")?
            .into_iter()
            .map(|t| (t.name, t.label))
            .collect()
    } else {
        let mut registry = build_registry(config).await;
        let names = registry.entity_type_names();
        registry.shutdown().await;
        names
            .into_iter()
            .map(|name| {
                let description = name
                    .parse::<EntityType>()
                    .map(|t| t.description().to_string())
                    .unwrap_or_else(|_| "Provided by a plugin".to_string());
                (name, description)
            })
            .collect()
    };
    println!("{}", types_table(&rows));
    Ok(())
}

pub async fn run_templates(command: &TemplatesCommand, config: &AppConfig) -> Result<()> {
    let backend = backend_client(config)?;
    let store = Templates::from_config(config, &backend).context("open template store")?;
    match command {
        TemplatesCommand::List { entity_type } => {
            let templates = store
                .list(entity_type)
                .await
                .with_context(|| format!("list templates for {entity_type}"))?;
            if templates.is_empty() {
                println!("No templates for {entity_type}");
                return Ok(());
            }
            let summaries: Vec<_> = templates.iter().map(MappingTemplate::summary).collect();
            println!("{}", templates_table(&summaries));
        }
        TemplatesCommand::Show { id } => {
            let template = store
                .get(*id)
                .await
                .with_context(|| format!("load template {id}"))?;
            println!("{} ({})", template.name, template.entity_type);
            if !template.description.is_empty() {
                println!("{}", template.description);
            }
            println!("{}", template_mappings_table(&template));
        }
        TemplatesCommand::Update {
            id,
            name,
            description,
            mappings,
        } => {
            let template = store
                .get(*id)
                .await
                .with_context(|| format!("load template {id}"))?;
            let request = edited_template_request(
                template,
                name.as_deref(),
                description.as_deref(),
                mappings,
            )?;
            let updated = store
                .update(*id, &request)
                .await
                .with_context(|| format!("update template {id}"))?;
            tracing::info!(id = updated.id, name = %updated.name, "Template updated");
            println!("{}", template_mappings_table(&updated));
        }
        TemplatesCommand::Delete { id } => {
            store
                .delete(*id)
                .await
                .with_context(|| format!("delete template {id}"))?;
            println!("Deleted template {id}");
        }
        TemplatesCommand::SetDefault { id } => {
            store
                .set_default(*id)
                .await
                .with_context(|| format!("set default template {id}"))?;
            println!("Template {id} is now the default");
        }
    }
    Ok(())
}

pub fn run_language(command: &LanguageCommand, current: Language) -> Result<()> {
    match command {
        LanguageCommand::Get => println!("{} ({})", current.native_name(), current.code()),
        LanguageCommand::List => println!("{}", languages_table(current)),
        LanguageCommand::Set { code } => {
            let language = Language::from_code(code)
                .with_context(|| format!("unsupported language code '{code}'"))?;
            let settings = Settings {
                language: language.code().to_string(),
            };
            let path = settings::save_settings(&settings)?;
            println!("{} ({})", language.native_name(), path.display());
        }
    }
    Ok(())
}

pub async fn run_map(args: &MapArgs, config: &AppConfig, language: Language) -> Result<Outcome> {
    let mut registry = build_registry(config).await;
    let result = map_spreadsheet(args, config, language, &registry).await;
    registry.shutdown().await;
    result
}

async fn map_spreadsheet(
    args: &MapArgs,
    config: &AppConfig,
    language: Language,
    registry: &PluginRegistry,
) -> Result<Outcome> {
    let backend = backend_client(config)?;
    let mut wizard = Wizard::new();

    // Upload
    println!("{}", step_line(language, wizard.step()));
    wizard.begin_upload()?;
    let table = match load_spreadsheet(&args.file) {
        Ok(table) => table,
        Err(error) => {
            wizard.abort();
            return Err(error);
        }
    };
    wizard.complete_upload(args.file.clone(), table);

    // Preview
    println!("{}", step_line(language, wizard.step()));
    if args.remote_preview
        && let Err(error) = backend.preview_spreadsheet(&args.file).await
    {
        tracing::warn!(error = %error, "Remote preview failed, using local data");
    }
    if let Some(table) = wizard.table() {
        println!("{}", preview_table(&preview(table, config.general.preview_rows)));
    }
    wizard.advance()?;

    // Mapping
    println!("{}", step_line(language, wizard.step()));
    let catalog = registry.catalog_for(&args.entity_type).with_context(|| {
        format!(
            "unknown entity type '{}' (available: {})",
            args.entity_type,
            registry.entity_type_names().join(", ")
        )
    })?;
    let required_keys = if args.remote_required {
        match backend.required_fields(&args.entity_type).await {
            Ok(fields) => fields.required_keys(),
            Err(error) => {
                tracing::warn!(error = %error, "Could not fetch required fields, using the catalog");
                catalog.required_keys()
            }
        }
    } else {
        catalog.required_keys()
    };
    wizard.select_entity(EntitySelection {
        name: args.entity_type.clone(),
        catalog,
        required_keys,
    })?;

    let store = Templates::from_config(config, &backend).context("open template store")?;
    apply_template(&mut wizard, &store, args).await?;
    for assignment in &args.mappings {
        assign_column(&mut wizard, assignment)?;
    }

    let (entity, table) = match (wizard.entity(), wizard.table()) {
        (Some(entity), Some(table)) => (entity.clone(), table.clone()),
        _ => bail!("wizard lost its spreadsheet or entity type"),
    };
    let samples = column_samples(&table, DEFAULT_SAMPLE_COUNT);
    println!(
        "{}",
        mapping_table(wizard.mapping(), &entity.catalog, &entity.required_keys, &samples)
    );
    let coverage = wizard.mapping().required_field_coverage(&entity.required_keys);
    println!(
        "{}",
        summary_text(
            language,
            &entity.name,
            &wizard.mapping().summary(&entity.required_keys),
            &coverage,
            &wizard.mapping().duplicate_targets(),
        )
    );

    if let Some(name) = &args.save_template {
        let request =
            wizard
                .mapping()
                .save_as_template(name, &args.template_description, &entity.name)?;
        let created = store.create(&request).await.context("save template")?;
        println!(
            "{}",
            language.format(Message::TemplateSaved, &[("name", &created.name)])
        );
    }

    wizard
        .advance()
        .map_err(|error| anyhow!(transition_message(language, &error)))?;

    // Summary
    println!("{}", step_line(language, wizard.step()));
    let payload = wizard
        .mapping()
        .to_export_payload(&entity.name, table.row_count(), Utc::now())?;
    let artifact = write_artifact(&payload, &args.out)?;
    println!(
        "{}",
        language.format(Message::MappingSaved, &[("path", &artifact.display().to_string())])
    );
    let csv = match &args.csv {
        Some(path) => {
            let content = generate_mapped_csv(&table, &payload.mappings)?;
            fs::write(path, content)
                .with_context(|| format!("write mapped CSV {}", path.display()))?;
            tracing::info!(path = %path.display(), "Mapped CSV written");
            Some(path.clone())
        }
        None => None,
    };
    if args.check_rows {
        check_rows(registry, &entity.name, &table, &payload.mappings).await;
    }

    wizard.begin_submit()?;
    let submitted = match args.submit {
        None => Ok(Outcome::Exported { artifact, csv }),
        Some(target) => submit(target, args, config, &backend, &table, &payload).await,
    };
    match submitted {
        Ok(outcome) => wizard.complete_submission(outcome),
        Err(error) => {
            wizard.abort();
            return Err(error);
        }
    }

    // Result
    println!("{}", step_line(language, wizard.step()));
    let outcome = wizard
        .outcome()
        .cloned()
        .context("wizard finished without an outcome")?;
    print_outcome(language, &outcome, &payload);
    Ok(outcome)
}

async fn apply_template(wizard: &mut Wizard, store: &Templates, args: &MapArgs) -> Result<()> {
    let template = if let Some(id) = args.template {
        Some(
            store
                .get(id)
                .await
                .with_context(|| format!("load template {id}"))?,
        )
    } else if args.default_template {
        let found = store
            .default_for(&args.entity_type)
            .await
            .with_context(|| format!("load default template for {}", args.entity_type))?;
        if found.is_none() {
            tracing::info!(entity_type = %args.entity_type, "No default template");
        }
        found
    } else {
        None
    };

    if let Some(template) = template {
        if !template.entity_type.eq_ignore_ascii_case(&args.entity_type) {
            tracing::warn!(
                template = %template.name,
                template_type = %template.entity_type,
                entity_type = %args.entity_type,
                "Template was saved for another entity type"
            );
        }
        let report = wizard.mapping_mut().load_template(&template);
        for column in &report.ignored {
            println!("Template column not in spreadsheet: {column}");
        }
    }
    Ok(())
}

/// Applies `templates update` edits to a stored template. Assignments
/// replace a column's field in place, add new columns at the end, or drop
/// the column when the field is empty.
fn edited_template_request(
    template: MappingTemplate,
    name: Option<&str>,
    description: Option<&str>,
    assignments: &[String],
) -> Result<TemplateRequest> {
    let mut mappings = template.mappings;
    for assignment in assignments {
        let (column, field) = parse_assignment(assignment)?;
        let existing = mappings.iter().position(|m| m.source_column == column);
        match (existing, field) {
            (Some(idx), Some(field)) => mappings[idx].target_field_key = field,
            (Some(idx), None) => {
                mappings.remove(idx);
            }
            (None, Some(field)) => mappings.push(ColumnMapping::new(column, field)),
            (None, None) => bail!("column '{column}' is not in template {}", template.id),
        }
    }
    if mappings.is_empty() {
        bail!("template {} would have no mappings left", template.id);
    }

    let name = name.map_or(template.name, str::to_string);
    if name.trim().is_empty() {
        bail!("template name is required");
    }
    Ok(TemplateRequest {
        name,
        description: description.map_or(template.description, str::to_string),
        entity_type: template.entity_type,
        mappings,
        created_by: DEFAULT_TEMPLATE_AUTHOR.to_string(),
    })
}

/// Parses `COLUMN=FIELD`; an empty field clears the column's mapping.
pub fn parse_assignment(assignment: &str) -> Result<(String, Option<String>)> {
    let (column, field) = assignment
        .split_once('=')
        .with_context(|| format!("invalid mapping '{assignment}', expected COLUMN=FIELD"))?;
    let column = column.trim();
    if column.is_empty() {
        bail!("invalid mapping '{assignment}', column name is empty");
    }
    let field = field.trim();
    let field = (!field.is_empty()).then(|| field.to_string());
    Ok((column.to_string(), field))
}

fn assign_column(wizard: &mut Wizard, assignment: &str) -> Result<()> {
    let (column, field) = parse_assignment(assignment)?;
    if let Some(entity) = wizard.entity()
        && let Some(key) = &field
        && !entity.catalog.contains(key)
    {
        bail!("unknown field '{key}' for {}", entity.name);
    }
    if let Some(table) = wizard.table() {
        let sample = sample_values(table, &column, 1);
        tracing::debug!(
            column = %column,
            field = field.as_deref().unwrap_or("-"),
            sample = redact_value(sample.first().map(String::as_str).unwrap_or_default()),
            "Column assigned"
        );
    }
    wizard
        .mapping_mut()
        .set_mapping(&column, field.as_deref())
        .with_context(|| format!("map column '{column}'"))?;
    Ok(())
}

fn transition_message(language: Language, error: &TransitionError) -> String {
    match error {
        TransitionError::NothingMapped => language.text(Message::NoFieldsMapped).to_string(),
        TransitionError::RequiredFieldsMissing { missing } => {
            language.format(Message::MissingRequired, &[("fields", &missing.join(", "))])
        }
        other => other.to_string(),
    }
}

/// Runs plugin row checks over the mapped rows; problems are only reported.
async fn check_rows(
    registry: &PluginRegistry,
    entity_type: &str,
    table: &SpreadsheetTable,
    mappings: &[ColumnMapping],
) -> usize {
    let columns: Vec<(usize, &str)> = mappings
        .iter()
        .filter_map(|m| {
            table
                .column_index(&m.source_column)
                .map(|index| (index, m.target_field_key.as_str()))
        })
        .collect();

    let mut problems = 0;
    for (index, _) in table.rows.iter().enumerate() {
        let row = row_from_pairs(
            columns
                .iter()
                .map(|(column, key)| (*key, table.cell(index, *column))),
        );
        let Some(validation) = registry.validate_row(entity_type, &row).await else {
            continue;
        };
        for warning in &validation.warnings {
            tracing::warn!(row = index + 1, warning = %warning, "Row check warning");
        }
        if !validation.is_valid {
            problems += 1;
            println!("Row {}: {}", index + 1, validation.errors.join("; "));
        }
    }
    tracing::info!(entity_type, rows = table.row_count(), problems, "Row checks finished");
    problems
}

async fn submit(
    target: SubmitTarget,
    args: &MapArgs,
    config: &AppConfig,
    backend: &BackendClient,
    table: &SpreadsheetTable,
    payload: &ExportPayload,
) -> Result<Outcome> {
    match target {
        SubmitTarget::Backend => {
            let ack = backend
                .import_mapping(payload)
                .await
                .context("submit mapping")?;
            Ok(Outcome::Submitted(ack))
        }
        SubmitTarget::Excel => {
            let report = backend
                .import_spreadsheet(&payload.import_type, &args.file, &payload.mappings)
                .await
                .context("import spreadsheet")?;
            Ok(Outcome::Imported(report))
        }
        SubmitTarget::Ticket => {
            let csv = generate_mapped_csv(table, &payload.mappings)?;
            if csv.is_empty() {
                bail!("the mapped CSV is empty, nothing to attach");
            }
            let client = TicketClient::new(config.ticket.clone(), config.api.timeout())
                .context("create ticket client")?;
            let id = client
                .submit(payload, csv)
                .await
                .context("create import ticket")?;
            Ok(Outcome::Ticket { id })
        }
    }
}

fn print_outcome(language: Language, outcome: &Outcome, payload: &ExportPayload) {
    match outcome {
        Outcome::Exported { .. } => {}
        Outcome::Submitted(ack) => {
            println!("{}", submission_line(language, ack, payload.total_rows));
        }
        Outcome::Imported(report) => {
            println!("{}", report_line(language, report));
            if report.has_errors() {
                println!("{}", report_table(report, language));
            }
        }
        Outcome::Ticket { id } => {
            println!("{}", language.format(Message::TicketCreated, &[("id", id)]));
        }
    }
}
