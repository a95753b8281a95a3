//! Spreadsheet import wizard CLI.

use clap::{ColorChoice, Parser};
use imp_cli::config::AppConfig;
use imp_cli::i18n::Language;
use imp_cli::logging::{LogConfig, LogFormat, init_logging};
use imp_cli::settings::{load_settings, settings_path};
use imp_cli::store::TemplateStoreError;
use imp_client::ClientError;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, LogFormatArg, LogLevelArg};
use crate::commands::{resolve_language, run};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(2);
        }
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url.clone_from(url);
    }

    let saved = settings_path()
        .filter(|path| path.exists())
        .map(|_| load_settings());
    let language = resolve_language(
        cli.language.as_deref(),
        config.general.language.as_deref(),
        saved.as_ref(),
        Language::from_env(),
    );
    tracing::debug!(language = language.code(), "Display language");

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("error: failed to start async runtime: {error}");
            std::process::exit(1);
        }
    };

    let exit_code = match runtime.block_on(run(cli.command, &config, language)) {
        Ok(code) => code,
        Err(error) => {
            report_error(&error, language);
            1
        }
    };
    std::process::exit(exit_code);
}

/// Prints a failed command, with the backend's message translated when the
/// failure came from a remote call.
fn report_error(error: &anyhow::Error, language: Language) {
    tracing::error!(error = %format!("{error:#}"), "Command failed");
    let client = error.chain().find_map(|cause| {
        cause.downcast_ref::<ClientError>().or_else(|| {
            cause
                .downcast_ref::<TemplateStoreError>()
                .and_then(TemplateStoreError::client_error)
        })
    });
    match client {
        Some(client) => {
            let message = match client.server_message() {
                Some(raw) => language.translate_error(raw),
                None => client.user_message().to_string(),
            };
            eprintln!("error: {error}: {message}");
        }
        None => eprintln!("error: {error:#}"),
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
