//! Persisted user preferences.
//!
//! Stored as `settings.toml` in the platform config directory:
//! - macOS: ~/Library/Application Support/com.import-wizard.Import-Wizard/
//! - Windows: %APPDATA%/import-wizard/Import Wizard/config/
//! - Linux: ~/.config/import-wizard/

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::i18n::{DEFAULT_LANGUAGE, Language};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "import-wizard";
const APP_NAME: &str = "Import Wizard";
const SETTINGS_FILENAME: &str = "settings.toml";

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
}

pub fn settings_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(SETTINGS_FILENAME))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Selected display language code.
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.code().to_string(),
        }
    }
}

impl Settings {
    /// The saved language, or the default when the code is unsupported.
    pub fn language(&self) -> Language {
        Language::from_code(&self.language).unwrap_or(DEFAULT_LANGUAGE)
    }
}

/// Loads settings from `path`.
///
/// Returns defaults when the file is missing or unreadable.
pub fn load_settings_from(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to parse settings file, using defaults");
                Settings::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read settings file, using defaults");
            Settings::default()
        }
    }
}

/// Saves settings to `path`, creating the parent directory if needed.
pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(settings).context("serialize settings")?;
    fs::write(path, content).with_context(|| format!("write settings {}", path.display()))?;
    tracing::info!(path = %path.display(), "Saved settings");
    Ok(())
}

/// Loads settings from the platform location.
pub fn load_settings() -> Settings {
    match settings_path() {
        Some(path) => load_settings_from(&path),
        None => {
            tracing::warn!("Could not determine settings path, using defaults");
            Settings::default()
        }
    }
}

pub fn save_settings(settings: &Settings) -> Result<PathBuf> {
    let path = settings_path().context("could not determine settings path")?;
    save_settings_to(&path, settings)?;
    Ok(path)
}
