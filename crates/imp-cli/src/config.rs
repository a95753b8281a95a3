//! Configuration file (`config.toml`).
//!
//! Read from `--config PATH` or the platform config directory. A missing
//! file yields the defaults; unknown keys are ignored and missing keys take
//! their default values.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8080/api"
//! timeout_secs = 30
//!
//! [ticket]
//! tenant_id = "help"
//! form_id = 14
//!
//! [plugins]
//! external = ["Group"]
//!
//! [templates]
//! dir = "/var/lib/import-wizard/templates"
//!
//! [general]
//! language = "en"
//! preview_rows = 5
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use imp_client::{DEFAULT_BASE_URL, TicketConfig};
use imp_ingest::DEFAULT_PREVIEW_ROWS;
use serde::{Deserialize, Serialize};

use crate::settings::project_dirs;

const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub ticket: TicketConfig,
    pub plugins: PluginsConfig,
    pub templates: TemplatesConfig,
    pub general: GeneralConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// External plugins to register after the built-ins, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    pub external: Vec<String>,
}

/// When `dir` is set, templates are kept in local files instead of the
/// backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Display language; the saved preference wins when unset.
    pub language: Option<String>,
    pub preview_rows: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: None,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads `path`, or the default location when `None`.
    ///
    /// A missing file at the default location is not an error. A path given
    /// explicitly must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => {
                    tracing::debug!("No configuration file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read configuration {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("parse configuration {}", path.display()))?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}
