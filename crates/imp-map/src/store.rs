//! Template storage.
//!
//! [`TemplateStore`] is implemented by the backend client and by
//! [`FileTemplateStore`], which keeps one JSON file per template for
//! offline use.
//!
//! # Storage Format
//!
//! Templates are stored as `template-{id}.json` in the store directory.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use imp_model::{MappingTemplate, TemplateRequest};

use crate::error::StoreError;

/// CRUD over named mapping templates.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Templates for one entity type.
    async fn list(&self, entity_type: &str) -> Result<Vec<MappingTemplate>, Self::Error>;

    async fn get(&self, id: i64) -> Result<MappingTemplate, Self::Error>;

    /// The template flagged default for an entity type, if any.
    async fn default_for(&self, entity_type: &str)
    -> Result<Option<MappingTemplate>, Self::Error>;

    async fn create(&self, request: &TemplateRequest) -> Result<MappingTemplate, Self::Error>;

    async fn update(
        &self,
        id: i64,
        request: &TemplateRequest,
    ) -> Result<MappingTemplate, Self::Error>;

    async fn delete(&self, id: i64) -> Result<(), Self::Error>;

    /// Flags `id` as default, clearing the flag on its siblings.
    async fn set_default(&self, id: i64) -> Result<(), Self::Error>;
}

/// Directory of template JSON files.
#[derive(Debug, Clone)]
pub struct FileTemplateStore {
    base_dir: PathBuf,
}

impl FileTemplateStore {
    /// Opens a store at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|e| StoreError::Io {
            path: base_dir.clone(),
            source: e,
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn template_path(&self, id: i64) -> PathBuf {
        self.base_dir.join(format!("template-{id}.json"))
    }

    fn read(&self, path: &Path) -> Result<MappingTemplate, StoreError> {
        let contents = fs::read_to_string(path).map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&contents).map_err(|e| StoreError::Json {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn write(&self, template: &MappingTemplate) -> Result<(), StoreError> {
        let path = self.template_path(template.id);
        let json = serde_json::to_string_pretty(template).map_err(|e| StoreError::Json {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, json).map_err(|e| StoreError::Io { path, source: e })
    }

    /// Ids and paths of every `template-{id}.json` file, parsed or not.
    fn template_files(&self) -> Result<Vec<(i64, PathBuf)>, StoreError> {
        let entries = fs::read_dir(&self.base_dir).map_err(|e| StoreError::Io {
            path: self.base_dir.clone(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Io {
                path: self.base_dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            let id = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_prefix("template-"))
                .and_then(|n| n.strip_suffix(".json"))
                .and_then(|n| n.parse::<i64>().ok());
            if let Some(id) = id
                && path.is_file()
            {
                files.push((id, path));
            }
        }
        files.sort_by_key(|(id, _)| *id);
        Ok(files)
    }

    /// Every readable template, sorted by id. Unreadable files are skipped.
    fn load_all(&self) -> Result<Vec<MappingTemplate>, StoreError> {
        let mut templates = Vec::new();
        for (_, path) in self.template_files()? {
            match self.read(&path) {
                Ok(template) => templates.push(template),
                Err(e) => tracing::warn!(error = %e, "Skipping unreadable template"),
            }
        }
        Ok(templates)
    }

    /// One past the highest id on disk, counting files that fail to parse.
    fn next_id(&self) -> Result<i64, StoreError> {
        Ok(self
            .template_files()?
            .last()
            .map_or(0, |(id, _)| *id)
            + 1)
    }
}

#[async_trait]
impl TemplateStore for FileTemplateStore {
    type Error = StoreError;

    async fn list(&self, entity_type: &str) -> Result<Vec<MappingTemplate>, StoreError> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|t| t.entity_type == entity_type)
            .collect())
    }

    async fn get(&self, id: i64) -> Result<MappingTemplate, StoreError> {
        let path = self.template_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id));
        }
        self.read(&path)
    }

    async fn default_for(&self, entity_type: &str) -> Result<Option<MappingTemplate>, StoreError> {
        Ok(self
            .list(entity_type)
            .await?
            .into_iter()
            .find(|t| t.is_default))
    }

    async fn create(&self, request: &TemplateRequest) -> Result<MappingTemplate, StoreError> {
        let template = MappingTemplate {
            id: self.next_id()?,
            name: request.name.clone(),
            description: request.description.clone(),
            entity_type: request.entity_type.clone(),
            mappings: request.mappings.clone(),
            is_default: false,
            created_at: Utc::now(),
        };
        self.write(&template)?;
        tracing::info!(id = template.id, name = %template.name, "Template saved");
        Ok(template)
    }

    async fn update(
        &self,
        id: i64,
        request: &TemplateRequest,
    ) -> Result<MappingTemplate, StoreError> {
        let mut template = self.get(id).await?;
        template.name = request.name.clone();
        template.description = request.description.clone();
        template.entity_type = request.entity_type.clone();
        template.mappings = request.mappings.clone();
        self.write(&template)?;
        Ok(template)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let path = self.template_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id));
        }
        fs::remove_file(&path).map_err(|e| StoreError::Io { path, source: e })
    }

    async fn set_default(&self, id: i64) -> Result<(), StoreError> {
        let chosen = self.get(id).await?;
        for mut template in self.list(&chosen.entity_type).await? {
            let is_default = template.id == id;
            if template.is_default != is_default {
                template.is_default = is_default;
                self.write(&template)?;
            }
        }
        Ok(())
    }
}
