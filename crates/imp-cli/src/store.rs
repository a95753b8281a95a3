//! Template store selection.
//!
//! Templates live on the backend unless `[templates] dir` is configured, in
//! which case a local file store is used.

use async_trait::async_trait;
use imp_client::{BackendClient, ClientError};
use imp_map::{FileTemplateStore, StoreError, TemplateStore};
use imp_model::{MappingTemplate, TemplateRequest};
use thiserror::Error;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum TemplateStoreError {
    #[error(transparent)]
    Files(#[from] StoreError),

    #[error(transparent)]
    Remote(#[from] ClientError),
}

impl TemplateStoreError {
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Remote(error) => Some(error),
            Self::Files(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Templates {
    Files(FileTemplateStore),
    Remote(BackendClient),
}

impl Templates {
    pub fn from_config(config: &AppConfig, backend: &BackendClient) -> Result<Self, StoreError> {
        match &config.templates.dir {
            Some(dir) => {
                tracing::debug!(dir = %dir.display(), "Using file template store");
                Ok(Self::Files(FileTemplateStore::new(dir)?))
            }
            None => Ok(Self::Remote(backend.clone())),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Files(_))
    }
}

#[async_trait]
impl TemplateStore for Templates {
    type Error = TemplateStoreError;

    async fn list(&self, entity_type: &str) -> Result<Vec<MappingTemplate>, Self::Error> {
        match self {
            Self::Files(store) => Ok(store.list(entity_type).await?),
            Self::Remote(client) => Ok(client.list(entity_type).await?),
        }
    }

    async fn get(&self, id: i64) -> Result<MappingTemplate, Self::Error> {
        match self {
            Self::Files(store) => Ok(store.get(id).await?),
            Self::Remote(client) => Ok(client.get(id).await?),
        }
    }

    async fn default_for(
        &self,
        entity_type: &str,
    ) -> Result<Option<MappingTemplate>, Self::Error> {
        match self {
            Self::Files(store) => Ok(store.default_for(entity_type).await?),
            Self::Remote(client) => Ok(client.default_for(entity_type).await?),
        }
    }

    async fn create(&self, request: &TemplateRequest) -> Result<MappingTemplate, Self::Error> {
        match self {
            Self::Files(store) => Ok(store.create(request).await?),
            Self::Remote(client) => Ok(client.create(request).await?),
        }
    }

    async fn update(
        &self,
        id: i64,
        request: &TemplateRequest,
    ) -> Result<MappingTemplate, Self::Error> {
        match self {
            Self::Files(store) => Ok(store.update(id, request).await?),
            Self::Remote(client) => Ok(client.update(id, request).await?),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), Self::Error> {
        match self {
            Self::Files(store) => Ok(store.delete(id).await?),
            Self::Remote(client) => Ok(client.delete(id).await?),
        }
    }

    async fn set_default(&self, id: i64) -> Result<(), Self::Error> {
        match self {
            Self::Files(store) => Ok(store.set_default(id).await?),
            Self::Remote(client) => Ok(client.set_default(id).await?),
        }
    }
}
