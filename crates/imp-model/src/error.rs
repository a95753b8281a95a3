use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),
    #[error("unknown field type: {0}")]
    UnknownFieldType(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
