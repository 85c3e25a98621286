use thiserror::Error;

#[derive(Error, Debug)]
pub enum KbaseError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Drafting service error: {0}")]
    Drafting(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Document not found: {0}")]
    NotFound(uuid::Uuid),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
