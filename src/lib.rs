use thiserror::Error;

pub type Result<T> = std::result::Result<T, FaqError>;

#[derive(Error, Debug)]
pub enum FaqError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] embeddings::EmbeddingError),

    #[error("Database error: {0}")]
    Database(#[from] database::StoreError),

    #[error("FAQ file error: {0}")]
    Load(#[from] loader::LoadError),

    #[error("Ingestion aborted: {0}")]
    Ingest(#[from] indexer::IngestError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub mod config;
pub mod database;
pub mod embeddings;
pub mod indexer;
pub mod loader;
pub mod search;
