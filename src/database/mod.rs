// Database module
// FAQ rows (question, answer, embedding) live in a single pgvector-backed table

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;

use crate::embeddings::{DimensionMismatch, Embedding};

pub use memory::MemoryFaqStore;
pub use models::{FaqMatch, FaqRecord, NewFaq};
pub use postgres::PgFaqStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to connect to database at {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("Failed to query stored questions: {0}")]
    Query(#[source] sqlx::Error),
    #[error("Failed to insert FAQ '{question}': {source}")]
    Insert {
        question: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("Embedding does not fit the storage column: {0}")]
    DimensionMismatch(#[from] DimensionMismatch),
    #[error("Invalid table name: {0}")]
    InvalidTable(String),
}

/// Storage for FAQ rows with a single nearest-neighbor lookup.
#[async_trait]
pub trait FaqStore: Send + Sync {
    /// Every question currently stored.
    async fn existing_questions(&self) -> Result<HashSet<String>, StoreError>;

    /// Append one row. Nothing is deduplicated here.
    async fn insert(&self, faq: &NewFaq) -> Result<(), StoreError>;

    /// The row whose embedding is closest to `embedding`.
    ///
    /// `None` covers both an empty table and a failed lookup; failures are logged.
    async fn nearest_neighbor(&self, embedding: &Embedding) -> Option<FaqMatch>;
}
