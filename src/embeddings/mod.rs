// Embeddings module
// Text-to-vector conversion through a remote embedding endpoint

pub mod openai;


use thiserror::Error;

pub use openai::OpenAiClient;

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
/// Output size of `text-embedding-ada-002`; the storage column must match it.
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 1536;

/// An ordered coordinate vector produced by an [`Embedder`].
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    #[inline]
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    #[inline]
    pub fn ensure_dimension(&self, expected: usize) -> Result<(), DimensionMismatch> {
        if self.dimension() == expected {
            Ok(())
        } else {
            Err(DimensionMismatch {
                expected,
                actual: self.dimension(),
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected {expected} dimensions, got {actual}")]
pub struct DimensionMismatch {
    pub expected: usize,
    pub actual: usize,
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Request to embedding endpoint failed: {0}")]
    Transport(#[from] ureq::Error),
    #[error("Embedding API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Failed to encode embedding request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("Failed to decode embedding response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("Embedding response contained no data")]
    EmptyResult,
    #[error("Embedding has unexpected size: {0}")]
    DimensionMismatch(#[from] DimensionMismatch),
}

/// Anything that can turn text into an [`Embedding`] of a fixed size.
pub trait Embedder: Send + Sync {
    /// Number of dimensions every returned embedding has.
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;
}
