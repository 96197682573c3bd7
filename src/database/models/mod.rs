
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::embeddings::Embedding;

/// A question/answer pair as it appears in the FAQ file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqRecord {
    pub question: String,
    pub answer: String,
}

/// A row about to be written to the FAQ table.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFaq {
    pub question: String,
    pub answer: String,
    pub embedding: Embedding,
}

/// The stored row closest to a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FaqMatch {
    pub question: String,
    pub answer: String,
}

impl NewFaq {
    #[inline]
    pub fn new(record: FaqRecord, embedding: Embedding) -> Self {
        Self {
            question: record.question,
            answer: record.answer,
            embedding,
        }
    }
}

impl std::fmt::Display for FaqMatch {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Q: {}\nA: {}", self.question, self.answer)
    }
}
