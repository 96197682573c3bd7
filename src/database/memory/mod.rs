
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::database::{FaqMatch, FaqStore, NewFaq, StoreError};
use crate::embeddings::Embedding;

/// Process-local FAQ table ranked by Euclidean distance, matching `<->` in pgvector.
#[derive(Debug, Default)]
pub struct MemoryFaqStore {
    dimension: usize,
    rows: Mutex<Vec<NewFaq>>,
}

impl MemoryFaqStore {
    #[inline]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            rows: Mutex::new(Vec::new()),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    /// Snapshot of the stored rows in insertion order.
    #[inline]
    pub fn rows_snapshot(&self) -> Vec<NewFaq> {
        self.rows().clone()
    }

    fn rows(&self) -> MutexGuard<'_, Vec<NewFaq>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[async_trait]
impl FaqStore for MemoryFaqStore {
    async fn existing_questions(&self) -> Result<HashSet<String>, StoreError> {
        Ok(self.rows().iter().map(|row| row.question.clone()).collect())
    }

    async fn insert(&self, faq: &NewFaq) -> Result<(), StoreError> {
        faq.embedding.ensure_dimension(self.dimension)?;
        self.rows().push(faq.clone());
        Ok(())
    }

    async fn nearest_neighbor(&self, embedding: &Embedding) -> Option<FaqMatch> {
        if embedding.ensure_dimension(self.dimension).is_err() {
            return None;
        }

        let query = embedding.as_slice();
        self.rows()
            .iter()
            .map(|row| (squared_distance(row.embedding.as_slice(), query), row))
            // min_by keeps the first of equal elements, so ties go to the oldest row
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, row)| FaqMatch {
                question: row.question.clone(),
                answer: row.answer.clone(),
            })
    }
}
