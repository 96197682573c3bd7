// Indexer module
// Embeds FAQ records that are not stored yet and writes them to the FAQ table


use clap::ValueEnum;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::database::{FaqRecord, FaqStore, NewFaq, StoreError};
use crate::embeddings::{Embedder, EmbeddingError};

/// What the indexer does after a record fails to embed or insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FailurePolicy {
    /// Stop at the first failure and leave the remaining records untouched.
    #[default]
    Abort,
    /// Record the failure and move on to the next record.
    Continue,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read stored questions: {0}")]
    ExistingQuestions(#[source] StoreError),
    #[error("Failed to embed '{question}': {source}")]
    Embedding {
        question: String,
        #[source]
        source: EmbeddingError,
    },
    #[error("Failed to store '{question}': {source}")]
    Insert {
        question: String,
        #[source]
        source: StoreError,
    },
}

impl IngestError {
    #[inline]
    pub fn question(&self) -> Option<&str> {
        match self {
            IngestError::ExistingQuestions(_) => None,
            IngestError::Embedding { question, .. } | IngestError::Insert { question, .. } => {
                Some(question.as_str())
            }
        }
    }
}

/// A record that could not be stored under [`FailurePolicy::Continue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestFailure {
    pub question: String,
    pub reason: String,
}

/// Outcome of one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub inserted: usize,
    pub skipped: usize,
    pub failures: Vec<IngestFailure>,
}

impl IngestReport {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct Indexer<'a> {
    store: &'a dyn FaqStore,
    embedder: &'a dyn Embedder,
    policy: FailurePolicy,
}

impl<'a> Indexer<'a> {
    #[inline]
    pub fn new(store: &'a dyn FaqStore, embedder: &'a dyn Embedder) -> Self {
        Self {
            store,
            embedder,
            policy: FailurePolicy::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Store every record whose question is not in the table yet, in input order.
    ///
    /// Questions already stored, or stored earlier in this run, are skipped.
    #[inline]
    pub async fn ingest(&self, records: Vec<FaqRecord>) -> Result<IngestReport, IngestError> {
        let mut existing = self
            .store
            .existing_questions()
            .await
            .map_err(IngestError::ExistingQuestions)?;

        info!(
            "Ingesting {} FAQ records ({} questions already stored)",
            records.len(),
            existing.len()
        );

        let mut report = IngestReport::default();

        for record in records {
            if existing.contains(&record.question) {
                info!("Skipping existing question: {}", record.question);
                report.skipped += 1;
                continue;
            }

            match self.ingest_record(record).await {
                Ok(question) => {
                    info!("Stored FAQ: {}", question);
                    existing.insert(question);
                    report.inserted += 1;
                }
                Err(e) => match self.policy {
                    FailurePolicy::Abort => {
                        error!("{}", e);
                        return Err(e);
                    }
                    FailurePolicy::Continue => {
                        warn!("{}", e);
                        report.failures.push(IngestFailure {
                            question: e.question().unwrap_or_default().to_string(),
                            reason: e.to_string(),
                        });
                    }
                },
            }
        }

        info!(
            "Ingestion finished: {} inserted, {} skipped, {} failed",
            report.inserted,
            report.skipped,
            report.failures.len()
        );

        Ok(report)
    }

    async fn ingest_record(&self, record: FaqRecord) -> Result<String, IngestError> {
        debug!("Embedding question: {}", record.question);

        let embedding = match self.embedder.embed(&record.question) {
            Ok(embedding) => embedding,
            Err(source) => {
                return Err(IngestError::Embedding {
                    question: record.question,
                    source,
                });
            }
        };

        let faq = NewFaq::new(record, embedding);
        let inserted = self.store.insert(&faq).await;
        match inserted {
            Ok(()) => Ok(faq.question),
            Err(source) => Err(IngestError::Insert {
                question: faq.question,
                source,
            }),
        }
    }
}
