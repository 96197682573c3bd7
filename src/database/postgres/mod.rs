
use async_trait::async_trait;
use pgvector::Vector;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::config::PostgresConfig;
use crate::config::settings::is_plain_identifier;
use crate::database::{FaqMatch, FaqStore, NewFaq, StoreError};
use crate::embeddings::Embedding;

/// SQL for one FAQ table. The table name is validated before it is interpolated.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Statements {
    list_questions: String,
    insert: String,
    nearest: String,
    count: String,
}

impl Statements {
    fn for_table(table: &str) -> Result<Self, StoreError> {
        if !is_plain_identifier(table) {
            return Err(StoreError::InvalidTable(table.to_string()));
        }

        Ok(Self {
            list_questions: format!("SELECT question FROM {table}"),
            insert: format!("INSERT INTO {table} (question, answer, embedding) VALUES ($1, $2, $3)"),
            nearest: format!(
                "SELECT question, answer FROM {table} ORDER BY embedding <-> $1 LIMIT 1"
            ),
            count: format!("SELECT COUNT(*) FROM {table}"),
        })
    }
}

/// FAQ table in PostgreSQL with the pgvector extension.
///
/// The pool holds a single connection for the lifetime of the run.
#[derive(Debug, Clone)]
pub struct PgFaqStore {
    pool: PgPool,
    table: String,
    dimension: usize,
    statements: Statements,
}

impl PgFaqStore {
    #[inline]
    pub async fn connect(config: &PostgresConfig, dimension: usize) -> Result<Self, StoreError> {
        let url = config.database_url().map_err(|e| StoreError::Connection {
            url: config.host.clone(),
            source: sqlx::Error::Configuration(Box::new(e)),
        })?;
        let redacted = config
            .redacted_database_url()
            .unwrap_or_else(|_| config.host.clone());

        info!("Connecting to {}", redacted);

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(url.as_str())
            .await
            .map_err(|source| StoreError::Connection {
                url: redacted,
                source,
            })?;

        Self::from_pool(pool, &config.table, dimension)
    }

    #[inline]
    pub fn from_pool(pool: PgPool, table: &str, dimension: usize) -> Result<Self, StoreError> {
        Ok(Self {
            pool,
            table: table.to_string(),
            dimension,
            statements: Statements::for_table(table)?,
        })
    }

    #[inline]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[inline]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[inline]
    pub async fn count(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar(&self.statements.count)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::Query)
    }

    /// Close the underlying connection.
    #[inline]
    pub async fn close(&self) {
        debug!("Closing database connection");
        self.pool.close().await;
    }
}

#[async_trait]
impl FaqStore for PgFaqStore {
    async fn existing_questions(&self) -> Result<HashSet<String>, StoreError> {
        let questions: Vec<String> = sqlx::query_scalar(&self.statements.list_questions)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::Query)?;

        debug!("Found {} stored questions in {}", questions.len(), self.table);
        Ok(questions.into_iter().collect())
    }

    async fn insert(&self, faq: &NewFaq) -> Result<(), StoreError> {
        faq.embedding.ensure_dimension(self.dimension)?;

        sqlx::query(&self.statements.insert)
            .bind(&faq.question)
            .bind(&faq.answer)
            .bind(Vector::from(faq.embedding.as_slice().to_vec()))
            .execute(&self.pool)
            .await
            .map_err(|source| StoreError::Insert {
                question: faq.question.clone(),
                source,
            })?;

        Ok(())
    }

    async fn nearest_neighbor(&self, embedding: &Embedding) -> Option<FaqMatch> {
        if let Err(e) = embedding.ensure_dimension(self.dimension) {
            warn!("Query embedding does not fit {}: {}", self.table, e);
            return None;
        }

        let result = sqlx::query_as::<_, FaqMatch>(&self.statements.nearest)
            .bind(Vector::from(embedding.as_slice().to_vec()))
            .fetch_optional(&self.pool)
            .await;

        match result {
            Ok(found) => found,
            Err(e) => {
                warn!("Nearest-neighbor lookup failed: {}", e);
                None
            }
        }
    }
}
