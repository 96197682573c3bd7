use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use faq_search::FaqError;
use faq_search::config::{Config, load_env_file, show_config};
use faq_search::database::{FaqRecord, FaqStore, PgFaqStore};
use faq_search::embeddings::{Embedder, OpenAiClient};
use faq_search::indexer::{FailurePolicy, Indexer};
use faq_search::loader::{DEFAULT_FAQ_FILE, load_faqs};
use faq_search::search::{answer_query, read_query};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "faq-search")]
#[command(about = "Store FAQ embeddings in PostgreSQL and answer a question with the closest FAQ")]
#[command(version)]
struct Cli {
    /// JSON file with an array of {"question", "answer"} objects
    #[arg(long, default_value = DEFAULT_FAQ_FILE)]
    faqs: PathBuf,
    /// Environment file to load instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
    /// Question to answer instead of prompting on stdin
    #[arg(long)]
    query: Option<String>,
    /// What to do when a record fails to embed or insert
    #[arg(long, value_enum, default_value_t = FailurePolicy::Abort)]
    on_error: FailurePolicy,
    /// Only answer the query, do not read the FAQ file
    #[arg(long)]
    skip_ingest: bool,
    /// Print the effective configuration and exit
    #[arg(long)]
    show_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    load_env_file(cli.env_file.as_deref()).context("Failed to load environment file")?;
    let config = Config::from_env().context("Failed to load configuration")?;

    if cli.show_config {
        show_config(&config).context("Failed to show configuration")?;
        return Ok(());
    }

    let records = load_records(&cli)?;

    let embedder = OpenAiClient::new(&config.openai);
    info!(
        "Embedding with {} at {}",
        embedder.model(),
        embedder.endpoint()
    );

    let store = PgFaqStore::connect(&config.postgres, config.openai.embedding_dimension)
        .await
        .context("Failed to initialize database")?;

    let result = run(&cli, &store, &embedder, records).await;
    store.close().await;
    Ok(result?)
}

/// The FAQ file is read before any network or database traffic.
fn load_records(cli: &Cli) -> Result<Option<Vec<FaqRecord>>> {
    if cli.skip_ingest {
        return Ok(None);
    }

    let records = load_faqs(&cli.faqs)
        .with_context(|| format!("Failed to load FAQ file {}", cli.faqs.display()))?;
    Ok(Some(records))
}

async fn run(
    cli: &Cli,
    store: &dyn FaqStore,
    embedder: &dyn Embedder,
    records: Option<Vec<FaqRecord>>,
) -> Result<(), FaqError> {
    if let Some(records) = records {
        let report = Indexer::new(store, embedder)
            .with_policy(cli.on_error)
            .ingest(records)
            .await?;

        if report.is_complete() {
            println!("{}", style("全てのFAQデータが登録されました。").green());
        } else {
            println!(
                "{}",
                style(format!(
                    "{} 件のFAQを登録できませんでした。",
                    report.failures.len()
                ))
                .yellow()
            );
            for failure in &report.failures {
                println!("  - {}", failure.reason);
            }
        }
    }

    let query = match &cli.query {
        Some(query) => query.trim().to_string(),
        None => read_query(io::stdin().lock(), io::stdout().lock())?,
    };

    let outcome = answer_query(store, embedder, &query, io::stdout()).await?;
    info!("Query finished: {:?}", outcome);

    Ok(())
}
