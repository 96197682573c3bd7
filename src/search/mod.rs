// Search module
// One question in, the closest stored FAQ out

#[cfg(test)]
mod tests;

use std::io::{self, BufRead, Write};
use tracing::{debug, error, info};

use crate::database::{FaqMatch, FaqStore};
use crate::embeddings::Embedder;

pub const PROMPT: &str = "質問を入力してください:";
pub const NOT_FOUND_MESSAGE: &str = "該当するFAQが見つかりませんでした。";

/// Result of answering a single query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Answered(FaqMatch),
    /// The table is empty or the lookup failed.
    NotFound,
    /// The query could not be embedded; nothing was printed.
    Unavailable,
}

/// Print the prompt and read one line, trimmed. End of input yields an empty query.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
#[inline]
pub fn read_query<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<String> {
    writeln!(output, "{}", PROMPT)?;
    output.flush()?;

    let mut line = Vec::new();
    input.read_until(b'\n', &mut line)?;
    Ok(String::from_utf8_lossy(&line).trim().to_string())
}

/// Embed `query`, look up the closest FAQ and print it to `output`.
#[inline]
pub async fn answer_query<W: Write>(
    store: &dyn FaqStore,
    embedder: &dyn Embedder,
    query: &str,
    mut output: W,
) -> io::Result<QueryOutcome> {
    debug!("Answering query: {}", query);

    let embedding = match embedder.embed(query) {
        Ok(embedding) => embedding,
        Err(e) => {
            error!("Failed to embed query: {}", e);
            return Ok(QueryOutcome::Unavailable);
        }
    };

    match store.nearest_neighbor(&embedding).await {
        Some(found) => {
            info!("Closest FAQ: {}", found.question);
            writeln!(output, "{}", found)?;
            Ok(QueryOutcome::Answered(found))
        }
        None => {
            writeln!(output, "{}", NOT_FOUND_MESSAGE)?;
            Ok(QueryOutcome::NotFound)
        }
    }
}
