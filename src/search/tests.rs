use super::*;
use crate::database::{MemoryFaqStore, NewFaq};
use crate::embeddings::{Embedding, EmbeddingError};
use std::io::Cursor;

/// Maps a few known phrases onto fixed 2-d vectors.
struct PhraseEmbedder;

impl Embedder for PhraseEmbedder {
    fn dimension(&self) -> usize {
        2
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let values = match text {
            "shipping" | "送料はいくら？" => vec![1.0, 0.0],
            "returns" => vec![0.0, 1.0],
            "offline" => return Err(EmbeddingError::EmptyResult),
            _ => vec![0.9, 0.1],
        };
        Ok(Embedding::new(values))
    }
}

async fn populated_store() -> MemoryFaqStore {
    let store = MemoryFaqStore::new(2);
    for (question, answer, embedding) in [
        ("送料はいくらですか？", "全国一律500円です。", vec![1.0, 0.0]),
        ("返品できますか？", "30日以内なら可能です。", vec![0.0, 1.0]),
    ] {
        store
            .insert(&NewFaq {
                question: question.to_string(),
                answer: answer.to_string(),
                embedding: Embedding::new(embedding),
            })
            .await
            .expect("insert should succeed");
    }
    store
}

#[test]
fn read_query_prints_prompt_and_trims() {
    let mut output = Vec::new();
    let query = read_query(Cursor::new("  送料はいくら？  \nignored line\n"), &mut output)
        .expect("reading should succeed");

    assert_eq!(query, "送料はいくら？");
    assert_eq!(
        String::from_utf8(output).expect("output is utf-8"),
        format!("{}\n", PROMPT)
    );
}

#[test]
fn read_query_at_end_of_input_is_empty() {
    let query = read_query(Cursor::new(""), io::sink()).expect("reading should succeed");
    assert_eq!(query, "");
}

#[test]
fn read_query_replaces_invalid_utf8() {
    let mut input = "送料".as_bytes().to_vec();
    input.extend_from_slice(&[0xff, 0xfe]);
    input.extend_from_slice(b"?\n");

    let query = read_query(Cursor::new(input), io::sink()).expect("invalid bytes should not fail");

    assert_eq!(query, "送料\u{fffd}\u{fffd}?");
}

#[tokio::test]
async fn prints_closest_answer() {
    let store = populated_store().await;
    let mut output = Vec::new();

    let outcome = answer_query(&store, &PhraseEmbedder, "送料はいくら？", &mut output)
        .await
        .expect("writing should succeed");

    assert_eq!(
        outcome,
        QueryOutcome::Answered(FaqMatch {
            question: "送料はいくらですか？".to_string(),
            answer: "全国一律500円です。".to_string(),
        })
    );
    assert_eq!(
        String::from_utf8(output).expect("output is utf-8"),
        "Q: 送料はいくらですか？\nA: 全国一律500円です。\n"
    );
}

#[tokio::test]
async fn empty_table_prints_not_found() {
    let store = MemoryFaqStore::new(2);
    let mut output = Vec::new();

    let outcome = answer_query(&store, &PhraseEmbedder, "returns", &mut output)
        .await
        .expect("writing should succeed");

    assert_eq!(outcome, QueryOutcome::NotFound);
    assert_eq!(
        String::from_utf8(output).expect("output is utf-8"),
        format!("{}\n", NOT_FOUND_MESSAGE)
    );
}

#[tokio::test]
async fn embedding_failure_prints_nothing() {
    let store = populated_store().await;
    let mut output = Vec::new();

    let outcome = answer_query(&store, &PhraseEmbedder, "offline", &mut output)
        .await
        .expect("writing should succeed");

    assert_eq!(outcome, QueryOutcome::Unavailable);
    assert!(output.is_empty());
}
