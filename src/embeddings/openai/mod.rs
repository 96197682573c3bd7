
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::{OpenAiConfig, Secret};
use crate::embeddings::{Embedder, Embedding, EmbeddingError};

/// Blocking client for an OpenAI-compatible `/embeddings` endpoint.
///
/// One request per call: no retries, no caching.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    endpoint: Url,
    api_key: Secret,
    model: String,
    dimension: usize,
    agent: ureq::Agent,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiClient {
    #[inline]
    pub fn new(config: &OpenAiConfig) -> Self {
        Self {
            endpoint: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            dimension: config.embedding_dimension,
            agent: build_agent(),
        }
    }

    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[inline]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn post(&self, body: &str) -> Result<(u16, String), EmbeddingError> {
        let mut response = self
            .agent
            .post(self.endpoint.as_str())
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .send(body)?;

        let status = response.status().as_u16();
        let text = response.body_mut().read_to_string()?;
        Ok((status, text))
    }
}

impl Embedder for OpenAiClient {
    #[inline]
    fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        debug!("Generating embedding for text (length: {})", text.len());

        let request = EmbeddingRequest {
            input: text,
            model: &self.model,
        };
        let request_json = serde_json::to_string(&request).map_err(EmbeddingError::Encode)?;

        let (status, body) = self.post(&request_json)?;
        if !(200..300).contains(&status) {
            warn!("Embedding endpoint returned HTTP {}", status);
            return Err(EmbeddingError::Api { status, body });
        }

        let response: EmbeddingResponse =
            serde_json::from_str(&body).map_err(EmbeddingError::Decode)?;

        let first = response
            .data
            .into_iter()
            .next()
            .ok_or(EmbeddingError::EmptyResult)?;

        let embedding = Embedding::new(first.embedding);
        embedding.ensure_dimension(self.dimension)?;

        debug!(
            "Generated embedding with {} dimensions",
            embedding.dimension()
        );
        Ok(embedding)
    }
}

/// Status codes are inspected by hand so error bodies can be reported.
/// Timeouts are left at the transport defaults.
fn build_agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .into()
}
