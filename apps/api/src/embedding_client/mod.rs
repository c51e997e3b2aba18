//! Embedding client: HTTP sentence-embedding collaborator.
//!
//! Speaks the OpenAI-compatible `POST /v1/embeddings` protocol, which is served
//! by text-embeddings-inference, vLLM, Ollama and friends, so the sentence model
//! (all-MiniLM-L6-v2 by default) runs out of process.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::scoring::semantic::{BoxError, Embedder};

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Embedding service returned no vectors")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl EmbeddingClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: format!("{}/v1/embeddings", base_url.trim_end_matches('/')),
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut request = self.client.post(&self.endpoint).json(&EmbeddingRequest {
            model: &self.model,
            input: [text],
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingResponse = response.json().await?;
        let vector = first_embedding(body)?;
        debug!(dims = vector.len(), chars = text.len(), "Embedding computed");
        Ok(vector)
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, BoxError> {
        Ok(self.embed_text(text).await?)
    }
}

fn first_embedding(body: EmbeddingResponse) -> Result<Vec<f32>, EmbeddingError> {
    body.data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .ok_or(EmbeddingError::EmptyResponse)
}
