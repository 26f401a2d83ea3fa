//! # Embedding Provider
//!
//! Client for an external, OpenAI-compatible `/embeddings` endpoint
//! (LM Studio, llama.cpp's server, or OpenAI itself). To the rest of the
//! crate the provider is opaque: query text goes in, a fixed-length `f32`
//! vector comes out, and every failure is classified as timeout,
//! unreachable, refused or malformed so the HTTP layer can map it to the
//! right status code.

use crate::errors::SearchError;
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Request payload for an OpenAI-compatible embeddings API.
///
/// `input` is always a single-element array: queries are embedded one at a
/// time, and the array form is the most widely supported.
#[derive(Serialize, Debug)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Deserialize, Debug)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize, Debug)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Anything that can turn query text into an embedding vector.
///
/// The pipeline and the server depend on this trait, which keeps tests free
/// to substitute a deterministic embedder.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SearchError>;
}

/// `TextEmbedder` backed by an OpenAI-compatible HTTP endpoint.
#[derive(Clone, Debug)]
pub struct HttpEmbedder {
    client: ReqwestClient,
    api_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpEmbedder {
    /// Creates a new embedder for the given endpoint.
    ///
    /// The timeout covers the whole request: connect, send and read. A
    /// provider that streams its answer too slowly is treated the same as
    /// one that never answers.
    pub fn new(
        api_url: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(SearchError::HttpClientBuild)?;
        Ok(Self {
            client,
            api_url,
            model,
            api_key,
            timeout,
        })
    }
}

#[async_trait]
impl TextEmbedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SearchError> {
        debug!(model = %self.model, api_url = %self.api_url, "requesting embedding");

        let payload = EmbeddingRequest {
            model: &self.model,
            input: [text],
        };

        let mut request = self.client.post(&self.api_url).json(&payload);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::EmbeddingTimeout(self.timeout)
            } else {
                SearchError::EmbeddingUnavailable(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchError::EmbeddingFailed(format!(
                "{status}: {error_body}"
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| SearchError::EmbeddingMalformed(e.to_string()))?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| {
                SearchError::EmbeddingMalformed("response contained no embedding data".into())
            })?;

        if vector.is_empty() {
            return Err(SearchError::EmbeddingMalformed(
                "provider returned an empty vector".into(),
            ));
        }

        debug!(dimensions = vector.len(), "embedding received");
        Ok(vector)
    }
}
