//! OpenAI-compatible embedding provider adapter.
//!
//! Talks to any `/embeddings` endpoint that follows the OpenAI wire format:
//! OpenAI itself, Azure OpenAI, or a local Ollama server.

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::EmbeddingRequestError;
use super::retry::RetryPolicy;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::config::OpenAiEmbeddingConfig;
use crate::domain::ports::{ensure_batch_shape, Embedder};

/// OpenAI-compatible embedding provider
///
/// Inputs are split into `max_batch_size` requests, up to
/// `max_concurrency` of which run at once. Results are reassembled in input
/// order.
pub struct OpenAiEmbeddingProvider {
    config: OpenAiEmbeddingConfig,
    api_key: Option<String>,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl OpenAiEmbeddingProvider {
    /// Create a provider from configuration
    ///
    /// The API key falls back to `OPENAI_API_KEY`. Local servers need none,
    /// so a missing key is not an error.
    pub fn new(config: OpenAiEmbeddingConfig) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                DomainError::EmbeddingUnavailable(format!("failed to build HTTP client: {e}"))
            })?;

        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.is_empty());

        let retry = RetryPolicy::new(
            config.max_retries,
            config.initial_backoff_ms,
            config.max_backoff_ms,
        );

        tracing::debug!(
            base_url = %config.base_url,
            model = %config.model,
            dimension = config.dimension,
            authenticated = api_key.is_some(),
            "openai embedding provider configured"
        );

        Ok(Self {
            config,
            api_key,
            client,
            retry,
        })
    }

    async fn call_embeddings_api(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, EmbeddingRequestError> {
        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));

        let request_body = EmbeddingsRequest {
            model: &self.config.model,
            input: texts,
        };

        let mut request = self.client.post(&url).json(&request_body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(EmbeddingRequestError::from_status(status.as_u16(), body));
        }

        let result: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingRequestError::InvalidResponse(e.to_string()))?;

        // Servers may answer out of order; `index` refers to the request input
        let mut data = result.data;
        data.sort_by_key(|d| d.index);

        if data.len() != texts.len() || data.iter().enumerate().any(|(i, d)| d.index != i) {
            return Err(EmbeddingRequestError::InvalidResponse(format!(
                "expected indices 0..{}, got {} entries",
                texts.len(),
                data.len()
            )));
        }

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl Embedder for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn dimensions(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, texts: &[&str]) -> DomainResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let batch_size = self.config.max_batch_size.max(1);
        let concurrency = self.config.max_concurrency.max(1);

        tracing::debug!(
            texts = texts.len(),
            requests = texts.len().div_ceil(batch_size),
            concurrency,
            "requesting embeddings"
        );

        // Each request owns its batch
        let requests: Vec<Vec<String>> = texts
            .chunks(batch_size)
            .map(|batch| batch.iter().map(|text| (*text).to_string()).collect())
            .collect();

        let batches: Vec<Vec<Vec<f32>>> = stream::iter(requests)
            .map(|batch| async move {
                self.retry
                    .execute(|| self.call_embeddings_api(&batch))
                    .await
            })
            .buffered(concurrency)
            .try_collect()
            .await
            .map_err(|e| DomainError::EmbeddingUnavailable(e.to_string()))?;

        let vectors: Vec<Vec<f32>> = batches.into_iter().flatten().collect();
        ensure_batch_shape(&vectors, texts.len(), self.config.dimension)?;

        Ok(vectors)
    }
}

// -- OpenAI API request/response types --

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
