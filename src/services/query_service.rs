//! Query service
//!
//! Embeds a question and returns the nearest chunks from the store.

use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult, Stage};
use crate::domain::models::QueryResult;
use crate::domain::ports::{Embedder, VectorStore};

/// Number of results returned when the caller does not ask for a count
pub const DEFAULT_K: usize = 3;

/// Embed a question and rank stored chunks against it
pub struct QueryService {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    default_k: usize,
}

impl QueryService {
    /// Create a query service returning [`DEFAULT_K`] results by default
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            default_k: DEFAULT_K,
        }
    }

    /// Override the default result count
    #[must_use]
    pub const fn with_default_k(mut self, default_k: usize) -> Self {
        self.default_k = default_k;
        self
    }

    /// Result count used by [`QueryService::query_default`]
    pub const fn default_k(&self) -> usize {
        self.default_k
    }

    /// Top `k` chunks for `text`, most relevant first
    ///
    /// An empty store yields an empty vector.
    ///
    /// # Errors
    /// * `InvalidArgument` - `k == 0` or `text` is blank
    /// * `EmbeddingUnavailable` - the query could not be embedded
    pub async fn query(&self, text: &str, k: usize) -> DomainResult<Vec<QueryResult>> {
        if k == 0 {
            return Err(DomainError::invalid(Stage::Input, "k must be a positive integer"));
        }
        if text.trim().is_empty() {
            return Err(DomainError::invalid(Stage::Input, "query text must not be blank"));
        }

        let query_vector = self.embedder.embed_one(text).await?;
        let results = self.store.search(&query_vector, k).await?;

        tracing::debug!(k, results = results.len(), "query answered");
        Ok(results)
    }

    /// Query with the default result count
    pub async fn query_default(&self, text: &str) -> DomainResult<Vec<QueryResult>> {
        self.query(text, self.default_k).await
    }
}
