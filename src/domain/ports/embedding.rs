//! Embedding port for semantic vector generation.
//!
//! Any model that maps text to fixed-length vectors, in input order, can sit
//! behind this trait.

use async_trait::async_trait;

use crate::domain::errors::{DomainError, DomainResult};

/// Trait for embedding backends.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Backend name (e.g. "local", "openai").
    fn name(&self) -> &'static str;

    /// Dimension of every vector this backend produces.
    fn dimensions(&self) -> usize;

    /// Embed many texts, returning one vector per input in input order.
    ///
    /// Must accept an empty slice. Implementations split large inputs into
    /// backend-sized batches themselves.
    async fn embed(&self, texts: &[&str]) -> DomainResult<Vec<Vec<f32>>>;

    /// Embed a single text.
    async fn embed_one(&self, text: &str) -> DomainResult<Vec<f32>> {
        self.embed(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::EmbeddingUnavailable("backend returned no vector".to_string()))
    }
}

/// Check that a backend answered with one vector of `dimensions` per input.
///
/// A short or malformed batch must never be padded or silently truncated.
pub fn ensure_batch_shape(
    vectors: &[Vec<f32>],
    expected_count: usize,
    dimensions: usize,
) -> DomainResult<()> {
    if vectors.len() != expected_count {
        return Err(DomainError::EmbeddingUnavailable(format!(
            "expected {expected_count} vectors, backend returned {}",
            vectors.len()
        )));
    }

    if let Some((index, vector)) = vectors
        .iter()
        .enumerate()
        .find(|(_, v)| v.len() != dimensions)
    {
        return Err(DomainError::EmbeddingUnavailable(format!(
            "vector {index} has {} dimensions, expected {dimensions}",
            vector.len()
        )));
    }

    Ok(())
}
