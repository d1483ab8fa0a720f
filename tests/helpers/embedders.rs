use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use codebridge::{DomainError, DomainResult, Embedder, EmbeddingModel, LocalEmbeddingService};

/// Embedder whose backend is always down
pub struct UnavailableEmbedder;

#[async_trait]
impl Embedder for UnavailableEmbedder {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn dimensions(&self) -> usize {
        EmbeddingModel::LocalMiniLM.dimensions()
    }

    async fn embed(&self, _texts: &[&str]) -> DomainResult<Vec<Vec<f32>>> {
        Err(DomainError::EmbeddingUnavailable(
            "model server not reachable".to_string(),
        ))
    }
}

/// Local embedder that records how often and with how many texts it was called
pub struct CountingEmbedder {
    inner: LocalEmbeddingService,
    calls: AtomicUsize,
    texts: AtomicUsize,
}

impl CountingEmbedder {
    pub fn new(model: EmbeddingModel) -> Self {
        Self {
            inner: LocalEmbeddingService::new(model),
            calls: AtomicUsize::new(0),
            texts: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn texts(&self) -> usize {
        self.texts.load(Ordering::SeqCst)
    }
}

impl Default for CountingEmbedder {
    fn default() -> Self {
        Self::new(EmbeddingModel::LocalMiniLM)
    }
}

#[async_trait]
impl Embedder for CountingEmbedder {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    async fn embed(&self, texts: &[&str]) -> DomainResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.fetch_add(texts.len(), Ordering::SeqCst);
        self.inner.embed(texts).await
    }
}

/// Embedder that maps every text to the same vector
pub struct ConstantEmbedder {
    vector: Vec<f32>,
}

impl ConstantEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self { vector }
    }
}

#[async_trait]
impl Embedder for ConstantEmbedder {
    fn name(&self) -> &'static str {
        "constant"
    }

    fn dimensions(&self) -> usize {
        self.vector.len()
    }

    async fn embed(&self, texts: &[&str]) -> DomainResult<Vec<Vec<f32>>> {
        Ok(vec![self.vector.clone(); texts.len()])
    }
}
