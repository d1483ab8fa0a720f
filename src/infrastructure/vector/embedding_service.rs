//! Local embedding service implementation
//!
//! Deterministic, dependency-free embeddings for offline development and
//! tests. Texts are hashed into a fixed number of buckets (the hashing
//! trick): every lower-cased word and character trigram adds a signed
//! contribution to one dimension, and the result is L2-normalised. Texts
//! sharing vocabulary land close together, identical texts map to identical
//! vectors, and no model download is needed.
//!
//! For real semantic quality, point the `openai` provider at an
//! OpenAI-compatible server (e.g. Ollama with `all-minilm`).

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::EmbeddingModel;
use crate::domain::ports::Embedder;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Weight of a whole-word feature relative to a trigram feature
const WORD_WEIGHT: f32 = 2.0;

/// Local embedding service
///
/// Dimensions follow the configured model so that a collection built
/// locally has the same shape as one built against the real model.
#[derive(Debug, Clone, Copy)]
pub struct LocalEmbeddingService {
    model_type: EmbeddingModel,
}

impl LocalEmbeddingService {
    /// Create a new local embedding service
    pub fn new(model_type: EmbeddingModel) -> Self {
        tracing::debug!(
            model = model_type.model_name(),
            dimensions = model_type.dimensions(),
            "using local hashed embeddings"
        );
        Self { model_type }
    }

    /// Generate the embedding for one text
    pub fn generate_embedding(&self, text: &str) -> Vec<f32> {
        let dimensions = self.model_type.dimensions();
        let mut embedding = vec![0.0f32; dimensions];

        let lowered = text.to_lowercase();
        for word in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            add_feature(&mut embedding, word.as_bytes(), WORD_WEIGHT);

            let chars: Vec<char> = word.chars().collect();
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                add_feature(&mut embedding, trigram.as_bytes(), 1.0);
            }
        }

        // f64 accumulation avoids drift over many dimensions
        let magnitude = embedding
            .iter()
            .map(|x| f64::from(*x) * f64::from(*x))
            .sum::<f64>()
            .sqrt();

        if magnitude > 1e-10 {
            #[allow(clippy::cast_possible_truncation)]
            let magnitude = magnitude as f32;
            for val in &mut embedding {
                *val /= magnitude;
            }
        } else {
            // Text without words: uniform unit vector rather than a zero vector
            #[allow(clippy::cast_precision_loss)]
            let uniform = 1.0 / (dimensions as f32).sqrt();
            embedding.fill(uniform);
        }

        embedding
    }
}

impl Default for LocalEmbeddingService {
    fn default() -> Self {
        Self::new(EmbeddingModel::default())
    }
}

/// FNV-1a: stable across platforms and compiler releases
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

fn add_feature(embedding: &mut [f32], feature: &[u8], weight: f32) {
    let hash = fnv1a(feature);
    #[allow(clippy::cast_possible_truncation)]
    let bucket = (hash % embedding.len() as u64) as usize;
    let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
    embedding[bucket] += sign * weight;
}

#[async_trait]
impl Embedder for LocalEmbeddingService {
    fn name(&self) -> &'static str {
        "local"
    }

    fn dimensions(&self) -> usize {
        self.model_type.dimensions()
    }

    async fn embed(&self, texts: &[&str]) -> DomainResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.generate_embedding(t)).collect())
    }
}
