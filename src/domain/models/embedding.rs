//! Embedding domain models
//!
//! Records owned by the vector store and the results it returns for
//! similarity queries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Local embedding models supported by the deterministic embedder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmbeddingModel {
    /// all-MiniLM-L6-v2 (384 dimensions)
    #[default]
    #[serde(rename = "minilm")]
    LocalMiniLM,

    /// all-mpnet-base-v2 (768 dimensions)
    #[serde(rename = "mpnet")]
    LocalMPNet,
}

impl EmbeddingModel {
    /// Returns the vector dimensions for this model
    pub const fn dimensions(&self) -> usize {
        match self {
            Self::LocalMiniLM => 384,
            Self::LocalMPNet => 768,
        }
    }

    /// Returns the HuggingFace model name
    pub const fn model_name(&self) -> &'static str {
        match self {
            Self::LocalMiniLM => "sentence-transformers/all-MiniLM-L6-v2",
            Self::LocalMPNet => "sentence-transformers/all-mpnet-base-v2",
        }
    }
}

impl fmt::Display for EmbeddingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalMiniLM => write!(f, "all-MiniLM-L6-v2 (local)"),
            Self::LocalMPNet => write!(f, "all-mpnet-base-v2 (local)"),
        }
    }
}

/// Metadata stored with every embedding record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Source document label (file name or URL-derived id)
    pub source: String,

    /// Position of the chunk within its source document
    pub sequence_index: usize,
}

/// A chunk together with its embedding, as persisted by the vector store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Unique record identifier
    pub id: String,

    /// Embedding vector; every record in a collection has the same length
    pub vector: Vec<f32>,

    /// Chunk text
    pub text: String,

    /// Source and position of the chunk
    pub metadata: ChunkMetadata,
}

impl EmbeddingRecord {
    /// Embedding dimensions of this record
    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }
}

/// A ranked chunk returned by a similarity query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Record identifier
    pub id: String,

    /// Chunk text
    pub text: String,

    /// Source and position of the chunk
    pub metadata: ChunkMetadata,

    /// Dissimilarity to the query (lower is better, 0 = identical).
    /// `None` when the store cannot supply a distance.
    pub distance: Option<f32>,
}

impl QueryResult {
    /// Normalized similarity score: `1 / (1 + distance)`
    pub fn score(&self) -> Option<f32> {
        self.distance.map(|d| 1.0 / (1.0 + d))
    }

    /// Short single-line preview of the chunk text
    pub fn preview(&self, max_chars: usize) -> String {
        let flat = self.text.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() <= max_chars {
            flat
        } else {
            let cut: String = flat.chars().take(max_chars).collect();
            format!("{cut}...")
        }
    }
}

/// Whether opening a collection found existing state or started fresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionStatus {
    /// A new, empty collection was created
    Created,
    /// An existing collection was loaded from disk
    Loaded,
}

impl CollectionStatus {
    /// Returns true if the collection did not exist before opening
    pub const fn is_new(&self) -> bool {
        matches!(self, Self::Created)
    }
}

impl fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Loaded => f.write_str("loaded"),
        }
    }
}
