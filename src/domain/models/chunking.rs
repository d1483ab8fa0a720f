//! Text chunking domain models
//!
//! Models for splitting documents into paragraph-aligned chunks for embedding.

use serde::{Deserialize, Serialize};

use super::embedding::{ChunkMetadata, EmbeddingRecord};
use crate::domain::errors::{DomainError, DomainResult, Stage};

/// Configuration for document chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters. Paragraphs are never split, so a
    /// single paragraph longer than this becomes its own oversized chunk.
    pub target_size: usize,

    /// Overlap between consecutive chunks. Any positive value carries the
    /// last paragraph of a closed chunk into the next one; zero disables it.
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    /// 500 characters per chunk with paragraph overlap enabled
    fn default() -> Self {
        Self {
            target_size: 500,
            overlap: 50,
        }
    }
}

impl ChunkingConfig {
    /// Validate the chunking configuration
    pub fn validate(&self) -> DomainResult<()> {
        if self.target_size == 0 {
            return Err(DomainError::invalid(
                Stage::Chunk,
                "target_size must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// A paragraph-aligned piece of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable identifier: `{document_id}_{sequence_index}`
    pub id: String,

    /// ID of the document this chunk was cut from
    pub source_document_id: String,

    /// Source label recorded in metadata (usually the file name)
    pub source: String,

    /// The text content of this chunk
    pub text: String,

    /// Position of this chunk within its document (0-based)
    pub sequence_index: usize,
}

impl Chunk {
    /// Create a new chunk, deriving its id from the document id and index
    pub fn new(
        source_document_id: impl Into<String>,
        source: impl Into<String>,
        text: String,
        sequence_index: usize,
    ) -> Self {
        let source_document_id = source_document_id.into();
        let id = Self::make_id(&source_document_id, sequence_index);

        Self {
            id,
            source_document_id,
            source: source.into(),
            text,
            sequence_index,
        }
    }

    /// Deterministic chunk id for a document and position
    pub fn make_id(document_id: &str, sequence_index: usize) -> String {
        format!("{document_id}_{sequence_index}")
    }

    /// Metadata persisted alongside the chunk's embedding
    pub fn metadata(&self) -> ChunkMetadata {
        ChunkMetadata {
            source: self.source.clone(),
            sequence_index: self.sequence_index,
        }
    }

    /// Pair this chunk with its embedding, consuming the chunk
    pub fn into_record(self, vector: Vec<f32>) -> EmbeddingRecord {
        let metadata = self.metadata();
        EmbeddingRecord {
            id: self.id,
            vector,
            text: self.text,
            metadata,
        }
    }
}
