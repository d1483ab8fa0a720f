//! Domain models for documents, chunks, embeddings and configuration.

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod ingestion;

pub use chunking::{Chunk, ChunkingConfig};
pub use config::{
    Config, EmbeddingConfig, EmbeddingProviderKind, IngestionConfig, LogFormat, LoggingConfig,
    OpenAiEmbeddingConfig, QueryConfig, RotationPolicy, StoreConfig,
};
pub use document::{Document, DOCUMENT_EXTENSION};
pub use embedding::{ChunkMetadata, CollectionStatus, EmbeddingModel, EmbeddingRecord, QueryResult};
pub use ingestion::IngestionReport;
