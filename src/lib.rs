//! Codebridge - documentation retrieval core
//!
//! Turns scraped technical documentation into paragraph-aligned chunks,
//! embeds them, stores them in a persistent per-collection vector index, and
//! answers similarity queries with ranked, source-annotated passages that a
//! locally hosted language model can be grounded on.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and the `Embedder` / `VectorStore` ports
//! - **Service Layer** (`services`): Ingestion, querying and the owning `RagService`
//! - **Infrastructure Layer** (`infrastructure`): `SQLite`, chunking, local embeddings, config, logging
//! - **Adapters** (`adapters`): OpenAI-compatible HTTP embeddings
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use codebridge::{Config, Document, RagService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = RagService::open(&Config::default()).await?;
//!     service
//!         .ingest(&[Document::from_file_name("react_hooks.txt", "useState ...")])
//!         .await?;
//!
//!     for result in service.query("How does useState work?", Some(3)).await? {
//!         println!("{} ({:?})", result.id, result.distance);
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult, Stage};
pub use domain::models::{
    Chunk, ChunkMetadata, ChunkingConfig, CollectionStatus, Config, Document, EmbeddingModel,
    EmbeddingRecord, IngestionReport, QueryResult,
};
pub use domain::ports::{Embedder, VectorStore};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::vector::{chunk_text, Chunker, LocalEmbeddingService, SqliteVectorStore};
pub use services::{IngestionService, QueryService, RagService};
