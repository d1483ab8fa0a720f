//! Vector infrastructure components
//!
//! Provides implementations for embedding generation, text chunking,
//! and vector storage for semantic search (RAG).

pub mod chunker;
pub mod embedding_service;
pub mod vector_store;

pub use chunker::{chunk_text, Chunker, ParagraphChunks};
pub use embedding_service::LocalEmbeddingService;
pub use vector_store::{SqliteVectorStore, INDEX_FILE_NAME};
