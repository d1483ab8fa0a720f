//! Application services
//!
//! Orchestrate the domain ports: ingestion (chunk, embed, store), querying,
//! and the `RagService` that owns one embedder and one open collection.

pub mod ingestion_service;
pub mod query_service;
pub mod rag_service;

pub use ingestion_service::IngestionService;
pub use query_service::QueryService;
pub use rag_service::{build_embedder, RagService};
