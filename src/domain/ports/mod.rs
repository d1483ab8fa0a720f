//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - Embedder: text to fixed-dimension vectors
//! - VectorStore: persistent similarity index over embedding records

pub mod embedding;
pub mod vector_store;

pub use embedding::{ensure_batch_shape, Embedder};
pub use vector_store::VectorStore;
