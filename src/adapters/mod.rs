//! Adapters for external systems.

pub mod embeddings;
