//! Domain layer for the codebridge retrieval core
//!
//! This module contains the data model, the error taxonomy, and the port
//! traits that embedding backends and vector stores implement.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{DomainError, DomainResult, Stage};
