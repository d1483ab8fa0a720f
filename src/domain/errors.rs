//! Domain errors for the retrieval core.
//!
//! Failures carry the pipeline stage they came from so callers can decide
//! whether to retry, abort, or ask the user to run ingestion first.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Pipeline stage a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Call parameters supplied by the caller
    Input,
    /// Reading documents from the document source
    Read,
    /// Splitting documents into chunks
    Chunk,
    /// Generating embeddings
    Embed,
    /// Reading from or writing to the vector store
    Store,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Input => "input",
            Self::Read => "read",
            Self::Chunk => "chunk",
            Self::Embed => "embed",
            Self::Store => "store",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by the chunking, embedding and retrieval pipeline.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The embedding backend failed or returned a malformed batch
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// A caller-supplied value was rejected
    #[error("Invalid argument ({stage}): {message}")]
    InvalidArgument {
        /// Stage that rejected the value
        stage: Stage,
        /// What was wrong
        message: String,
    },

    /// The collection could not be opened
    #[error("Vector store unavailable: {0}")]
    StoreUnavailable(String),

    /// A read or write against an open collection failed
    #[error("Vector store operation failed: {0}")]
    StoreFailure(String),

    /// A source document could not be read as UTF-8 text
    #[error("Document unreadable: {}: {reason}", .path.display())]
    DocumentUnreadable {
        /// File that failed
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },
}

/// Result alias used throughout the core.
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Shorthand for an [`DomainError::InvalidArgument`] at the given stage.
    pub fn invalid(stage: Stage, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            stage,
            message: message.into(),
        }
    }

    /// The pipeline stage that failed.
    pub const fn stage(&self) -> Stage {
        match self {
            Self::EmbeddingUnavailable(_) => Stage::Embed,
            Self::InvalidArgument { stage, .. } => *stage,
            Self::StoreUnavailable(_) | Self::StoreFailure(_) => Stage::Store,
            Self::DocumentUnreadable { .. } => Stage::Read,
        }
    }

    /// Whether retrying the same call later may succeed.
    ///
    /// The core never retries on its own; this is advice for callers.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::EmbeddingUnavailable(_) | Self::StoreFailure(_))
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        Self::StoreFailure(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for DomainError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::StoreUnavailable(format!("migration failed: {err}"))
    }
}
