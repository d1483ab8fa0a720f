//! Ingestion outcome reporting.

use serde::{Deserialize, Serialize};

/// Summary of one ingestion call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionReport {
    /// Number of documents read and chunked
    pub documents_processed: usize,

    /// Number of records written (new or overwritten) to the store
    pub chunks_added: usize,

    /// Ids of documents that produced no chunks (blank content)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents_without_chunks: Vec<String>,
}

impl IngestionReport {
    /// Returns true if nothing was written
    pub const fn is_empty(&self) -> bool {
        self.chunks_added == 0
    }
}
