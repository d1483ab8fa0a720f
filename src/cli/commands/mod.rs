//! CLI command implementations.

pub mod ingest;
pub mod query;
pub mod stats;

use anyhow::{Context, Result};

use crate::domain::models::config::Config;
use crate::services::RagService;

/// Open the configured collection, attaching CLI-friendly context
pub(crate) async fn open_service(config: &Config) -> Result<RagService> {
    RagService::open(config).await.with_context(|| {
        format!(
            "Failed to open collection '{}' in {}",
            config.store.collection,
            config.store.data_dir.display()
        )
    })
}

/// Hint printed when a query runs against an empty collection
pub(crate) const EMPTY_STORE_HINT: &str =
    "The collection is empty. Run `codebridge ingest` first.";
