//! `codebridge stats`

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::output::TableFormatter;
use crate::domain::models::config::Config;
use crate::domain::models::CollectionStatus;

use super::open_service;

#[derive(Debug, Serialize)]
struct CollectionStats {
    collection: String,
    status: CollectionStatus,
    location: PathBuf,
    chunks: usize,
    dimension: Option<usize>,
    embedder: &'static str,
}

/// Handle the stats command
pub async fn execute(config: &Config, json: bool) -> Result<()> {
    let service = open_service(config).await?;

    let stats = CollectionStats {
        collection: service.collection().to_string(),
        status: service.status(),
        location: service
            .location()
            .map_or_else(|| config.store.data_dir.join(&config.store.collection), Path::to_path_buf),
        chunks: service.count().await.context("Failed to count stored chunks")?,
        dimension: service.dimension().await.context("Failed to read collection dimension")?,
        embedder: service.embedder_name(),
    };
    service.close().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let rows = [
        ("Collection", stats.collection.clone()),
        ("Status", stats.status.to_string()),
        ("Location", stats.location.display().to_string()),
        ("Chunks", stats.chunks.to_string()),
        (
            "Dimension",
            stats.dimension.map_or_else(|| "-".to_string(), |d| d.to_string()),
        ),
        ("Embedder", stats.embedder.to_string()),
    ];
    println!("{}", TableFormatter::new().format_properties(&rows));

    Ok(())
}
