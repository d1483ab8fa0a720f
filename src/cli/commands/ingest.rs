//! `codebridge ingest`

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::cli::output::progress::{create_spinner_with_message, hidden_spinner, ProgressBarExt};
use crate::cli::output::TableFormatter;
use crate::domain::models::config::Config;

use super::open_service;

/// Handle the ingest command
pub async fn execute(config: &Config, docs_dir: Option<PathBuf>, json: bool) -> Result<()> {
    let service = open_service(config).await?;
    let dir = docs_dir.unwrap_or_else(|| service.docs_dir().to_path_buf());

    let spinner = if json {
        hidden_spinner()
    } else {
        create_spinner_with_message(format!("Indexing {}", dir.display()))
    };

    let report = match service.ingest_directory(&dir).await {
        Ok(report) => report,
        Err(err) => {
            spinner.finish_error("Ingestion failed");
            service.close().await;
            return Err(err).with_context(|| format!("Failed to ingest {}", dir.display()));
        }
    };

    let total = service.count().await.context("Failed to count stored chunks")?;
    service.close().await;

    if report.documents_processed == 0 {
        spinner.finish_warning(format!("No documentation files found in {}", dir.display()));
    } else {
        spinner.finish_success(format!(
            "Indexed {} chunks from {} documents",
            report.chunks_added, report.documents_processed
        ));
    }

    if json {
        let body = serde_json::json!({
            "collection": config.store.collection,
            "docs_dir": dir,
            "report": report,
            "total_chunks": total,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("{}", TableFormatter::new().format_report(&report));
        println!("Collection '{}' now holds {total} chunks", config.store.collection);
    }

    Ok(())
}
