use std::path::Path;
use std::sync::Arc;

use codebridge::{Chunker, ChunkingConfig, Config, Document, Embedder, IngestionService, SqliteVectorStore};

/// Three paragraphs; with target 6 and overlap every paragraph closes a chunk
pub const DOC_A: &str = "Para1\n\nPara2\n\nPara3";

/// Five characters, a single chunk
pub const DOC_B: &str = "Short";

pub fn scenario_documents() -> Vec<Document> {
    vec![Document::new("A", DOC_A), Document::new("B", DOC_B)]
}

/// Chunker used by the scenario: target 6, overlap on
pub fn scenario_chunker() -> Chunker {
    Chunker::with_config(ChunkingConfig {
        target_size: 6,
        overlap: 1,
    })
    .expect("valid chunking config")
}

pub async fn memory_store() -> Arc<SqliteVectorStore> {
    Arc::new(
        SqliteVectorStore::in_memory("test_docs")
            .await
            .expect("failed to create in-memory store"),
    )
}

pub fn ingestion_service(embedder: Arc<dyn Embedder>, store: Arc<SqliteVectorStore>) -> IngestionService {
    IngestionService::new(scenario_chunker(), embedder, store)
}

/// Write `(file name, content)` pairs into `dir`
pub fn write_docs(dir: &Path, docs: &[(&str, &str)]) {
    std::fs::create_dir_all(dir).expect("failed to create docs dir");
    for (name, content) in docs {
        std::fs::write(dir.join(name), content).expect("failed to write doc");
    }
}

/// Default configuration rooted in a temporary directory
pub fn config_in(root: &Path) -> Config {
    let mut config = Config::default();
    config.store.data_dir = root.join("vectordb");
    config.ingestion.docs_dir = root.join("docs");
    config
}
