//! RAG (Retrieval-Augmented Generation) service
//!
//! High-level orchestration for document indexing and semantic search.
//! Owns one embedder and one open collection; callers construct it
//! explicitly and drop or [`RagService::close`] it when done.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::embeddings::OpenAiEmbeddingProvider;
use crate::domain::errors::DomainResult;
use crate::domain::models::config::{Config, EmbeddingConfig, EmbeddingProviderKind};
use crate::domain::models::{CollectionStatus, Document, IngestionReport, QueryResult};
use crate::domain::ports::{Embedder, VectorStore};
use crate::infrastructure::vector::{Chunker, LocalEmbeddingService, SqliteVectorStore};

use super::ingestion_service::IngestionService;
use super::query_service::QueryService;

/// Build the embedding backend selected in configuration
pub fn build_embedder(config: &EmbeddingConfig) -> DomainResult<Arc<dyn Embedder>> {
    let embedder: Arc<dyn Embedder> = match config.provider {
        EmbeddingProviderKind::Local => Arc::new(LocalEmbeddingService::new(config.local_model)),
        EmbeddingProviderKind::OpenAi => {
            Arc::new(OpenAiEmbeddingProvider::new(config.openai.clone())?)
        }
    };
    Ok(embedder)
}

/// RAG service for document indexing and semantic search
///
/// This service provides high-level operations for:
/// - Ingesting documents or a directory of `.txt` files
/// - Retrieving the chunks most relevant to a question
/// - Inspecting and maintaining the open collection
pub struct RagService {
    store: Arc<SqliteVectorStore>,
    embedder: Arc<dyn Embedder>,
    status: CollectionStatus,
    ingestion: IngestionService,
    query: QueryService,
    docs_dir: PathBuf,
}

impl RagService {
    /// Open the configured collection with the configured embedder
    ///
    /// # Errors
    /// * `InvalidArgument` - invalid chunking settings or collection name
    /// * `EmbeddingUnavailable` - the embedding backend cannot be built
    /// * `StoreUnavailable` - the collection cannot be opened
    pub async fn open(config: &Config) -> DomainResult<Self> {
        let embedder = build_embedder(&config.embedding)?;
        let (store, status) = SqliteVectorStore::open_or_create(
            &config.store.data_dir,
            &config.store.collection,
            config.store.max_connections,
        )
        .await?;

        Self::with_components(config, embedder, store, status).await
    }

    /// Assemble a service from an already opened store and an embedder
    pub async fn with_components(
        config: &Config,
        embedder: Arc<dyn Embedder>,
        store: SqliteVectorStore,
        status: CollectionStatus,
    ) -> DomainResult<Self> {
        let chunker = Chunker::with_config(config.chunking.clone())?;

        if let Some(stored) = store.dimension().await? {
            if stored != embedder.dimensions() {
                tracing::warn!(
                    collection = store.collection(),
                    stored,
                    embedder = embedder.dimensions(),
                    "embedder dimension differs from collection; writes and queries will be rejected"
                );
            }
        }

        let store = Arc::new(store);
        let dyn_store: Arc<dyn VectorStore> = store.clone();

        Ok(Self {
            ingestion: IngestionService::new(chunker, embedder.clone(), dyn_store.clone()),
            query: QueryService::new(embedder.clone(), dyn_store)
                .with_default_k(config.query.default_k),
            store,
            embedder,
            status,
            docs_dir: config.ingestion.docs_dir.clone(),
        })
    }

    /// Whether the collection existed before this service opened it
    pub const fn status(&self) -> CollectionStatus {
        self.status
    }

    /// Name of the open collection
    pub fn collection(&self) -> &str {
        self.store.collection()
    }

    /// Directory holding the collection, `None` for in-memory stores
    pub fn location(&self) -> Option<&Path> {
        self.store.location()
    }

    /// Name of the embedding backend
    pub fn embedder_name(&self) -> &'static str {
        self.embedder.name()
    }

    /// Configured document directory
    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }

    /// Ingest already loaded documents
    pub async fn ingest(&self, documents: &[Document]) -> DomainResult<IngestionReport> {
        self.ingestion.ingest(documents).await
    }

    /// Ingest every `.txt` file in `dir`
    pub async fn ingest_directory(&self, dir: &Path) -> DomainResult<IngestionReport> {
        self.ingestion.ingest_directory(dir).await
    }

    /// Ingest the configured document directory
    pub async fn ingest_configured_docs(&self) -> DomainResult<IngestionReport> {
        self.ingestion.ingest_directory(&self.docs_dir).await
    }

    /// Top `k` chunks for `text`; `None` uses the configured default
    pub async fn query(&self, text: &str, k: Option<usize>) -> DomainResult<Vec<QueryResult>> {
        let k = k.unwrap_or_else(|| self.query.default_k());
        self.query.query(text, k).await
    }

    /// Number of stored chunks
    pub async fn count(&self) -> DomainResult<usize> {
        self.store.count().await
    }

    /// Vector dimension of the collection, `None` while empty
    pub async fn dimension(&self) -> DomainResult<Option<usize>> {
        self.store.dimension().await
    }

    /// Drop every chunk of one source document
    pub async fn delete_source(&self, source: &str) -> DomainResult<usize> {
        self.store.delete_by_source(source).await
    }

    /// Close the collection
    pub async fn close(&self) {
        self.store.close().await;
    }
}
