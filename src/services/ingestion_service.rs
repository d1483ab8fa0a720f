//! Ingestion pipeline
//!
//! Documents are chunked, embedded in a single batch and written with a
//! single store call, so a failed embedding leaves the store untouched.

use std::path::Path;
use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Document, IngestionReport};
use crate::domain::ports::{ensure_batch_shape, Embedder, VectorStore};
use crate::infrastructure::documents::TextDirectorySource;
use crate::infrastructure::vector::Chunker;

/// Chunk, embed and store documents
pub struct IngestionService {
    chunker: Chunker,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl IngestionService {
    /// Create a new ingestion service
    pub fn new(chunker: Chunker, embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            chunker,
            embedder,
            store,
        }
    }

    /// Ingest documents
    ///
    /// Chunk ids are `{document_id}_{index}`, so ingesting the same documents
    /// again overwrites the same records and leaves the count unchanged.
    /// Each document replaces its previous chunks: records left over from an
    /// earlier, longer chunking are removed in the same write.
    ///
    /// # Returns
    /// * `Ok(IngestionReport)` - Counts, plus the ids of blank documents
    /// * `Err(EmbeddingUnavailable)` - Nothing was written
    /// * `Err(InvalidArgument | StoreFailure)` - The store rejected the batch
    pub async fn ingest(&self, documents: &[Document]) -> DomainResult<IngestionReport> {
        let mut report = IngestionReport {
            documents_processed: documents.len(),
            ..IngestionReport::default()
        };

        let mut chunks = Vec::new();
        for document in documents {
            let document_chunks = self.chunker.chunk_document(document);
            tracing::debug!(
                document = %document.id,
                chunks = document_chunks.len(),
                "document chunked"
            );

            if document_chunks.is_empty() {
                report.documents_without_chunks.push(document.id.clone());
            }
            chunks.extend(document_chunks);
        }

        let sources: Vec<String> = documents.iter().map(|d| d.source.clone()).collect();

        if chunks.is_empty() {
            if !sources.is_empty() {
                self.store.replace_sources(&sources, Vec::new()).await?;
            }
            tracing::info!(documents = documents.len(), "no chunks to ingest");
            return Ok(report);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let vectors = self.embedder.embed(&texts).await?;
        ensure_batch_shape(&vectors, chunks.len(), self.embedder.dimensions())?;

        tracing::debug!(
            embedder = self.embedder.name(),
            batch = vectors.len(),
            "chunks embedded"
        );

        let records = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| chunk.into_record(vector))
            .collect();

        report.chunks_added = self.store.replace_sources(&sources, records).await?;

        tracing::info!(
            documents = report.documents_processed,
            chunks = report.chunks_added,
            blank = report.documents_without_chunks.len(),
            "ingestion complete"
        );

        Ok(report)
    }

    /// Ingest every `.txt` file in `dir`, in file-name order
    ///
    /// A missing or empty directory is not an error: it yields an empty
    /// report.
    pub async fn ingest_directory(&self, dir: &Path) -> DomainResult<IngestionReport> {
        let documents = TextDirectorySource::new(dir).read_all().await?;

        if documents.is_empty() {
            tracing::warn!(dir = %dir.display(), "no documentation files found");
            return Ok(IngestionReport::default());
        }

        self.ingest(&documents).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use crate::domain::models::ChunkingConfig;
    use crate::infrastructure::vector::{LocalEmbeddingService, SqliteVectorStore};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEmbedder {
        inner: LocalEmbeddingService,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn dimensions(&self) -> usize {
            self.inner.dimensions()
        }

        async fn embed(&self, texts: &[&str]) -> DomainResult<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.embed(texts).await
        }
    }

    struct ShortEmbedder;

    #[async_trait]
    impl Embedder for ShortEmbedder {
        fn name(&self) -> &'static str {
            "short"
        }

        fn dimensions(&self) -> usize {
            4
        }

        async fn embed(&self, _texts: &[&str]) -> DomainResult<Vec<Vec<f32>>> {
            Ok(vec![vec![1.0, 0.0, 0.0, 0.0]])
        }
    }

    async fn service_with(
        embedder: Arc<dyn Embedder>,
    ) -> (IngestionService, Arc<SqliteVectorStore>) {
        let store = Arc::new(SqliteVectorStore::in_memory("test").await.unwrap());
        let chunker = Chunker::with_config(ChunkingConfig {
            target_size: 6,
            overlap: 1,
        })
        .unwrap();
        (IngestionService::new(chunker, embedder, store.clone()), store)
    }

    #[tokio::test]
    async fn test_single_embed_call_for_all_documents() {
        let embedder = Arc::new(CountingEmbedder {
            inner: LocalEmbeddingService::default(),
            calls: AtomicUsize::new(0),
        });
        let (service, store) = service_with(embedder.clone()).await;

        let report = service
            .ingest(&[
                Document::new("A", "Para1\n\nPara2\n\nPara3"),
                Document::new("B", "Short"),
            ])
            .await
            .unwrap();

        assert_eq!(report.documents_processed, 2);
        assert_eq!(report.chunks_added, 4);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_zero_chunks_skip_embedder() {
        let embedder = Arc::new(CountingEmbedder {
            inner: LocalEmbeddingService::default(),
            calls: AtomicUsize::new(0),
        });
        let (service, _store) = service_with(embedder.clone()).await;

        let report = service.ingest(&[]).await.unwrap();
        assert_eq!(report, IngestionReport::default());

        let report = service.ingest(&[Document::new("blank", "\n\n  \n")]).await.unwrap();
        assert_eq!(report.chunks_added, 0);
        assert_eq!(report.documents_without_chunks, vec!["blank".to_string()]);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_short_embedding_batch_writes_nothing() {
        let (service, store) = service_with(Arc::new(ShortEmbedder)).await;

        let err = service
            .ingest(&[Document::new("A", "Para1\n\nPara2")])
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::EmbeddingUnavailable(_)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_blank_reingest_clears_document() {
        let (service, store) = service_with(Arc::new(LocalEmbeddingService::default())).await;

        service.ingest(&[Document::new("A", "Para1\n\nPara2")]).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);

        let report = service.ingest(&[Document::new("A", "  \n")]).await.unwrap();
        assert_eq!(report.chunks_added, 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_directory_yields_empty_report() {
        let (service, _store) = service_with(Arc::new(LocalEmbeddingService::default())).await;
        let dir = tempfile::tempdir().unwrap();

        let report = service
            .ingest_directory(&dir.path().join("nothing-here"))
            .await
            .unwrap();
        assert!(report.is_empty());
        assert_eq!(report.documents_processed, 0);
    }
}
