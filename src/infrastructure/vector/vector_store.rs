//! Vector store implementation on `SQLite`
//!
//! Each collection lives in its own directory, `{data_dir}/{name}/index.db`.
//! Vectors are stored as little-endian `f32` blobs and ranked in Rust by
//! cosine distance with a full scan.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::domain::errors::{DomainError, DomainResult, Stage};
use crate::domain::models::{ChunkMetadata, CollectionStatus, EmbeddingRecord, QueryResult};
use crate::domain::ports::VectorStore;
use crate::infrastructure::database::DatabaseConnection;

/// File name of the index inside a collection directory
pub const INDEX_FILE_NAME: &str = "index.db";

const DIMENSION_KEY: &str = "dimension";
const NAME_KEY: &str = "collection";

/// Vector store for semantic search
///
/// Writes go through an exclusive gate so a batch is never observed half
/// written; reads share the gate.
pub struct SqliteVectorStore {
    pool: SqlitePool,
    collection: String,
    location: Option<PathBuf>,
    write_gate: RwLock<()>,
}

impl SqliteVectorStore {
    /// Open the named collection under `data_dir`, creating it if absent
    ///
    /// # Returns
    /// * `Ok((store, CollectionStatus::Loaded))` - existing state was found
    /// * `Ok((store, CollectionStatus::Created))` - a new empty collection
    /// * `Err(InvalidArgument)` - the name is not a safe directory name
    /// * `Err(StoreUnavailable)` - the directory or database cannot be opened
    pub async fn open_or_create(
        data_dir: &Path,
        collection: &str,
        max_connections: u32,
    ) -> DomainResult<(Self, CollectionStatus)> {
        validate_collection_name(collection)?;

        let dir = data_dir.join(collection);
        let index_path = dir.join(INDEX_FILE_NAME);
        let status = if index_path.is_file() {
            CollectionStatus::Loaded
        } else {
            CollectionStatus::Created
        };

        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            DomainError::StoreUnavailable(format!("cannot create {}: {e}", dir.display()))
        })?;

        let db = DatabaseConnection::open(&index_path, max_connections).await?;
        let store = Self::initialize(db, collection, Some(dir)).await?;

        let count = store.count().await?;
        tracing::info!(
            collection = %collection,
            status = %status,
            records = count,
            path = %index_path.display(),
            "vector collection {}",
            status
        );

        Ok((store, status))
    }

    /// Create a throwaway collection held in memory
    pub async fn in_memory(collection: &str) -> DomainResult<Self> {
        validate_collection_name(collection)?;
        let db = DatabaseConnection::in_memory().await?;
        Self::initialize(db, collection, None).await
    }

    async fn initialize(
        db: DatabaseConnection,
        collection: &str,
        location: Option<PathBuf>,
    ) -> DomainResult<Self> {
        db.migrate().await?;
        let pool = db.into_pool();

        sqlx::query("INSERT OR IGNORE INTO collection_meta (key, value) VALUES (?, ?)")
            .bind(NAME_KEY)
            .bind(collection)
            .execute(&pool)
            .await
            .map_err(|e| DomainError::StoreUnavailable(format!("cannot initialize collection: {e}")))?;

        Ok(Self {
            pool,
            collection: collection.to_string(),
            location,
            write_gate: RwLock::new(()),
        })
    }

    /// Collection name
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Directory holding the collection, `None` for in-memory stores
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Vector dimension fixed by the first write, `None` while empty
    pub async fn dimension(&self) -> DomainResult<Option<usize>> {
        let _read = self.write_gate.read().await;
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM collection_meta WHERE key = ?")
                .bind(DIMENSION_KEY)
                .fetch_optional(&self.pool)
                .await?;

        value
            .map(|v| {
                v.parse::<usize>().map_err(|e| {
                    DomainError::StoreFailure(format!("corrupt dimension entry {v:?}: {e}"))
                })
            })
            .transpose()
    }

    /// Close the underlying pool; further calls fail with `StoreFailure`
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Serialize embedding vector to bytes for storage
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding vector from bytes
    fn bytes_to_embedding(bytes: &[u8]) -> DomainResult<Vec<f32>> {
        if bytes.len() % 4 != 0 {
            return Err(DomainError::StoreFailure(
                "invalid embedding bytes length".to_string(),
            ));
        }

        Ok(bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }

    /// Calculate cosine distance between two vectors
    ///
    /// `1 - cosine_similarity`, clamped at zero. `None` when the pair cannot
    /// be scored: mismatched lengths or a zero vector.
    pub fn cosine_distance(a: &[f32], b: &[f32]) -> Option<f32> {
        if a.len() != b.len() {
            return None;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if mag_a == 0.0 || mag_b == 0.0 {
            return None;
        }

        Some((1.0 - (dot / (mag_a * mag_b))).max(0.0))
    }

    /// Read the collection dimension inside a write transaction
    async fn dimension_in(tx: &mut Transaction<'_, Sqlite>) -> DomainResult<Option<usize>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM collection_meta WHERE key = ?")
                .bind(DIMENSION_KEY)
                .fetch_optional(&mut **tx)
                .await?;

        Ok(value.and_then(|v| v.parse().ok()))
    }

    fn metadata_from_row(row: &SqliteRow) -> DomainResult<ChunkMetadata> {
        let sequence_index: i64 = row.try_get("sequence_index")?;
        Ok(ChunkMetadata {
            source: row.try_get("source")?,
            sequence_index: usize::try_from(sequence_index).map_err(|_| {
                DomainError::StoreFailure(format!("negative sequence index {sequence_index}"))
            })?,
        })
    }
}

/// Collection names double as directory names
fn validate_collection_name(name: &str) -> DomainResult<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(DomainError::invalid(
            Stage::Store,
            format!("invalid collection name {name:?}: use letters, digits, '_', '-' or '.'"),
        ))
    }
}

impl SqliteVectorStore {
    /// Upsert `records` and trim stale chunks of `sources` in one transaction
    async fn write_batch(
        &self,
        sources: &[String],
        records: Vec<EmbeddingRecord>,
    ) -> DomainResult<usize> {
        if records.is_empty() && sources.is_empty() {
            return Ok(0);
        }

        let batch_dimension = records.first().map_or(0, EmbeddingRecord::dimensions);
        if !records.is_empty() && batch_dimension == 0 {
            return Err(DomainError::invalid(Stage::Store, "embedding vectors must not be empty"));
        }
        if let Some(bad) = records.iter().find(|r| r.dimensions() != batch_dimension) {
            return Err(DomainError::invalid(
                Stage::Store,
                format!(
                    "record {} has {} dimensions, batch uses {batch_dimension}",
                    bad.id,
                    bad.dimensions()
                ),
            ));
        }

        let _write = self.write_gate.write().await;
        let mut tx = self.pool.begin().await?;

        if !records.is_empty() {
            match Self::dimension_in(&mut tx).await? {
                Some(existing) if existing != batch_dimension => {
                    return Err(DomainError::invalid(
                        Stage::Store,
                        format!(
                            "collection '{}' stores {existing}-dimensional vectors, got {batch_dimension}",
                            self.collection
                        ),
                    ));
                }
                Some(_) => {}
                None => {
                    sqlx::query("INSERT INTO collection_meta (key, value) VALUES (?, ?)")
                        .bind(DIMENSION_KEY)
                        .bind(batch_dimension.to_string())
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }

        let now = chrono::Utc::now().to_rfc3339();
        let written = records.len();

        for record in &records {
            let dimension = i64::try_from(record.dimensions())
                .map_err(|_| DomainError::invalid(Stage::Store, "vector too long"))?;
            let sequence_index = i64::try_from(record.metadata.sequence_index)
                .map_err(|_| DomainError::invalid(Stage::Store, "sequence index too large"))?;

            // Upsert keeps `seq`, so an overwritten record keeps its rank on ties
            sqlx::query(
                r"
                INSERT INTO embeddings (id, source, sequence_index, text, dimension, vector, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    source = excluded.source,
                    sequence_index = excluded.sequence_index,
                    text = excluded.text,
                    dimension = excluded.dimension,
                    vector = excluded.vector,
                    updated_at = excluded.updated_at
                ",
            )
            .bind(&record.id)
            .bind(&record.metadata.source)
            .bind(sequence_index)
            .bind(&record.text)
            .bind(dimension)
            .bind(Self::embedding_to_bytes(&record.vector))
            .bind(&now)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        let mut removed = 0;
        for source in sources {
            let kept = records
                .iter()
                .filter(|r| &r.metadata.source == source)
                .map(|r| r.metadata.sequence_index + 1)
                .max()
                .unwrap_or(0);
            let kept = i64::try_from(kept)
                .map_err(|_| DomainError::invalid(Stage::Store, "sequence index too large"))?;

            let result =
                sqlx::query("DELETE FROM embeddings WHERE source = ? AND sequence_index >= ?")
                    .bind(source)
                    .bind(kept)
                    .execute(&mut *tx)
                    .await?;
            removed += result.rows_affected();
        }

        tx.commit().await?;

        tracing::debug!(
            collection = %self.collection,
            records = written,
            stale = removed,
            dimension = batch_dimension,
            "records written"
        );

        Ok(written)
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    async fn add(&self, records: Vec<EmbeddingRecord>) -> DomainResult<usize> {
        self.write_batch(&[], records).await
    }

    async fn replace_sources(
        &self,
        sources: &[String],
        records: Vec<EmbeddingRecord>,
    ) -> DomainResult<usize> {
        self.write_batch(sources, records).await
    }

    async fn search(&self, query_vector: &[f32], k: usize) -> DomainResult<Vec<QueryResult>> {
        if k == 0 {
            return Err(DomainError::invalid(Stage::Input, "k must be a positive integer"));
        }
        if query_vector.is_empty() {
            return Err(DomainError::invalid(Stage::Input, "query vector must not be empty"));
        }

        let _read = self.write_gate.read().await;

        let rows = sqlx::query(
            "SELECT id, source, sequence_index, text, vector FROM embeddings ORDER BY seq ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored = Vec::with_capacity(rows.len());
        for row in &rows {
            let vector_bytes: Vec<u8> = row.try_get("vector")?;
            let vector = Self::bytes_to_embedding(&vector_bytes)?;

            if vector.len() != query_vector.len() {
                return Err(DomainError::invalid(
                    Stage::Input,
                    format!(
                        "query has {} dimensions, collection '{}' stores {}",
                        query_vector.len(),
                        self.collection,
                        vector.len()
                    ),
                ));
            }

            scored.push(QueryResult {
                id: row.try_get("id")?,
                text: row.try_get("text")?,
                metadata: Self::metadata_from_row(row)?,
                distance: Self::cosine_distance(query_vector, &vector),
            });
        }

        // Rows arrive in insertion order and sort_by is stable, so ties keep it.
        // Unscored records go last.
        scored.sort_by(|a, b| match (a.distance, b.distance) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        scored.truncate(k);

        tracing::debug!(
            collection = %self.collection,
            scanned = rows.len(),
            returned = scored.len(),
            "similarity search"
        );

        Ok(scored)
    }

    async fn count(&self) -> DomainResult<usize> {
        let _read = self.write_gate.read().await;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM embeddings")
            .fetch_one(&self.pool)
            .await?;

        usize::try_from(count)
            .map_err(|_| DomainError::StoreFailure(format!("invalid record count {count}")))
    }

    async fn get(&self, id: &str) -> DomainResult<Option<EmbeddingRecord>> {
        let _read = self.write_gate.read().await;
        let row = sqlx::query(
            "SELECT id, source, sequence_index, text, vector FROM embeddings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let vector_bytes: Vec<u8> = row.try_get("vector")?;
        Ok(Some(EmbeddingRecord {
            id: row.try_get("id")?,
            vector: Self::bytes_to_embedding(&vector_bytes)?,
            text: row.try_get("text")?,
            metadata: Self::metadata_from_row(&row)?,
        }))
    }

    async fn delete_by_source(&self, source: &str) -> DomainResult<usize> {
        let _write = self.write_gate.write().await;
        let result = sqlx::query("DELETE FROM embeddings WHERE source = ?")
            .bind(source)
            .execute(&self.pool)
            .await?;

        let removed = usize::try_from(result.rows_affected()).unwrap_or(usize::MAX);
        tracing::debug!(collection = %self.collection, source, removed, "records deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, vector: Vec<f32>) -> EmbeddingRecord {
        EmbeddingRecord {
            id: id.to_string(),
            vector,
            text: format!("text of {id}"),
            metadata: ChunkMetadata {
                source: format!("{}.txt", id.split('_').next().unwrap_or(id)),
                sequence_index: id
                    .rsplit('_')
                    .next()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0),
            },
        }
    }

    async fn memory_store() -> SqliteVectorStore {
        SqliteVectorStore::in_memory("test_docs")
            .await
            .expect("Failed to create vector store")
    }

    #[test]
    fn test_embedding_serialization() {
        let embedding = vec![0.1, 0.2, 0.3, 0.4, 0.5];
        let bytes = SqliteVectorStore::embedding_to_bytes(&embedding);
        let restored = SqliteVectorStore::bytes_to_embedding(&bytes).unwrap();
        assert_eq!(embedding, restored);
    }

    #[test]
    fn test_invalid_bytes_length() {
        assert!(SqliteVectorStore::bytes_to_embedding(&[0u8; 7]).is_err());
    }

    #[test]
    fn test_cosine_distance() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!(SqliteVectorStore::cosine_distance(&a, &b).unwrap().abs() < 1e-6);

        let c = vec![0.0, 1.0, 0.0];
        assert!((SqliteVectorStore::cosine_distance(&a, &c).unwrap() - 1.0).abs() < 1e-6);

        assert_eq!(SqliteVectorStore::cosine_distance(&a, &[1.0]), None);
        assert_eq!(SqliteVectorStore::cosine_distance(&a, &[0.0, 0.0, 0.0]), None);
    }

    #[test]
    fn test_collection_name_validation() {
        assert!(validate_collection_name("code_docs").is_ok());
        assert!(validate_collection_name("docs-v2.1").is_ok());
        assert!(validate_collection_name("").is_err());
        assert!(validate_collection_name("..").is_err());
        assert!(validate_collection_name("a/b").is_err());
    }

    #[tokio::test]
    async fn test_empty_store_search_returns_empty() {
        let store = memory_store().await;
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.search(&[1.0, 0.0], 3).await.unwrap().is_empty());
        assert_eq!(store.dimension().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_search_orders_by_distance_and_truncates() {
        let store = memory_store().await;
        store
            .add(vec![
                record("far_0", vec![0.0, 1.0]),
                record("near_0", vec![1.0, 0.1]),
                record("exact_0", vec![1.0, 0.0]),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 2).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["exact_0", "near_0"]);
        assert!(results[0].distance.unwrap() <= results[1].distance.unwrap());
        assert!(results[0].distance.unwrap().abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let store = memory_store().await;
        store
            .add(vec![
                record("b_0", vec![0.0, 1.0]),
                record("a_0", vec![0.0, 2.0]),
                record("c_0", vec![0.0, 3.0]),
            ])
            .await
            .unwrap();

        let results = store.search(&[0.0, 1.0], 3).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b_0", "a_0", "c_0"]);
    }

    #[tokio::test]
    async fn test_add_overwrites_existing_id() {
        let store = memory_store().await;
        store.add(vec![record("doc_0", vec![1.0, 0.0])]).await.unwrap();

        let mut updated = record("doc_0", vec![0.0, 1.0]);
        updated.text = "rewritten".to_string();
        store.add(vec![updated]).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let stored = store.get("doc_0").await.unwrap().expect("record exists");
        assert_eq!(stored.text, "rewritten");
        assert_eq!(stored.vector, vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn test_overwrite_keeps_tie_position() {
        let store = memory_store().await;
        store
            .add(vec![record("first_0", vec![1.0, 0.0]), record("second_0", vec![1.0, 0.0])])
            .await
            .unwrap();
        store.add(vec![record("first_0", vec![1.0, 0.0])]).await.unwrap();

        let results = store.search(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(results[0].id, "first_0");
        assert_eq!(results[1].id, "second_0");
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_rejected_atomically() {
        let store = memory_store().await;
        store.add(vec![record("a_0", vec![1.0, 0.0])]).await.unwrap();

        let err = store.add(vec![record("b_0", vec![1.0, 0.0, 0.0])]).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument { stage: Stage::Store, .. }));

        let err = store
            .add(vec![record("c_0", vec![1.0, 0.0]), record("d_0", vec![1.0])])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument { .. }));

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.dimension().await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_search_rejects_zero_k_and_wrong_dimension() {
        let store = memory_store().await;
        store.add(vec![record("a_0", vec![1.0, 0.0])]).await.unwrap();

        assert!(matches!(
            store.search(&[1.0, 0.0], 0).await,
            Err(DomainError::InvalidArgument { stage: Stage::Input, .. })
        ));
        assert!(matches!(
            store.search(&[1.0, 0.0, 0.0], 1).await,
            Err(DomainError::InvalidArgument { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_by_source() {
        let store = memory_store().await;
        store
            .add(vec![
                record("react_0", vec![1.0, 0.0]),
                record("react_1", vec![0.5, 0.5]),
                record("swift_0", vec![0.0, 1.0]),
            ])
            .await
            .unwrap();

        assert_eq!(store.delete_by_source("react.txt").await.unwrap(), 2);
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.get("react_0").await.unwrap().is_none());
        assert!(store.get("swift_0").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_zero_vector_is_unscored_and_last() {
        let store = memory_store().await;
        store
            .add(vec![
                record("blank_0", vec![0.0, 0.0]),
                record("far_0", vec![0.0, 1.0]),
                record("near_0", vec![1.0, 0.0]),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 3).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["near_0", "far_0", "blank_0"]);
        assert_eq!(results[2].distance, None);
        assert_eq!(results[2].score(), None);
    }

    #[tokio::test]
    async fn test_replace_sources_drops_trailing_chunks() {
        let store = memory_store().await;
        store
            .add(vec![
                record("react_0", vec![1.0, 0.0]),
                record("react_1", vec![0.5, 0.5]),
                record("react_2", vec![0.0, 1.0]),
                record("swift_0", vec![0.0, 1.0]),
            ])
            .await
            .unwrap();

        let written = store
            .replace_sources(
                &["react.txt".to_string()],
                vec![record("react_0", vec![0.9, 0.1])],
            )
            .await
            .unwrap();

        assert_eq!(written, 1);
        assert_eq!(store.count().await.unwrap(), 2);
        assert!(store.get("react_1").await.unwrap().is_none());
        assert!(store.get("react_2").await.unwrap().is_none());
        assert_eq!(store.get("react_0").await.unwrap().unwrap().vector, vec![0.9, 0.1]);
        assert!(store.get("swift_0").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_replace_sources_without_records_empties_source() {
        let store = memory_store().await;
        store
            .add(vec![record("react_0", vec![1.0, 0.0]), record("swift_0", vec![0.0, 1.0])])
            .await
            .unwrap();

        let written = store
            .replace_sources(&["react.txt".to_string()], Vec::new())
            .await
            .unwrap();

        assert_eq!(written, 0);
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.get("react_0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_sources_rejected_batch_keeps_old_chunks() {
        let store = memory_store().await;
        store
            .add(vec![record("react_0", vec![1.0, 0.0]), record("react_1", vec![0.0, 1.0])])
            .await
            .unwrap();

        let err = store
            .replace_sources(
                &["react.txt".to_string()],
                vec![record("react_0", vec![1.0, 0.0, 0.0])],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidArgument { .. }));
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_add_empty_batch_is_noop() {
        let store = memory_store().await;
        assert_eq!(store.add(Vec::new()).await.unwrap(), 0);
        assert_eq!(store.dimension().await.unwrap(), None);
    }
}
