//! Vector store port for persisting and ranking embedding records.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{EmbeddingRecord, QueryResult};

/// Persistent nearest-neighbour index over embedding records
///
/// Single writer: `add` and `delete_by_source` must not interleave with each
/// other or with reads. Reads may run concurrently with one another.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or overwrite records
    ///
    /// # Arguments
    /// * `records` - Records to write; an existing id is overwritten in place
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records written
    /// * `Err(_)` - If any record is invalid or the write fails; nothing is written
    async fn add(&self, records: Vec<EmbeddingRecord>) -> DomainResult<usize>;

    /// Write `records` as the complete chunk set of every source in `sources`
    ///
    /// Behaves like [`VectorStore::add`], and in the same transaction drops
    /// the records of each listed source whose `sequence_index` lies beyond
    /// the chunks written for it. A listed source with no records is emptied.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records written
    /// * `Err(_)` - If any record is invalid or the write fails; nothing changes
    async fn replace_sources(
        &self,
        sources: &[String],
        records: Vec<EmbeddingRecord>,
    ) -> DomainResult<usize>;

    /// Nearest neighbours of `query_vector`
    ///
    /// # Returns
    /// * At most `k` results ordered by ascending distance, ties in insertion
    ///   order. An empty store yields an empty vector.
    async fn search(&self, query_vector: &[f32], k: usize) -> DomainResult<Vec<QueryResult>>;

    /// Number of stored records
    async fn count(&self) -> DomainResult<usize>;

    /// Fetch a record by id
    async fn get(&self, id: &str) -> DomainResult<Option<EmbeddingRecord>>;

    /// Remove every record whose metadata source equals `source`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records removed
    async fn delete_by_source(&self, source: &str) -> DomainResult<usize>;
}
