//! `SQLite` connection pool setup and migrations.

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};

/// Database connection pool manager
///
/// Manages the `SQLite` pool behind one collection, with WAL mode enabled
/// so readers are not blocked by the single writer.
pub struct DatabaseConnection {
    pool: SqlitePool,
}

impl DatabaseConnection {
    /// Open (creating if missing) the database file at `path`
    ///
    /// # Configuration
    /// - Journal mode: WAL (Write-Ahead Logging)
    /// - Synchronous: NORMAL (good balance of safety and performance)
    /// - Busy timeout: 5 seconds
    /// - Max connections: `max_connections`
    /// - Idle timeout: 30 seconds
    /// - Acquire timeout: 10 seconds
    ///
    /// # Returns
    /// * `Ok(DatabaseConnection)` on success
    /// * `Err(StoreUnavailable)` if the file cannot be opened
    pub async fn open(path: &Path, max_connections: u32) -> DomainResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(max_connections.max(1))
            .idle_timeout(Duration::from_secs(30))
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| {
                DomainError::StoreUnavailable(format!(
                    "failed to open {}: {e}",
                    path.display()
                ))
            })?;

        Ok(Self { pool })
    }

    /// Open a private in-memory database
    ///
    /// A single connection that never idles out, since the data lives only
    /// as long as that connection.
    pub async fn in_memory() -> DomainResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DomainError::StoreUnavailable(format!("invalid database URL: {e}")))?;

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(|e| {
                DomainError::StoreUnavailable(format!("failed to open in-memory database: {e}"))
            })?;

        Ok(Self { pool })
    }

    /// Run migrations at startup
    ///
    /// Safe to call on every open - only applies new migrations.
    pub async fn migrate(&self) -> DomainResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Hand the pool to a repository
    pub fn into_pool(self) -> SqlitePool {
        self.pool
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
