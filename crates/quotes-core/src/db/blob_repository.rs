//! Blob repository implementation

use std::path::Path;

use libsql::params;

use super::Database;
use crate::error::Result;
use crate::storage::BlobStore;

/// libSQL implementation of [`BlobStore`]
pub struct LibSqlBlobStore {
    db: Database,
}

impl LibSqlBlobStore {
    /// Wrap an open database
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open (or create) a database file and wrap it
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Database::open(path).await?))
    }

    /// In-memory store (useful for testing)
    pub async fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory().await?))
    }

    /// Keys currently stored, sorted
    pub async fn keys(&self) -> Result<Vec<String>> {
        let mut rows = self
            .db
            .connection()
            .query("SELECT key FROM blobs ORDER BY key", ())
            .await?;

        let mut keys = Vec::new();
        while let Some(row) = rows.next().await? {
            keys.push(row.get::<String>(0)?);
        }
        Ok(keys)
    }
}

impl BlobStore for LibSqlBlobStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut rows = self
            .db
            .connection()
            .query("SELECT value FROM blobs WHERE key = ?1", params![key])
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(row.get::<Vec<u8>>(0)?))
        } else {
            Ok(None)
        }
    }

    async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        let now = chrono::Utc::now().timestamp_millis();
        self.db
            .connection()
            .execute(
                "INSERT INTO blobs (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, bytes, now],
            )
            .await?;
        Ok(())
    }
}
