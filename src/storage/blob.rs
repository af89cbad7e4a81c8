//! Blob store abstraction.
//!
//! The offline queue reads and writes its whole state as one serialized
//! blob under a fixed key. Anything that can `get` and `set` a string by
//! key can back it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::AthenaError;

use super::Database;

/// Persistent key-value store holding serialized blobs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read the blob stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, AthenaError>;

    /// Replace the blob stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), AthenaError>;
}

/// Blob store backed by the `SQLite` database.
///
/// Calls run on the blocking thread pool so the async runtime is never
/// stalled by disk I/O.
#[derive(Clone)]
pub struct SqliteBlobStore {
    db: Arc<Mutex<Database>>,
}

impl SqliteBlobStore {
    /// Open the store at the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open() -> Result<Self, AthenaError> {
        Ok(Self::with_database(Database::open()?))
    }

    /// Open the store at a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_at(path: &Path) -> Result<Self, AthenaError> {
        Ok(Self::with_database(Database::open_at(path)?))
    }

    /// Open a store over an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_in_memory() -> Result<Self, AthenaError> {
        Ok(Self::with_database(Database::open_in_memory()?))
    }

    /// Wrap an already opened database.
    #[must_use]
    pub fn with_database(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    async fn with_db<T, F>(&self, f: F) -> Result<T, AthenaError>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T, AthenaError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let guard = db
                .lock()
                .map_err(|_| AthenaError::Database("Database lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| AthenaError::Database(format!("Storage task failed: {e}")))?
    }
}

#[async_trait]
impl BlobStore for SqliteBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AthenaError> {
        let key = key.to_string();
        self.with_db(move |db| db.get_value(&key)).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AthenaError> {
        let key = key.to_string();
        let value = value.to_string();
        self.with_db(move |db| db.set_value(&key, &value)).await
    }
}

/// Process-local blob store.
///
/// Clones share the same map, so a store handed to a second manager
/// behaves like the same device storage after a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, AthenaError> {
        self.entries
            .lock()
            .map_err(|_| AthenaError::Database("Memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AthenaError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AthenaError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryBlobStore::new();
        assert_eq!(store.get("queue").await.unwrap(), None);

        store.set("queue", "[]").await.unwrap();
        assert_eq!(store.get("queue").await.unwrap(), Some("[]".to_string()));
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_state() {
        let store = MemoryBlobStore::new();
        let other = store.clone();

        store.set("queue", "[1]").await.unwrap();
        assert_eq!(other.get("queue").await.unwrap(), Some("[1]".to_string()));
    }

    #[tokio::test]
    async fn test_sqlite_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("athena.db");

        {
            let store = SqliteBlobStore::open_at(&path).unwrap();
            store.set("queue", r#"[{"a":1}]"#).await.unwrap();
        }

        let store = SqliteBlobStore::open_at(&path).unwrap();
        assert_eq!(
            store.get("queue").await.unwrap(),
            Some(r#"[{"a":1}]"#.to_string())
        );
        assert_eq!(store.get("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sqlite_store_in_memory() {
        let store = SqliteBlobStore::open_in_memory().unwrap();
        store.set("k", "v1").await.unwrap();
        store.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v2".to_string()));
    }
}
