//! In-memory key database implementation.
//!
//! This implementation is for testing and ephemeral processes. Keys are
//! lost when the process exits, which downgrades every restart to the
//! fresh-key path.

use std::collections::HashMap;
use std::sync::RwLock;

use super::traits::{KeyDatabase, KeyDatabaseError, KeyDatabaseResult};

/// In-memory implementation of the key database.
pub struct InMemoryKeyDatabase {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

fn lock_error(context: &str) -> KeyDatabaseError {
    KeyDatabaseError::Unavailable(format!(
        "InMemoryKeyDatabase: lock poisoned during {}",
        context
    ))
}

impl InMemoryKeyDatabase {
    /// Create a new in-memory key database.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get the number of stored entries.
    ///
    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Check if the database is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().map(|e| e.is_empty()).unwrap_or(true)
    }
}

impl Default for InMemoryKeyDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl KeyDatabase for InMemoryKeyDatabase {
    async fn retrieve(&self, key_id: &str) -> KeyDatabaseResult<Option<Vec<u8>>> {
        let entries = self.entries.read().map_err(|_| lock_error("retrieve"))?;
        Ok(entries.get(key_id).cloned())
    }

    async fn store(&self, key_id: &str, material: &[u8]) -> KeyDatabaseResult<()> {
        let mut entries = self.entries.write().map_err(|_| lock_error("store"))?;
        entries.insert(key_id.to_string(), material.to_vec());
        Ok(())
    }

    async fn delete(&self, key_id: &str) -> KeyDatabaseResult<()> {
        let mut entries = self.entries.write().map_err(|_| lock_error("delete"))?;
        entries.remove(key_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_retrieve() {
        let db = InMemoryKeyDatabase::new();
        db.store("master", b"key-material").await.unwrap();

        let loaded = db.retrieve("master").await.unwrap();
        assert_eq!(loaded, Some(b"key-material".to_vec()));
    }

    #[tokio::test]
    async fn test_retrieve_missing() {
        let db = InMemoryKeyDatabase::new();
        assert_eq!(db.retrieve("nonexistent").await.unwrap(), None);
        assert!(!db.exists("nonexistent").await.unwrap());
    }

    #[tokio::test]
    async fn test_overwrite() {
        let db = InMemoryKeyDatabase::new();
        db.store("master", b"first").await.unwrap();
        db.store("master", b"second").await.unwrap();

        assert_eq!(db.retrieve("master").await.unwrap(), Some(b"second".to_vec()));
        assert_eq!(db.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let db = InMemoryKeyDatabase::new();
        db.store("master", b"data").await.unwrap();

        db.delete("master").await.unwrap();
        assert!(db.is_empty());

        // Deleting again is not an error
        db.delete("master").await.unwrap();
    }
}
