//! Core trait for key database backends.

/// Error type for key database operations.
#[derive(Debug, thiserror::Error)]
pub enum KeyDatabaseError {
    /// The backing store rejected the operation (quota, permissions,
    /// missing directory).
    #[error("key database unavailable: {0}")]
    Unavailable(String),

    /// The store was readable but its contents could not be interpreted.
    #[error("key database corrupted: {0}")]
    Corrupted(String),
}

/// Result type for key database operations.
pub type KeyDatabaseResult<T> = std::result::Result<T, KeyDatabaseError>;

/// Platform-agnostic store for encryption key material.
///
/// Implementations should:
/// - Persist key bytes exactly as given, keyed by identifier
/// - Never log or expose key material
/// - Treat retrieval of an absent identifier as `Ok(None)`, not an error
///
/// Retrieval and storage are asynchronous: this is the subsystem's single
/// suspension point, because the backing store may be a structured database
/// with async access on the target platform.
#[async_trait::async_trait]
pub trait KeyDatabase: Send + Sync {
    /// Retrieve key material by identifier, or `None` if absent.
    async fn retrieve(&self, key_id: &str) -> KeyDatabaseResult<Option<Vec<u8>>>;

    /// Store key material under the identifier, overwriting any previous
    /// material.
    async fn store(&self, key_id: &str, material: &[u8]) -> KeyDatabaseResult<()>;

    /// Delete key material by identifier. Deleting an absent identifier is
    /// not an error.
    async fn delete(&self, key_id: &str) -> KeyDatabaseResult<()>;

    /// Check whether material exists for the identifier.
    async fn exists(&self, key_id: &str) -> KeyDatabaseResult<bool> {
        Ok(self.retrieve(key_id).await?.is_some())
    }
}
