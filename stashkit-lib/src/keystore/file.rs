//! File-backed key database implementation.
//!
//! Persists key material in a small JSON document, base64-encoded, in the
//! application data directory. This is the default backend on platforms
//! without a structured database binding; it survives process restarts and
//! is destroyed only when the user or platform clears the data directory.

use std::collections::HashMap;
use std::path::PathBuf;

use base64::{engine::general_purpose, Engine as _};

use super::traits::{KeyDatabase, KeyDatabaseError, KeyDatabaseResult};

/// File-backed implementation of the key database.
pub struct FileKeyDatabase {
    path: PathBuf,
}

impl FileKeyDatabase {
    /// Create a key database backed by the given file path.
    ///
    /// The file and its parent directory are created lazily on first store.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read_document(&self) -> KeyDatabaseResult<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| KeyDatabaseError::Unavailable(e.to_string()))?;
        serde_json::from_str(&contents)
            .map_err(|e| KeyDatabaseError::Corrupted(e.to_string()))
    }

    fn write_document(&self, document: &HashMap<String, String>) -> KeyDatabaseResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| KeyDatabaseError::Unavailable(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| KeyDatabaseError::Corrupted(e.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|e| KeyDatabaseError::Unavailable(e.to_string()))
    }
}

#[async_trait::async_trait]
impl KeyDatabase for FileKeyDatabase {
    async fn retrieve(&self, key_id: &str) -> KeyDatabaseResult<Option<Vec<u8>>> {
        let document = self.read_document()?;
        match document.get(key_id) {
            Some(encoded) => {
                let material = general_purpose::STANDARD
                    .decode(encoded)
                    .map_err(|e| KeyDatabaseError::Corrupted(e.to_string()))?;
                Ok(Some(material))
            }
            None => Ok(None),
        }
    }

    async fn store(&self, key_id: &str, material: &[u8]) -> KeyDatabaseResult<()> {
        // A corrupted document must not block storing a fresh key; the old
        // contents are unreadable either way.
        let mut document = self.read_document().unwrap_or_default();
        document.insert(
            key_id.to_string(),
            general_purpose::STANDARD.encode(material),
        );
        self.write_document(&document)
    }

    async fn delete(&self, key_id: &str) -> KeyDatabaseResult<()> {
        let mut document = self.read_document().unwrap_or_default();
        if document.remove(key_id).is_some() {
            self.write_document(&document)?;
        }
        Ok(())
    }
}
