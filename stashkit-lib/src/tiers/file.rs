//! File-backed storage tier.
//!
//! Entries live in a single JSON document under the tier's root directory,
//! mirrored by an in-memory cache that is the source of truth between
//! writes. The same implementation backs both the session tier (rooted in
//! a per-session scratch directory) and the persistent tier (rooted in the
//! application data directory); the lifetime contract comes from the
//! directory's lifecycle, not from this type.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::traits::{TierBackend, TierError, TierResult};

const ENTRIES_FILE: &str = "entries.json";

/// File-backed tier implementation.
pub struct FileTier {
    name: &'static str,
    path: PathBuf,
    cache: Mutex<HashMap<String, String>>,
}

impl FileTier {
    /// Open a tier rooted at the given directory.
    ///
    /// Opening never fails: an unreadable or corrupted document starts the
    /// tier empty with a logged warning, and directory problems surface as
    /// per-operation errors so the selector can fall back.
    pub fn open(name: &'static str, root: impl AsRef<Path>) -> Self {
        let path = root.as_ref().join(ENTRIES_FILE);
        let cache = match Self::load_document(&path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("{} tier document unreadable, starting empty: {}", name, e);
                HashMap::new()
            }
        };
        Self {
            name,
            path,
            cache: Mutex::new(cache),
        }
    }

    fn load_document(path: &Path) -> std::result::Result<HashMap<String, String>, String> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&contents).map_err(|e| e.to_string())
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, entries: &HashMap<String, String>) -> TierResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| TierError::new(self.name, e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| TierError::new(self.name, e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| TierError::new(self.name, e.to_string()))
    }
}

impl TierBackend for FileTier {
    fn name(&self) -> &'static str {
        self.name
    }

    fn get(&self, key: &str) -> TierResult<Option<String>> {
        Ok(self.cache().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> TierResult<()> {
        let mut cache = self.cache();
        let previous = cache.insert(key.to_string(), value.to_string());
        match self.persist(&cache) {
            Ok(()) => Ok(()),
            Err(e) => {
                // Revert so a failed write does not read back from this tier
                match previous {
                    Some(old) => cache.insert(key.to_string(), old),
                    None => cache.remove(key),
                };
                Err(e)
            }
        }
    }

    fn remove(&self, key: &str) -> TierResult<()> {
        let mut cache = self.cache();
        if cache.remove(key).is_some() {
            self.persist(&cache)?;
        }
        Ok(())
    }

    fn keys(&self) -> TierResult<Vec<String>> {
        Ok(self.cache().keys().cloned().collect())
    }
}
