//! Process-memory tier.

use std::collections::HashMap;
use std::sync::Mutex;

use super::traits::{TierBackend, TierResult};

/// Process-lifetime key→string map.
///
/// Always available and never fails, which is what guarantees the
/// selector's write operation succeeds from the caller's point of view.
/// Data absorbed here is lost on process exit. A poisoned lock is
/// recovered rather than surfaced, since this tier must not fail.
pub struct MemoryTier {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTier {
    /// Create an empty memory tier.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryTier {
    fn default() -> Self {
        Self::new()
    }
}

impl TierBackend for MemoryTier {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> TierResult<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> TierResult<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> TierResult<()> {
        self.entries().remove(key);
        Ok(())
    }

    fn keys(&self) -> TierResult<Vec<String>> {
        Ok(self.entries().keys().cloned().collect())
    }
}
