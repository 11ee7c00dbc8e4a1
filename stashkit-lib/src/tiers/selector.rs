//! Tier selection and fallback routing.

use super::memory::MemoryTier;
use super::traits::{TierBackend, TierResult};

/// Routes each request to the preferred tier and falls through to memory.
///
/// The preference order is an explicit strategy list, tried in sequence:
/// the tier chosen by the caller's persistence flag, then the memory tier.
/// Failures on the preferred tier are logged and absorbed, never
/// propagated; the memory tier cannot fail, so writes always succeed from
/// the caller's point of view.
pub struct TierSelector {
    session: Box<dyn TierBackend>,
    persistent: Box<dyn TierBackend>,
    memory: MemoryTier,
}

impl TierSelector {
    /// Create a selector over the given session and persistent backends.
    /// The memory fallback is owned by the selector itself.
    pub fn new(session: Box<dyn TierBackend>, persistent: Box<dyn TierBackend>) -> Self {
        Self {
            session,
            persistent,
            memory: MemoryTier::new(),
        }
    }

    fn preferred(&self, persistent: bool) -> &dyn TierBackend {
        if persistent {
            self.persistent.as_ref()
        } else {
            self.session.as_ref()
        }
    }

    /// Strategy list for one request, in preference order.
    fn candidates(&self, persistent: bool) -> [&dyn TierBackend; 2] {
        [self.preferred(persistent), &self.memory]
    }

    /// Write a value. Never fails; the memory tier absorbs the write when
    /// the preferred tier is unavailable.
    pub fn write(&self, key: &str, value: &str, persistent: bool) {
        for backend in self.candidates(persistent) {
            match backend.set(key, value) {
                Ok(()) => {
                    tracing::debug!("Stored entry {} in {} tier", key, backend.name());
                    return;
                }
                Err(e) => {
                    let err = crate::errors::StashError::from(e);
                    tracing::warn!(
                        "Tier write failed for {} (code {:?}), falling back: {}",
                        key,
                        err.code(),
                        err
                    );
                }
            }
        }
    }

    /// Read a value: preferred tier first, then memory, first hit wins.
    /// Absent from both is `None`, not an error.
    pub fn read(&self, key: &str, persistent: bool) -> Option<String> {
        for backend in self.candidates(persistent) {
            match backend.get(key) {
                Ok(Some(value)) => return Some(value),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        "{} tier read failed for {}, falling back: {}",
                        backend.name(),
                        key,
                        e
                    );
                }
            }
        }
        None
    }

    /// Remove a key from the preferred tier and the memory fallback.
    pub fn remove(&self, key: &str, persistent: bool) {
        for backend in self.candidates(persistent) {
            if let Err(e) = backend.remove(key) {
                tracing::warn!("{} tier remove failed for {}: {}", backend.name(), key, e);
            }
        }
    }

    /// Union of keys across the preferred tier and the memory fallback.
    pub fn keys(&self, persistent: bool) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for backend in self.candidates(persistent) {
            match backend.keys() {
                Ok(tier_keys) => keys.extend(tier_keys),
                Err(e) => {
                    tracing::warn!("{} tier key listing failed: {}", backend.name(), e);
                }
            }
        }
        keys.sort();
        keys.dedup();
        keys
    }

    /// All entries of one specific tier, for the migration pass. Does not
    /// consult the memory fallback: migration rewrites entries where they
    /// actually live.
    pub(crate) fn scan_tier(&self, persistent: bool) -> Vec<(String, String)> {
        let backend = self.preferred(persistent);
        let keys = match backend.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!("{} tier scan failed: {}", backend.name(), e);
                return Vec::new();
            }
        };
        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            match backend.get(&key) {
                Ok(Some(value)) => entries.push((key, value)),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        "{} tier entry {} unreadable during scan: {}",
                        backend.name(),
                        key,
                        e
                    );
                }
            }
        }
        entries
    }

    /// Overwrite an entry in the specific tier it was scanned from.
    pub(crate) fn overwrite_in_tier(
        &self,
        persistent: bool,
        key: &str,
        value: &str,
    ) -> TierResult<()> {
        self.preferred(persistent).set(key, value)
    }
}
