//! Encryption key lifecycle management.
//!
//! The key manager obtains the device's symmetric key: loaded from the key
//! database when one was persisted earlier, generated and best-effort
//! persisted otherwise. Key retrieval is the subsystem's single suspension
//! point.

use std::fmt;
use std::sync::{Arc, Mutex};

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::keystore::KeyDatabase;

/// Fixed identifier the master key is persisted under.
pub const MASTER_KEY_ID: &str = "stashkit.master-key";

/// Opaque 256-bit symmetric key handle.
///
/// Never serialized to the value-storage tiers, never logged, never exposed
/// to callers. Material is zeroized when the handle is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey([u8; 32]);

impl EncryptionKey {
    /// Key length in bytes (256 bits).
    pub const LEN: usize = 32;

    /// Generate a fresh key from the platform's secure random source.
    pub fn generate() -> Self {
        let mut material = [0u8; Self::LEN];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut material);
        Self(material)
    }

    /// Build a key from persisted material. Returns `None` unless the
    /// material is exactly 256 bits.
    pub fn from_bytes(material: &[u8]) -> Option<Self> {
        let material: [u8; Self::LEN] = material.try_into().ok()?;
        Some(Self(material))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(..)")
    }
}

/// Obtains the device encryption key, generating it at most once.
///
/// The key is cached in-process after the first resolution, so a key whose
/// persistence failed stays usable for the remainder of the process; it is
/// simply not recoverable after restart.
pub struct KeyManager {
    database: Arc<dyn KeyDatabase>,
    cached: Mutex<Option<EncryptionKey>>,
}

impl KeyManager {
    /// Create a key manager over the given key database.
    pub fn new(database: Arc<dyn KeyDatabase>) -> Self {
        Self {
            database,
            cached: Mutex::new(None),
        }
    }

    /// Get the device key, loading or generating it on first call.
    ///
    /// Never fails: a database that cannot be read is treated as holding no
    /// key (previously encrypted values then surface as decryption
    /// failures), and a database that cannot be written leaves the fresh
    /// key ephemeral with a logged warning.
    ///
    /// Concurrent first calls may race to generate; the race is benign.
    /// In-process, the first caller to cache wins and later generators
    /// adopt its key. Across processes, the last successful persist wins.
    pub async fn get_or_create_key(&self) -> EncryptionKey {
        if let Some(key) = self.cached_key() {
            return key;
        }

        match self.database.retrieve(MASTER_KEY_ID).await {
            Ok(Some(material)) => match EncryptionKey::from_bytes(&material) {
                Some(key) => return self.adopt(key),
                None => {
                    tracing::warn!(
                        "Persisted key has unexpected length ({} bytes), generating fresh key",
                        material.len()
                    );
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Key database read failed, treating key as absent: {}", e);
            }
        }

        let key = EncryptionKey::generate();
        if let Err(e) = self.database.store(MASTER_KEY_ID, key.as_bytes()).await {
            let err = crate::errors::StashError::from(e);
            tracing::warn!(
                "Failed to persist encryption key (code {:?}), continuing with in-memory key: {}",
                err.code(),
                err
            );
        }
        self.adopt(key)
    }

    fn cached_key(&self) -> Option<EncryptionKey> {
        self.cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Cache a resolved key, deferring to one cached by a concurrent call.
    fn adopt(&self, key: EncryptionKey) -> EncryptionKey {
        let mut cached = self
            .cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match cached.as_ref() {
            Some(existing) => existing.clone(),
            None => {
                *cached = Some(key.clone());
                key
            }
        }
    }
}
