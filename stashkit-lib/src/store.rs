//! The secure store root object.
//!
//! Owns the capability probe, key manager, and tier selector, and exposes
//! the generic whole-value operations the facade channels and migration
//! pass delegate to. All failures inside these operations are converted to
//! a fallback action or an absent result; nothing escapes to the caller. A
//! failed read is indistinguishable from a value that was never stored.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::crypto::{cipher, legacy, CryptoCapability, KeyManager, PlatformCapability};
use crate::errors::StashError;
use crate::keystore::{FileKeyDatabase, KeyDatabase};
use crate::record::StoredRecord;
use crate::tiers::{FileTier, TierBackend, TierSelector};

/// Per-call storage policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotOptions {
    /// Encrypt the value at rest.
    pub encrypted: bool,
    /// Prefer the persistent tier over the session tier.
    pub persistent: bool,
}

impl SlotOptions {
    /// Create default options (plaintext, session-scoped).
    pub fn new() -> Self {
        Self::default()
    }

    /// Encrypt the value at rest.
    pub fn encrypted(mut self) -> Self {
        self.encrypted = true;
        self
    }

    /// Prefer the persistent tier.
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }
}

/// Layered secure local storage for small JSON-serializable values.
pub struct SecureStore {
    capability: Box<dyn CryptoCapability>,
    keys: KeyManager,
    tiers: TierSelector,
}

impl SecureStore {
    /// Create a store from explicitly constructed components.
    pub fn new(
        capability: Box<dyn CryptoCapability>,
        key_database: Arc<dyn KeyDatabase>,
        session: Box<dyn TierBackend>,
        persistent: Box<dyn TierBackend>,
    ) -> Self {
        Self {
            capability,
            keys: KeyManager::new(key_database),
            tiers: TierSelector::new(session, persistent),
        }
    }

    /// Open a store with the default file-backed components: a session
    /// tier under `session_dir` (typically a per-session scratch
    /// directory), and the persistent tier plus key database under
    /// `data_dir`.
    pub fn open(session_dir: impl AsRef<Path>, data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self::new(
            Box::new(PlatformCapability),
            Arc::new(FileKeyDatabase::new(data_dir.join("keystore.json"))),
            Box::new(FileTier::open("session", session_dir)),
            Box::new(FileTier::open("persistent", data_dir)),
        )
    }

    /// Store a value under the key. Returns false only when the value
    /// cannot be encoded at all; tier failures are absorbed by the
    /// memory fallback.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, options: SlotOptions) -> bool {
        let encoded = if options.encrypted {
            if self.capability.is_available() {
                let device_key = self.keys.get_or_create_key().await;
                match cipher::encrypt(&device_key, value) {
                    Ok(encoded) => encoded,
                    Err(e) => {
                        let err = StashError::from(e);
                        tracing::warn!(
                            "Encryption failed for {} (code {:?}), value not stored: {}",
                            key,
                            err.code(),
                            err
                        );
                        return false;
                    }
                }
            } else {
                let err =
                    StashError::CapabilityUnavailable("secure random source unavailable".into());
                tracing::warn!(
                    "Storing {} with legacy obfuscation (code {:?}): {}",
                    key,
                    err.code(),
                    err
                );
                match legacy::obfuscate(value) {
                    Ok(encoded) => encoded,
                    Err(e) => {
                        tracing::warn!("Obfuscation failed for {}, value not stored: {}", key, e);
                        return false;
                    }
                }
            }
        } else {
            match serde_json::to_string(value) {
                Ok(json) => json,
                Err(e) => {
                    tracing::warn!("Serialization failed for {}, value not stored: {}", key, e);
                    return false;
                }
            }
        };

        self.tiers.write(key, &encoded, options.persistent);
        true
    }

    /// Read a value by key. Absent, undecryptable, and malformed entries
    /// all yield `None`; the distinction is logged, not surfaced.
    pub async fn get<T: DeserializeOwned>(&self, key: &str, options: SlotOptions) -> Option<T> {
        let raw = self.tiers.read(key, options.persistent)?;
        if raw.is_empty() {
            return None;
        }

        match StoredRecord::parse(&raw) {
            StoredRecord::AesGcmV1(payload) => {
                let device_key = self.keys.get_or_create_key().await;
                match cipher::open(&device_key, &payload) {
                    Ok(text) => match serde_json::from_str(&text) {
                        Ok(value) => Some(value),
                        Err(e) => {
                            let err = StashError::from(e);
                            tracing::warn!(
                                "Decrypted entry {} is not valid JSON (code {:?}): {}",
                                key,
                                err.code(),
                                err
                            );
                            None
                        }
                    },
                    Err(e) => {
                        let err = StashError::from(e);
                        tracing::warn!(
                            "Entry {} failed authenticated decryption (code {:?}): {}",
                            key,
                            err.code(),
                            err
                        );
                        None
                    }
                }
            }
            StoredRecord::LegacyXor(payload) => {
                let value = legacy::decode_bytes(&payload);
                if value.is_none() {
                    tracing::warn!("Legacy entry {} could not be decoded", key);
                }
                value
            }
            StoredRecord::Plaintext(text) => {
                if options.encrypted {
                    // Bare pre-tag-era blob on an encrypted channel
                    legacy::deobfuscate(&text)
                } else {
                    match serde_json::from_str(&text) {
                        Ok(value) => Some(value),
                        Err(e) => {
                            tracing::warn!("Stored entry {} is not valid JSON: {}", key, e);
                            None
                        }
                    }
                }
            }
        }
    }

    /// Remove a value by key.
    pub fn remove(&self, key: &str, options: SlotOptions) {
        self.tiers.remove(key, options.persistent);
    }

    /// Check whether a readable value exists under the key. An entry that
    /// cannot be decoded reports false, matching the read behavior.
    pub async fn has(&self, key: &str, options: SlotOptions) -> bool {
        self.get::<serde_json::Value>(key, options).await.is_some()
    }

    /// Keys under the namespace prefix in the addressed tier (including
    /// entries absorbed by the memory fallback).
    pub fn keys(&self, namespace: &str, persistent: bool) -> Vec<String> {
        self.tiers
            .keys(persistent)
            .into_iter()
            .filter(|key| key.starts_with(namespace))
            .collect()
    }

    /// Remove every entry under the namespace prefix. Returns the number
    /// of keys removed. Deletion is always caller-initiated; the subsystem
    /// itself never deletes entries.
    pub fn clear_namespace(&self, namespace: &str, persistent: bool) -> usize {
        let keys = self.keys(namespace, persistent);
        for key in &keys {
            self.tiers.remove(key, persistent);
        }
        keys.len()
    }

    pub(crate) fn tiers(&self) -> &TierSelector {
        &self.tiers
    }

    pub(crate) fn key_manager(&self) -> &KeyManager {
        &self.keys
    }
}
