//! Test utilities for storage testing.
//!
//! This module is only available with the `test-utils` feature or in test
//! builds.

use std::sync::Arc;

use crate::crypto::CryptoCapability;
use crate::keystore::{InMemoryKeyDatabase, KeyDatabase, KeyDatabaseError, KeyDatabaseResult};
use crate::store::SecureStore;
use crate::tiers::{MemoryTier, TierBackend, TierError, TierResult};

/// Capability probe that always answers the same way.
pub struct FixedCapability(pub bool);

impl CryptoCapability for FixedCapability {
    fn is_available(&self) -> bool {
        self.0
    }
}

/// Tier backend that rejects every operation, standing in for quota
/// exhaustion or disabled storage.
pub struct FailingTier {
    name: &'static str,
}

impl FailingTier {
    /// Create a failing backend reporting the given tier name.
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }

    fn error(&self) -> TierError {
        TierError::new(self.name, "storage disabled")
    }
}

impl TierBackend for FailingTier {
    fn name(&self) -> &'static str {
        self.name
    }
    fn get(&self, _key: &str) -> TierResult<Option<String>> {
        Err(self.error())
    }
    fn set(&self, _key: &str, _value: &str) -> TierResult<()> {
        Err(self.error())
    }
    fn remove(&self, _key: &str) -> TierResult<()> {
        Err(self.error())
    }
    fn keys(&self) -> TierResult<Vec<String>> {
        Err(self.error())
    }
}

/// Key database whose writes always fail, standing in for a store without
/// quota. Reads report no key present.
pub struct ReadOnlyKeyDatabase;

#[async_trait::async_trait]
impl KeyDatabase for ReadOnlyKeyDatabase {
    async fn retrieve(&self, _key_id: &str) -> KeyDatabaseResult<Option<Vec<u8>>> {
        Ok(None)
    }
    async fn store(&self, _key_id: &str, _material: &[u8]) -> KeyDatabaseResult<()> {
        Err(KeyDatabaseError::Unavailable("quota exceeded".into()))
    }
    async fn delete(&self, _key_id: &str) -> KeyDatabaseResult<()> {
        Ok(())
    }
}

/// Fully in-memory store with real crypto: memory-backed tiers and key
/// database, platform capability probe.
pub fn memory_store() -> SecureStore {
    store_with_capability(FixedCapability(true))
}

/// In-memory store with the given capability probe.
pub fn store_with_capability(capability: FixedCapability) -> SecureStore {
    SecureStore::new(
        Box::new(capability),
        Arc::new(InMemoryKeyDatabase::new()),
        Box::new(MemoryTier::new()),
        Box::new(MemoryTier::new()),
    )
}
