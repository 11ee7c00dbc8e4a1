//! Stashkit library.
//!
//! Layered secure local storage for small, sensitive, JSON-serializable
//! values (authorization tokens, session flags). Values are encrypted at
//! rest with AES-256-GCM under a device key that is generated once and
//! persisted in a local key database; storage degrades gracefully through
//! a session tier, a persistent tier, and an always-available in-process
//! fallback. Entries written under the pre-encryption obfuscation scheme
//! remain readable and are upgraded in place by a one-shot migration pass.
//!
//! This crate intentionally stays free of ambient global state: the store
//! and its collaborators are explicitly constructed and handed to the
//! facade channels through dependency injection.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use stashkit_lib::{AuthChannel, MigrationPass, SecureStore, AUTH_NAMESPACE};
//!
//! let store = Arc::new(SecureStore::open(session_dir, data_dir));
//!
//! // Upgrade any pre-encryption entries before the first read
//! MigrationPass::new(&store, AUTH_NAMESPACE).run().await;
//!
//! let auth = AuthChannel::new(store.clone());
//! auth.set_auth(&serde_json::json!({"token": "abc123"})).await;
//! let token: Option<serde_json::Value> = auth.get_auth().await;
//! ```

pub mod channels;
pub mod crypto;
pub mod errors;
pub mod keystore;
pub mod migration;
pub mod prelude;
mod record;
mod store;
pub mod tiers;

/// Test utilities for storage testing.
///
/// This module is only available with the `test-utils` feature or in test
/// builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use channels::{AuthChannel, ConfigChannel, AUTH_NAMESPACE, CONFIG_NAMESPACE};
pub use crypto::{CryptoCapability, EncryptionKey, KeyManager, PlatformCapability};
pub use errors::{StashError, StashErrorCode};
pub use keystore::{FileKeyDatabase, InMemoryKeyDatabase, KeyDatabase};
pub use migration::{MigrationPass, MigrationReport, MigrationStatus};
pub use record::StoredRecord;
pub use store::{SecureStore, SlotOptions};
pub use tiers::{FileTier, MemoryTier, TierBackend, TierError, TierSelector};
