//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits for
//! quick setup. Import everything with:
//!
//! ```rust,ignore
//! use stashkit_lib::prelude::*;
//! ```
//!
//! ## What's Included
//!
//! - Store and options: `SecureStore`, `SlotOptions`
//! - Facade channels: `AuthChannel`, `ConfigChannel`
//! - Migration: `MigrationPass`, `MigrationReport`, `MigrationStatus`
//! - Error types: `StashError`, `StashErrorCode`
//! - Injection seams: `CryptoCapability`, `KeyDatabase`, `TierBackend`

// Store root and per-call policy
pub use crate::store::{SecureStore, SlotOptions};

// Facade channels
pub use crate::channels::{AuthChannel, ConfigChannel, AUTH_NAMESPACE, CONFIG_NAMESPACE};

// Migration pass
pub use crate::migration::{MigrationPass, MigrationReport, MigrationStatus};

// Error handling
pub use crate::errors::{StashError, StashErrorCode};

// Crypto seams
pub use crate::crypto::{CryptoCapability, EncryptionKey, KeyManager, PlatformCapability};

// Key database backends
pub use crate::keystore::{FileKeyDatabase, InMemoryKeyDatabase, KeyDatabase};

// Storage tiers
pub use crate::tiers::{FileTier, MemoryTier, TierBackend, TierSelector};
