//! Facade channels.
//!
//! Thin fixed-policy wrappers over the secure store. Each channel bakes in
//! an `{encrypted, persistent}` policy and a key-namespace prefix and
//! performs no logic beyond delegation. Channels are handed a shared store
//! rather than reaching for ambient global state.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::store::{SecureStore, SlotOptions};

/// Namespace prefix for authorization entries.
pub const AUTH_NAMESPACE: &str = "auth.";

/// Namespace prefix for configuration entries.
pub const CONFIG_NAMESPACE: &str = "config.";

/// Slot key holding the authorization value.
const AUTH_SLOT: &str = "authorized";

/// Authorization channel: encrypted, session-scoped, single fixed slot.
pub struct AuthChannel {
    store: Arc<SecureStore>,
}

impl AuthChannel {
    /// Create the channel over a shared store.
    pub fn new(store: Arc<SecureStore>) -> Self {
        Self { store }
    }

    fn options() -> SlotOptions {
        SlotOptions::new().encrypted()
    }

    fn slot_key() -> String {
        format!("{}{}", AUTH_NAMESPACE, AUTH_SLOT)
    }

    /// Encrypt and store the authorization value.
    pub async fn set_auth<T: Serialize>(&self, value: &T) -> bool {
        self.store.set(&Self::slot_key(), value, Self::options()).await
    }

    /// Read the authorization value, decrypting or legacy-decoding as the
    /// stored scheme dictates.
    pub async fn get_auth<T: DeserializeOwned>(&self) -> Option<T> {
        self.store.get(&Self::slot_key(), Self::options()).await
    }

    /// Remove the authorization value.
    pub fn remove_auth(&self) {
        self.store.remove(&Self::slot_key(), Self::options());
    }

    /// Check whether a readable authorization value exists.
    pub async fn has_auth(&self) -> bool {
        self.store.has(&Self::slot_key(), Self::options()).await
    }
}

/// Configuration channel: plaintext, persistent, caller-keyed.
pub struct ConfigChannel {
    store: Arc<SecureStore>,
}

impl ConfigChannel {
    /// Create the channel over a shared store.
    pub fn new(store: Arc<SecureStore>) -> Self {
        Self { store }
    }

    fn options() -> SlotOptions {
        SlotOptions::new().persistent()
    }

    fn prefixed(key: &str) -> String {
        format!("{}{}", CONFIG_NAMESPACE, key)
    }

    /// Store a configuration value as raw JSON.
    pub async fn set_config<T: Serialize>(&self, key: &str, value: &T) -> bool {
        self.store.set(&Self::prefixed(key), value, Self::options()).await
    }

    /// Read a configuration value.
    pub async fn get_config<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.store.get(&Self::prefixed(key), Self::options()).await
    }

    /// Remove a configuration value.
    pub fn remove_config(&self, key: &str) {
        self.store.remove(&Self::prefixed(key), Self::options());
    }

    /// Check whether a configuration value exists.
    pub async fn has_config(&self, key: &str) -> bool {
        self.store.has(&Self::prefixed(key), Self::options()).await
    }
}
