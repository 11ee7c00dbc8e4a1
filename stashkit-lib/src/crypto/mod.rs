//! Cryptographic components: capability probing, key lifecycle, the
//! AES-256-GCM cipher engine, and the legacy obfuscation codec kept for
//! backward read-compatibility.

mod capability;
pub mod cipher;
mod key_manager;
pub mod legacy;

pub use capability::{CryptoCapability, PlatformCapability};
pub use cipher::CipherError;
pub use key_manager::{EncryptionKey, KeyManager, MASTER_KEY_ID};
