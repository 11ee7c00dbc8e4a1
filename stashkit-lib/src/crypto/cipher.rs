//! AES-256-GCM cipher engine for stored values.
//!
//! # Security Properties
//!
//! - **Confidentiality**: AES-256 encryption prevents casual inspection
//! - **Integrity**: GCM authentication tag detects tampering
//! - **Unique Nonces**: a fresh random 96-bit nonce is drawn per write, so
//!   nonce reuse under a given key never occurs
//!
//! # Encoded Form
//!
//! ```text
//! "AGV1" || base64( [12 bytes nonce][N bytes ciphertext][16 bytes auth tag] )
//! ```
//!
//! The four-character scheme tag makes the scheme recoverable from the
//! stored string alone, with no out-of-band metadata.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose, Engine as _};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::key_manager::EncryptionKey;

/// Scheme tag prepended to every cipher engine output.
pub const SCHEME_TAG: &str = "AGV1";

/// Size of the nonce in bytes (96 bits for GCM).
const NONCE_SIZE: usize = 12;

/// Size of the authentication tag in bytes.
const TAG_SIZE: usize = 16;

/// Cipher engine error types.
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    EncryptFailed(String),
    #[error("authentication tag did not verify")]
    IntegrityFailure,
    #[error("invalid ciphertext format")]
    InvalidFormat,
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Result type for cipher operations.
pub type CipherResult<T> = Result<T, CipherError>;

/// Encrypt a JSON-serializable value into the tagged encoded form.
///
/// Serializes the value to its canonical JSON string, draws a fresh random
/// 96-bit nonce, seals with AES-256-GCM, and encodes `nonce || ciphertext`
/// as base64 behind the scheme tag.
pub fn encrypt<T: Serialize>(key: &EncryptionKey, value: &T) -> CipherResult<String> {
    let plaintext =
        serde_json::to_string(value).map_err(|e| CipherError::Serialization(e.to_string()))?;

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CipherError::EncryptFailed(e.to_string()))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|e| CipherError::EncryptFailed(e.to_string()))?;

    let mut payload = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    payload.extend_from_slice(&nonce_bytes);
    payload.extend_from_slice(&ciphertext);

    Ok(format!(
        "{}{}",
        SCHEME_TAG,
        general_purpose::STANDARD.encode(payload)
    ))
}

/// Decrypt a tagged encoded string back to the original value.
///
/// # Errors
///
/// - `InvalidFormat` if the tag is missing, the base64 is malformed, or the
///   payload is shorter than nonce + tag
/// - `IntegrityFailure` if the authentication tag does not verify (payload
///   tampered or wrong key), never a best-effort partial decode
/// - `Serialization` if the decrypted bytes are not the canonical JSON form
pub fn decrypt<T: DeserializeOwned>(key: &EncryptionKey, encoded: &str) -> CipherResult<T> {
    let body = encoded
        .strip_prefix(SCHEME_TAG)
        .ok_or(CipherError::InvalidFormat)?;
    let payload = general_purpose::STANDARD
        .decode(body)
        .map_err(|_| CipherError::InvalidFormat)?;
    let text = open(key, &payload)?;
    serde_json::from_str(&text).map_err(|e| CipherError::Serialization(e.to_string()))
}

/// Authenticated decryption of a raw `nonce || ciphertext` payload.
///
/// Used by the read path after the scheme tag and base64 layer have been
/// stripped at the record boundary.
pub(crate) fn open(key: &EncryptionKey, payload: &[u8]) -> CipherResult<String> {
    if payload.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CipherError::InvalidFormat);
    }

    let (nonce_bytes, encrypted_data) = payload.split_at(NONCE_SIZE);

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CipherError::EncryptFailed(e.to_string()))?;

    let nonce = Nonce::from_slice(nonce_bytes);
    let plaintext = cipher
        .decrypt(nonce, encrypted_data)
        .map_err(|_| CipherError::IntegrityFailure)?;

    String::from_utf8(plaintext).map_err(|e| CipherError::Serialization(e.to_string()))
}
