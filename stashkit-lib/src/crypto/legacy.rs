//! Legacy obfuscation codec.
//!
//! A reversible transform that XORs the serialized value against a fixed,
//! hardcoded key string and base64-encodes the result. This is NOT
//! cryptographically secure: the key ships in the binary and XOR offers no
//! integrity. It exists only for backward read-compatibility with entries
//! written before the cipher engine existed, and as a last-resort write
//! path when the capability probe reports no secure primitive.

use base64::{engine::general_purpose, Engine as _};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Scheme tag prepended to obfuscated writes. Entries written before the
/// tag existed are bare base64 and are still accepted on read.
pub const SCHEME_TAG: &str = "OBF1";

/// Fixed obfuscation key. Not a secret.
const LEGACY_KEY: &[u8] = b"stash-legacy-obfuscation-key";

/// Codec error for the write path.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("serialization failed: {0}")]
    Serialization(String),
}

fn xor_cyclic(input: &[u8]) -> Vec<u8> {
    input
        .iter()
        .zip(LEGACY_KEY.iter().cycle())
        .map(|(byte, key)| byte ^ key)
        .collect()
}

/// Obfuscate a JSON-serializable value into the tagged encoded form.
pub fn obfuscate<T: Serialize>(value: &T) -> Result<String, CodecError> {
    let plaintext =
        serde_json::to_string(value).map_err(|e| CodecError::Serialization(e.to_string()))?;
    let masked = xor_cyclic(plaintext.as_bytes());
    Ok(format!(
        "{}{}",
        SCHEME_TAG,
        general_purpose::STANDARD.encode(masked)
    ))
}

/// Reverse the obfuscation transform.
///
/// Accepts tagged and bare (pre-tag era) input. On malformed base64 or a
/// result that is not valid JSON, attempts a raw-JSON parse of the input
/// before giving up and returning `None`.
pub fn deobfuscate<T: DeserializeOwned>(encoded: &str) -> Option<T> {
    let body = encoded.strip_prefix(SCHEME_TAG).unwrap_or(encoded);
    if let Ok(masked) = general_purpose::STANDARD.decode(body) {
        if let Some(value) = decode_bytes(&masked) {
            return Some(value);
        }
    }
    // Raw-JSON fallback for entries that were stored unobfuscated
    serde_json::from_str(encoded).ok()
}

/// Decode an already-unwrapped XOR payload (tag and base64 layer stripped
/// at the record boundary).
pub(crate) fn decode_bytes<T: DeserializeOwned>(masked: &[u8]) -> Option<T> {
    let plaintext = xor_cyclic(masked);
    let text = String::from_utf8(plaintext).ok()?;
    serde_json::from_str(&text).ok()
}
