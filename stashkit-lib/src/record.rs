//! Stored record encoding.
//!
//! Every persisted entry is a string whose scheme is recoverable from a
//! fixed four-character prefix, with no out-of-band metadata. Parsing
//! happens once at the read boundary; the resulting sum type is matched
//! exhaustively by the store.

use base64::{engine::general_purpose, Engine as _};

use crate::crypto::{cipher, legacy};

/// A persisted entry, parsed by scheme prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredRecord {
    /// `AGV1`-tagged authenticated ciphertext: `nonce || ciphertext + tag`.
    AesGcmV1(Vec<u8>),
    /// `OBF1`-tagged XOR-masked bytes.
    LegacyXor(Vec<u8>),
    /// Untagged text: raw JSON on the configuration channel, or a bare
    /// pre-tag-era legacy blob on encrypted channels.
    Plaintext(String),
}

impl StoredRecord {
    /// Parse a raw stored string by its scheme prefix.
    ///
    /// A tagged entry whose base64 layer is malformed falls through to
    /// `Plaintext`; the decode paths downstream then treat it as
    /// unrecoverable rather than erroring here.
    pub fn parse(raw: &str) -> StoredRecord {
        if let Some(body) = raw.strip_prefix(cipher::SCHEME_TAG) {
            if let Ok(payload) = general_purpose::STANDARD.decode(body) {
                return StoredRecord::AesGcmV1(payload);
            }
        }
        if let Some(body) = raw.strip_prefix(legacy::SCHEME_TAG) {
            if let Ok(payload) = general_purpose::STANDARD.decode(body) {
                return StoredRecord::LegacyXor(payload);
            }
        }
        StoredRecord::Plaintext(raw.to_string())
    }

    /// Scheme name for log events.
    pub fn scheme(&self) -> &'static str {
        match self {
            StoredRecord::AesGcmV1(_) => "AES-GCM-V1",
            StoredRecord::LegacyXor(_) => "LEGACY-XOR",
            StoredRecord::Plaintext(_) => "PLAINTEXT",
        }
    }

    /// True if the raw string carries the cipher engine's scheme tag.
    /// Used by the migration pass for idempotence detection.
    pub fn is_current_scheme(raw: &str) -> bool {
        raw.starts_with(cipher::SCHEME_TAG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{legacy, EncryptionKey};
    use serde_json::json;

    #[test]
    fn test_cipher_output_parses_as_aes() {
        let key = EncryptionKey::from_bytes(&[1u8; 32]).unwrap();
        let encoded = crate::crypto::cipher::encrypt(&key, &json!("v")).unwrap();

        let record = StoredRecord::parse(&encoded);
        assert!(matches!(record, StoredRecord::AesGcmV1(_)));
        assert_eq!(record.scheme(), "AES-GCM-V1");
        assert!(StoredRecord::is_current_scheme(&encoded));
    }

    #[test]
    fn test_legacy_output_parses_as_legacy() {
        let encoded = legacy::obfuscate(&json!("v")).unwrap();

        let record = StoredRecord::parse(&encoded);
        assert!(matches!(record, StoredRecord::LegacyXor(_)));
        assert!(!StoredRecord::is_current_scheme(&encoded));
    }

    #[test]
    fn test_detection_is_prefix_only() {
        // The two codecs never claim each other's output, and raw JSON
        // claims neither
        let key = EncryptionKey::from_bytes(&[1u8; 32]).unwrap();
        let aes = crate::crypto::cipher::encrypt(&key, &json!({"a": 1})).unwrap();
        let xor = legacy::obfuscate(&json!({"a": 1})).unwrap();

        assert!(matches!(StoredRecord::parse(&aes), StoredRecord::AesGcmV1(_)));
        assert!(matches!(StoredRecord::parse(&xor), StoredRecord::LegacyXor(_)));
        assert!(matches!(
            StoredRecord::parse(r#"{"a": 1}"#),
            StoredRecord::Plaintext(_)
        ));
    }

    #[test]
    fn test_tagged_but_malformed_base64_is_plaintext() {
        let record = StoredRecord::parse("AGV1 this is not base64");
        assert!(matches!(record, StoredRecord::Plaintext(_)));
    }
}
