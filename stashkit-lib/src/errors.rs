//! Error types for Stashkit storage operations.
//!
//! Failures inside the storage subsystem never escape to callers as panics
//! or unhandled errors; they are converted to a fallback action or an absent
//! result at the subsystem boundary. These types exist so the conversion
//! points can log precisely and so embedders can inspect codes.

/// Error codes for FFI and mobile integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum StashErrorCode {
    /// Secure random generation or AEAD primitive unavailable
    CapabilityUnavailable = 1000,
    /// Preferred storage tier rejected the operation
    TierUnavailable = 2000,
    /// Authentication tag did not verify on decrypt
    Integrity = 3000,
    /// Stored data could not be (de)serialized
    Serialization = 4000,
    /// Encryption key could not be persisted
    KeyPersistence = 5000,
    /// Internal/unexpected error
    Internal = 9999,
}

/// Comprehensive error type for Stashkit operations.
#[derive(Debug, thiserror::Error)]
pub enum StashError {
    /// The platform cannot perform secure random generation or
    /// authenticated encryption.
    #[error("cryptographic capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// A storage tier rejected a read or write (quota, permissions,
    /// disabled storage).
    #[error("{tier} tier unavailable: {reason}")]
    TierUnavailable {
        /// Tier that failed ("session", "persistent")
        tier: &'static str,
        /// Underlying failure description
        reason: String,
    },

    /// Authenticated decryption failed: the payload was tampered with or
    /// encrypted under a different key.
    #[error("integrity check failed: {0}")]
    Integrity(String),

    /// Stored data was malformed (bad base64, non-UTF-8, invalid JSON).
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The encryption key could not be written to the key database. The
    /// in-memory key remains usable for the rest of the process.
    #[error("key persistence failed: {0}")]
    KeyPersistence(String),

    /// Internal/unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StashError {
    /// Get the error code for FFI/mobile integration.
    pub fn code(&self) -> StashErrorCode {
        match self {
            Self::CapabilityUnavailable(_) => StashErrorCode::CapabilityUnavailable,
            Self::TierUnavailable { .. } => StashErrorCode::TierUnavailable,
            Self::Integrity(_) => StashErrorCode::Integrity,
            Self::Serialization(_) => StashErrorCode::Serialization,
            Self::KeyPersistence(_) => StashErrorCode::KeyPersistence,
            Self::Internal(_) => StashErrorCode::Internal,
        }
    }

    /// Returns true if the operation can proceed through a fallback path
    /// (legacy codec, memory tier, ephemeral key) rather than failing.
    pub fn has_fallback(&self) -> bool {
        matches!(
            self,
            Self::CapabilityUnavailable(_)
                | Self::TierUnavailable { .. }
                | Self::KeyPersistence(_)
        )
    }

    /// Returns true if the stored value is unrecoverable and should surface
    /// to the caller as an absent result.
    pub fn is_data_loss(&self) -> bool {
        matches!(self, Self::Integrity(_) | Self::Serialization(_))
    }
}

impl From<serde_json::Error> for StashError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<crate::crypto::CipherError> for StashError {
    fn from(err: crate::crypto::CipherError) -> Self {
        use crate::crypto::CipherError;
        match err {
            CipherError::IntegrityFailure => Self::Integrity(err.to_string()),
            CipherError::InvalidFormat => Self::Serialization(err.to_string()),
            CipherError::Serialization(msg) => Self::Serialization(msg),
            CipherError::EncryptFailed(msg) => Self::Internal(msg),
        }
    }
}

impl From<crate::tiers::TierError> for StashError {
    fn from(err: crate::tiers::TierError) -> Self {
        Self::TierUnavailable {
            tier: err.tier,
            reason: err.reason,
        }
    }
}

impl From<crate::keystore::KeyDatabaseError> for StashError {
    fn from(err: crate::keystore::KeyDatabaseError) -> Self {
        Self::KeyPersistence(err.to_string())
    }
}
