//! Cryptographic capability probe.

use rand::rngs::OsRng;
use rand::RngCore;

/// Reports whether the platform can perform secure random generation and
/// authenticated symmetric encryption.
///
/// Implementations must be pure and side-effect-free, and are re-evaluated
/// on every call: capability can change across calls in some embedding
/// contexts, so callers never cache the answer.
pub trait CryptoCapability: Send + Sync {
    /// True if the secure primitives are usable right now.
    fn is_available(&self) -> bool;
}

/// Capability probe backed by the operating system's secure random source.
///
/// The AEAD implementation is compiled into the binary, so the gating
/// capability on this platform is the OS entropy source: if it cannot
/// satisfy a draw, neither key generation nor nonce generation is safe and
/// the subsystem must fall back to the legacy codec.
pub struct PlatformCapability;

impl CryptoCapability for PlatformCapability {
    fn is_available(&self) -> bool {
        let mut probe = [0u8; 1];
        OsRng.try_fill_bytes(&mut probe).is_ok()
    }
}
