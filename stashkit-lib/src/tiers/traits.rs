//! Core trait for storage tier backends.

/// Error type for tier operations (quota exceeded, disabled storage,
/// filesystem failure).
#[derive(Debug, thiserror::Error)]
#[error("{tier} tier: {reason}")]
pub struct TierError {
    /// Tier that produced the error.
    pub tier: &'static str,
    /// Underlying failure description.
    pub reason: String,
}

impl TierError {
    /// Create a tier error.
    pub fn new(tier: &'static str, reason: impl Into<String>) -> Self {
        Self {
            tier,
            reason: reason.into(),
        }
    }
}

/// Result type for tier operations.
pub type TierResult<T> = std::result::Result<T, TierError>;

/// A key→string storage backend with a distinct lifetime contract.
///
/// All operations are synchronous and independently atomic at the backend
/// level; the subsystem never holds a tier resource across a suspension
/// point.
pub trait TierBackend: Send + Sync {
    /// Backend name for routing decisions and log events.
    fn name(&self) -> &'static str;

    /// Read a value, or `None` if the key is absent.
    fn get(&self, key: &str) -> TierResult<Option<String>>;

    /// Write a value, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> TierResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> TierResult<()>;

    /// All keys currently present in this tier.
    fn keys(&self) -> TierResult<Vec<String>>;
}
