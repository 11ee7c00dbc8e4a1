//! Storage tiers and the tier selector.
//!
//! Three tiers with distinct lifetime contracts:
//! - **Session**: a file store rooted in a per-session scratch directory,
//!   discarded with the session
//! - **Persistent**: a file store rooted in the application data
//!   directory, survives restarts
//! - **Memory**: a process-lifetime map, never the first choice, always
//!   available
//!
//! The selector routes each request to the preferred tier from the
//! caller's persistence flag and falls through to memory on failure, so a
//! write never fails from the caller's point of view.

mod file;
mod memory;
mod selector;
mod traits;

pub use file::FileTier;
pub use memory::MemoryTier;
pub use selector::TierSelector;
pub use traits::{TierBackend, TierError, TierResult};
