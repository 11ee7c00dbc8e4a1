//! Key database abstraction for encryption key persistence.
//!
//! The key manager stores exactly one master key, but the database it
//! persists to is injectable so embedders can supply whatever local
//! structured store the platform offers. Two implementations ship with the
//! crate:
//! - In-memory storage (for testing and ephemeral processes)
//! - File-backed storage (a small JSON document in the app data directory)
//!
//! ## Security Considerations
//!
//! - Key material is never logged or exposed through `Debug`
//! - The database holds raw key bytes; the file backend encodes them as
//!   base64 inside the JSON document
//! - Clearing the database is the only way a device loses its key

mod file;
mod memory;
mod traits;

pub use file::FileKeyDatabase;
pub use memory::InMemoryKeyDatabase;
pub use traits::{KeyDatabase, KeyDatabaseError, KeyDatabaseResult};
