//! Persistence provider abstraction.
//!
//! The core persists three named blobs: the replica, the conflict ledger, and
//! the selected category filter. Backends only need to get and set bytes by
//! key; a missing key loads as `None`.

mod memory;

use std::future::Future;

use crate::Result;

pub use memory::MemoryBlobStore;

/// Key holding the replica (JSON array of quotes)
pub const QUOTES_KEY: &str = "quotes";

/// Key holding open conflicts (JSON array of conflicts)
pub const CONFLICTS_KEY: &str = "conflicts";

/// Key holding the selected category filter (JSON string)
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";

/// Named blob persistence.
///
/// Methods return `Send` futures so a store can be driven from a spawned
/// tokio task.
pub trait BlobStore: Send + Sync + 'static {
    /// Read the blob stored under `key`
    fn load(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Store `bytes` under `key`, replacing any previous value
    fn save(&self, key: &str, bytes: Vec<u8>) -> impl Future<Output = Result<()>> + Send;
}
