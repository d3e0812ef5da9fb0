//! Store trait definitions

use serde::{Deserialize, Serialize};
use tally_api::HistoryEntry;

use crate::StoreResult;

/// Fixed key the counter state is persisted under
pub const COUNTER_STORAGE_KEY: &str = "counter-storage";

/// Durable storage provider: JSON blobs addressed by string key.
///
/// Writes are best-effort from the caller's point of view; a failed write
/// must never corrupt previously stored data.
pub trait Store: Send + Sync {
    /// Read a previously written blob, or `None` if the key is absent
    fn read_blob(&self, key: &str) -> StoreResult<Option<serde_json::Value>>;

    /// Write a blob under the given key, replacing any previous value
    fn write_blob(&self, key: &str, value: &serde_json::Value) -> StoreResult<()>;

    /// Check if the store is healthy
    fn is_healthy(&self) -> bool;
}

/// Persisted counter state.
///
/// Bounds are configuration and are never persisted; `history` is
/// most-recent-first, exactly as held in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub count: i64,
    pub history: Vec<HistoryEntry>,
}
