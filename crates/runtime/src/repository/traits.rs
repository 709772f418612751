//! Repository contract for storing per-player session records.

use super::Result;
use crate::types::{SessionId, SessionRecord};

/// Store of session records keyed by session id.
///
/// The runtime writes a record through after every committed mutation, so a
/// repository always holds the latest state of each session. Eviction,
/// expiry, and durability policies belong to the implementation and to the
/// runtime's sweeper, not to the farm rules.
pub trait SessionRepository: Send + Sync {
    /// Insert or replace the record for `record.id()`.
    fn save(&self, record: &SessionRecord) -> Result<()>;

    /// Load a record by id.
    fn load(&self, id: SessionId) -> Result<Option<SessionRecord>>;

    /// Check if a record exists
    fn exists(&self, id: SessionId) -> bool;

    /// Delete a record. Deleting a missing id is not an error.
    fn delete(&self, id: SessionId) -> Result<()>;

    /// List all stored session ids
    fn list_ids(&self) -> Result<Vec<SessionId>>;

    /// Number of stored records.
    fn len(&self) -> Result<usize> {
        self.list_ids().map(|ids| ids.len())
    }
}
