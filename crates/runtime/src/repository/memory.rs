//! In-memory SessionRepository implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{RepositoryError, Result, SessionRepository};
use crate::types::{SessionId, SessionRecord};

/// Process-local session store. Nothing survives a restart.
pub struct InMemorySessionRepo {
    records: RwLock<HashMap<SessionId, SessionRecord>>,
}

impl InMemorySessionRepo {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRepository for InMemorySessionRepo {
    fn save(&self, record: &SessionRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        records.insert(record.id(), record.clone());
        Ok(())
    }

    fn load(&self, id: SessionId) -> Result<Option<SessionRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.get(&id).cloned())
    }

    fn exists(&self, id: SessionId) -> bool {
        self.records
            .read()
            .map(|records| records.contains_key(&id))
            .unwrap_or(false)
    }

    fn delete(&self, id: SessionId) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        records.remove(&id);
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<SessionId>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut ids: Vec<SessionId> = records.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    fn len(&self) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.len())
    }
}
