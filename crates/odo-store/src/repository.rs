use odo_types::Reading;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::index::IdIndex;
use crate::traits::{IndexStore, LedgerState, RecordStore};

/// Record store and ID index over a single ledger view.
///
/// Readings live under their vehicle identifier; the index lives under
/// `index_key`. Wrap a [`Transaction`](crate::Transaction) to get
/// per-invocation atomicity, then take it back with
/// [`LedgerRepository::into_inner`] to commit.
#[derive(Debug)]
pub struct LedgerRepository<S> {
    state: S,
    index_key: String,
}

impl<S: LedgerState> LedgerRepository<S> {
    pub fn new(state: S, index_key: impl Into<String>) -> Self {
        Self {
            state,
            index_key: index_key.into(),
        }
    }

    pub fn into_inner(self) -> S {
        self.state
    }

    fn store_index(&mut self, index: &IdIndex) -> StoreResult<()> {
        let bytes = index.to_bytes()?;
        self.state.put(&self.index_key, bytes)
    }
}

impl<S: LedgerState> RecordStore for LedgerRepository<S> {
    fn save(&mut self, reading: &Reading) -> StoreResult<()> {
        let bytes = reading
            .to_bytes()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.state.put(&reading.vehicle_id, bytes)?;
        debug!(id = %reading.vehicle_id, "reading saved");
        Ok(())
    }

    fn retrieve(&mut self, id: &str) -> StoreResult<Reading> {
        let bytes = match self.state.get(id)? {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => return Err(StoreError::RecordNotFound(id.to_string())),
        };
        let reading = Reading::from_bytes(&bytes).map_err(|e| StoreError::CorruptRecord {
            key: id.to_string(),
            reason: e.to_string(),
        })?;
        if reading.vehicle_id != id {
            return Err(StoreError::CorruptRecord {
                key: id.to_string(),
                reason: format!("stored vehicleID {:?} does not match key", reading.vehicle_id),
            });
        }
        Ok(reading)
    }

    fn delete(&mut self, id: &str) -> StoreResult<()> {
        self.retrieve(id)?;
        self.state.delete(id)?;
        debug!(id, "reading deleted");
        Ok(())
    }

    fn exists(&mut self, id: &str) -> StoreResult<bool> {
        Ok(self.state.get(id)?.is_some_and(|bytes| !bytes.is_empty()))
    }
}

impl<S: LedgerState> IndexStore for LedgerRepository<S> {
    fn index_key(&self) -> &str {
        &self.index_key
    }

    fn is_written(&mut self) -> StoreResult<bool> {
        Ok(self.state.get(&self.index_key)?.is_some())
    }

    fn load(&mut self) -> StoreResult<IdIndex> {
        let Some(bytes) = self.state.get(&self.index_key)? else {
            warn!(key = %self.index_key, "ID index has never been written; is the ledger provisioned?");
            return Ok(IdIndex::new());
        };
        IdIndex::from_bytes(&bytes).map_err(|e| StoreError::CorruptIndex {
            key: self.index_key.clone(),
            reason: e.to_string(),
        })
    }

    fn append(&mut self, id: &str) -> StoreResult<()> {
        let mut index = self.load()?;
        index.push(id)?;
        self.store_index(&index)?;
        debug!(id, len = index.len(), "id appended to index");
        Ok(())
    }

    fn remove(&mut self, id: &str) -> StoreResult<()> {
        let mut index = self.load()?;
        index.remove(id)?;
        self.store_index(&index)?;
        debug!(id, len = index.len(), "id removed from index");
        Ok(())
    }

    fn reset(&mut self) -> StoreResult<()> {
        self.state.delete(&self.index_key)?;
        self.store_index(&IdIndex::new())?;
        debug!(key = %self.index_key, "index reset");
        Ok(())
    }
}
