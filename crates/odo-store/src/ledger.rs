use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{Ledger, LedgerState};

/// A committed value and the commit sequence that last wrote it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned {
    pub version: u64,
    pub value: Vec<u8>,
}

/// Reads and staged writes of one invocation.
///
/// The read set maps each key to the version observed on its first read
/// (`None` if the key was absent). The write set maps each key to its new
/// value, or `None` for a delete.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    reads: BTreeMap<String, Option<u64>>,
    writes: BTreeMap<String, Option<Vec<u8>>>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the version observed for `key`. Later reads do not overwrite it.
    pub fn record_read(&mut self, key: &str, version: Option<u64>) {
        self.reads.entry(key.to_string()).or_insert(version);
    }

    pub fn stage_put(&mut self, key: &str, value: Vec<u8>) {
        self.writes.insert(key.to_string(), Some(value));
    }

    pub fn stage_delete(&mut self, key: &str) {
        self.writes.insert(key.to_string(), None);
    }

    /// The staged state of `key`: `None` if untouched, `Some(None)` if
    /// deleted, `Some(Some(bytes))` if written.
    pub fn staged(&self, key: &str) -> Option<Option<&[u8]>> {
        self.writes.get(key).map(|w| w.as_deref())
    }

    pub fn reads(&self) -> &BTreeMap<String, Option<u64>> {
        &self.reads
    }

    pub fn writes(&self) -> &BTreeMap<String, Option<Vec<u8>>> {
        &self.writes
    }

    /// Returns `true` if nothing is staged for writing.
    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Committed key space shared by the ledger backends.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeySpace {
    /// Sequence number of the last commit that wrote anything.
    pub seq: u64,
    pub entries: BTreeMap<String, Versioned>,
}

impl KeySpace {
    pub fn get(&self, key: &str) -> Option<&Versioned> {
        self.entries.get(key)
    }

    /// Validate the read set, then apply the write set under a new sequence.
    ///
    /// Leaves `self` untouched on conflict.
    pub fn apply(&mut self, changes: ChangeSet) -> StoreResult<u64> {
        for (key, seen) in &changes.reads {
            let current = self.entries.get(key).map(|v| v.version);
            if current != *seen {
                return Err(StoreError::Conflict { key: key.clone() });
            }
        }
        if changes.writes.is_empty() {
            return Ok(self.seq);
        }

        let seq = self.seq + 1;
        for (key, write) in changes.writes {
            match write {
                Some(value) => {
                    self.entries.insert(key, Versioned { version: seq, value });
                }
                None => {
                    self.entries.remove(&key);
                }
            }
        }
        self.seq = seq;
        Ok(seq)
    }
}

/// The ledger view of a single invocation.
///
/// Reads go through to the committed ledger unless the key has been staged,
/// in which case the staged value is returned. Nothing is visible to other
/// invocations until [`Transaction::commit`]; dropping the transaction
/// discards every staged write.
pub struct Transaction<'a> {
    ledger: &'a dyn Ledger,
    changes: ChangeSet,
}

impl<'a> Transaction<'a> {
    pub fn begin(ledger: &'a dyn Ledger) -> Self {
        Self {
            ledger,
            changes: ChangeSet::new(),
        }
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Hand every staged write to the ledger in one atomic commit.
    pub fn commit(self) -> StoreResult<u64> {
        let writes = self.changes.writes.len();
        let reads = self.changes.reads.len();
        let seq = self.ledger.commit(self.changes)?;
        debug!(seq, reads, writes, "transaction committed");
        Ok(seq)
    }

    /// Discard every staged write.
    pub fn rollback(self) {
        debug!(
            writes = self.changes.writes.len(),
            "transaction rolled back"
        );
    }
}

impl LedgerState for Transaction<'_> {
    fn get(&mut self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        if let Some(staged) = self.changes.staged(key) {
            return Ok(staged.map(<[u8]>::to_vec));
        }
        let current = self.ledger.read(key)?;
        self.changes
            .record_read(key, current.as_ref().map(|v| v.version));
        Ok(current.map(|v| v.value))
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        self.changes.stage_put(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StoreResult<()> {
        self.changes.stage_delete(key);
        Ok(())
    }
}

impl std::fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("reads", &self.changes.reads.len())
            .field("writes", &self.changes.writes.len())
            .finish()
    }
}
