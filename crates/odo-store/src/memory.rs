use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::ledger::{ChangeSet, KeySpace, Versioned};
use crate::traits::Ledger;

/// In-memory, `BTreeMap`-based ledger.
///
/// Intended for tests and embedding. The committed key space sits behind a
/// `RwLock`; a commit validates and applies under the write lock, so readers
/// never observe half of one.
pub struct InMemoryLedger {
    space: RwLock<KeySpace>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            space: RwLock::new(KeySpace::default()),
        }
    }

    /// Number of committed keys.
    pub fn len(&self) -> usize {
        self.space.read().map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted list of committed keys.
    pub fn keys(&self) -> Vec<String> {
        self.space
            .read()
            .map(|s| s.entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Committed bytes at `key`, bypassing any transaction.
    pub fn value(&self, key: &str) -> Option<Vec<u8>> {
        self.space
            .read()
            .ok()
            .and_then(|s| s.get(key).map(|v| v.value.clone()))
    }

    /// Commit a single blind write.
    pub fn seed(&self, key: &str, value: Vec<u8>) -> StoreResult<u64> {
        let mut changes = ChangeSet::new();
        changes.stage_put(key, value);
        self.commit(changes)
    }

    /// Copy of the committed key space.
    pub fn snapshot(&self) -> StoreResult<KeySpace> {
        self.space
            .read()
            .map(|s| s.clone())
            .map_err(|_| StoreError::Backend("ledger read lock poisoned".into()))
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger for InMemoryLedger {
    fn read(&self, key: &str) -> StoreResult<Option<Versioned>> {
        let space = self
            .space
            .read()
            .map_err(|_| StoreError::Backend("ledger read lock poisoned".into()))?;
        Ok(space.get(key).cloned())
    }

    fn commit(&self, changes: ChangeSet) -> StoreResult<u64> {
        let mut space = self
            .space
            .write()
            .map_err(|_| StoreError::Backend("ledger write lock poisoned".into()))?;
        space.apply(changes)
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLedger")
            .field("key_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_key_returns_none() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.read("missing").unwrap().is_none());
    }

    #[test]
    fn seed_and_read() {
        let ledger = InMemoryLedger::new();
        let seq = ledger.seed("k", b"v".to_vec()).unwrap();
        let read = ledger.read("k").unwrap().expect("should exist");
        assert_eq!(read.value, b"v");
        assert_eq!(read.version, seq);
    }

    #[test]
    fn commit_applies_puts_and_deletes_together() {
        let ledger = InMemoryLedger::new();
        ledger.seed("old", b"1".to_vec()).unwrap();

        let mut changes = ChangeSet::new();
        changes.stage_delete("old");
        changes.stage_put("new", b"2".to_vec());
        ledger.commit(changes).unwrap();

        assert_eq!(ledger.keys(), vec!["new".to_string()]);
    }

    #[test]
    fn stale_read_set_fails_whole_commit() {
        let ledger = InMemoryLedger::new();
        ledger.seed("k", b"1".to_vec()).unwrap();

        let mut changes = ChangeSet::new();
        changes.record_read("k", None);
        changes.stage_put("other", b"x".to_vec());
        assert!(matches!(
            ledger.commit(changes),
            Err(StoreError::Conflict { .. })
        ));
        assert!(ledger.value("other").is_none());
    }

    #[test]
    fn default_creates_empty_ledger() {
        let ledger = InMemoryLedger::default();
        assert!(ledger.is_empty());
    }

    #[test]
    fn debug_format() {
        let ledger = InMemoryLedger::new();
        ledger.seed("x", vec![1]).unwrap();
        let debug = format!("{ledger:?}");
        assert!(debug.contains("InMemoryLedger"));
        assert!(debug.contains("key_count"));
    }

    #[test]
    fn concurrent_reads_are_safe() {
        use std::sync::Arc;
        use std::thread;

        let ledger = Arc::new(InMemoryLedger::new());
        ledger.seed("shared", b"data".to_vec()).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    let read = ledger.read("shared").unwrap();
                    assert_eq!(read.map(|v| v.value), Some(b"data".to_vec()));
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }
    }
}
