use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::ledger::{ChangeSet, KeySpace, Versioned};
use crate::traits::Ledger;

/// On-disk form of the key space. Values are hex so the file stays valid
/// JSON whatever bytes a key holds.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    seq: u64,
    entries: BTreeMap<String, SnapshotEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEntry {
    version: u64,
    value: String,
}

impl Snapshot {
    fn from_space(space: &KeySpace) -> Self {
        Self {
            seq: space.seq,
            entries: space
                .entries
                .iter()
                .map(|(k, v)| {
                    (
                        k.clone(),
                        SnapshotEntry {
                            version: v.version,
                            value: hex::encode(&v.value),
                        },
                    )
                })
                .collect(),
        }
    }

    fn into_space(self) -> StoreResult<KeySpace> {
        let mut entries = BTreeMap::new();
        for (key, entry) in self.entries {
            let value = hex::decode(&entry.value).map_err(|e| {
                StoreError::Serialization(format!("value at {key:?} is not hex: {e}"))
            })?;
            entries.insert(
                key,
                Versioned {
                    version: entry.version,
                    value,
                },
            );
        }
        Ok(KeySpace {
            seq: self.seq,
            entries,
        })
    }
}

/// File-backed ledger.
///
/// The whole key space is kept in memory and rewritten to a JSON snapshot
/// on every commit that writes something. The snapshot is written to a
/// temporary file in the same directory and renamed over the old one, so a
/// crash leaves either the previous or the new state on disk.
///
/// One process owns the file at a time; the in-process `Mutex` serializes
/// commits.
pub struct FileLedger {
    path: PathBuf,
    space: Mutex<KeySpace>,
}

impl FileLedger {
    /// Open the ledger at `path`, starting empty if the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let space = if path.exists() {
            let bytes = fs::read(&path)?;
            let snapshot: Snapshot = serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            snapshot.into_space()?
        } else {
            KeySpace::default()
        };
        info!(
            path = %path.display(),
            keys = space.entries.len(),
            seq = space.seq,
            "file ledger opened"
        );
        Ok(Self {
            path,
            space: Mutex::new(space),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, space: &KeySpace) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let encoded = serde_json::to_vec_pretty(&Snapshot::from_space(space))
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(&encoded)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        debug!(path = %self.path.display(), bytes = encoded.len(), "ledger snapshot written");
        Ok(())
    }
}

impl Ledger for FileLedger {
    fn read(&self, key: &str) -> StoreResult<Option<Versioned>> {
        let space = self
            .space
            .lock()
            .map_err(|_| StoreError::Backend("file ledger mutex poisoned".into()))?;
        Ok(space.get(key).cloned())
    }

    fn commit(&self, changes: ChangeSet) -> StoreResult<u64> {
        let mut space = self
            .space
            .lock()
            .map_err(|_| StoreError::Backend("file ledger mutex poisoned".into()))?;
        if changes.is_read_only() {
            return space.apply(changes);
        }
        // Apply to a copy so a failed write leaves memory matching disk.
        let mut next = space.clone();
        let seq = next.apply(changes)?;
        self.persist(&next)?;
        *space = next;
        Ok(seq)
    }
}

impl std::fmt::Debug for FileLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLedger")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Transaction;
    use crate::traits::LedgerState;

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = FileLedger::open(dir.path().join("ledger.json")).unwrap();
        assert!(ledger.read("anything").unwrap().is_none());
        assert!(!ledger.path().exists());
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        {
            let ledger = FileLedger::open(&path).unwrap();
            let mut tx = Transaction::begin(&ledger);
            tx.put("k", b"\x00binary\xff".to_vec()).unwrap();
            tx.put("gone", b"x".to_vec()).unwrap();
            tx.commit().unwrap();

            let mut tx = Transaction::begin(&ledger);
            tx.delete("gone").unwrap();
            tx.commit().unwrap();
        }

        let reopened = FileLedger::open(&path).unwrap();
        let read = reopened.read("k").unwrap().expect("should persist");
        assert_eq!(read.value, b"\x00binary\xff");
        assert_eq!(read.version, 1);
        assert!(reopened.read("gone").unwrap().is_none());
    }

    #[test]
    fn conflicting_commit_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let ledger = FileLedger::open(&path).unwrap();

        let mut stale = Transaction::begin(&ledger);
        assert!(stale.get("k").unwrap().is_none());
        stale.put("k", b"stale".to_vec()).unwrap();

        let mut fresh = Transaction::begin(&ledger);
        fresh.put("k", b"fresh".to_vec()).unwrap();
        fresh.commit().unwrap();
        let before = fs::read(&path).unwrap();

        assert!(matches!(stale.commit(), Err(StoreError::Conflict { .. })));
        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(ledger.read("k").unwrap().unwrap().value, b"fresh");
    }

    #[test]
    fn corrupt_snapshot_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, b"not json").unwrap();
        assert!(matches!(
            FileLedger::open(&path),
            Err(StoreError::Serialization(_))
        ));
    }
}
