use odo_types::Reading;

use crate::error::StoreResult;
use crate::index::IdIndex;
use crate::ledger::{ChangeSet, Versioned};

/// Committed key space of an external ledger.
///
/// All implementations must satisfy these invariants:
/// - `commit` applies every write of the change set or none of them.
/// - `commit` fails with [`StoreError::Conflict`](crate::StoreError::Conflict)
///   if any key recorded in the change set's read set has a different version
///   than the one recorded (per-key optimistic concurrency).
/// - Versions of written keys strictly increase across commits.
pub trait Ledger: Send + Sync {
    /// Read the committed value and version at `key`.
    fn read(&self, key: &str) -> StoreResult<Option<Versioned>>;

    /// Atomically apply a change set. Returns the commit sequence number.
    fn commit(&self, changes: ChangeSet) -> StoreResult<u64>;
}

/// The get/put/delete primitives available to one invocation.
///
/// `get` takes `&mut self` because implementations record what was read.
pub trait LedgerState {
    fn get(&mut self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    fn put(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    fn delete(&mut self, key: &str) -> StoreResult<()>;
}

/// One reading per ledger key, keyed by vehicle identifier.
pub trait RecordStore {
    /// Serialize `reading` and write it under its vehicle identifier.
    fn save(&mut self, reading: &Reading) -> StoreResult<()>;

    /// Read and decode the reading at `id`.
    ///
    /// Fails with `RecordNotFound` when nothing (or an empty value) is stored
    /// and with `CorruptRecord` when the stored bytes are not a valid reading.
    fn retrieve(&mut self, id: &str) -> StoreResult<Reading>;

    /// Remove the reading at `id` after verifying it exists.
    fn delete(&mut self, id: &str) -> StoreResult<()>;

    /// Returns `true` if any value is stored at `id`.
    fn exists(&mut self, id: &str) -> StoreResult<bool>;
}

/// The single ledger entry listing every live reading identifier.
pub trait IndexStore {
    /// Ledger key the index lives under.
    fn index_key(&self) -> &str;

    /// Returns `true` once the index has been written.
    fn is_written(&mut self) -> StoreResult<bool>;

    /// Load the index. A never-written index reads as empty.
    fn load(&mut self) -> StoreResult<IdIndex>;

    /// Append `id`, failing with `AlreadyIndexed` if it is present.
    fn append(&mut self, id: &str) -> StoreResult<()>;

    /// Remove `id`, failing with `NotIndexed` if it is absent.
    fn remove(&mut self, id: &str) -> StoreResult<()>;

    /// Overwrite the index with an empty sequence.
    fn reset(&mut self) -> StoreResult<()>;
}

/// A record store and an index store sharing one ledger view.
pub trait Repository: RecordStore + IndexStore {}

impl<T: RecordStore + IndexStore> Repository for T {}
