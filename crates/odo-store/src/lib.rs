//! Ledger-backed storage for the odometer reading ledger.
//!
//! The ledger is an external key-value service. This crate models its
//! contract and builds the two stores the registry needs on top of it.
//!
//! # Ledger primitives
//!
//! Every backend implements [`Ledger`]: versioned point reads and an atomic
//! [`ChangeSet`] commit. One invocation runs inside a [`Transaction`], which
//! exposes the `get`/`put`/`delete` primitives through [`LedgerState`],
//! stages writes, and hands them to the ledger in a single commit.
//!
//! - [`InMemoryLedger`]: `BTreeMap`-based ledger for tests and embedding
//! - [`FileLedger`]: JSON snapshot on disk, rewritten atomically per commit
//!
//! # Stores
//!
//! - [`RecordStore`]: one [`Reading`](odo_types::Reading) per key
//! - [`IndexStore`]: the single [`IdIndex`] entry listing live keys
//!
//! [`LedgerRepository`] implements both over any [`LedgerState`].
//!
//! # Concurrency
//!
//! Backends provide per-key optimistic concurrency: a commit fails with
//! [`StoreError::Conflict`] if any key the invocation read has changed since.
//! The store itself holds no locks across an invocation.

pub mod error;
pub mod file;
pub mod index;
pub mod ledger;
pub mod memory;
pub mod repository;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileLedger;
pub use index::IdIndex;
pub use ledger::{ChangeSet, KeySpace, Transaction, Versioned};
pub use memory::InMemoryLedger;
pub use repository::LedgerRepository;
pub use traits::{IndexStore, Ledger, LedgerState, RecordStore, Repository};
