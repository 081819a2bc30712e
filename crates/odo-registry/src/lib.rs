//! Reading registry for the odometer reading ledger.
//!
//! Readings are keyed by vehicle identifier and listed in a single ID
//! index. The registry keeps the two consistent: a reading exists if and
//! only if its id is indexed, at the end of every successful invocation.
//!
//! # Operations
//!
//! | Name | Effect |
//! |---|---|
//! | `addNewReading(json)` | store a new reading and index it |
//! | `updateReading(json)` | replace a reading; value and date may only move forward |
//! | `removeAllReadings()` | delete every indexed reading and reset the index |
//! | `readReading(id)` | one reading as JSON |
//! | `readAllReadings()` | every reading, in index order, as a JSON array |
//!
//! [`Registry`] hosts these on a [`Ledger`](odo_store::Ledger) and commits
//! each invocation atomically. [`RegistryService`] is the same logic over any
//! [`Repository`](odo_store::Repository).

pub mod config;
pub mod error;
pub mod operation;
pub mod registry;
pub mod service;
pub mod validator;

pub use config::{RegistryConfig, DEFAULT_INDEX_KEY};
pub use error::{ErrorKind, RegistryError, RegistryResult};
pub use operation::Operation;
pub use registry::Registry;
pub use service::RegistryService;
pub use validator::{MonotonicDate, MonotonicValue, UpdateRule, UpdateValidator};
