//! Foundation types for the odometer reading ledger.
//!
//! Every other `odo-*` crate depends on `odo-types`. The types here know
//! nothing about storage; they define the record shape, its wire format, and
//! the ordering rules used when a reading is replaced.
//!
//! # Key Types
//!
//! - [`Reading`]: the ledger record keyed by vehicle identifier
//! - [`ReadingValue`]: numeric reading carried as a string on the wire
//! - [`ReadingDate`]: calendar date carried as `MM/DD/YYYY` on the wire

pub mod date;
pub mod error;
pub mod reading;
pub mod value;

pub use date::{ReadingDate, DATE_FORMAT};
pub use error::TypeError;
pub use reading::{Reading, DOC_TYPE, REQUIRED_FIELDS};
pub use value::ReadingValue;
