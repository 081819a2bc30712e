use std::fmt;

use odo_store::StoreError;
use odo_types::TypeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced to callers of registry operations.
///
/// Every error is terminal for the invocation; its staged writes are
/// discarded.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("this reading already exists: {0}")]
    AlreadyExists(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Corrupt(String),

    #[error("new reading {proposed} is less than current reading {current} - cannot update")]
    ValueRegression { current: String, proposed: String },

    #[error("new date {proposed} is earlier than current date {current} - cannot update")]
    DateRegression { current: String, proposed: String },

    #[error("{0}")]
    InvalidDate(String),

    #[error("{0}")]
    InvalidValue(String),

    #[error("no readings to remove")]
    EmptyIndex,

    #[error("storage failure: {0}")]
    StorageFailure(#[source] StoreError),

    #[error("received unknown function invocation: {0}")]
    UnknownOperation(String),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Corrupt(_) => ErrorKind::Corrupt,
            Self::ValueRegression { .. } => ErrorKind::ValueRegression,
            Self::DateRegression { .. } => ErrorKind::DateRegression,
            Self::InvalidDate(_) => ErrorKind::InvalidDate,
            Self::InvalidValue(_) => ErrorKind::InvalidValue,
            Self::EmptyIndex => ErrorKind::EmptyIndex,
            Self::StorageFailure(_) => ErrorKind::StorageFailure,
            Self::UnknownOperation(_) => ErrorKind::UnknownOperation,
        }
    }
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::RecordNotFound(_) | StoreError::NotIndexed(_) => {
                Self::NotFound(err.to_string())
            }
            StoreError::CorruptRecord { .. }
            | StoreError::CorruptIndex { .. }
            | StoreError::AlreadyIndexed(_) => Self::Corrupt(err.to_string()),
            other => Self::StorageFailure(other),
        }
    }
}

impl From<TypeError> for RegistryError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidDate { .. } => Self::InvalidDate(err.to_string()),
            TypeError::InvalidValue { .. } => Self::InvalidValue(err.to_string()),
            other => Self::MalformedInput(other.to_string()),
        }
    }
}

/// Classification of a [`RegistryError`], stable across message changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    MalformedInput,
    AlreadyExists,
    NotFound,
    Corrupt,
    ValueRegression,
    DateRegression,
    InvalidDate,
    InvalidValue,
    EmptyIndex,
    StorageFailure,
    UnknownOperation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedInput => "MalformedInput",
            Self::AlreadyExists => "AlreadyExists",
            Self::NotFound => "NotFound",
            Self::Corrupt => "Corrupt",
            Self::ValueRegression => "ValueRegression",
            Self::DateRegression => "DateRegression",
            Self::InvalidDate => "InvalidDate",
            Self::InvalidValue => "InvalidValue",
            Self::EmptyIndex => "EmptyIndex",
            Self::StorageFailure => "StorageFailure",
            Self::UnknownOperation => "UnknownOperation",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;
