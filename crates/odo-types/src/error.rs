use thiserror::Error;

/// Errors produced while parsing readings and their fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("input is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("input JSON is not an object")]
    NotAnObject,

    #[error("input JSON does not comply to schema: missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid reading value `{value}`")]
    InvalidValue { value: String },

    #[error("invalid date `{value}`: {reason}")]
    InvalidDate { value: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}
