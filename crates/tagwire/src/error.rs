//! Codec error types.

use tagwire_buffers::BufferError;
use thiserror::Error;

use crate::types::WireType;

/// Failure while reading wire bytes. Every variant aborts the whole decode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("read past the end of the buffer")]
    OutOfRange,
    #[error("string field is not valid UTF-8")]
    InvalidEncoding,
    #[error("unknown type code {0}")]
    UnknownType(u8),
    #[error("nesting deeper than {0} levels")]
    DepthExceeded(usize),
}

impl From<BufferError> for DecodeError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => DecodeError::OutOfRange,
            BufferError::InvalidUtf8 => DecodeError::InvalidEncoding,
        }
    }
}

/// Failure while writing a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("field `{field}`: value does not match declared type {expected}")]
    TypeMismatch { field: String, expected: WireType },
    #[error("field `{0}`: model value without a nested model descriptor")]
    MissingModel(String),
    #[error("repeated values cannot nest another list")]
    NestedList,
    #[error("map key does not match the map's key kind")]
    MapKeyKind,
    #[error("{0} exceeds the maximum encodable length")]
    LengthOverflow(&'static str),
    #[error("unframed model must be the last value of its enclosing range")]
    UnframedModel,
}

/// Failure while projecting a generic record onto a schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectError {
    #[error("field `{0}`: model value without a nested model descriptor")]
    MissingModel(String),
}

/// Umbrella error for callers chaining several codec steps.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Project(#[from] ProjectError),
}
