//! Error types for encoding and decoding.

use tablepack_buffers::BufferError;
use thiserror::Error;

use crate::constants::WireType;
use crate::value::ValueType;

/// Malformed or unsupported MessagePack input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid MessagePack byte 0x{byte:02x} at offset {offset}")]
    InvalidByte { byte: u8, offset: usize },
    #[error("cannot decode MessagePack extension type {0}")]
    UnsupportedExtension(i8),
    #[error("invalid timestamp extension of {0} bytes")]
    InvalidTimestamp(usize),
    #[error("timestamp {seconds}s is outside the representable range")]
    TimestampOutOfRange { seconds: i64 },
    #[error("cannot decode {0} as a table key")]
    InvalidMapKey(WireType),
    #[error("nesting exceeds maximum depth of {0}")]
    DepthLimitExceeded(usize),
}

impl From<BufferError> for DecodeError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => DecodeError::UnexpectedEof,
        }
    }
}

/// A value that cannot be expressed in MessagePack.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("cannot encode recursively nested tables to msgpack")]
    Nested,
    #[error("cannot encode sparse array")]
    SparseArray,
    #[error("cannot encode mixed or invalid key types")]
    InvalidKeys,
    #[error("cannot encode {0} to msgpack")]
    InvalidType(ValueType),
    #[error("nesting exceeds maximum depth of {0}")]
    DepthLimitExceeded(usize),
    #[error("length {0} exceeds the MessagePack 32-bit limit")]
    LengthOverflow(usize),
}
