//! Lossless conversion between a scripting runtime's generic table values
//! and MessagePack.
//!
//! The runtime has a single container type, [`Table`], that serves as both
//! array and object and may reference itself. MessagePack distinguishes
//! arrays from maps and cannot express cycles. This crate bridges the two:
//!
//! - [`decode`] turns MessagePack bytes into a [`Value`] tree, tagging
//!   tables that came from wire maps so empty maps stay maps.
//! - [`encode`] classifies every table as an array or an object, rejects
//!   cycles, sparse arrays and mixed keys, and writes object keys in sorted
//!   order so equal values always produce identical bytes.
//!
//! # Example
//!
//! ```
//! use tablepack::{decode, encode, Table, Value};
//!
//! let point = Table::object([("x", Value::from(1)), ("y", Value::from(2))]);
//! let bytes = encode(&Value::Table(point.clone())).unwrap();
//! assert_eq!(bytes[0], 0x82);
//! assert_eq!(decode(&bytes).unwrap(), Value::Table(point));
//! ```

pub mod classify;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod module;
pub mod options;
pub mod timestamp;
pub mod value;

pub use classify::{classify, Container};
pub use constants::WireType;
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{DecodeError, EncodeError};
pub use json::to_json;
pub use options::{DecoderOptions, EncoderOptions, DEFAULT_MAX_DEPTH};
pub use timestamp::Timestamp;
pub use value::{ContainerKind, Handle, HandleKind, Key, Table, Value, ValueType};

/// Encode with default options: every number as float64.
pub fn encode(value: &Value) -> Result<Vec<u8>, EncodeError> {
    Encoder::new().encode(value)
}

pub fn encode_with(value: &Value, options: EncoderOptions) -> Result<Vec<u8>, EncodeError> {
    Encoder::with_options(options).encode(value)
}

/// Decode the first MessagePack item in `data`.
pub fn decode(data: &[u8]) -> Result<Value, DecodeError> {
    Decoder::new().decode(data)
}

pub fn decode_with(data: &[u8], options: DecoderOptions) -> Result<Value, DecodeError> {
    Decoder::with_options(options).decode(data)
}
