//! The `msgpack` function table exposed to scripts.
//!
//! Functions follow the runtime's calling convention: they take their
//! arguments as a slice and return their results as a list. Failures never
//! raise; they return `nil` followed by the error message.

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::value::{Handle, HandleKind, Table, Value};

pub const MODULE_NAME: &str = "msgpack";

/// A native function callable from scripts.
pub type NativeFunction = fn(&[Value]) -> Vec<Value>;

pub const API: &[(&str, NativeFunction)] = &[("encode", encode), ("decode", decode)];

/// Builds the module table: each API entry stored as a function handle.
pub fn loader() -> Table {
    let module = Table::new();
    for (name, function) in API {
        module.set(*name, Value::Handle(Handle::new(HandleKind::Function, *function)));
    }
    module
}

fn failure(message: impl ToString) -> Vec<Value> {
    vec![Value::Nil, Value::from(message.to_string())]
}

/// `msgpack.encode(value)` returns the encoded string, or `nil, err`.
pub fn encode(args: &[Value]) -> Vec<Value> {
    let nil = Value::Nil;
    let value = args.first().unwrap_or(&nil);
    match Encoder::new().encode(value) {
        Ok(bytes) => vec![Value::String(bytes)],
        Err(err) => failure(err),
    }
}

/// `msgpack.decode(data)` returns the decoded value, or `nil, err`.
pub fn decode(args: &[Value]) -> Vec<Value> {
    let data = match args.first() {
        Some(Value::String(data)) => data,
        other => {
            let got = other.map_or("no value", |v| v.type_of().name());
            return failure(format!(
                "bad argument #1 to decode (string expected, got {got})"
            ));
        }
    };
    match Decoder::new().decode(data) {
        Ok(value) => vec![value],
        Err(err) => failure(err),
    }
}
