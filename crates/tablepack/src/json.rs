//! Conversion between [`Value`] and `serde_json::Value`.
//!
//! Importing JSON is treated as decoding: objects become tables tagged
//! [`ContainerKind::Map`], arrays become tables tagged
//! [`ContainerKind::Array`]. Exporting goes through the same
//! classification and cycle rules as the MessagePack encoder.

use std::collections::HashSet;

use serde_json::{Map, Number};

use crate::classify::{classify, Container};
use crate::constants::MAX_SAFE_INTEGER;
use crate::error::EncodeError;
use crate::options::DEFAULT_MAX_DEPTH;
use crate::value::{ContainerKind, Table, Value};

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s.into_bytes()),
            serde_json::Value::Array(arr) => {
                let table = Table::with_kind(ContainerKind::Array);
                for (index, item) in (1usize..).zip(arr) {
                    table.set(index, Value::from(item));
                }
                Value::Table(table)
            }
            serde_json::Value::Object(obj) => {
                let table = Table::with_kind(ContainerKind::Map);
                for (key, item) in obj {
                    table.set(key, Value::from(item));
                }
                Value::Table(table)
            }
        }
    }
}

/// Converts `value` to JSON.
///
/// Integral numbers within ±(2^53 - 1) other than `-0.0` become JSON
/// integers, non-finite numbers become `null`, and strings that are not
/// UTF-8 are converted lossily.
pub fn to_json(value: &Value) -> Result<serde_json::Value, EncodeError> {
    let mut exporter = JsonExporter {
        visiting: HashSet::new(),
        max_depth: DEFAULT_MAX_DEPTH,
    };
    exporter.convert(value, 0)
}

struct JsonExporter {
    visiting: HashSet<usize>,
    max_depth: usize,
}

impl JsonExporter {
    fn convert(&mut self, value: &Value, depth: usize) -> Result<serde_json::Value, EncodeError> {
        Ok(match value {
            Value::Nil => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(String::from_utf8_lossy(s).into_owned()),
            Value::Table(table) => {
                let id = table.id();
                if !self.visiting.insert(id) {
                    return Err(EncodeError::Nested);
                }
                let result = self.convert_table(table, depth + 1);
                self.visiting.remove(&id);
                result?
            }
            Value::Handle(handle) => return Err(EncodeError::InvalidType(handle.value_type())),
        })
    }

    fn convert_table(&mut self, table: &Table, depth: usize) -> Result<serde_json::Value, EncodeError> {
        if depth > self.max_depth {
            return Err(EncodeError::DepthLimitExceeded(self.max_depth));
        }
        match classify(table)? {
            Container::Array(items) => items
                .iter()
                .map(|item| self.convert(item, depth))
                .collect::<Result<Vec<_>, _>>()
                .map(serde_json::Value::Array),
            Container::Object(pairs) => {
                let mut obj = Map::with_capacity(pairs.len());
                for (key, item) in &pairs {
                    let key = String::from_utf8_lossy(key).into_owned();
                    obj.insert(key, self.convert(item, depth)?);
                }
                Ok(serde_json::Value::Object(obj))
            }
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    let negative_zero = n == 0.0 && n.is_sign_negative();
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER && !negative_zero {
        return serde_json::Value::from(n as i64);
    }
    Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn import_tags_containers() {
        let v = Value::from(json!({"list": [], "obj": {}}));
        let t = v.as_table().unwrap();
        assert_eq!(t.kind(), Some(ContainerKind::Map));
        let list = t.get("list").unwrap();
        assert_eq!(list.as_table().unwrap().kind(), Some(ContainerKind::Array));
        let obj = t.get("obj").unwrap();
        assert_eq!(obj.as_table().unwrap().kind(), Some(ContainerKind::Map));
    }

    #[test]
    fn export_round_trips_json() {
        let source = json!({"a": [1, 2.5, null, true], "b": {}, "c": [], "d": "x"});
        let v = Value::from(source.clone());
        assert_eq!(to_json(&v).unwrap(), source);
    }

    #[test]
    fn export_non_finite_is_null() {
        assert_eq!(to_json(&Value::from(f64::NAN)).unwrap(), json!(null));
        assert_eq!(to_json(&Value::from(f64::INFINITY)).unwrap(), json!(null));
    }

    #[test]
    fn export_keeps_negative_zero() {
        let exported = to_json(&Value::from(-0.0)).unwrap();
        assert!(exported.is_f64());
        assert!(exported.as_f64().unwrap().is_sign_negative());
        assert_eq!(to_json(&Value::from(0.0)).unwrap(), json!(0));
    }

    #[test]
    fn export_rejects_cycles() {
        let t = Table::new();
        t.set("self", Value::Table(t.clone()));
        assert_eq!(to_json(&Value::Table(t)), Err(EncodeError::Nested));
    }

    #[test]
    fn export_rejects_sparse() {
        let t = Table::object([(1, Value::Nil), (3, Value::Nil)]);
        assert_eq!(to_json(&Value::Table(t)), Err(EncodeError::SparseArray));
    }
}
