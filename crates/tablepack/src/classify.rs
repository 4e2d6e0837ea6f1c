//! Encode-time classification of a generic [`Table`] into an array or an
//! object.
//!
//! The wire format distinguishes arrays from maps, tables do not. The
//! decision is made from the table's keys in [`Key`] order:
//!
//! - no keys: the origin tag decides, untagged tables become empty arrays
//! - first key numeric: keys must be exactly `1..=N`
//! - first key a string: every key must be a string
//! - anything else is rejected

use crate::error::EncodeError;
use crate::value::{ContainerKind, Key, Table, Value};

/// A table after classification.
#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    /// Elements in index order.
    Array(Vec<Value>),
    /// String-keyed pairs in ascending bytewise key order.
    Object(Vec<(Vec<u8>, Value)>),
}

impl Container {
    pub fn len(&self) -> usize {
        match self {
            Container::Array(items) => items.len(),
            Container::Object(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classifies `table` as an array or an object.
///
/// Fails with [`EncodeError::SparseArray`] when numeric keys leave a gap
/// and with [`EncodeError::InvalidKeys`] when key types are mixed or
/// unsupported. Nothing is returned on failure.
pub fn classify(table: &Table) -> Result<Container, EncodeError> {
    let entries = table.entries();
    let first = match entries.first() {
        Some((key, _)) => key.clone(),
        None => {
            return Ok(match table.kind() {
                Some(ContainerKind::Map) => Container::Object(Vec::new()),
                _ => Container::Array(Vec::new()),
            })
        }
    };
    match first {
        Key::Number(_) => classify_array(entries),
        Key::String(_) => classify_object(entries),
        Key::Bool(_) => Err(EncodeError::InvalidKeys),
    }
}

fn classify_array(entries: Vec<(Key, Value)>) -> Result<Container, EncodeError> {
    let mut items = Vec::with_capacity(entries.len());
    for (expected, (key, value)) in (1usize..).zip(entries) {
        let Key::Number(index) = key else {
            return Err(EncodeError::InvalidKeys);
        };
        if index != expected as f64 {
            return Err(EncodeError::SparseArray);
        }
        items.push(value);
    }
    Ok(Container::Array(items))
}

fn classify_object(entries: Vec<(Key, Value)>) -> Result<Container, EncodeError> {
    entries
        .into_iter()
        .map(|(key, value)| match key {
            Key::String(name) => Ok((name, value)),
            _ => Err(EncodeError::InvalidKeys),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Container::Object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_untagged_is_array() {
        assert_eq!(classify(&Table::new()), Ok(Container::Array(vec![])));
    }

    #[test]
    fn empty_map_origin_is_object() {
        let t = Table::with_kind(ContainerKind::Map);
        assert_eq!(classify(&t), Ok(Container::Object(vec![])));
    }

    #[test]
    fn contiguous_numeric_keys() {
        let t = Table::array([Value::from(1), Value::from(2), Value::from(3)]);
        assert_eq!(
            classify(&t),
            Ok(Container::Array(vec![
                Value::from(1),
                Value::from(2),
                Value::from(3)
            ]))
        );
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let t = Table::new();
        t.set(3, Value::from("c"));
        t.set(1, Value::from("a"));
        t.set(2, Value::from("b"));
        assert_eq!(
            classify(&t),
            Ok(Container::Array(vec![
                Value::from("a"),
                Value::from("b"),
                Value::from("c")
            ]))
        );
    }

    #[test]
    fn gap_is_sparse() {
        let t = Table::object([(1, Value::from("x")), (3, Value::from("y"))]);
        assert_eq!(classify(&t), Err(EncodeError::SparseArray));
    }

    #[test]
    fn zero_based_is_sparse() {
        let t = Table::object([(0, Value::from("x")), (1, Value::from("y"))]);
        assert_eq!(classify(&t), Err(EncodeError::SparseArray));
    }

    #[test]
    fn fractional_index_is_sparse() {
        let t = Table::object([(1.0, Value::from("x")), (1.5, Value::from("y"))]);
        assert_eq!(classify(&t), Err(EncodeError::SparseArray));
    }

    #[test]
    fn number_then_string_is_invalid() {
        let t = Table::new();
        t.set(1, Value::from("x"));
        t.set("b", Value::from("y"));
        assert_eq!(classify(&t), Err(EncodeError::InvalidKeys));
    }

    #[test]
    fn gap_before_string_key_is_sparse() {
        let t = Table::new();
        t.set(1, Value::Nil);
        t.set(3, Value::Nil);
        t.set("b", Value::Nil);
        assert_eq!(classify(&t), Err(EncodeError::SparseArray));
    }

    #[test]
    fn string_then_bool_is_invalid() {
        let t = Table::new();
        t.set("a", Value::from(1));
        t.set(true, Value::from(2));
        assert_eq!(classify(&t), Err(EncodeError::InvalidKeys));
    }

    #[test]
    fn bool_only_is_invalid() {
        let t = Table::object([(false, Value::from(1))]);
        assert_eq!(classify(&t), Err(EncodeError::InvalidKeys));
    }

    #[test]
    fn object_keys_come_sorted() {
        let t = Table::new();
        t.set("b", Value::from(2));
        t.set("a", Value::from(1));
        t.set("B", Value::from(0));
        let Ok(Container::Object(pairs)) = classify(&t) else {
            panic!("expected object");
        };
        let keys: Vec<&[u8]> = pairs.iter().map(|(k, _)| k.as_slice()).collect();
        assert_eq!(keys, vec![&b"B"[..], b"a", b"b"]);
    }

    #[test]
    fn map_origin_with_numeric_keys_is_array() {
        let t = Table::with_kind(ContainerKind::Map);
        t.set(1, Value::Bool(true));
        assert_eq!(classify(&t), Ok(Container::Array(vec![Value::Bool(true)])));
    }
}
